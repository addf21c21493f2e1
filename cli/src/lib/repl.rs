//! The interactive prompt (supplemental engine collaborator C13): the same
//! engine driven by a program that grows one line at a time, per §9
//! "Interactive mode as a dynamic program".
//!
//! A runtime error discards the just-entered instruction and keeps the
//! session alive (§7); a line that fails to parse is discarded the same
//! way without ever reaching the engine.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ippvm::env::Environment;
use ippvm::error::{Code, Error};
use ippvm::isolate::scan_new_labels;
use ippvm::program::{Instruction, Program};
use ippvm::{Halt, Isolate};
use ippvm_lexer::Lexer;

use crate::common::InputArgs;
use crate::report::print_error;
use crate::text_loader::parse_line;

/// Drives one interactive session to completion, returning the process
/// exit code: `0` on EOF, or `EXIT`'s operand if the guest calls it.
pub fn run(args: &InputArgs) -> Result<i32, Error> {
  let mut editor = DefaultEditor::new()
    .map_err(|e| Error::new(Code::Internal, format!("failed to start the line editor: {e}")))?;

  let mut input = args.open_input()?;
  let stdout = std::io::stdout();
  let mut output = stdout.lock();

  let mut program = Program::new(Vec::new());
  let mut env = Environment::new();
  // Mirrors the post-`Halt::Done` invariant (`ip == program.len()`) for the
  // empty program the session starts with, so the first appended line is
  // resumed at the same `ip - 1` offset every later line uses.
  let mut ip: isize = 0;

  loop {
    let line = match editor.readline("ipp> ") {
      Ok(line) => line,
      Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(0),
      Err(e) => return Err(Error::new(Code::Internal, format!("line editor error: {e}"))),
    };
    let _ = editor.add_history_entry(line.as_str());

    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let instruction = match parse_one_line(trimmed, program.len() as u32 + 1) {
      Ok(instruction) => instruction,
      Err(e) => {
        print_error(&e);
        continue;
      }
    };

    program.push(instruction);
    let new_index = program.len() - 1;
    if let Err(e) = scan_new_labels(&program, &mut env, new_index) {
      print_error(&e);
      program.retract_last();
      continue;
    }

    let mut isolate = Isolate::resume(&program, env, ip - 1, &mut input, &mut output);
    let result = isolate.run();
    let (new_env, new_ip) = isolate.into_parts();
    env = new_env;
    ip = new_ip;

    match result {
      Ok(Halt::Done) => {}
      Ok(Halt::Exit(code)) => return Ok(code),
      Err(e) => {
        print_error(&e);
        program.retract_last();
      }
    }
  }
}

/// Tokenizes and decodes a single instruction line, the REPL's equivalent
/// of one line of the `.IPPcode19` plain-text dialect (minus the header,
/// which the interactive session never expects).
fn parse_one_line(line: &str, order: u32) -> Result<Instruction, Error> {
  let lexer = Lexer::lex(line).map_err(|errors| {
    let first = errors.into_iter().next().expect("lex error list is non-empty");
    Error::new(Code::Structural, first.message.to_string())
  })?;
  let mut lines = lexer.lines();
  let Some(tokens) = lines.next() else {
    return Err(Error::new(Code::Structural, "empty instruction line"));
  };
  parse_line(order, tokens)
}
