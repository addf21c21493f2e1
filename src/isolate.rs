//! The label scanner and main dispatch loop (engine components C4 and C5).

use std::io::{BufRead, Write};

use crate::env::Environment;
use crate::error::{bail, Code, Error, Result};
use crate::ops;
use crate::program::Program;

/// Why execution stopped.
#[derive(Debug)]
pub enum Halt {
  /// Ran off the end of the program.
  Done,
  /// `EXIT` with an operand in `0..=49`.
  Exit(i32),
}

/// Owns the [`Environment`] and instruction pointer for one run of a
/// [`Program`]. `input`/`output` are generic so the CLI can plug in stdio,
/// the REPL can plug in its own prompt-aware reader, and tests can plug in
/// in-memory buffers.
pub struct Isolate<'p, R, W> {
  program: &'p Program,
  env: Environment,
  ip: isize,
  input: R,
  output: W,
}

impl<'p, R: BufRead, W: Write> Isolate<'p, R, W> {
  pub fn new(program: &'p Program, input: R, output: W) -> Result<Isolate<'p, R, W>> {
    let mut env = Environment::new();
    scan_new_labels(program, &mut env, 0)?;
    Ok(Isolate { program, env, ip: -1, input, output })
  }

  /// Resumes a session with an already-populated [`Environment`] and
  /// instruction pointer, trusting the caller to have registered every
  /// `LABEL` up to `program`'s current length. Used by the interactive
  /// loader (C13), which rebuilds `program` one instruction at a time and
  /// must carry frames/stacks across each rebuild rather than starting
  /// fresh the way [`Isolate::new`] does.
  pub fn resume(program: &'p Program, env: Environment, ip: isize, input: R, output: W) -> Isolate<'p, R, W> {
    Isolate { program, env, ip, input, output }
  }

  /// Tears down this step, handing the environment and instruction pointer
  /// back to the caller so a later `resume` can pick up where this left
  /// off.
  pub fn into_parts(self) -> (Environment, isize) {
    (self.env, self.ip)
  }

  pub fn env(&self) -> &Environment {
    &self.env
  }

  pub fn ip(&self) -> isize {
    self.ip
  }

  pub fn set_ip(&mut self, ip: isize) {
    self.ip = ip;
  }

  /// Runs from the current instruction pointer until the program ends or
  /// `EXIT` is hit.
  pub fn run(&mut self) -> Result<Halt> {
    loop {
      self.ip += 1;
      let index = match usize::try_from(self.ip) {
        Ok(index) => index,
        Err(_) => bail!(Code::Internal, "instruction pointer went negative"),
      };
      let Some(instruction) = self.program.get(index) else {
        return Ok(Halt::Done);
      };
      if let Some(code) = ops::execute(instruction, &mut self.env, &mut self.ip, &mut self.input, &mut self.output)? {
        return Ok(Halt::Exit(code));
      }
    }
  }
}

/// Pass 1: walk every instruction from `from_index` onward, registering
/// `LABEL` positions before any instruction executes. Indices are the
/// program's own order, so a forward reference to a label later in the
/// file resolves correctly. [`Isolate::new`] scans from `0`; the
/// interactive loader calls this directly with the index of just the line
/// it appended, so labels already registered in a carried-over
/// `Environment` are not re-registered (which would otherwise look like a
/// duplicate definition).
pub fn scan_new_labels(program: &Program, env: &mut Environment, from_index: usize) -> Result<()> {
  use crate::program::{Argument, Opcode};

  for index in from_index..program.len() {
    let instruction = program.get(index).expect("index within program bounds");
    if instruction.opcode != Opcode::Label {
      continue;
    }
    let Some(Argument::Label(name)) = instruction.args.first() else {
      bail!(Code::Semantic, "LABEL instruction missing its name operand");
    };
    env.register_label(name.clone(), index)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;
  use std::rc::Rc;

  use super::*;
  use crate::program::{Argument, FrameSelector, Instruction, Opcode};
  use crate::value::Value;

  fn instr(order: u32, opcode: Opcode, args: Vec<Argument>) -> Instruction {
    Instruction { order, opcode, args }
  }

  #[test]
  fn label_scan_is_forward_reference_safe() {
    let program = Program::new(vec![
      instr(1, Opcode::Jump, vec![Argument::Label(Rc::from("end"))]),
      instr(2, Opcode::Label, vec![Argument::Label(Rc::from("end"))]),
    ]);
    let input = Cursor::new(Vec::new());
    let output = Vec::new();
    let isolate = Isolate::new(&program, input, output).unwrap();
    assert_eq!(isolate.env().resolve_label("end").unwrap(), 1);
  }

  #[test]
  fn run_halts_done_past_end_of_program() {
    let program = Program::new(vec![instr(
      1,
      Opcode::DefVar,
      vec![Argument::Var(crate::program::Address {
        frame: FrameSelector::Global,
        name: Rc::from("x"),
      })],
    )]);
    let input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    let mut isolate = Isolate::new(&program, input, &mut output).unwrap();
    assert!(matches!(isolate.run().unwrap(), Halt::Done));
  }

  #[test]
  fn exit_halts_with_operand_code() {
    let program = Program::new(vec![instr(
      1,
      Opcode::Exit,
      vec![Argument::Value(Value::Int(9))],
    )]);
    let input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    let mut isolate = Isolate::new(&program, input, &mut output).unwrap();
    match isolate.run().unwrap() {
      Halt::Exit(code) => assert_eq!(code, 9),
      Halt::Done => panic!("expected EXIT"),
    }
  }
}
