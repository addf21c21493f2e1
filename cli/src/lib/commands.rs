//! The host's top-level commands: `run` (the default), `disassemble`, and
//! the interactive REPL, wired to `ippvm`'s [`Isolate`] and this crate's
//! loaders.

use std::io;

use clap::Subcommand;
use ippvm::{Code, Error, Halt, Isolate};

use crate::common::InputArgs;
use crate::report::print_error;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
  /// Load and run an IPPcode19 program [default].
  Run(InputArgs),
  /// Print the loaded program's instructions instead of running it.
  #[clap(visible_alias = "dis")]
  Disassemble(InputArgs),
}

impl Command {
  pub fn run(input: InputArgs) -> Self {
    Self::Run(input)
  }

  /// Runs the command to completion and returns the process exit code,
  /// mirroring the `§6` exit-code contract: `0` on normal termination,
  /// `EXIT`'s own operand on a guest `EXIT`, and a taxonomy code otherwise.
  pub fn execute(self) -> i32 {
    let result = match self {
      Command::Run(args) => handle_run(args),
      Command::Disassemble(args) => handle_disassemble(args),
    };
    match result {
      Ok(code) => code,
      Err(e) => {
        print_error(&e);
        e.code.exit_code()
      }
    }
  }
}

fn handle_run(args: InputArgs) -> Result<i32, Error> {
  args.validate()?;

  if args.interactive {
    return crate::repl::run(&args);
  }

  let program = args.load_program()?;
  let mut input = args.open_input()?;
  let stdout = io::stdout();
  let mut output = stdout.lock();

  let mut isolate = Isolate::new(&program, &mut input, &mut output)?;
  match isolate.run()? {
    Halt::Done => Ok(0),
    Halt::Exit(code) => Ok(code),
  }
}

fn handle_disassemble(args: InputArgs) -> Result<i32, Error> {
  if args.interactive {
    return Err(Error::new(Code::Usage, "-i is incompatible with disassemble"));
  }
  let program = args.load_program()?;
  for instr in program.iter() {
    println!("{instr}");
  }
  Ok(0)
}
