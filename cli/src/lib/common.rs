//! Shared CLI argument surface (engine component C9's concrete host side):
//! `--source`, `--input`, `--text`, `-i`, wired to whichever loader and
//! `InputSource` the run needs.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use clap::Args;
use ippvm::program::Program;
use ippvm::{Code, Error, ProgramLoader};

use crate::text_loader::TextLoader;
use crate::xml_loader::XmlLoader;

#[derive(Clone, Debug, Default, Args)]
pub struct InputArgs {
  /// XML program file. If omitted (and `-i` is not given), the program is
  /// read from stdin.
  #[arg(long, value_name = "PATH")]
  pub source: Option<PathBuf>,

  /// File supplying the lines `READ` consumes. If omitted, `READ` pulls
  /// from stdin.
  #[arg(long, value_name = "PATH")]
  pub input: Option<PathBuf>,

  /// Parse `--source` (or stdin) as the line-oriented plain-text dialect
  /// instead of XML.
  #[arg(long)]
  pub text: bool,

  /// Read and execute instructions one line at a time from stdin instead
  /// of loading a complete program. Incompatible with `--source`.
  #[arg(short = 'i', long = "interactive")]
  pub interactive: bool,
}

impl InputArgs {
  /// Validates the `§6 Host CLI surface` constraints that cut across
  /// individual flags: `-i` rules out `--source`, and a non-interactive
  /// run needs at least one of `--source`/`--input` (both missing would
  /// mean both the program and `READ`'s input are ambiguously "from
  /// stdin").
  pub fn validate(&self) -> Result<(), Error> {
    if self.interactive && self.source.is_some() {
      return Err(Error::new(Code::Usage, "-i is incompatible with --source"));
    }
    if !self.interactive && self.source.is_none() && self.input.is_none() {
      return Err(Error::new(
        Code::Usage,
        "at least one of --source or --input is required in non-interactive mode",
      ));
    }
    Ok(())
  }

  /// Reads the complete program text, from `--source` or stdin.
  pub fn read_source(&self) -> Result<String, Error> {
    match &self.source {
      Some(path) => std::fs::read_to_string(path)
        .map_err(|e| Error::new(Code::Usage, format!("failed to read {}: {e}", path.display()))),
      None => {
        let mut buf = String::new();
        io::stdin()
          .read_to_string(&mut buf)
          .map_err(|e| Error::new(Code::Usage, format!("failed to read program from stdin: {e}")))?;
        Ok(buf)
      }
    }
  }

  /// Loads a complete [`Program`] using the loader selected by `--text`.
  pub fn load_program(&self) -> Result<Program, Error> {
    let source = self.read_source()?;
    if self.text {
      TextLoader { source: &source }.load()
    } else {
      XmlLoader { source: &source }.load()
    }
  }

  /// Opens the `READ` input source: `--input` if given, else stdin.
  pub fn open_input(&self) -> Result<Box<dyn BufRead>, Error> {
    match &self.input {
      Some(path) => {
        let file = File::open(path)
          .map_err(|e| Error::new(Code::Usage, format!("failed to open {}: {e}", path.display())))?;
        Ok(Box::new(BufReader::new(file)))
      }
      None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
  }

  pub fn name(&self) -> std::borrow::Cow<'static, str> {
    match &self.source {
      Some(p) => p.display().to_string().into(),
      None => "<stdin>".into(),
    }
  }
}
