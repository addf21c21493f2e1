//! Interfaces a concrete program source must implement (engine component
//! C9). The XML loader, the plain-text loader and the REPL's line-by-line
//! loader each live outside this crate (in the `ippvm-cli` binary) and
//! implement [`ProgramLoader`] to hand this crate a [`Program`] without the
//! engine ever depending on an XML or lexer crate itself.

use crate::error::Result;
use crate::program::Program;

/// Parses a complete program from some external representation into the
/// engine's [`Program`] model.
pub trait ProgramLoader {
  fn load(&self) -> Result<Program>;
}

/// A `ProgramLoader` built from an already-decoded [`Program`], useful for
/// tests and for the REPL (which builds its `Program` incrementally rather
/// than parsing it all at once).
impl ProgramLoader for Program {
  fn load(&self) -> Result<Program> {
    Ok(self.clone())
  }
}
