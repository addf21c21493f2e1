//! The interpreter's error/exit-code model (engine component C8).
//!
//! Every fallible operation in this crate returns `Result<T, Error>`. An
//! [`Error`] carries the [`Code`] that decides the process exit status, so
//! the CLI layer never has to re-derive it from a message string.

use std::fmt;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The taxonomy of non-zero exit codes this interpreter can produce.
///
/// `EXIT`'s own operand-controlled code (0..=49) is not represented here: it
/// is returned directly as a successful halt, not as an `Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Code {
  /// Bad CLI invocation (missing/extra/unknown arguments).
  Usage = 1,
  /// Input is not well-formed XML.
  MalformedXml = 31,
  /// XML is well-formed but violates the expected structure, or a textual
  /// program is lexically invalid.
  Structural = 32,
  /// Undefined label, redefined variable/label, wrong number or kind of
  /// arguments, or any other static semantic error.
  Semantic = 52,
  /// An operand has the wrong runtime type.
  OperandType = 53,
  /// Access to an undefined variable (declared but never assigned).
  UndefinedVariable = 54,
  /// Access to a non-existent frame (undeclared TF, empty LF stack).
  NoSuchFrame = 55,
  /// Missing value: reading an undeclared variable, or popping an empty
  /// stack.
  MissingValue = 56,
  /// A value used as an operand is invalid (division by zero, `EXIT` code
  /// out of range).
  InvalidValue = 57,
  /// A string operation failed (index out of range, bad conversion).
  StringOp = 58,
  /// Internal error with no better-fitting code; not produced for any
  /// conforming program.
  Internal = 99,
}

impl Code {
  pub fn exit_code(self) -> i32 {
    self as i32
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.exit_code())
  }
}

/// An interpreter error: a [`Code`] plus a human-readable explanation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
  pub code: Code,
  pub message: String,
}

impl Error {
  pub fn new(code: Code, message: impl Into<String>) -> Error {
    Error { code, message: message.into() }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl std::error::Error for Error {}

/// Build and return an [`Error`] in one expression, mirroring the `bail!`
/// convention other interpreters use for "construct and early-return".
macro_rules! bail {
  ($code:expr, $($arg:tt)*) => {
    return Err($crate::error::Error::new($code, format!($($arg)*)))
  };
}

pub use bail;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exit_codes_match_spec_taxonomy() {
    assert_eq!(Code::MalformedXml.exit_code(), 31);
    assert_eq!(Code::Structural.exit_code(), 32);
    assert_eq!(Code::Semantic.exit_code(), 52);
    assert_eq!(Code::OperandType.exit_code(), 53);
    assert_eq!(Code::UndefinedVariable.exit_code(), 54);
    assert_eq!(Code::NoSuchFrame.exit_code(), 55);
    assert_eq!(Code::MissingValue.exit_code(), 56);
    assert_eq!(Code::InvalidValue.exit_code(), 57);
    assert_eq!(Code::StringOp.exit_code(), 58);
  }
}
