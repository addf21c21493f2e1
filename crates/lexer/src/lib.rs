//! Tokenizer for IPPcode19's supplemental plain-text dialect: one
//! instruction per line, whitespace-separated words, `#` starts a
//! line comment. This is not part of the canonical XML representation —
//! it exists so the CLI's `--text` flag and its REPL can accept the same
//! opcode/operand words without round-tripping through XML first.

use beef::lean::Cow;
use span::Span;

pub mod lexer;

pub use lexer::{Lexer, Token, TokenKind};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug)]
pub struct Error {
  pub message: Cow<'static, str>,
  pub span: Span,
}

impl Error {
  pub fn new(message: impl Into<Cow<'static, str>>, span: impl Into<Span>) -> Self {
    Error { message: message.into(), span: span.into() }
  }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let Error { message, span } = self;
    write!(f, "error at {span}: {message}")
  }
}
