#![allow(non_camel_case_types)]

use beef::lean::Cow;
use logos::Logos;
use span::Span;

use crate::Error;

/// A single whitespace-delimited word: an opcode name, a `TYPE@VALUE`
/// argument, a `FRAME@name` variable, or a bare label/type name.
#[derive(Clone, Debug)]
pub struct Token<'src> {
  pub lexeme: Cow<'src, str>,
  pub kind: TokenKind,
  pub span: Span,
}

pub struct Lexer<'src> {
  tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
  /// Tokenizes `src` into words and end-of-line markers. Whitespace and `#`
  /// comments are discarded; a `.source` directive line (as used by the
  /// `.IPPcode19` header) lexes like any other line — deciding what a line
  /// of words *means* is the loader's job, not the lexer's.
  pub fn lex(src: &'src str) -> Result<Self, Vec<Error>> {
    let mut errors = vec![];
    let mut tokens = vec![];
    let mut lexer = logos::Lexer::<'src, TokenKind>::new(src);
    while let Some(kind) = lexer.next() {
      let lexeme = lexer.slice();
      let span: Span = lexer.span().into();

      match kind {
        TokenKind::_Whitespace | TokenKind::_Comment => continue,
        TokenKind::_Error => {
          errors.push(Error::new(format!("unexpected character {lexeme:?}"), span));
          continue;
        }
        _ => tokens.push(Token { lexeme: lexeme.into(), kind, span }),
      }
    }

    if !errors.is_empty() {
      Err(errors)
    } else {
      Ok(Lexer { tokens })
    }
  }

  pub fn tokens(&self) -> &[Token<'src>] {
    &self.tokens
  }

  /// Splits the already-tokenized stream into per-line slices, skipping
  /// blank lines (an `Eol` directly following another `Eol` or the start).
  pub fn lines(&self) -> impl Iterator<Item = &[Token<'src>]> {
    self.tokens.split(|t| t.kind == TokenKind::Eol).filter(|line| !line.is_empty())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Logos)]
pub enum TokenKind {
  #[regex(r"[ \t]+", logos::skip)]
  _Whitespace,

  #[regex(r"#[^\n]*", logos::skip)]
  _Comment,

  #[token("\n")]
  Eol,

  #[regex(r"[^ \t\n]+")]
  Word,

  #[error]
  _Error,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn words(src: &str) -> Vec<&str> {
    Lexer::lex(src)
      .unwrap()
      .tokens()
      .iter()
      .filter(|t| t.kind == TokenKind::Word)
      .map(|t| t.lexeme.as_ref())
      .collect()
  }

  #[test]
  fn splits_on_whitespace_and_strips_comments() {
    assert_eq!(words("MOVE GF@x int@1 # comment\n"), vec!["MOVE", "GF@x", "int@1"]);
  }

  #[test]
  fn lines_groups_words_by_newline() {
    let lexer = Lexer::lex("DEFVAR GF@x\nMOVE GF@x int@1\n").unwrap();
    let lines: Vec<Vec<&str>> = lexer
      .lines()
      .map(|line| line.iter().map(|t| t.lexeme.as_ref()).collect())
      .collect();
    assert_eq!(lines, vec![vec!["DEFVAR", "GF@x"], vec!["MOVE", "GF@x", "int@1"]]);
  }

  #[test]
  fn blank_lines_are_skipped() {
    let lexer = Lexer::lex("MOVE GF@x int@1\n\n\nWRITE GF@x\n").unwrap();
    assert_eq!(lexer.lines().count(), 2);
  }
}
