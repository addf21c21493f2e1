//! Loads a [`Program`] from the plain-text IPPcode19 dialect: one
//! instruction per line, tokenized by `ippvm_lexer`. This is a supplemental
//! convenience format, not the canonical XML one — see `xml_loader`.

use std::rc::Rc;

use ippvm::error::{bail, Code, Error};
use ippvm::program::{Address, Argument, FrameSelector, Instruction, Opcode, Program};
use ippvm::value::{Kind, Value};
use ippvm::{ProgramLoader, Result};
use ippvm_lexer::Lexer;

/// Renders the first lex error as an `ippvm_diag::Report` with a source
/// snippet pointing at the offending span, the one load-error path in this
/// crate where a precise span actually survives to the point of reporting
/// (see §4.8's note that most structural errors are plain messages).
fn lex_error(source: &str, errors: Vec<ippvm_lexer::Error>) -> Error {
  let first = errors.into_iter().next().expect("lex error list is non-empty");
  let rendered = ippvm_diag::Report::error()
    .source(source)
    .span(first.span)
    .message(first.message.to_string())
    .color(false)
    .build()
    .emit_to_string()
    .unwrap_or_else(|_| first.message.to_string());
  Error::new(Code::Structural, rendered)
}

/// The shape an instruction's Nth word must have.
#[derive(Clone, Copy)]
enum Shape {
  /// `Var` or `Value` (a symbol/constant in spec terms).
  Symb,
  Var,
  Label,
  Type,
}

/// The operand shapes each opcode expects, in order. Mirrors the arity/type
/// table the original interpreter checks each instruction against.
fn shapes(opcode: Opcode) -> &'static [Shape] {
  use Opcode::*;
  use Shape::*;
  match opcode {
    CreateFrame | PushFrame | PopFrame | Return | Break | Clears | Label | Adds | Subs | Muls
    | Idivs | Lts | Gts | Eqs | Ands | Ors | Nots | Int2Chars | Stri2Ints => &[],
    DefVar | PopS => &[Var],
    PushS | Write | DPrint | PrintInst | Exit => &[Symb],
    Call | Jump | JumpIfEqs | JumpIfNeqs => &[Shape::Label],
    Move | Not | Strlen | Int2Float | Float2Int | Int2Char | Type => &[Var, Symb],
    Add | Sub | Mul | IDiv | Div | Lt | Gt | Eq | And | Or | Stri2Int | Concat | GetChar
    | SetChar => &[Var, Symb, Symb],
    Read => &[Var, Type],
    JumpIfEq | JumpIfNeq => &[Shape::Label, Symb, Symb],
  }
}

pub struct TextLoader<'a> {
  pub source: &'a str,
}

impl<'a> ProgramLoader for TextLoader<'a> {
  fn load(&self) -> Result<Program> {
    parse(self.source)
  }
}

fn parse(source: &str) -> Result<Program> {
  let lexer = Lexer::lex(source).map_err(|errors| lex_error(source, errors))?;

  let mut lines = lexer.lines().peekable();

  match lines.peek() {
    Some(header) if header.len() == 1 && header[0].lexeme.eq_ignore_ascii_case(".ippcode19") => {
      lines.next();
    }
    _ => bail!(Code::Structural, "program must start with a .IPPcode19 header line"),
  }

  let mut instructions = Vec::new();
  for (index, line) in lines.enumerate() {
    let order = (index + 1) as u32;
    if line.is_empty() {
      continue;
    }
    instructions.push(parse_line(order, line)?);
  }

  Ok(Program::new(instructions))
}

/// Decodes one already-tokenized line (an opcode word plus its operand
/// words) into an [`Instruction`]. Shared by [`TextLoader`] (one call per
/// program line) and the interactive REPL (one call per line typed at the
/// prompt).
pub fn parse_line(order: u32, line: &[ippvm_lexer::Token<'_>]) -> Result<Instruction> {
  let Some((name_token, operand_tokens)) = line.split_first() else {
    bail!(Code::Structural, "empty instruction line");
  };
  let name = name_token.lexeme.to_ascii_uppercase();
  let opcode = Opcode::from_name(&name)
    .ok_or_else(|| Error::new(Code::Structural, format!("unknown opcode {name}")))?;

  let expected = shapes(opcode);
  if expected.len() != operand_tokens.len() {
    bail!(
      Code::Structural,
      "{name} expects {} operand(s), found {}",
      expected.len(),
      operand_tokens.len()
    );
  }

  let mut args = Vec::with_capacity(operand_tokens.len());
  for (shape, token) in expected.iter().zip(operand_tokens) {
    args.push(parse_operand(*shape, &token.lexeme)?);
  }

  Ok(Instruction { order, opcode, args })
}

fn parse_operand(shape: Shape, word: &str) -> Result<Argument> {
  match shape {
    Shape::Label => Ok(Argument::Label(Rc::from(word))),
    Shape::Type => Kind::from_name(word)
      .map(Argument::Type)
      .ok_or_else(|| Error::new(Code::Structural, format!("{word} is not a type name"))),
    Shape::Var => parse_var(word).map(Argument::Var),
    Shape::Symb => {
      if let Some((frame, _)) = word.split_once('@') {
        if matches!(frame, "GF" | "LF" | "TF") {
          return parse_var(word).map(Argument::Var);
        }
      }
      parse_value(word).map(Argument::Value)
    }
  }
}

fn parse_var(word: &str) -> Result<Address> {
  let (frame, name) = word
    .split_once('@')
    .ok_or_else(|| Error::new(Code::Structural, format!("{word} is not a valid variable")))?;
  let frame = FrameSelector::from_prefix(frame)
    .ok_or_else(|| Error::new(Code::Structural, format!("{frame} is not a valid frame")))?;
  Ok(Address { frame, name: Rc::from(name) })
}

fn parse_value(word: &str) -> Result<Value> {
  let (kind, raw) = word
    .split_once('@')
    .ok_or_else(|| Error::new(Code::Structural, format!("{word} is not a valid constant")))?;
  match kind {
    "int" => raw
      .parse::<i64>()
      .map(Value::Int)
      .map_err(|_| Error::new(Code::Structural, format!("{raw} is not a valid int literal"))),
    "float" => ippvm::io::parse_hex_float(raw)
      .or_else(|_| raw.parse::<f64>().map_err(|_| Error::new(Code::Structural, "not a float")))
      .map(Value::Float),
    "bool" => match raw {
      "true" => Ok(Value::Bool(true)),
      "false" => Ok(Value::Bool(false)),
      _ => bail!(Code::Structural, "{raw} is not a valid bool literal"),
    },
    "string" => ippvm::io::unescape(raw).map(Value::str),
    "nil" if raw == "nil" => Ok(Value::Nil),
    _ => bail!(Code::Structural, "{kind}@{raw} is not a recognized constant"),
  }
}
