//! Loads a [`Program`] from IPPcode19's canonical XML representation.
//!
//! ```xml
//! <program language="IPPcode19">
//!   <instruction order="1" opcode="MOVE">
//!     <arg1 type="var">GF@x</arg1>
//!     <arg2 type="int">42</arg2>
//!   </instruction>
//! </program>
//! ```
//!
//! The `type` attribute on each `argN` element names its shape directly —
//! `var`, `label`, `type`, or a value kind (`int`/`bool`/`string`/`float`/
//! `nil`) — so, unlike the text dialect, no opcode-specific arity table is
//! needed here: each argument carries enough information to decode itself.

use std::rc::Rc;

use ippvm::error::{bail, Code, Error};
use ippvm::program::{Address, Argument, FrameSelector, Instruction, Opcode, Program};
use ippvm::value::{Kind, Value};
use ippvm::{ProgramLoader, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct XmlLoader<'a> {
  pub source: &'a str,
}

impl<'a> ProgramLoader for XmlLoader<'a> {
  fn load(&self) -> Result<Program> {
    parse(self.source)
  }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
  Error::new(Code::MalformedXml, e.to_string())
}

fn parse(source: &str) -> Result<Program> {
  let mut reader = Reader::from_str(source);
  reader.trim_text(true);

  let mut instructions = Vec::new();
  let mut buf = Vec::new();
  let mut saw_program_root = false;

  loop {
    match reader.read_event_into(&mut buf).map_err(xml_error)? {
      Event::Eof => break,
      Event::Start(tag) if tag.name().as_ref() == b"program" => {
        saw_program_root = true;
        let language = attr(&tag, "language")?;
        if language != "IPPcode19" {
          bail!(Code::Structural, "<program> language attribute must be \"IPPcode19\", found {language:?}");
        }
      }
      Event::Start(tag) if tag.name().as_ref() == b"instruction" => {
        instructions.push(parse_instruction(&mut reader, &tag)?);
      }
      Event::Empty(tag) if tag.name().as_ref() == b"instruction" => {
        instructions.push(parse_empty_instruction(&tag)?);
      }
      _ => {}
    }
    buf.clear();
  }

  if !saw_program_root {
    bail!(Code::Structural, "missing root <program> element");
  }

  instructions.sort_by_key(|i: &Instruction| i.order);
  Program::from_sorted(instructions)
}

fn attr(tag: &BytesStart<'_>, name: &str) -> Result<String> {
  tag
    .try_get_attribute(name)
    .map_err(xml_error)?
    .ok_or_else(|| Error::new(Code::Structural, format!("missing {name} attribute")))?
    .unescape_value()
    .map_err(xml_error)
    .map(|v| v.into_owned())
}

fn instruction_header(tag: &BytesStart<'_>) -> Result<(u32, Opcode)> {
  let order: u32 = attr(tag, "order")?
    .parse()
    .map_err(|_| Error::new(Code::Structural, "instruction order must be an integer"))?;
  let opcode_name = attr(tag, "opcode")?;
  if opcode_name != opcode_name.to_ascii_uppercase() {
    bail!(Code::Structural, "opcode attribute {opcode_name:?} must be all-uppercase");
  }
  let opcode = Opcode::from_name(&opcode_name)
    .ok_or_else(|| Error::new(Code::Structural, format!("unknown opcode {opcode_name}")))?;
  Ok((order, opcode))
}

/// A self-closing `<instruction .../>` has no argument children.
fn parse_empty_instruction(tag: &BytesStart<'_>) -> Result<Instruction> {
  let (order, opcode) = instruction_header(tag)?;
  Ok(Instruction { order, opcode, args: Vec::new() })
}

fn parse_instruction(reader: &mut Reader<&[u8]>, tag: &BytesStart<'_>) -> Result<Instruction> {
  let (order, opcode) = instruction_header(tag)?;

  let mut raw_args: Vec<(String, String, String)> = Vec::new();
  let mut buf = Vec::new();
  loop {
    match reader.read_event_into(&mut buf).map_err(xml_error)? {
      Event::End(end) if end.name().as_ref() == b"instruction" => break,
      Event::Start(arg_tag) => {
        let tag_name = String::from_utf8_lossy(arg_tag.name().as_ref()).into_owned();
        let kind = arg_type_attr(&arg_tag)?;
        let text = read_text(reader)?;
        raw_args.push((tag_name, kind, text));
      }
      Event::Empty(arg_tag) => {
        let tag_name = String::from_utf8_lossy(arg_tag.name().as_ref()).into_owned();
        let kind = arg_type_attr(&arg_tag)?;
        raw_args.push((tag_name, kind, String::new()));
      }
      Event::Eof => bail!(Code::MalformedXml, "unexpected end of document inside instruction"),
      _ => {}
    }
    buf.clear();
  }
  raw_args.sort_by(|a, b| a.0.cmp(&b.0));
  check_arg_index_density(&raw_args)?;

  let args = raw_args
    .into_iter()
    .map(|(_, kind, text)| parse_argument(&kind, &text))
    .collect::<Result<Vec<_>>>()?;

  Ok(Instruction { order, opcode, args })
}

fn arg_type_attr(tag: &BytesStart<'_>) -> Result<String> {
  let kind = attr(tag, "type")?;
  if kind != kind.to_ascii_lowercase() {
    bail!(Code::Structural, "argument type attribute {kind:?} must be all-lowercase");
  }
  Ok(kind)
}

/// `argN` tag names must be exactly `arg1..argK` with no gaps or repeats,
/// mirroring the order-density invariant the engine enforces for
/// instructions themselves.
fn check_arg_index_density(raw_args: &[(String, String, String)]) -> Result<()> {
  for (index, (tag_name, _, _)) in raw_args.iter().enumerate() {
    let expected = format!("arg{}", index + 1);
    if *tag_name != expected {
      bail!(
        Code::Structural,
        "argument tags must be arg1..arg{} with no gaps or duplicates, found <{tag_name}>",
        raw_args.len()
      );
    }
  }
  Ok(())
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
  let mut buf = Vec::new();
  let mut text = String::new();
  loop {
    match reader.read_event_into(&mut buf).map_err(xml_error)? {
      Event::Text(t) => text.push_str(&t.unescape().map_err(xml_error)?),
      Event::End(_) => break,
      Event::Start(child) => {
        let name = String::from_utf8_lossy(child.name().as_ref()).into_owned();
        bail!(Code::Structural, "argument element must not contain a child element <{name}>");
      }
      Event::Eof => bail!(Code::MalformedXml, "unexpected end of document inside argument"),
      _ => {}
    }
    buf.clear();
  }
  Ok(text)
}

fn parse_argument(kind: &str, text: &str) -> Result<Argument> {
  let trimmed = text.trim();
  match kind {
    "var" => {
      let (frame, name) = trimmed
        .split_once('@')
        .ok_or_else(|| Error::new(Code::Structural, format!("{trimmed} is not a valid variable")))?;
      let frame = FrameSelector::from_prefix(frame)
        .ok_or_else(|| Error::new(Code::Structural, format!("{frame} is not a valid frame")))?;
      Ok(Argument::Var(Address { frame, name: Rc::from(name) }))
    }
    "label" => Ok(Argument::Label(Rc::from(trimmed))),
    "type" => Kind::from_name(trimmed)
      .map(Argument::Type)
      .ok_or_else(|| Error::new(Code::Structural, format!("{trimmed} is not a type name"))),
    "int" => trimmed
      .parse::<i64>()
      .map(|v| Argument::Value(Value::Int(v)))
      .map_err(|_| Error::new(Code::Structural, format!("{trimmed} is not a valid int"))),
    "float" => ippvm::io::parse_hex_float(trimmed)
      .or_else(|_| trimmed.parse::<f64>().map_err(|_| Error::new(Code::Structural, "not a float")))
      .map(|v| Argument::Value(Value::Float(v))),
    "bool" => match trimmed {
      "true" => Ok(Argument::Value(Value::Bool(true))),
      "false" => Ok(Argument::Value(Value::Bool(false))),
      _ => bail!(Code::Structural, "{trimmed} is not a valid bool"),
    },
    "string" => ippvm::io::unescape(text).map(|s| Argument::Value(Value::str(s))),
    "nil" => Ok(Argument::Value(Value::Nil)),
    other => bail!(Code::Structural, "unrecognized argument type {other}"),
  }
}

#[cfg(test)]
mod tests {
  use indoc::indoc;

  use super::*;

  #[test]
  fn parses_instruction_with_out_of_order_args() {
    let source = indoc! {r#"
      <?xml version="1.0" encoding="UTF-8"?>
      <program language="IPPcode19">
        <instruction order="1" opcode="MOVE">
          <arg2 type="int">42</arg2>
          <arg1 type="var">GF@x</arg1>
        </instruction>
      </program>
    "#};
    let program = XmlLoader { source }.load().unwrap();
    assert_eq!(program.len(), 1);
    let instr = program.get(0).unwrap();
    assert_eq!(instr.opcode, Opcode::Move);
    assert!(matches!(instr.args[0], Argument::Var(_)));
    assert!(matches!(instr.args[1], Argument::Value(Value::Int(42))));
  }

  #[test]
  fn rejects_document_without_program_root() {
    let source = "<not_a_program></not_a_program>";
    assert!(XmlLoader { source }.load().is_err());
  }

  #[test]
  fn sorts_instructions_by_order_attribute() {
    let source = indoc! {r#"
      <program language="IPPcode19">
        <instruction order="2" opcode="WRITE"><arg1 type="string">b</arg1></instruction>
        <instruction order="1" opcode="WRITE"><arg1 type="string">a</arg1></instruction>
      </program>
    "#};
    let program = XmlLoader { source }.load().unwrap();
    assert_eq!(program.get(0).unwrap().order, 1);
    assert_eq!(program.get(1).unwrap().order, 2);
  }
}
