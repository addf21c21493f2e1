//! Opcode semantics (engine component C6).
//!
//! `execute` is the single dispatch point the isolate's run loop calls once
//! per decoded instruction. It returns `Ok(Some(code))` only for `EXIT`,
//! which is the one opcode allowed to stop the run loop on success.

use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::env::Environment;
use crate::error::{bail, Code, Error, Result};
use crate::io::{format_hex_float, parse_hex_float};
use crate::program::{Argument, Instruction, Opcode};
use crate::value::{Kind, Value};

pub fn execute<R: BufRead, W: Write>(
  instr: &Instruction,
  env: &mut Environment,
  ip: &mut isize,
  input: &mut R,
  output: &mut W,
) -> Result<Option<i32>> {
  use Opcode::*;

  match instr.opcode {
    // --- frame / variable lifecycle ---------------------------------
    Move => {
      let dst = var_arg(instr, 0)?;
      let value = resolve(env, instr, 1)?;
      env.store(dst, value)?;
    }
    CreateFrame => env.create_frame(),
    PushFrame => env.push_frame()?,
    PopFrame => env.pop_frame()?,
    DefVar => env.define(var_arg(instr, 0)?)?,

    // --- control flow -------------------------------------------------
    Call => {
      let target = label_arg(instr, 0)?;
      let dest = env.resolve_label(target)?;
      env.push_return(*ip);
      *ip = dest as isize - 1;
    }
    Return => {
      *ip = env.pop_return()?;
    }
    Label => {}
    Jump => {
      let target = label_arg(instr, 0)?;
      *ip = env.resolve_label(target)? as isize;
    }
    JumpIfEq | JumpIfNeq => {
      let target = label_arg(instr, 0)?;
      let a = resolve(env, instr, 1)?;
      let b = resolve(env, instr, 2)?;
      let eq = same_kind_equal(&a, &b)?;
      let take = if instr.opcode == JumpIfEq { eq } else { !eq };
      if take {
        *ip = env.resolve_label(target)? as isize;
      }
    }
    JumpIfEqs | JumpIfNeqs => {
      let target = label_arg(instr, 0)?;
      let b = env.pop_value()?;
      let a = env.pop_value()?;
      let eq = same_kind_equal(&a, &b)?;
      let take = if instr.opcode == JumpIfEqs { eq } else { !eq };
      if take {
        *ip = env.resolve_label(target)? as isize;
      }
    }
    Exit => {
      let value = resolve(env, instr, 0)?;
      let code = value.as_int().ok_or_else(|| {
        Error::new(Code::OperandType, "EXIT operand must be an integer")
      })?;
      if !(0..=49).contains(&code) {
        bail!(Code::InvalidValue, "EXIT code {code} is out of range 0..=49");
      }
      return Ok(Some(code as i32));
    }

    // --- data stack -----------------------------------------------
    PushS => {
      let value = resolve(env, instr, 0)?;
      env.push_value(value);
    }
    PopS => {
      let dst = var_arg(instr, 0)?;
      let value = env.pop_value()?;
      env.store(dst, value)?;
    }
    Clears => {
      while env.data_stack_len() > 0 {
        env.pop_value()?;
      }
    }

    // --- arithmetic -------------------------------------------------
    Add => binary_var(env, instr, numeric_add)?,
    Sub => binary_var(env, instr, numeric_sub)?,
    Mul => binary_var(env, instr, numeric_mul)?,
    IDiv => binary_var(env, instr, divide)?,
    Div => binary_var(env, instr, divide)?,
    Adds => binary_stack(env, numeric_add)?,
    Subs => binary_stack(env, numeric_sub)?,
    Muls => binary_stack(env, numeric_mul)?,
    Idivs => binary_stack(env, divide)?,

    // --- relational ---------------------------------------------------
    Lt => relational_var(env, instr, Ordering::Less)?,
    Gt => relational_var(env, instr, Ordering::Greater)?,
    Eq => {
      let dst = var_arg(instr, 0)?;
      let a = resolve(env, instr, 1)?;
      let b = resolve(env, instr, 2)?;
      env.store(dst, Value::Bool(values_equal(&a, &b)?))?;
    }
    Lts => relational_stack(env, Ordering::Less)?,
    Gts => relational_stack(env, Ordering::Greater)?,
    Eqs => {
      let b = env.pop_value()?;
      let a = env.pop_value()?;
      env.push_value(Value::Bool(values_equal(&a, &b)?));
    }

    // --- logical --------------------------------------------------
    And => logical_var(env, instr, |a, b| a && b)?,
    Or => logical_var(env, instr, |a, b| a || b)?,
    Not => {
      let dst = var_arg(instr, 0)?;
      let a = resolve(env, instr, 1)?;
      let a = expect_bool(&a)?;
      env.store(dst, Value::Bool(!a))?;
    }
    Ands => logical_stack(env, |a, b| a && b)?,
    Ors => logical_stack(env, |a, b| a || b)?,
    Nots => {
      let a = env.pop_value()?;
      let a = expect_bool(&a)?;
      env.push_value(Value::Bool(!a));
    }

    // --- conversions --------------------------------------------------
    Int2Char => {
      let dst = var_arg(instr, 0)?;
      let value = resolve(env, instr, 1)?;
      let ch = int2char(&value)?;
      env.store(dst, Value::str(ch))?;
    }
    Int2Chars => {
      let value = env.pop_value()?;
      let ch = int2char(&value)?;
      env.push_value(Value::str(ch));
    }
    Stri2Int => {
      let dst = var_arg(instr, 0)?;
      let s = resolve(env, instr, 1)?;
      let i = resolve(env, instr, 2)?;
      let result = stri2int(&s, &i)?;
      env.store(dst, Value::Int(result))?;
    }
    Stri2Ints => {
      let i = env.pop_value()?;
      let s = env.pop_value()?;
      let result = stri2int(&s, &i)?;
      env.push_value(Value::Int(result));
    }
    Int2Float => {
      let dst = var_arg(instr, 0)?;
      let value = resolve(env, instr, 1)?;
      let i = expect_int(&value)?;
      env.store(dst, Value::Float(i as f64))?;
    }
    Float2Int => {
      let dst = var_arg(instr, 0)?;
      let value = resolve(env, instr, 1)?;
      let f = expect_float(&value)?;
      env.store(dst, Value::Int(f as i64))?;
    }

    // --- I/O ------------------------------------------------------
    Read => {
      let dst = var_arg(instr, 0)?;
      let kind = type_arg(instr, 1)?;
      let value = read_value(input, kind);
      env.store(dst, value)?;
    }
    Write => {
      let value = resolve(env, instr, 0)?;
      write_value(output, &value).map_err(|e| io_error(e))?;
    }

    // --- strings --------------------------------------------------
    Concat => {
      let dst = var_arg(instr, 0)?;
      let a = resolve(env, instr, 1)?;
      let b = resolve(env, instr, 2)?;
      let a = expect_str(&a)?;
      let b = expect_str(&b)?;
      env.store(dst, Value::str(format!("{a}{b}")))?;
    }
    Strlen => {
      let dst = var_arg(instr, 0)?;
      let value = resolve(env, instr, 1)?;
      let s = expect_str(&value)?;
      env.store(dst, Value::Int(s.chars().count() as i64))?;
    }
    GetChar => {
      let dst = var_arg(instr, 0)?;
      let s = resolve(env, instr, 1)?;
      let i = resolve(env, instr, 2)?;
      let s = expect_str(&s)?;
      let i = expect_int(&i)?;
      let ch = char_at(s, i)?;
      env.store(dst, Value::str(ch))?;
    }
    SetChar => {
      let dst = var_arg(instr, 0)?;
      let i = resolve(env, instr, 1)?;
      let c = resolve(env, instr, 2)?;
      let i = expect_int(&i)?;
      let c = expect_str(&c)?;
      let first = c.chars().next().ok_or_else(|| {
        Error::new(Code::StringOp, "SETCHAR replacement string is empty")
      })?;
      let current = env.load(dst)?.clone();
      let base = expect_str(&current)?;
      let replaced = set_char_at(base, i, first)?;
      env.store(dst, Value::str(replaced))?;
    }

    // --- reflection / diagnostics --------------------------------------
    Type => {
      let dst = var_arg(instr, 0)?;
      // TYPE reports the empty string for a declared-but-unassigned
      // variable, but still errors on one that was never DEFVAR'd, so it
      // cannot use plain `resolve`.
      let name = match instr.args.get(1) {
        Some(Argument::Value(v)) => v.kind().name(),
        Some(Argument::Var(addr)) => env.load_optional(addr)?.map_or("", |v| v.kind().name()),
        _ => bail!(Code::Semantic, "TYPE is missing its operand"),
      };
      env.store(dst, Value::str(name))?;
    }
    DPrint => {
      let value = resolve(env, instr, 0)?;
      eprint!("{}", display_value(&value));
    }
    Break => {
      eprintln!(
        "position {}, local frames: {}, data stack: {}, call stack: {}",
        ip,
        env.local_frame_count(),
        env.data_stack_len(),
        env.call_stack_len(),
      );
    }
    PrintInst => {
      eprintln!("{instr}");
    }
  }

  Ok(None)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Ordering {
  Less,
  Greater,
}

fn var_arg(instr: &Instruction, index: usize) -> Result<&crate::program::Address> {
  match instr.args.get(index) {
    Some(Argument::Var(addr)) => Ok(addr),
    _ => bail!(Code::Semantic, "{} expects a variable operand", instr.opcode),
  }
}

fn label_arg(instr: &Instruction, index: usize) -> Result<&str> {
  match instr.args.get(index) {
    Some(Argument::Label(name)) => Ok(name),
    _ => bail!(Code::Semantic, "{} expects a label operand", instr.opcode),
  }
}

fn type_arg(instr: &Instruction, index: usize) -> Result<Kind> {
  match instr.args.get(index) {
    Some(Argument::Type(kind)) => Ok(*kind),
    _ => bail!(Code::Semantic, "{} expects a type operand", instr.opcode),
  }
}

/// Evaluates a `Value` or `Var` argument to its current [`Value`].
fn resolve(env: &Environment, instr: &Instruction, index: usize) -> Result<Value> {
  match instr.args.get(index) {
    Some(Argument::Value(v)) => Ok(v.clone()),
    Some(Argument::Var(addr)) => Ok(env.load(addr)?.clone()),
    _ => bail!(Code::Semantic, "{} is missing operand {index}", instr.opcode),
  }
}

fn expect_int(v: &Value) -> Result<i64> {
  v.as_int().ok_or_else(|| Error::new(Code::OperandType, "expected an integer operand"))
}

fn expect_float(v: &Value) -> Result<f64> {
  v.as_float().ok_or_else(|| Error::new(Code::OperandType, "expected a float operand"))
}

fn expect_bool(v: &Value) -> Result<bool> {
  v.as_bool().ok_or_else(|| Error::new(Code::OperandType, "expected a bool operand"))
}

fn expect_str(v: &Value) -> Result<&str> {
  v.as_str().ok_or_else(|| Error::new(Code::OperandType, "expected a string operand"))
}

/// Shared ADD/SUB/MUL/DIV/IDIV dispatch, grounded in the "match on the
/// non-stack form, then share with the `*S` stack variant" pattern.
macro_rules! define_numeric_binop {
  ($name:ident, $int_op:expr, $float_op:expr) => {
    fn $name(a: &Value, b: &Value) -> Result<Value> {
      match (a, b) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int($int_op(*a, *b)?)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float($float_op(*a, *b))),
        _ => bail!(Code::OperandType, "arithmetic operands must both be int or both be float"),
      }
    }
  };
}

define_numeric_binop!(numeric_add, |a: i64, b: i64| -> Result<i64> { Ok(a.wrapping_add(b)) }, |a: f64, b: f64| a + b);
define_numeric_binop!(numeric_sub, |a: i64, b: i64| -> Result<i64> { Ok(a.wrapping_sub(b)) }, |a: f64, b: f64| a - b);
define_numeric_binop!(numeric_mul, |a: i64, b: i64| -> Result<i64> { Ok(a.wrapping_mul(b)) }, |a: f64, b: f64| a * b);

/// Shared `IDIV`/`DIV` dispatch: both opcodes accept either a matching pair
/// of `INT`s or a matching pair of `FLOAT`s, and the result kind is always
/// the operand kind (an int pair divides by truncation, a float pair
/// divides exactly).
fn divide(a: &Value, b: &Value) -> Result<Value> {
  match (a, b) {
    (Value::Int(a), Value::Int(b)) => {
      if *b == 0 {
        bail!(Code::InvalidValue, "integer division by zero");
      }
      // Rust's `/` on signed integers already truncates toward zero.
      Ok(Value::Int(a.wrapping_div(*b)))
    }
    (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
    _ => bail!(Code::OperandType, "IDIV/DIV operands must both be int or both be float"),
  }
}

fn binary_var(
  env: &mut Environment,
  instr: &Instruction,
  op: fn(&Value, &Value) -> Result<Value>,
) -> Result<()> {
  let dst = var_arg(instr, 0)?;
  let a = resolve(env, instr, 1)?;
  let b = resolve(env, instr, 2)?;
  let result = op(&a, &b)?;
  env.store(dst, result)
}

fn binary_stack(env: &mut Environment, op: fn(&Value, &Value) -> Result<Value>) -> Result<()> {
  let b = env.pop_value()?;
  let a = env.pop_value()?;
  let result = op(&a, &b)?;
  env.push_value(result);
  Ok(())
}

/// `EQ`/`EQS` allow same-kind comparison, or either side being `NIL`.
fn values_equal(a: &Value, b: &Value) -> Result<bool> {
  if a.kind() != b.kind() && !a.is_nil() && !b.is_nil() {
    bail!(Code::OperandType, "EQ operands must share a type, or one must be nil");
  }
  Ok(a == b)
}

/// `JUMPIFEQ`/`JUMPIFNEQ` (and their `*S` forms) require identical kinds
/// with no `NIL` exception, unlike `EQ`/`EQS`.
fn same_kind_equal(a: &Value, b: &Value) -> Result<bool> {
  if a.kind() != b.kind() {
    bail!(Code::OperandType, "JUMPIFEQ/JUMPIFNEQ operands must share a type");
  }
  Ok(a == b)
}

fn compare(a: &Value, b: &Value, want: Ordering) -> Result<bool> {
  if a.is_nil() || b.is_nil() {
    bail!(Code::OperandType, "LT/GT operands must not be nil");
  }
  let ord = match (a, b) {
    (Value::Int(a), Value::Int(b)) => a.cmp(b),
    (Value::Float(a), Value::Float(b)) => {
      a.partial_cmp(b).ok_or_else(|| Error::new(Code::OperandType, "NaN is not ordered"))?
    }
    (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
    (Value::Str(a), Value::Str(b)) => a.cmp(b),
    _ => bail!(Code::OperandType, "LT/GT operands must share the same type"),
  };
  Ok(match want {
    Ordering::Less => ord == std::cmp::Ordering::Less,
    Ordering::Greater => ord == std::cmp::Ordering::Greater,
  })
}

fn relational_var(env: &mut Environment, instr: &Instruction, want: Ordering) -> Result<()> {
  let dst = var_arg(instr, 0)?;
  let a = resolve(env, instr, 1)?;
  let b = resolve(env, instr, 2)?;
  let result = compare(&a, &b, want)?;
  env.store(dst, Value::Bool(result))
}

fn relational_stack(env: &mut Environment, want: Ordering) -> Result<()> {
  let b = env.pop_value()?;
  let a = env.pop_value()?;
  let result = compare(&a, &b, want)?;
  env.push_value(Value::Bool(result));
  Ok(())
}

fn logical_var(
  env: &mut Environment,
  instr: &Instruction,
  op: fn(bool, bool) -> bool,
) -> Result<()> {
  let dst = var_arg(instr, 0)?;
  let a = resolve(env, instr, 1)?;
  let b = resolve(env, instr, 2)?;
  let result = op(expect_bool(&a)?, expect_bool(&b)?);
  env.store(dst, Value::Bool(result))
}

fn logical_stack(env: &mut Environment, op: fn(bool, bool) -> bool) -> Result<()> {
  let b = env.pop_value()?;
  let a = env.pop_value()?;
  let result = op(expect_bool(&a)?, expect_bool(&b)?);
  env.push_value(Value::Bool(result));
  Ok(())
}

fn int2char(value: &Value) -> Result<String> {
  let code = expect_int(value)?;
  let code = u32::try_from(code).map_err(|_| Error::new(Code::StringOp, "INT2CHAR code out of range"))?;
  let ch = char::from_u32(code)
    .ok_or_else(|| Error::new(Code::StringOp, format!("{code} is not a valid code point")))?;
  Ok(ch.to_string())
}

fn stri2int(s: &Value, i: &Value) -> Result<i64> {
  let s = expect_str(s)?;
  let i = expect_int(i)?;
  let ch = char_at(s, i)?;
  Ok(ch as i64)
}

fn char_at(s: &str, index: i64) -> Result<char> {
  if index < 0 {
    bail!(Code::StringOp, "string index {index} out of range");
  }
  s.chars()
    .nth(index as usize)
    .ok_or_else(|| Error::new(Code::StringOp, format!("string index {index} out of range")))
}

fn set_char_at(base: &str, index: i64, replacement: char) -> Result<String> {
  if index < 0 {
    bail!(Code::StringOp, "string index {index} out of range");
  }
  let index = index as usize;
  let mut chars: Vec<char> = base.chars().collect();
  let slot = chars
    .get_mut(index)
    .ok_or_else(|| Error::new(Code::StringOp, format!("string index {index} out of range")))?;
  *slot = replacement;
  Ok(chars.into_iter().collect())
}

fn io_error(e: std::io::Error) -> Error {
  Error::new(Code::Internal, format!("I/O error: {e}"))
}

fn display_value(v: &Value) -> String {
  match v {
    Value::Int(i) => i.to_string(),
    Value::Float(f) => format_hex_float(*f),
    Value::Bool(b) => b.to_string(),
    Value::Str(s) => s.to_string(),
    Value::Nil => String::new(),
  }
}

fn write_value<W: Write>(output: &mut W, v: &Value) -> std::io::Result<()> {
  write!(output, "{}", display_value(v))
}

/// `READ`: on EOF or a value that fails to parse as `kind`, store the
/// type's default (`0`, `0.0`, `""`, `false`) rather than erroring, mirroring
/// the original interpreter's permissive `READ` behavior.
fn read_value<R: BufRead>(input: &mut R, kind: Kind) -> Value {
  let mut line = String::new();
  let read = input.read_line(&mut line).unwrap_or(0);
  if read == 0 {
    return default_for(kind);
  }
  let trimmed = line.trim_end_matches(['\n', '\r']);
  match kind {
    Kind::Int => trimmed.trim().parse::<i64>().map(Value::Int).unwrap_or_else(|_| default_for(kind)),
    Kind::Float => parse_hex_float(trimmed.trim())
      .or_else(|_| trimmed.trim().parse::<f64>().map_err(|_| Error::new(Code::StringOp, "")))
      .map(Value::Float)
      .unwrap_or_else(|_| default_for(kind)),
    Kind::Bool => match trimmed.trim().to_ascii_lowercase().as_str() {
      "true" => Value::Bool(true),
      _ => Value::Bool(false),
    },
    Kind::Str => Value::str(trimmed),
    Kind::Nil => Value::Nil,
  }
}

fn default_for(kind: Kind) -> Value {
  match kind {
    Kind::Int => Value::Int(0),
    Kind::Float => Value::Float(0.0),
    Kind::Bool => Value::Bool(false),
    Kind::Str => Value::str(""),
    Kind::Nil => Value::Nil,
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;
  use crate::program::{Address, FrameSelector};

  fn addr(name: &str) -> Address {
    Address { frame: FrameSelector::Global, name: Rc::from(name) }
  }

  fn run_one(env: &mut Environment, instr: &Instruction) -> Result<Option<i32>> {
    let mut input: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    let mut output = Vec::new();
    let mut ip = 0isize;
    execute(instr, env, &mut ip, &mut input, &mut output)
  }

  #[test]
  fn add_ints() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::Add,
      args: vec![
        Argument::Var(addr("x")),
        Argument::Value(Value::Int(2)),
        Argument::Value(Value::Int(3)),
      ],
    };
    run_one(&mut env, &instr).unwrap();
    assert_eq!(env.load(&addr("x")).unwrap(), &Value::Int(5));
  }

  #[test]
  fn idiv_by_zero_is_invalid_value() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::IDiv,
      args: vec![
        Argument::Var(addr("x")),
        Argument::Value(Value::Int(1)),
        Argument::Value(Value::Int(0)),
      ],
    };
    assert_eq!(run_one(&mut env, &instr).unwrap_err().code, Code::InvalidValue);
  }

  #[test]
  fn eq_allows_nil_against_any_kind() {
    assert!(values_equal(&Value::Nil, &Value::Int(1)).unwrap() == false);
    assert!(values_equal(&Value::Nil, &Value::Nil).unwrap());
    assert!(values_equal(&Value::Int(5), &Value::Int(5)).unwrap());
    assert!(values_equal(&Value::Int(5), &Value::Str(Rc::from("5"))).is_err());
  }

  #[test]
  fn same_kind_equal_rejects_nil_against_other_kinds() {
    assert_eq!(same_kind_equal(&Value::Nil, &Value::Int(1)).unwrap_err().code, Code::OperandType);
    assert!(same_kind_equal(&Value::Nil, &Value::Nil).unwrap());
    assert!(same_kind_equal(&Value::Int(5), &Value::Int(5)).unwrap());
  }

  #[test]
  fn idiv_and_div_both_accept_float_operands() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::IDiv,
      args: vec![
        Argument::Var(addr("x")),
        Argument::Value(Value::Float(7.0)),
        Argument::Value(Value::Float(2.0)),
      ],
    };
    run_one(&mut env, &instr).unwrap();
    assert_eq!(env.load(&addr("x")).unwrap(), &Value::Float(3.5));
  }

  #[test]
  fn div_accepts_int_operands() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::Div,
      args: vec![
        Argument::Var(addr("x")),
        Argument::Value(Value::Int(7)),
        Argument::Value(Value::Int(2)),
      ],
    };
    run_one(&mut env, &instr).unwrap();
    assert_eq!(env.load(&addr("x")).unwrap(), &Value::Int(3));
  }

  #[test]
  fn type_of_declared_unassigned_variable_is_empty_string() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    env.define(&addr("y")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::Type,
      args: vec![Argument::Var(addr("y")), Argument::Var(addr("x"))],
    };
    run_one(&mut env, &instr).unwrap();
    assert_eq!(env.load(&addr("y")).unwrap().as_str(), Some(""));
  }

  #[test]
  fn type_of_undeclared_variable_is_undefined_variable_error() {
    let mut env = Environment::new();
    env.define(&addr("y")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::Type,
      args: vec![Argument::Var(addr("y")), Argument::Var(addr("x"))],
    };
    assert_eq!(run_one(&mut env, &instr).unwrap_err().code, Code::UndefinedVariable);
  }

  #[test]
  fn getchar_and_setchar_operate_on_strings() {
    let mut env = Environment::new();
    env.define(&addr("x")).unwrap();
    let instr = Instruction {
      order: 1,
      opcode: Opcode::GetChar,
      args: vec![
        Argument::Var(addr("x")),
        Argument::Value(Value::str("hello")),
        Argument::Value(Value::Int(1)),
      ],
    };
    run_one(&mut env, &instr).unwrap();
    assert_eq!(env.load(&addr("x")).unwrap().as_str(), Some("e"));
  }

  #[test]
  fn int2char_rejects_out_of_range_code_point() {
    assert!(int2char(&Value::Int(-1)).is_err());
  }

  #[test]
  fn hex_float_write_round_trips_through_read() {
    let formatted = display_value(&Value::Float(2.5));
    let mut cursor = Cursor::new(format!("{formatted}\n").into_bytes());
    let value = read_value(&mut cursor, Kind::Float);
    assert_eq!(value, Value::Float(2.5));
  }
}
