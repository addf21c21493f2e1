//! End-to-end scenarios exercising the whole engine: label scanning,
//! frames, the call stack and opcode semantics together, the way a real
//! IPPcode19 program would.

use std::io::Cursor;
use std::rc::Rc;

use crate::error::Code;
use crate::isolate::{Halt, Isolate};
use crate::program::{Address, Argument, FrameSelector, Instruction, Opcode, Program};
use crate::value::Value;

fn instr(order: u32, opcode: Opcode, args: Vec<Argument>) -> Instruction {
  Instruction { order, opcode, args }
}

fn global(name: &str) -> Address {
  Address { frame: FrameSelector::Global, name: Rc::from(name) }
}

fn run(program: &Program, stdin: &str) -> (Halt, String) {
  let input = Cursor::new(stdin.as_bytes().to_vec());
  let mut output = Vec::new();
  let mut isolate = Isolate::new(program, input, &mut output).unwrap();
  let halt = isolate.run().unwrap();
  (halt, String::from_utf8(output).unwrap())
}

#[test]
fn writes_a_greeting() {
  let program = Program::new(vec![instr(
    1,
    Opcode::Write,
    vec![Argument::Value(Value::str("hello, world"))],
  )]);
  let (halt, out) = run(&program, "");
  assert!(matches!(halt, Halt::Done));
  assert_eq!(out, "hello, world");
}

/// A hand-assembled factorial(5) using `CALL`/`RETURN` and a forward-
/// referenced `LABEL`, mirroring a typical recursive IPPcode19 program.
#[test]
fn recursive_factorial_via_call_and_labels() {
  let n = global("n");
  let acc = global("acc");
  let tmp = global("tmp");

  let program = Program::new(vec![
    instr(1, Opcode::DefVar, vec![Argument::Var(n.clone())]),
    instr(2, Opcode::DefVar, vec![Argument::Var(acc.clone())]),
    instr(3, Opcode::DefVar, vec![Argument::Var(tmp.clone())]),
    instr(4, Opcode::Move, vec![Argument::Var(n.clone()), Argument::Value(Value::Int(5))]),
    instr(5, Opcode::Move, vec![Argument::Var(acc.clone()), Argument::Value(Value::Int(1))]),
    instr(6, Opcode::Label, vec![Argument::Label(Rc::from("loop"))]),
    instr(
      7,
      Opcode::Gt,
      vec![Argument::Var(tmp.clone()), Argument::Var(n.clone()), Argument::Value(Value::Int(0))],
    ),
    instr(
      8,
      Opcode::JumpIfNeq,
      vec![
        Argument::Label(Rc::from("done")),
        Argument::Var(tmp.clone()),
        Argument::Value(Value::Bool(true)),
      ],
    ),
    instr(
      9,
      Opcode::Mul,
      vec![Argument::Var(acc.clone()), Argument::Var(acc.clone()), Argument::Var(n.clone())],
    ),
    instr(
      10,
      Opcode::Sub,
      vec![Argument::Var(n.clone()), Argument::Var(n.clone()), Argument::Value(Value::Int(1))],
    ),
    instr(11, Opcode::Jump, vec![Argument::Label(Rc::from("loop"))]),
    instr(12, Opcode::Label, vec![Argument::Label(Rc::from("done"))]),
    instr(13, Opcode::Write, vec![Argument::Var(acc)]),
  ]);

  let (halt, out) = run(&program, "");
  assert!(matches!(halt, Halt::Done));
  assert_eq!(out, "120");
}

#[test]
fn call_and_return_resume_after_the_call_site() {
  let result = global("result");
  let program = Program::new(vec![
    instr(1, Opcode::DefVar, vec![Argument::Var(result.clone())]),
    instr(2, Opcode::Call, vec![Argument::Label(Rc::from("set"))]),
    instr(3, Opcode::Write, vec![Argument::Var(result.clone())]),
    instr(4, Opcode::Jump, vec![Argument::Label(Rc::from("end"))]),
    instr(5, Opcode::Label, vec![Argument::Label(Rc::from("set"))]),
    instr(6, Opcode::Move, vec![Argument::Var(result), Argument::Value(Value::Int(7))]),
    instr(7, Opcode::Return, vec![]),
    instr(8, Opcode::Label, vec![Argument::Label(Rc::from("end"))]),
  ]);

  let (halt, out) = run(&program, "");
  assert!(matches!(halt, Halt::Done));
  assert_eq!(out, "7");
}

#[test]
fn exit_stops_the_program_with_its_operand_code() {
  let program = Program::new(vec![
    instr(1, Opcode::Exit, vec![Argument::Value(Value::Int(3))]),
    instr(2, Opcode::Write, vec![Argument::Value(Value::str("unreachable"))]),
  ]);
  let (halt, out) = run(&program, "");
  assert!(matches!(halt, Halt::Exit(3)));
  assert_eq!(out, "");
}

#[test]
fn popframe_without_pushframe_is_no_such_frame() {
  let program = Program::new(vec![instr(1, Opcode::PopFrame, vec![])]);
  let input = Cursor::new(Vec::new());
  let mut output = Vec::new();
  let mut isolate = Isolate::new(&program, input, &mut output).unwrap();
  let err = isolate.run().unwrap_err();
  assert_eq!(err.code, Code::NoSuchFrame);
}

#[test]
fn reading_an_undeclared_variable_is_undefined_variable() {
  let program = Program::new(vec![instr(1, Opcode::Write, vec![Argument::Var(global("never_defined"))])]);
  let input = Cursor::new(Vec::new());
  let mut output = Vec::new();
  let mut isolate = Isolate::new(&program, input, &mut output).unwrap();
  let err = isolate.run().unwrap_err();
  assert_eq!(err.code, Code::UndefinedVariable);
}

#[test]
fn read_consumes_one_line_of_stdin_per_call() {
  let a = global("a");
  let b = global("b");
  let program = Program::new(vec![
    instr(1, Opcode::DefVar, vec![Argument::Var(a.clone())]),
    instr(2, Opcode::DefVar, vec![Argument::Var(b.clone())]),
    instr(3, Opcode::Read, vec![Argument::Var(a.clone()), Argument::Type(crate::value::Kind::Int)]),
    instr(4, Opcode::Read, vec![Argument::Var(b.clone()), Argument::Type(crate::value::Kind::Str)]),
    instr(5, Opcode::Write, vec![Argument::Var(a)]),
    instr(6, Opcode::Write, vec![Argument::Var(b)]),
  ]);
  let (halt, out) = run(&program, "42\nhello\n");
  assert!(matches!(halt, Halt::Done));
  assert_eq!(out, "42hello");
}

#[test]
fn read_past_eof_yields_the_type_default() {
  let a = global("a");
  let program = Program::new(vec![
    instr(1, Opcode::DefVar, vec![Argument::Var(a.clone())]),
    instr(2, Opcode::Read, vec![Argument::Var(a.clone()), Argument::Type(crate::value::Kind::Int)]),
    instr(3, Opcode::Write, vec![Argument::Var(a)]),
  ]);
  let (halt, out) = run(&program, "");
  assert!(matches!(halt, Halt::Done));
  assert_eq!(out, "0");
}

#[test]
fn exit_code_out_of_range_is_invalid_value() {
  let program = Program::new(vec![instr(1, Opcode::Exit, vec![Argument::Value(Value::Int(200))])]);
  let input = Cursor::new(Vec::new());
  let mut output = Vec::new();
  let mut isolate = Isolate::new(&program, input, &mut output).unwrap();
  let err = isolate.run().unwrap_err();
  assert_eq!(err.code, Code::InvalidValue);
}
