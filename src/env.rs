//! Frame, stack and label-table storage (engine component C2).

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{bail, Code, Error, Result};
use crate::program::{Address, FrameSelector};
use crate::value::Value;

/// A single frame: an ordered map from declared variable name to its slot.
/// `None` means declared-but-undefined; a missing key means never declared.
/// Insertion order is preserved so [`Environment::dump_frame`] (used by
/// `BREAK`) reports variables in declaration order.
pub type Frame = IndexMap<Rc<str>, Option<Value>>;

/// Global frame, local-frame stack, temporary frame, data stack, call stack
/// and label table: everything an [`crate::isolate::Isolate`] mutates while
/// running a [`crate::program::Program`].
#[derive(Debug, Default)]
pub struct Environment {
  global: Frame,
  locals: Vec<Frame>,
  temp: Option<Frame>,
  data_stack: Vec<Value>,
  call_stack: Vec<isize>,
  labels: IndexMap<Rc<str>, usize>,
}

impl Environment {
  pub fn new() -> Environment {
    Environment::default()
  }

  fn frame(&self, selector: FrameSelector) -> Result<&Frame> {
    match selector {
      FrameSelector::Global => Ok(&self.global),
      FrameSelector::Temp => self.temp.as_ref().ok_or_else(|| {
        Error::new(Code::NoSuchFrame, "temporary frame is not initialized")
      }),
      FrameSelector::Local => self.locals.last().ok_or_else(|| {
        Error::new(Code::NoSuchFrame, "local frame stack is empty")
      }),
    }
  }

  fn frame_mut(&mut self, selector: FrameSelector) -> Result<&mut Frame> {
    match selector {
      FrameSelector::Global => Ok(&mut self.global),
      FrameSelector::Temp => self.temp.as_mut().ok_or_else(|| {
        Error::new(Code::NoSuchFrame, "temporary frame is not initialized")
      }),
      FrameSelector::Local => self.locals.last_mut().ok_or_else(|| {
        Error::new(Code::NoSuchFrame, "local frame stack is empty")
      }),
    }
  }

  /// `DEFVAR`: declare `addr` as undefined in its frame. Redeclaring an
  /// already-declared name is a semantic error.
  pub fn define(&mut self, addr: &Address) -> Result<()> {
    let frame = self.frame_mut(addr.frame)?;
    if frame.contains_key(&addr.name) {
      bail!(Code::Semantic, "variable {addr} already defined");
    }
    frame.insert(addr.name.clone(), None);
    Ok(())
  }

  /// Read the current value of `addr`. Errors with [`Code::MissingValue`]
  /// if declared but never assigned, or [`Code::UndefinedVariable`] if
  /// never declared.
  pub fn load(&self, addr: &Address) -> Result<&Value> {
    let frame = self.frame(addr.frame)?;
    match frame.get(&addr.name) {
      Some(Some(value)) => Ok(value),
      Some(None) => {
        bail!(Code::MissingValue, "variable {addr} has no value")
      }
      None => {
        bail!(Code::UndefinedVariable, "variable {addr} is not defined")
      }
    }
  }

  /// `TYPE`'s lookup: like [`Environment::load`], but a declared and
  /// unassigned slot is not an error. It yields `None` so the caller can
  /// report it as the empty type name. A never-declared `addr` is still
  /// [`Code::UndefinedVariable`].
  pub fn load_optional(&self, addr: &Address) -> Result<Option<&Value>> {
    let frame = self.frame(addr.frame)?;
    match frame.get(&addr.name) {
      Some(Some(value)) => Ok(Some(value)),
      Some(None) => Ok(None),
      None => {
        bail!(Code::UndefinedVariable, "variable {addr} is not defined")
      }
    }
  }

  /// `MOVE`-style assignment. Errors with [`Code::UndefinedVariable`] if
  /// `addr` was never declared via `DEFVAR`.
  pub fn store(&mut self, addr: &Address, value: Value) -> Result<()> {
    let frame = self.frame_mut(addr.frame)?;
    match frame.get_mut(&addr.name) {
      Some(slot) => {
        *slot = Some(value);
        Ok(())
      }
      None => {
        bail!(Code::UndefinedVariable, "variable {addr} is not defined")
      }
    }
  }

  /// `CREATEFRAME`: replace TF with a fresh, empty frame, discarding any
  /// previous one.
  pub fn create_frame(&mut self) {
    self.temp = Some(Frame::new());
  }

  /// `PUSHFRAME`: move TF onto the LF stack, leaving TF uninitialized.
  pub fn push_frame(&mut self) -> Result<()> {
    let frame = self.temp.take().ok_or_else(|| {
      Error::new(Code::NoSuchFrame, "temporary frame is not initialized")
    })?;
    self.locals.push(frame);
    Ok(())
  }

  /// `POPFRAME`: pop the topmost LF into TF.
  pub fn pop_frame(&mut self) -> Result<()> {
    let frame = self
      .locals
      .pop()
      .ok_or_else(|| Error::new(Code::NoSuchFrame, "local frame stack is empty"))?;
    self.temp = Some(frame);
    Ok(())
  }

  pub fn push_value(&mut self, value: Value) {
    self.data_stack.push(value);
  }

  pub fn pop_value(&mut self) -> Result<Value> {
    self
      .data_stack
      .pop()
      .ok_or_else(|| Error::new(Code::MissingValue, "data stack is empty"))
  }

  /// `CALL`: remember the instruction index to resume at on `RETURN`.
  pub fn push_return(&mut self, ip: isize) {
    self.call_stack.push(ip);
  }

  /// `RETURN`.
  pub fn pop_return(&mut self) -> Result<isize> {
    self
      .call_stack
      .pop()
      .ok_or_else(|| Error::new(Code::MissingValue, "call stack is empty"))
  }

  /// Records a `LABEL`'s position during the first pass. Redefining a label
  /// is a semantic error.
  pub fn register_label(&mut self, name: Rc<str>, index: usize) -> Result<()> {
    if self.labels.contains_key(&name) {
      bail!(Code::Semantic, "label {name} already defined");
    }
    self.labels.insert(name, index);
    Ok(())
  }

  /// `CALL`/`JUMP`/`JUMPIFEQ`/`JUMPIFNEQ` target resolution.
  pub fn resolve_label(&self, name: &str) -> Result<usize> {
    self
      .labels
      .get(name)
      .copied()
      .ok_or_else(|| Error::new(Code::Semantic, format!("label {name} is not defined")))
  }

  /// Frame contents in declaration order, for `BREAK`'s diagnostic dump.
  pub fn dump_frame(&self, selector: FrameSelector) -> Option<&Frame> {
    match selector {
      FrameSelector::Global => Some(&self.global),
      FrameSelector::Temp => self.temp.as_ref(),
      FrameSelector::Local => self.locals.last(),
    }
  }

  pub fn local_frame_count(&self) -> usize {
    self.locals.len()
  }

  pub fn data_stack_len(&self) -> usize {
    self.data_stack.len()
  }

  pub fn call_stack_len(&self) -> usize {
    self.call_stack.len()
  }
}
