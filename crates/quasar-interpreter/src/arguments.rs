//! Argument lists and argument checking helpers
//!
//! Argument count is always checked before argument types so that error
//! messages are deterministic. Null arguments are never type errors; the
//! checkers report them as `Ok(None)` and the caller usually returns null.

use crate::error::{Error, ExpectedType};
use crate::value::Value;

/// Arguments of one call, consumed front to back
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<Value>>,
    pos: usize,
}

impl Arguments {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values, pos: 0 }
    }

    /// Total number of arguments, consumed or not
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Number of arguments not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len() - self.pos
    }

    /// Take the next argument; null if exhausted
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Value> {
        let value = self.values.get_mut(self.pos).and_then(Option::take);
        if self.pos < self.values.len() {
            self.pos += 1;
        }
        value
    }

    pub fn check_argument_count(&self, n: usize) -> Result<(), Error> {
        self.check_argument_count_range(n, n)
    }

    pub fn check_argument_count_range(&self, min: usize, max: usize) -> Result<(), Error> {
        let got = self.values.len();
        if got < min || got > max {
            Err(Error::Arity { min, max, got })
        } else {
            Ok(())
        }
    }
}

/// Integer argument; booleans are accepted as 0/1
pub fn check_integer_arg(value: Option<&Value>) -> Result<Option<i32>, Error> {
    match value {
        None => Ok(None),
        Some(Value::Integer(i)) => Ok(Some(*i)),
        Some(Value::Boolean(b)) => Ok(Some(i32::from(*b))),
        Some(_) => Err(Error::Type(ExpectedType::Integer)),
    }
}

/// Integer argument within `min..=max`
pub fn check_integer_arg_range(value: Option<&Value>, min: i32, max: i32) -> Result<Option<i32>, Error> {
    match check_integer_arg(value)? {
        Some(i) if i < min || i > max => Err(Error::Range),
        other => Ok(other),
    }
}

/// String argument; scalars are converted to their text form
pub fn check_string_arg(value: Option<&Value>) -> Result<Option<String>, Error> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Integer(_) | Value::Float(_) | Value::Boolean(_))) => Ok(Some(v.to_text(false))),
        Some(_) => Err(Error::Type(ExpectedType::String)),
    }
}

pub fn check_boolean_arg(value: Option<&Value>) -> Result<Option<bool>, Error> {
    match value {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(Value::Integer(i)) => Ok(Some(*i != 0)),
        Some(Value::Float(f)) => Ok(Some(f.abs() > 1e-6)),
        Some(_) => Err(Error::Type(ExpectedType::Boolean)),
    }
}
