//! Runtime value types
//!
//! Scalars are stored inline. Everything with behaviour (callables,
//! indexables, contexts) is an open trait-object family so that the game
//! layer can add its own entity kinds. Script null is `Option::<Value>::None`.

use crate::arguments::Arguments;
use crate::context::Context;
use crate::error::{Error, ExpectedType};
use crate::process::Process;
use crate::serialization::{store_float, store_string, Charset, SaveContext, TagNode, TAG_BOOLEAN, TAG_INTEGER};
use crate::world::World;
use std::fmt;

/// Behaviour shared by all non-scalar values
pub trait BaseValue: fmt::Debug {
    /// Render as text.
    ///
    /// With `readable` set, the result parses back into an equivalent value
    /// where that is possible (`Hull(17)`); otherwise it may be a debug tag
    /// such as `#<array>`.
    fn to_text(&self, readable: bool) -> String;

    /// Serialize into a tag node plus auxiliary data.
    ///
    /// Values without a stable representation fail with [`Error::NotSerializable`];
    /// callers are expected to skip such values when persisting state.
    fn store(
        &self,
        out: &mut TagNode,
        aux: &mut Vec<u8>,
        charset: Charset,
        ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error>;
}

/// Something a script can invoke with an argument list
pub trait CallableValue: BaseValue {
    /// Invoke. A result, if wanted, is pushed onto the process stack.
    fn call(&self, process: &mut Process, world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error>;

    /// True if this is a procedure (no result)
    fn is_procedure_call(&self) -> bool;

    /// Size descriptor.
    ///
    /// `which == 0` is 1 for collections and 0 otherwise; `which == 1` is
    /// one more than the highest valid 1-based index, 0 for an empty or
    /// unloaded collection.
    fn get_dimension(&self, which: usize) -> usize;

    /// Context positioned at the first element; `None` if the collection is empty
    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error>;

    fn clone_callable(&self) -> Box<dyn CallableValue>;
}

/// Array or function-call-like access, `Hull(17)`
pub trait IndexableValue: CallableValue {
    fn get(&self, args: &mut Arguments) -> Result<Option<Value>, Error>;

    /// Assign an element. Read-only indexables fail with [`Error::NotAssignable`].
    fn set(&self, args: &mut Arguments, value: Option<&Value>) -> Result<(), Error>;

    fn clone_indexable(&self) -> Box<dyn IndexableValue>;
}

/// `call` for indexables: calling evaluates `get`
pub fn call_indexable(
    this: &dyn IndexableValue,
    process: &mut Process,
    mut args: Arguments,
    want_result: bool,
) -> Result<(), Error> {
    let result = this.get(&mut args)?;
    if want_result {
        process.push_value(result);
    }
    Ok(())
}

/// Failure for `store` of values without persistent form
pub fn reject_store() -> Result<(), Error> {
    Err(Error::NotSerializable)
}

/// Failure for `set` on read-only values
pub fn reject_set() -> Result<(), Error> {
    Err(Error::NotAssignable)
}

/// Dynamically-typed script value
#[derive(Debug)]
pub enum Value {
    Integer(i32),
    Float(f64),
    Boolean(bool),
    String(String),
    Callable(Box<dyn CallableValue>),
    Indexable(Box<dyn IndexableValue>),
    Context(Box<dyn Context>),
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Integer(i) => Value::Integer(*i),
            Value::Float(f) => Value::Float(*f),
            Value::Boolean(b) => Value::Boolean(*b),
            Value::String(s) => Value::String(s.clone()),
            Value::Callable(c) => Value::Callable(c.clone_callable()),
            Value::Indexable(i) => Value::Indexable(i.clone_indexable()),
            Value::Context(c) => Value::Context(c.clone_context()),
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl Value {
    pub fn to_text(&self, readable: bool) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(b) => (if *b { "True" } else { "False" }).to_string(),
            Value::String(s) => {
                if readable {
                    quote_string(s)
                } else {
                    s.clone()
                }
            }
            Value::Callable(c) => c.to_text(readable),
            Value::Indexable(i) => i.to_text(readable),
            Value::Context(c) => c.to_text(readable),
        }
    }

    pub fn store(
        &self,
        out: &mut TagNode,
        aux: &mut Vec<u8>,
        charset: Charset,
        ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        match self {
            Value::Integer(i) => {
                *out = TagNode::new(TAG_INTEGER, *i as u32);
                Ok(())
            }
            Value::Boolean(b) => {
                *out = TagNode::new(TAG_BOOLEAN, u32::from(*b));
                Ok(())
            }
            Value::Float(f) => store_float(*f, out, aux),
            Value::String(s) => store_string(s, out, aux, charset),
            Value::Callable(c) => c.store(out, aux, charset, ctx),
            Value::Indexable(i) => i.store(out, aux, charset, ctx),
            Value::Context(c) => c.store(out, aux, charset, ctx),
        }
    }

    /// Short kind name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Callable(_) => "callable",
            Value::Indexable(_) => "array",
            Value::Context(_) => "object",
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&dyn Context> {
        match self {
            Value::Context(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Numeric view; booleans count as 0/1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(f64::from(*i)),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Collection view for iteration and dimension queries
    pub fn get_dimension(&self, which: usize) -> usize {
        match self {
            Value::Callable(c) => c.get_dimension(which),
            Value::Indexable(i) => i.get_dimension(which),
            _ => 0,
        }
    }

    pub fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        match self {
            Value::Callable(c) => c.make_first_context(),
            Value::Indexable(i) => i.make_first_context(),
            _ => Err(Error::Type(ExpectedType::Iterable)),
        }
    }
}

/// Text of an optional value; null is `EMPTY` in readable form and empty otherwise
pub fn value_to_text(value: Option<&Value>, readable: bool) -> String {
    match value {
        Some(v) => v.to_text(readable),
        None if readable => "EMPTY".to_string(),
        None => String::new(),
    }
}

/// Tri-state truth value; `None` for null
pub fn to_boolean(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Integer(i) => Some(*i != 0),
        Value::Float(f) => Some(f.abs() > 1e-6),
        Value::Boolean(b) => Some(*b),
        Value::String(s) => Some(!s.is_empty()),
        _ => Some(true),
    }
}

/// Quote a string so that it parses back to itself
pub fn quote_string(s: &str) -> String {
    if !s.contains('"') {
        format!("\"{}\"", s.replace('\\', "\\\\"))
    } else if !s.contains('\'') {
        format!("'{}'", s)
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_text() {
        assert_eq!(Value::Integer(42).to_text(true), "42");
        assert_eq!(Value::Float(2.0).to_text(false), "2");
        assert_eq!(Value::Float(2.5).to_text(false), "2.5");
        assert_eq!(Value::Boolean(true).to_text(true), "True");
        assert_eq!(Value::from("abc").to_text(false), "abc");
        assert_eq!(Value::from("abc").to_text(true), "\"abc\"");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_string("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote_string("it's \"x\""), "\"it's \\\"x\\\"\"");
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_null_text() {
        assert_eq!(value_to_text(None, true), "EMPTY");
        assert_eq!(value_to_text(None, false), "");
    }

    #[test]
    fn test_truth() {
        assert_eq!(to_boolean(None), None);
        assert_eq!(to_boolean(Some(&Value::Integer(0))), Some(false));
        assert_eq!(to_boolean(Some(&Value::Integer(3))), Some(true));
        assert_eq!(to_boolean(Some(&Value::from(""))), Some(false));
        assert_eq!(to_boolean(Some(&Value::from("x"))), Some(true));
    }

    #[test]
    fn test_scalars_are_not_iterable() {
        let v = Value::Integer(3);
        assert_eq!(v.get_dimension(0), 0);
        assert!(matches!(v.make_first_context(), Err(Error::Type(ExpectedType::Iterable))));
    }
}
