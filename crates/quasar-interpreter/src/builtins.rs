//! Native functions callable from scripts
//!
//! A [`BuiltinFunction`] wraps a host closure. Closures receive the world,
//! the calling process and the argument list, and return the result value.
//! The lock builtins `LOCK` and `GETLOCKINFO` live here since they only
//! need the world's mutex list.

use crate::arguments::{check_integer_arg_range, check_string_arg, Arguments};
use crate::context::Context;
use crate::error::{Error, ExpectedType};
use crate::mutex::MutexContext;
use crate::process::{Process, ProcessHandle};
use crate::serialization::{Charset, SaveContext, TagNode};
use crate::value::{reject_store, BaseValue, CallableValue, Value};
use crate::world::World;
use std::fmt;
use std::rc::Rc;

/// Signature of native functions
pub type NativeFn = Rc<dyn Fn(&mut World, &ProcessHandle, &mut Arguments) -> Result<Option<Value>, Error>>;

/// Callable value backed by a host closure
#[derive(Clone)]
pub struct BuiltinFunction {
    name: String,
    func: NativeFn,
    is_procedure: bool,
}

impl BuiltinFunction {
    /// Builtin returning a value
    pub fn function(
        name: &str,
        func: impl Fn(&mut World, &ProcessHandle, &mut Arguments) -> Result<Option<Value>, Error> + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            func: Rc::new(func),
            is_procedure: false,
        }
    }

    /// Builtin used as a statement; its result is discarded
    pub fn procedure(
        name: &str,
        func: impl Fn(&mut World, &ProcessHandle, &mut Arguments) -> Result<Option<Value>, Error> + 'static,
    ) -> Self {
        Self {
            is_procedure: true,
            ..Self::function(name, func)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke outside of a running process
    pub fn invoke(&self, world: &mut World, process: &ProcessHandle, args: &mut Arguments) -> Result<Option<Value>, Error> {
        (self.func)(world, process, args)
    }

    /// Wrap into a script value
    pub fn into_value(self) -> Value {
        Value::Callable(Box::new(self))
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("is_procedure", &self.is_procedure)
            .finish()
    }
}

impl BaseValue for BuiltinFunction {
    fn to_text(&self, _readable: bool) -> String {
        format!("#<builtin:{}>", self.name)
    }

    fn store(
        &self,
        _out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        reject_store()
    }
}

impl CallableValue for BuiltinFunction {
    fn call(&self, process: &mut Process, world: &mut World, mut args: Arguments, want_result: bool) -> Result<(), Error> {
        let handle = process.handle().clone();
        let result = (self.func)(world, &handle, &mut args)?;
        if want_result {
            process.push_value(result);
        }
        Ok(())
    }

    fn is_procedure_call(&self) -> bool {
        self.is_procedure
    }

    fn get_dimension(&self, _which: usize) -> usize {
        0
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        Err(Error::Type(ExpectedType::Iterable))
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

/// `Lock(name[, hint])`: a context that takes the lock when entered
pub fn lock(args: &mut Arguments) -> Result<Option<Value>, Error> {
    args.check_argument_count_range(1, 2)?;
    let name = match check_string_arg(args.next().as_ref())? {
        Some(name) => name,
        None => return Ok(None),
    };
    let hint = check_string_arg(args.next().as_ref())?.unwrap_or_default();
    Ok(Some(Value::Context(Box::new(MutexContext::new(name, hint)))))
}

/// `GetLockInfo(name[, type])`
///
/// Type 0 reports whether the lock is held, 1 the owner's display name,
/// 2 the note given when locking. Unknown locks yield false or null.
pub fn lock_info(world: &World, args: &mut Arguments) -> Result<Option<Value>, Error> {
    args.check_argument_count_range(1, 2)?;
    let name = check_string_arg(args.next().as_ref())?;
    let kind = check_integer_arg_range(args.next().as_ref(), 0, 2)?.unwrap_or(0);
    let name = match name {
        Some(name) => name,
        None => return Ok(None),
    };

    let mutex = world.mutex_list().query(&name);
    Ok(match kind {
        0 => Some(Value::Boolean(mutex.is_some())),
        1 => mutex.map(|m| Value::from(m.owner().name())),
        _ => mutex.map(|m| Value::from(m.note())),
    })
}

/// Define `LOCK` and `GETLOCKINFO` as globals
pub fn register_lock_builtins(world: &mut World) {
    world.set_global(
        "LOCK",
        Some(BuiltinFunction::function("LOCK", |_, _, args| lock(args)).into_value()),
    );
    world.set_global(
        "GETLOCKINFO",
        Some(BuiltinFunction::function("GETLOCKINFO", |world, _, args| lock_info(world, args)).into_value()),
    );
}
