//! Subroutines: bytecode objects as callable values

use crate::arguments::Arguments;
use crate::bytecode::BytecodeRef;
use crate::context::Context;
use crate::error::{Error, ExpectedType};
use crate::process::Process;
use crate::serialization::{Charset, SaveContext, TagNode, TAG_BCO};
use crate::value::{BaseValue, CallableValue, Value};
use crate::world::World;

/// A relocated bytecode object wrapped as a value. Calling it runs the
/// object in a new frame of the calling process.
#[derive(Debug, Clone)]
pub struct SubroutineValue {
    bco: BytecodeRef,
}

impl SubroutineValue {
    pub fn new(bco: BytecodeRef) -> Self {
        Self { bco }
    }

    pub fn bytecode(&self) -> &BytecodeRef {
        &self.bco
    }

    pub fn into_value(self) -> Value {
        Value::Callable(Box::new(self))
    }
}

impl BaseValue for SubroutineValue {
    fn to_text(&self, _readable: bool) -> String {
        if self.bco.subroutine_name().is_empty() {
            "#<subroutine>".to_string()
        } else {
            format!("#<subroutine:{}>", self.bco.subroutine_name())
        }
    }

    /// Stored by reference; needs a save context to assign the id
    fn store(
        &self,
        out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        match ctx {
            Some(ctx) => {
                let id = ctx.add_bytecode(&self.bco)?;
                *out = TagNode::new(TAG_BCO, id);
                Ok(())
            }
            None => Err(Error::NotSerializable),
        }
    }
}

impl CallableValue for SubroutineValue {
    fn call(&self, process: &mut Process, _world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error> {
        args.check_argument_count(0)?;
        process.push_frame(self.bco.clone(), want_result)
    }

    fn is_procedure_call(&self) -> bool {
        self.bco.is_procedure()
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
