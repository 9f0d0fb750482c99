//! Contexts: cursor-bearing, property-queryable views of one element

use crate::error::Error;
use crate::names::{PropertyAcceptor, PropertyIndex};
use crate::process::ProcessHandle;
use crate::value::{BaseValue, Value};
use crate::world::World;

/// "The currently selected object of some collection"
///
/// A context owns only a selector (slot index or object id). Backing data
/// belongs to the session; contexts reach it through weak handles and
/// re-derive the element on every access, so deleting the element a context
/// points at never leaves a dangling reference.
pub trait Context: BaseValue {
    /// Resolve a property name against the kind's static name table
    fn lookup(&self, name: &str) -> Option<PropertyIndex>;

    /// Read a property; null when the property has no value for this element
    fn get(&self, index: PropertyIndex) -> Result<Option<Value>, Error>;

    /// Write a property
    fn set(&self, index: PropertyIndex, value: Option<&Value>) -> Result<(), Error> {
        let _ = (index, value);
        Err(Error::NotAssignable)
    }

    /// Advance to the next valid element. Returns false, leaving the
    /// position unchanged, when no further element exists.
    fn next(&mut self) -> bool;

    /// Copy of the cursor sharing the backing collection
    fn clone_context(&self) -> Box<dyn Context>;

    fn enum_properties(&self, acceptor: &mut dyn PropertyAcceptor);

    /// Called when a process enters this context (`With`, `ForEach`)
    fn on_context_entered(&mut self, world: &mut World, process: &ProcessHandle) -> Result<(), Error> {
        let _ = (world, process);
        Ok(())
    }

    /// Called when the process leaves the context, including unwinding
    fn on_context_left(&mut self, world: &mut World, process: &ProcessHandle) {
        let _ = (world, process);
    }
}

/// Look up and read a property by name
pub fn get_property(ctx: &dyn Context, name: &str) -> Result<Option<Value>, Error> {
    match ctx.lookup(name) {
        Some(index) => ctx.get(index),
        None => Err(Error::UnknownIdentifier(name.to_string())),
    }
}

/// Look up and write a property by name
pub fn set_property(ctx: &dyn Context, name: &str, value: Option<&Value>) -> Result<(), Error> {
    match ctx.lookup(name) {
        Some(index) => ctx.set(index, value),
        None => Err(Error::UnknownIdentifier(name.to_string())),
    }
}
