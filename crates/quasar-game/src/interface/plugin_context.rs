//! Plugin context and `System.Plugin()` function

use crate::plugin::{Plugin, PluginManager};
use quasar_interpreter::arguments::check_string_arg;
use quasar_interpreter::names::{enum_table, lookup_name, NameTable, PropertyAcceptor, PropertyIndex, TypeHint};
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::{call_indexable, reject_set, reject_store};
use quasar_interpreter::{
    Arguments, BaseValue, CallableValue, Context, Error, ExpectedType, IndexableValue, Process, Value, World,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginProperty {
    Id,
    Name,
    Description,
    Directory,
    Version,
}

pub const PLUGIN_MAPPING: &[NameTable<PluginProperty>] = &[
    NameTable::new("DESCRIPTION", PluginProperty::Description, TypeHint::String),
    NameTable::new("DIRECTORY", PluginProperty::Directory, TypeHint::String),
    NameTable::new("ID", PluginProperty::Id, TypeHint::String),
    NameTable::new("NAME", PluginProperty::Name, TypeHint::String),
    NameTable::new("VERSION", PluginProperty::Version, TypeHint::String),
];

pub fn get_plugin_property(plugin: &Plugin, property: PluginProperty) -> Option<Value> {
    Some(Value::from(match property {
        PluginProperty::Id => plugin.id().to_string(),
        PluginProperty::Name => plugin.name.clone(),
        PluginProperty::Description => plugin.description.clone(),
        PluginProperty::Directory => plugin.base_directory().to_string_lossy().into_owned(),
        PluginProperty::Version => plugin.version.clone(),
    }))
}

/// View of one plugin. Properties are read from the manager on access, so
/// a loader compiled earlier sees the plugin's current directory.
#[derive(Debug, Clone)]
pub struct PluginContext {
    id: String,
    manager: Weak<RefCell<PluginManager>>,
}

impl PluginContext {
    pub fn new(id: &str, manager: Weak<RefCell<PluginManager>>) -> Self {
        Self {
            id: id.to_uppercase(),
            manager,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Context(Box::new(self))
    }
}

impl BaseValue for PluginContext {
    fn to_text(&self, _readable: bool) -> String {
        "#<plugin>".to_string()
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

impl Context for PluginContext {
    fn lookup(&self, name: &str) -> Option<PropertyIndex> {
        lookup_name(name, PLUGIN_MAPPING)
    }

    fn get(&self, index: PropertyIndex) -> Result<Option<Value>, Error> {
        let (entry, manager) = match (PLUGIN_MAPPING.get(index), self.manager.upgrade()) {
            (Some(entry), Some(manager)) => (entry, manager),
            _ => return Ok(None),
        };
        let manager = manager.borrow();
        Ok(manager
            .find(&self.id)
            .and_then(|plugin| get_plugin_property(plugin, entry.domain)))
    }

    fn next(&mut self) -> bool {
        false
    }

    fn clone_context(&self) -> Box<dyn Context> {
        Box::new(self.clone())
    }

    fn enum_properties(&self, acceptor: &mut dyn PropertyAcceptor) {
        enum_table(PLUGIN_MAPPING, acceptor);
    }
}

/// `System.Plugin(id)`
#[derive(Debug, Clone)]
pub struct PluginFunction {
    manager: Weak<RefCell<PluginManager>>,
}

impl PluginFunction {
    pub fn new(manager: &Rc<RefCell<PluginManager>>) -> Self {
        Self {
            manager: Rc::downgrade(manager),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Indexable(Box::new(self))
    }
}

impl BaseValue for PluginFunction {
    fn to_text(&self, _readable: bool) -> String {
        "#<array>".to_string()
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

impl CallableValue for PluginFunction {
    fn call(&self, process: &mut Process, _world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error> {
        call_indexable(self, process, args, want_result)
    }

    fn is_procedure_call(&self) -> bool {
        false
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

impl IndexableValue for PluginFunction {
    fn get(&self, args: &mut Arguments) -> Result<Option<Value>, Error> {
        args.check_argument_count(1)?;
        let id = match check_string_arg(args.next().as_ref())? {
            Some(id) => id,
            None => return Ok(None),
        };
        let exists = self
            .manager
            .upgrade()
            .map_or(false, |m| m.borrow().find(&id).is_some());
        Ok(exists.then(|| PluginContext::new(&id, self.manager.clone()).into_value()))
    }

    fn set(&self, _args: &mut Arguments, _value: Option<&Value>) -> Result<(), Error> {
        reject_set()
    }

    fn clone_indexable(&self) -> Box<dyn IndexableValue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_interpreter::context::get_property;
    use std::path::PathBuf;

    #[test]
    fn test_properties_follow_manager() {
        let manager = Rc::new(RefCell::new(PluginManager::new()));
        let mut p = Plugin::new("tax");
        p.version = "1.0".to_string();
        p.base_directory = PathBuf::from("plugins");
        manager.borrow_mut().add_plugin(p);

        let f = PluginFunction::new(&manager);
        let v = f.get(&mut Arguments::new(vec![Some(Value::from("Tax"))])).unwrap().unwrap();
        let ctx = v.as_context().unwrap();
        assert_eq!(get_property(ctx, "ID").unwrap().unwrap().as_str(), Some("TAX"));
        assert_eq!(get_property(ctx, "VERSION").unwrap().unwrap().as_str(), Some("1.0"));

        if let Some(p) = manager.borrow_mut().find_mut("TAX") {
            p.base_directory = PathBuf::from("moved");
        }
        assert_eq!(get_property(ctx, "DIRECTORY").unwrap().unwrap().as_str(), Some("moved"));
        assert!(f.get(&mut Arguments::new(vec![Some(Value::from("none"))])).unwrap().is_none());
    }
}
