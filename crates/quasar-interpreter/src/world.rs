//! Interpreter world: shared state of all script processes

use crate::bytecode::BytecodeRef;
use crate::error::Error;
use crate::mutex::MutexList;
use crate::serialization::Charset;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Interpreter limits and options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum number of nested frames per process
    pub max_call_depth: usize,
    /// Maximum operand stack size per process
    pub max_stack_depth: usize,
    /// Character set for serialized strings
    pub charset: Charset,
    /// Also emit script output as log events
    pub print_to_log: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 200,
            max_stack_depth: 1000,
            charset: Charset::Utf8,
            print_to_log: true,
        }
    }
}

/// Services the interpreter needs from its embedding: the script compiler
/// and the file system.
pub trait ScriptHost {
    /// Compile one statement; syntax errors are reported as [`Error::User`]
    fn compile_statement(&mut self, text: &str, origin: &str) -> Result<BytecodeRef, Error>;

    /// Open and compile a script file. `Ok(None)` if the file does not exist.
    fn open_script(&mut self, file_name: &str, origin: &str) -> Result<Option<BytecodeRef>, Error>;
}

/// Host without a compiler or file system
#[derive(Debug, Default)]
pub struct NullHost;

impl ScriptHost for NullHost {
    fn compile_statement(&mut self, _text: &str, _origin: &str) -> Result<BytecodeRef, Error> {
        Err(Error::user("Statement compilation is not available"))
    }

    fn open_script(&mut self, _file_name: &str, _origin: &str) -> Result<Option<BytecodeRef>, Error> {
        Ok(None)
    }
}

/// Globals, locks and host services
pub struct World {
    config: WorldConfig,
    globals: HashMap<String, Option<Value>>,
    mutexes: MutexList,
    host: Box<dyn ScriptHost>,
    console: Vec<String>,
    next_process_id: u32,
}

impl World {
    pub fn new(config: WorldConfig, host: Box<dyn ScriptHost>) -> Self {
        Self {
            config,
            globals: HashMap::new(),
            mutexes: MutexList::new(),
            host,
            console: Vec::new(),
            next_process_id: 1,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Read a global variable. Names are canonical upper case.
    pub fn global(&self, name: &str) -> Result<Option<Value>, Error> {
        match self.globals.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::UnknownIdentifier(name.to_string())),
        }
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    /// Define or overwrite a global variable
    pub fn set_global(&mut self, name: impl Into<String>, value: Option<Value>) {
        self.globals.insert(name.into(), value);
    }

    pub fn mutex_list(&self) -> &MutexList {
        &self.mutexes
    }

    pub fn mutex_list_mut(&mut self) -> &mut MutexList {
        &mut self.mutexes
    }

    pub fn host_mut(&mut self) -> &mut dyn ScriptHost {
        self.host.as_mut()
    }

    /// Script output
    pub fn print(&mut self, text: &str) {
        if self.config.print_to_log {
            info!(target: "script.print", "{}", text);
        }
        self.console.push(text.to_string());
    }

    /// Everything printed so far
    pub fn console(&self) -> &[String] {
        &self.console
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    pub fn allocate_process_id(&mut self) -> u32 {
        let id = self.next_process_id;
        self.next_process_id = self.next_process_id.wrapping_add(1);
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default(), Box::new(NullHost))
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("globals", &self.globals.len())
            .field("mutexes", &self.mutexes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals() {
        let mut world = World::default();
        assert_eq!(world.global("X").unwrap_err(), Error::UnknownIdentifier("X".to_string()));
        world.set_global("X", None);
        assert!(world.has_global("X"));
        assert!(world.global("X").unwrap().is_none());
        world.set_global("X", Some(Value::Integer(3)));
        assert_eq!(world.global("X").unwrap().and_then(|v| v.as_integer()), Some(3));
    }

    #[test]
    fn test_print_collects_output() {
        let mut world = World::default();
        world.print("hello");
        assert_eq!(world.console(), &["hello".to_string()]);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: WorldConfig = serde_json::from_str(r#"{"max_call_depth": 10}"#).unwrap();
        assert_eq!(config.max_call_depth, 10);
        assert_eq!(config.max_stack_depth, 1000);
        assert!(config.print_to_log);
    }

    #[test]
    fn test_process_ids_are_distinct() {
        let mut world = World::default();
        let a = world.allocate_process_id();
        let b = world.allocate_process_id();
        assert_ne!(a, b);
    }
}
