//! Shared fixtures for the interpreter integration tests

#![allow(dead_code)]

use quasar_interpreter::arguments::Arguments;
use quasar_interpreter::error::{Error, ExpectedType};
use quasar_interpreter::names::{PropertyAcceptor, PropertyIndex, TypeHint};
use quasar_interpreter::opcode::{IndirectOp, Major, Scope, SpecialOp};
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::reject_store;
use quasar_interpreter::{
    register_lock_builtins, BaseValue, BytecodeBuilder, BytecodeRef, CallableValue, Context, Process,
    ScriptHost, Value, World, WorldConfig,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Host with precompiled statements and files
#[derive(Default)]
pub struct TestHost {
    pub statements: HashMap<String, BytecodeRef>,
    pub files: HashMap<String, BytecodeRef>,
    pub origins: Rc<RefCell<Vec<String>>>,
}

impl ScriptHost for TestHost {
    fn compile_statement(&mut self, text: &str, origin: &str) -> Result<BytecodeRef, Error> {
        self.origins.borrow_mut().push(origin.to_string());
        self.statements
            .get(text)
            .cloned()
            .ok_or_else(|| Error::user(format!("Syntax error in \"{}\"", text)))
    }

    fn open_script(&mut self, file_name: &str, origin: &str) -> Result<Option<BytecodeRef>, Error> {
        self.origins.borrow_mut().push(origin.to_string());
        Ok(self.files.get(file_name).cloned())
    }
}

pub fn make_world(host: TestHost) -> World {
    let mut world = World::new(WorldConfig::default(), Box::new(host));
    register_lock_builtins(&mut world);
    world
}

/// Run `builder` in a fresh process
pub fn run(world: &mut World, name: &str, builder: BytecodeBuilder) -> Process {
    let bco = Rc::new(builder.relocate().unwrap());
    let mut process = Process::new(world, name);
    process.push_frame(bco, false).unwrap();
    process.run(world);
    process
}

/// Compile a builder that prints `text`
pub fn print_program(text: &str) -> BytecodeRef {
    let mut b = BytecodeBuilder::new();
    push_str(&mut b, text);
    special(&mut b, SpecialOp::Print);
    Rc::new(b.relocate().unwrap())
}

pub fn push_str(b: &mut BytecodeBuilder, text: &str) {
    b.add_push_literal(Some(Value::from(text))).unwrap();
}

pub fn push_int(b: &mut BytecodeBuilder, i: i32) {
    b.add_push_literal(Some(Value::Integer(i))).unwrap();
}

pub fn push_global(b: &mut BytecodeBuilder, name: &str) {
    b.add_named_instruction(Major::Push, Scope::NamedShared as u8, name).unwrap();
}

pub fn push_var(b: &mut BytecodeBuilder, name: &str) {
    b.add_named_instruction(Major::Push, Scope::NamedVariable as u8, name).unwrap();
}

pub fn special(b: &mut BytecodeBuilder, op: SpecialOp) {
    b.add_instruction(Major::Special, op as u8, 0);
}

/// `callee(args...)` leaving the result on the stack; args must be pushed already
pub fn call_function(b: &mut BytecodeBuilder, name: &str, argc: u16) {
    push_global(b, name);
    b.add_instruction(Major::Indirect, IndirectOp::Load as u8, argc);
}

/// Collection of integers with a `VALUE` property per element
#[derive(Debug, Clone)]
pub struct Numbers {
    pub values: Rc<Vec<i32>>,
}

impl Numbers {
    pub fn value(values: Vec<i32>) -> Value {
        Value::Callable(Box::new(Numbers { values: Rc::new(values) }))
    }
}

impl BaseValue for Numbers {
    fn to_text(&self, _readable: bool) -> String {
        "#<numbers>".to_string()
    }

    fn store(&self, _: &mut TagNode, _: &mut Vec<u8>, _: Charset, _: Option<&mut dyn SaveContext>) -> Result<(), Error> {
        reject_store()
    }
}

impl CallableValue for Numbers {
    fn call(&self, _: &mut Process, _: &mut World, _: Arguments, _: bool) -> Result<(), Error> {
        Err(Error::Type(ExpectedType::Indexable))
    }

    fn is_procedure_call(&self) -> bool {
        false
    }

    fn get_dimension(&self, which: usize) -> usize {
        match which {
            0 => 1,
            _ if self.values.is_empty() => 0,
            _ => self.values.len() + 1,
        }
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        if self.values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Box::new(NumberContext {
                values: self.values.clone(),
                index: 0,
            })))
        }
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct NumberContext {
    values: Rc<Vec<i32>>,
    index: usize,
}

impl BaseValue for NumberContext {
    fn to_text(&self, _readable: bool) -> String {
        "#<number>".to_string()
    }

    fn store(&self, _: &mut TagNode, _: &mut Vec<u8>, _: Charset, _: Option<&mut dyn SaveContext>) -> Result<(), Error> {
        reject_store()
    }
}

impl Context for NumberContext {
    fn lookup(&self, name: &str) -> Option<PropertyIndex> {
        (name == "VALUE").then_some(0)
    }

    fn get(&self, _index: PropertyIndex) -> Result<Option<Value>, Error> {
        Ok(self.values.get(self.index).map(|v| Value::Integer(*v)))
    }

    fn next(&mut self) -> bool {
        if self.index + 1 < self.values.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn clone_context(&self) -> Box<dyn Context> {
        Box::new(self.clone())
    }

    fn enum_properties(&self, acceptor: &mut dyn PropertyAcceptor) {
        acceptor.add_property("VALUE", TypeHint::Int);
    }
}
