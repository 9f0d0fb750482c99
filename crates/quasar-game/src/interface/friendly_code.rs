//! Friendly code context and `FCode()` function

use crate::spec::{FriendlyCode, ShipList};
use quasar_interpreter::arguments::check_string_arg;
use quasar_interpreter::names::{enum_table, lookup_name, NameTable, PropertyAcceptor, PropertyIndex, TypeHint};
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::{call_indexable, quote_string, reject_set, reject_store};
use quasar_interpreter::{
    Arguments, BaseValue, CallableValue, Context, Error, IndexableValue, Process, Value, World,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendlyCodeProperty {
    Name,
    Description,
    Flags,
}

pub const FCODE_MAPPING: &[NameTable<FriendlyCodeProperty>] = &[
    NameTable::new("DESCRIPTION", FriendlyCodeProperty::Description, TypeHint::String),
    NameTable::new("FLAGS", FriendlyCodeProperty::Flags, TypeHint::String),
    NameTable::new("NAME", FriendlyCodeProperty::Name, TypeHint::String),
];

pub fn get_friendly_code_property(code: &FriendlyCode, property: FriendlyCodeProperty) -> Option<Value> {
    let text = match property {
        FriendlyCodeProperty::Name => &code.code,
        FriendlyCodeProperty::Description => &code.description,
        FriendlyCodeProperty::Flags => &code.flags,
    };
    Some(Value::from(text.as_str()))
}

/// Cursor on one friendly code, by position in the list
#[derive(Debug, Clone)]
pub struct FriendlyCodeContext {
    index: usize,
    ship_list: Weak<RefCell<ShipList>>,
}

impl FriendlyCodeContext {
    pub fn new(index: usize, ship_list: Weak<RefCell<ShipList>>) -> Self {
        Self { index, ship_list }
    }

    fn code(&self) -> Option<String> {
        let list = self.ship_list.upgrade()?;
        let list = list.borrow();
        list.friendly_codes().get(self.index).map(|c| c.code.clone())
    }
}

impl BaseValue for FriendlyCodeContext {
    fn to_text(&self, readable: bool) -> String {
        match self.code() {
            Some(code) if readable => format!("FCode({})", quote_string(&code)),
            _ => "#<fcode>".to_string(),
        }
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

impl Context for FriendlyCodeContext {
    fn lookup(&self, name: &str) -> Option<PropertyIndex> {
        lookup_name(name, FCODE_MAPPING)
    }

    fn get(&self, index: PropertyIndex) -> Result<Option<Value>, Error> {
        let (entry, list) = match (FCODE_MAPPING.get(index), self.ship_list.upgrade()) {
            (Some(entry), Some(list)) => (entry, list),
            _ => return Ok(None),
        };
        let list = list.borrow();
        Ok(list
            .friendly_codes()
            .get(self.index)
            .and_then(|code| get_friendly_code_property(code, entry.domain)))
    }

    fn next(&mut self) -> bool {
        let len = self
            .ship_list
            .upgrade()
            .map_or(0, |list| list.borrow().friendly_codes().len());
        if self.index + 1 < len {
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
        enum_table(FCODE_MAPPING, acceptor);
    }
}

/// `FCode(code)`; iterating it visits the codes in list order
#[derive(Debug, Clone)]
pub struct FriendlyCodeFunction {
    ship_list: Weak<RefCell<ShipList>>,
}

impl FriendlyCodeFunction {
    pub fn new(ship_list: &Rc<RefCell<ShipList>>) -> Self {
        Self {
            ship_list: Rc::downgrade(ship_list),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Indexable(Box::new(self))
    }

    fn len(&self) -> usize {
        self.ship_list
            .upgrade()
            .map_or(0, |list| list.borrow().friendly_codes().len())
    }
}

impl BaseValue for FriendlyCodeFunction {
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

impl CallableValue for FriendlyCodeFunction {
    fn call(&self, process: &mut Process, _world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error> {
        call_indexable(self, process, args, want_result)
    }

    fn is_procedure_call(&self) -> bool {
        false
    }

    fn get_dimension(&self, which: usize) -> usize {
        match (which, self.len()) {
            (0, _) => 1,
            (_, 0) => 0,
            (_, n) => n + 1,
        }
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        if self.len() == 0 {
            Ok(None)
        } else {
            Ok(Some(Box::new(FriendlyCodeContext::new(0, self.ship_list.clone()))))
        }
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

impl IndexableValue for FriendlyCodeFunction {
    fn get(&self, args: &mut Arguments) -> Result<Option<Value>, Error> {
        args.check_argument_count(1)?;
        let code = match check_string_arg(args.next().as_ref())? {
            Some(code) => code,
            None => return Ok(None),
        };
        let list = match self.ship_list.upgrade() {
            Some(list) => list,
            None => return Ok(None),
        };
        let index = list.borrow().friendly_codes().find_index(&code);
        Ok(index.map(|i| Value::Context(Box::new(FriendlyCodeContext::new(i, self.ship_list.clone())))))
    }

    fn set(&self, _args: &mut Arguments, _value: Option<&Value>) -> Result<(), Error> {
        reject_set()
    }

    fn clone_indexable(&self) -> Box<dyn IndexableValue> {
        Box::new(self.clone())
    }
}
