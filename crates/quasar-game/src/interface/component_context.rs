//! Contexts and accessor functions for ship list components
//!
//! Hulls, beams, torpedoes, launchers and engines share one cursor type and
//! one accessor function type, parameterized by a [`ComponentKind`]. The kind
//! supplies the static name table and the property dispatch; the generic
//! code handles lookup, iteration, persistence and change notification.

use crate::spec::ShipList;
use quasar_interpreter::arguments::check_integer_arg;
use quasar_interpreter::names::{enum_table, lookup_name, NameTable, PropertyAcceptor, PropertyIndex};
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::{call_indexable, reject_set, reject_store};
use quasar_interpreter::{
    Arguments, BaseValue, CallableValue, Context, Error, IndexableValue, Process, Value, World,
};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

/// One kind of ship list component as seen by scripts
pub trait ComponentKind: fmt::Debug + Clone + Copy + 'static {
    /// Domain tag of the name table
    type Domain: Copy + 'static;

    /// Script name of the accessor function, also used for `Hull(17)` texts
    const NAME: &'static str;

    /// Serialization tag
    const TAG: u16;

    const TABLE: &'static [NameTable<Self::Domain>];

    /// Highest id that may be in use
    fn size(list: &ShipList) -> i32;

    /// Smallest existing id greater than `id`
    fn find_next(list: &ShipList, id: i32) -> Option<i32>;

    fn get_property(list: &ShipList, id: i32, domain: Self::Domain) -> Option<Value>;

    /// Assign a property; `Ok(false)` when the value was null and nothing changed.
    /// Fails with `NotAssignable` when the component does not exist.
    fn set_property(list: &mut ShipList, id: i32, domain: Self::Domain, value: Option<&Value>)
        -> Result<bool, Error>;

    fn exists(list: &ShipList, id: i32) -> bool {
        id > 0 && Self::find_next(list, id - 1) == Some(id)
    }
}

/// Cursor on one component
#[derive(Debug, Clone)]
pub struct ComponentContext<K: ComponentKind> {
    id: i32,
    ship_list: Weak<RefCell<ShipList>>,
    kind: PhantomData<K>,
}

impl<K: ComponentKind> ComponentContext<K> {
    pub fn new(id: i32, ship_list: Weak<RefCell<ShipList>>) -> Self {
        Self {
            id,
            ship_list,
            kind: PhantomData,
        }
    }

    /// Context for `id`, or `None` if that component does not exist
    pub fn create(id: i32, ship_list: &Rc<RefCell<ShipList>>) -> Option<Self> {
        if K::exists(&ship_list.borrow(), id) {
            Some(Self::new(id, Rc::downgrade(ship_list)))
        } else {
            None
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }
}

impl<K: ComponentKind> BaseValue for ComponentContext<K> {
    fn to_text(&self, readable: bool) -> String {
        if readable {
            format!("{}({})", K::NAME, self.id)
        } else {
            format!("#<{}>", K::NAME.to_lowercase())
        }
    }

    fn store(
        &self,
        out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        *out = TagNode::new(K::TAG, self.id as u32);
        Ok(())
    }
}

impl<K: ComponentKind> Context for ComponentContext<K> {
    fn lookup(&self, name: &str) -> Option<PropertyIndex> {
        lookup_name(name, K::TABLE)
    }

    fn get(&self, index: PropertyIndex) -> Result<Option<Value>, Error> {
        let (entry, list) = match (K::TABLE.get(index), self.ship_list.upgrade()) {
            (Some(entry), Some(list)) => (entry, list),
            _ => return Ok(None),
        };
        let list = list.borrow();
        Ok(K::get_property(&list, self.id, entry.domain))
    }

    fn set(&self, index: PropertyIndex, value: Option<&Value>) -> Result<(), Error> {
        let (entry, list) = match (K::TABLE.get(index), self.ship_list.upgrade()) {
            (Some(entry), Some(list)) => (entry, list),
            _ => return Err(Error::NotAssignable),
        };
        let signal = {
            let mut list = list.borrow_mut();
            if !K::set_property(&mut list, self.id, entry.domain, value)? {
                return Ok(());
            }
            list.sig_change().clone()
        };
        signal.raise();
        Ok(())
    }

    fn next(&mut self) -> bool {
        let next = self
            .ship_list
            .upgrade()
            .and_then(|list| K::find_next(&list.borrow(), self.id));
        match next {
            Some(id) => {
                self.id = id;
                true
            }
            None => false,
        }
    }

    fn clone_context(&self) -> Box<dyn Context> {
        Box::new(self.clone())
    }

    fn enum_properties(&self, acceptor: &mut dyn PropertyAcceptor) {
        enum_table(K::TABLE, acceptor);
    }
}

/// Accessor function, `Hull(17)`; iterating it visits all components
#[derive(Debug, Clone)]
pub struct ComponentFunction<K: ComponentKind> {
    ship_list: Weak<RefCell<ShipList>>,
    kind: PhantomData<K>,
}

impl<K: ComponentKind> ComponentFunction<K> {
    pub fn new(ship_list: &Rc<RefCell<ShipList>>) -> Self {
        Self {
            ship_list: Rc::downgrade(ship_list),
            kind: PhantomData,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Indexable(Box::new(self))
    }
}

impl<K: ComponentKind> BaseValue for ComponentFunction<K> {
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

impl<K: ComponentKind> CallableValue for ComponentFunction<K> {
    fn call(&self, process: &mut Process, _world: &mut World, args: Arguments, want_result: bool) -> Result<(), Error> {
        call_indexable(self, process, args, want_result)
    }

    fn is_procedure_call(&self) -> bool {
        false
    }

    fn get_dimension(&self, which: usize) -> usize {
        let size = self.ship_list.upgrade().map_or(0, |list| K::size(&list.borrow()));
        match (which, size) {
            (0, _) => 1,
            (_, 0) => 0,
            (_, n) => n as usize + 1,
        }
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        let first = self
            .ship_list
            .upgrade()
            .and_then(|list| K::find_next(&list.borrow(), 0));
        Ok(first.map(|id| Box::new(ComponentContext::<K>::new(id, self.ship_list.clone())) as Box<dyn Context>))
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

impl<K: ComponentKind> IndexableValue for ComponentFunction<K> {
    fn get(&self, args: &mut Arguments) -> Result<Option<Value>, Error> {
        args.check_argument_count(1)?;
        let id = match check_integer_arg(args.next().as_ref())? {
            Some(id) => id,
            None => return Ok(None),
        };
        let list = match self.ship_list.upgrade() {
            Some(list) => list,
            None => return Ok(None),
        };
        Ok(ComponentContext::<K>::create(id, &list).map(|ctx| Value::Context(Box::new(ctx))))
    }

    fn set(&self, _args: &mut Arguments, _value: Option<&Value>) -> Result<(), Error> {
        reject_set()
    }

    fn clone_indexable(&self) -> Box<dyn IndexableValue> {
        Box::new(self.clone())
    }
}
