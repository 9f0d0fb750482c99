//! Named locks shared between script processes
//!
//! Scripts use locks to announce that they are working on an object
//! (`With Lock("P15.TAX") Do ...`). A lock is created when the process enters
//! the lock context and released when it leaves it, either normally, by
//! exception unwinding, or because the process ends.

use crate::error::Error;
use crate::names::{PropertyAcceptor, PropertyIndex};
use crate::process::ProcessHandle;
use crate::serialization::{write_aux_string, Charset, SaveContext, TagNode, TAG_MUTEX};
use crate::value::{BaseValue, Value};
use crate::context::Context;
use crate::world::World;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One held lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutex {
    name: String,
    note: String,
    owner: ProcessHandle,
}

impl Mutex {
    /// Canonical (upper-case) name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn owner(&self) -> &ProcessHandle {
        &self.owner
    }
}

/// All locks of a world, keyed by canonical name
#[derive(Debug, Default)]
pub struct MutexList {
    locks: HashMap<String, Mutex>,
}

fn canonical(name: &str) -> String {
    name.to_uppercase()
}

impl MutexList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lock.
    ///
    /// Fails with [`Error::LockConflict`] if a lock of that name exists,
    /// regardless of its owner; a process cannot take the same lock twice.
    pub fn create(&mut self, name: &str, note: &str, owner: &ProcessHandle) -> Result<&Mutex, Error> {
        let key = canonical(name);
        if let Some(existing) = self.locks.get(&key) {
            warn!(lock = %key, holder = %existing.owner.name(), requester = %owner.name(), "lock conflict");
            return Err(Error::LockConflict { name: key });
        }
        debug!(lock = %key, owner = %owner.name(), "lock created");
        let mutex = Mutex {
            name: key.clone(),
            note: note.to_string(),
            owner: owner.clone(),
        };
        Ok(self.locks.entry(key).or_insert(mutex))
    }

    /// Look up a lock by name, case-insensitively
    pub fn query(&self, name: &str) -> Option<&Mutex> {
        self.locks.get(&canonical(name))
    }

    /// Release a lock held by `owner_id`. Returns false if no such lock exists.
    pub fn release(&mut self, name: &str, owner_id: u32) -> bool {
        let key = canonical(name);
        match self.locks.get(&key) {
            Some(m) if m.owner.id() == owner_id => {
                self.locks.remove(&key);
                debug!(lock = %key, "lock released");
                true
            }
            _ => false,
        }
    }

    /// Drop every lock still held by a process. Returns the number removed.
    pub fn disown_locks_by_process(&mut self, process_id: u32) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, m| m.owner.id() != process_id);
        let removed = before - self.locks.len();
        if removed > 0 {
            debug!(process = process_id, count = removed, "released locks of finished process");
        }
        removed
    }

    /// Locks sorted by name
    pub fn enum_locks(&self) -> Vec<&Mutex> {
        let mut locks: Vec<&Mutex> = self.locks.values().collect();
        locks.sort_by(|a, b| a.name.cmp(&b.name));
        locks
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Value returned by `Lock()`: entering it takes the lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexContext {
    name: String,
    note: String,
}

impl MutexContext {
    pub fn new(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: note.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

impl BaseValue for MutexContext {
    fn to_text(&self, _readable: bool) -> String {
        "#<lock>".to_string()
    }

    fn store(
        &self,
        out: &mut TagNode,
        aux: &mut Vec<u8>,
        charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        write_aux_string(aux, &self.name, charset)?;
        write_aux_string(aux, &self.note, charset)?;
        *out = TagNode::new(TAG_MUTEX, 0);
        Ok(())
    }
}

impl Context for MutexContext {
    fn lookup(&self, _name: &str) -> Option<PropertyIndex> {
        None
    }

    fn get(&self, _index: PropertyIndex) -> Result<Option<Value>, Error> {
        Ok(None)
    }

    fn next(&mut self) -> bool {
        false
    }

    fn clone_context(&self) -> Box<dyn Context> {
        Box::new(self.clone())
    }

    fn enum_properties(&self, _acceptor: &mut dyn PropertyAcceptor) {}

    fn on_context_entered(&mut self, world: &mut World, process: &ProcessHandle) -> Result<(), Error> {
        world.mutex_list_mut().create(&self.name, &self.note, process)?;
        Ok(())
    }

    fn on_context_left(&mut self, world: &mut World, process: &ProcessHandle) {
        world.mutex_list_mut().release(&self.name, process.id());
    }
}
