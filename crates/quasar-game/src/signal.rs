//! Change notification

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener = Box<dyn FnMut()>;

/// Multicast "something changed" signal
///
/// Clones share the listener list, so a signal can be taken out of a
/// borrowed container and raised after the borrow has ended. Listeners must
/// not connect new listeners while the signal is being raised.
#[derive(Clone, Default)]
pub struct ChangeSignal {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, listener: impl FnMut() + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn raise(&self) {
        for listener in self.listeners.borrow_mut().iter_mut() {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
