//! Event Hooks
//!
//! Plain subscribable callback lists for one-off notification surfaces.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A subscribable callback list.
pub struct EventHook<T> {
    inner: Rc<RefCell<HookInner<T>>>,
}

struct HookInner<T> {
    next_id: u64,
    callbacks: Vec<(u64, Rc<dyn Fn(&T)>)>,
}

impl<T> EventHook<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HookInner {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Subscribe. The callback stays registered until [`HookHandle::off`]
    /// is called or the hook itself is dropped.
    pub fn on(&self, func: impl Fn(&T) + 'static) -> HookHandle<T> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.push((id, Rc::new(func)));
        HookHandle {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Invoke every registered callback with `payload`, in subscription
    /// order.
    pub fn emit(&self, payload: &T) {
        let callbacks: Vec<Rc<dyn Fn(&T)>> = self
            .inner
            .borrow()
            .callbacks
            .iter()
            .map(|(_, func)| func.clone())
            .collect();
        for callback in callbacks {
            callback(payload);
        }
    }

    pub fn count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }
}

impl<T> Clone for EventHook<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for EventHook<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unsubscription handle for one hook callback.
pub struct HookHandle<T> {
    id: u64,
    inner: Weak<RefCell<HookInner<T>>>,
}

impl<T> HookHandle<T> {
    pub fn off(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}
