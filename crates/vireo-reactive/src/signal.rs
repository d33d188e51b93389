//! Observable Cells
//!
//! `Signal<T>` value cells with synchronous change notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{RuntimeCore, SourceId, notify};

/// An observable value cell.
///
/// Reads inside a running effect register the cell as a dependency of that
/// effect. Writes notify subscribers synchronously. Clones share the value.
pub struct Signal<T> {
    id: SourceId,
    value: Rc<RefCell<T>>,
    core: Weak<RuntimeCore>,
}

impl<T> Signal<T> {
    pub(crate) fn new(id: SourceId, value: T, core: Weak<RuntimeCore>) -> Self {
        Self {
            id,
            value: Rc::new(RefCell::new(value)),
            core,
        }
    }

    pub(crate) fn raw_id(&self) -> SourceId {
        self.id
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        if let Some(core) = self.core.upgrade() {
            notify(&core, self.id);
        }
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, func: impl FnOnce(&mut T)) {
        func(&mut self.value.borrow_mut());
        if let Some(core) = self.core.upgrade() {
            notify(&core, self.id);
        }
    }

    /// Borrow the value for the duration of `func`, registering a
    /// dependency. Writing the same cell from inside `func` is an error.
    pub fn with<R>(&self, func: impl FnOnce(&T) -> R) -> R {
        self.track();
        let value = self.value.borrow();
        func(&value)
    }

    fn track(&self) {
        if let Some(core) = self.core.upgrade() {
            core.track_read(self.id);
        }
    }
}

impl<T: PartialEq> Signal<T> {
    /// Write `value` only if it differs from the current value, skipping
    /// notification entirely when nothing changed.
    pub fn set_neq(&self, value: T) {
        if *self.value.borrow() == value {
            return;
        }
        self.set(value);
    }
}

impl<T: Clone> Signal<T> {
    /// Read the current value, registering it as a dependency of the
    /// running effect, if any.
    pub fn get(&self) -> T {
        self.track();
        self.value.borrow().clone()
    }

    /// Read the current value without dependency tracking.
    pub fn peek(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: self.value.clone(),
            core: self.core.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&*self.value.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::Runtime;

    #[test]
    fn test_get_set() {
        let runtime = Runtime::new();
        let cell = runtime.signal(5);

        assert_eq!(cell.get(), 5);
        cell.set(9);
        assert_eq!(cell.get(), 9);
    }

    #[test]
    fn test_update_in_place() {
        let runtime = Runtime::new();
        let cell = runtime.signal(vec![1, 2]);

        cell.update(|v| v.push(3));
        assert_eq!(cell.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_neq_skips_unchanged_notification() {
        use std::cell::Cell;
        use std::rc::Rc;

        let runtime = Runtime::new();
        let cell = runtime.signal(4);
        let runs = Rc::new(Cell::new(0));

        let counter = runs.clone();
        let source = cell.clone();
        let _sub = runtime.effect(move || {
            source.get();
            counter.set(counter.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        cell.set_neq(4);
        assert_eq!(runs.get(), 1);
        cell.set_neq(5);
        assert_eq!(runs.get(), 2);
        assert_eq!(cell.get(), 5);
    }

    #[test]
    fn test_clones_share_value() {
        let runtime = Runtime::new();
        let cell = runtime.signal("a".to_string());
        let alias = cell.clone();

        alias.set("b".to_string());
        assert_eq!(cell.get(), "b");
    }

    #[test]
    fn test_with_borrows() {
        let runtime = Runtime::new();
        let cell = runtime.signal(vec![1, 2, 3]);

        let len = cell.with(|v| v.len());
        assert_eq!(len, 3);
    }
}
