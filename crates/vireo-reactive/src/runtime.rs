//! Reactive Runtime
//!
//! Cell factory and synchronous effect scheduler.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::{Rc, Weak};

use crate::signal::Signal;

pub(crate) type SourceId = u64;
pub(crate) type ObserverId = u64;

/// A registered effect or watch callback.
pub(crate) struct Observer {
    func: Rc<RefCell<dyn FnMut()>>,
    /// Auto-tracked observers re-collect their dependencies on every run.
    tracked: bool,
    /// Non-zero depth mutes the observer without touching its dependencies.
    suppress: Option<Rc<Cell<u32>>>,
    running: Cell<bool>,
}

#[derive(Default)]
pub(crate) struct RuntimeCore {
    next_id: Cell<u64>,
    /// Observer currently collecting dependencies, if any.
    current: Cell<Option<ObserverId>>,
    observers: RefCell<HashMap<ObserverId, Rc<Observer>>>,
    subscribers: RefCell<HashMap<SourceId, BTreeSet<ObserverId>>>,
    depends_on: RefCell<HashMap<ObserverId, HashSet<SourceId>>>,
}

impl RuntimeCore {
    pub(crate) fn alloc_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Record a read of `source` by the observer currently collecting
    /// dependencies.
    pub(crate) fn track_read(&self, source: SourceId) {
        let Some(observer) = self.current.get() else { return };
        self.subscribers
            .borrow_mut()
            .entry(source)
            .or_default()
            .insert(observer);
        self.depends_on
            .borrow_mut()
            .entry(observer)
            .or_default()
            .insert(source);
    }

    fn clear_dependencies(&self, observer: ObserverId) {
        let sources = self.depends_on.borrow_mut().remove(&observer).unwrap_or_default();
        let mut subscribers = self.subscribers.borrow_mut();
        for source in sources {
            if let Some(set) = subscribers.get_mut(&source) {
                set.remove(&observer);
            }
        }
    }

    pub(crate) fn remove_observer(&self, observer: ObserverId) {
        self.clear_dependencies(observer);
        self.observers.borrow_mut().remove(&observer);
    }
}

/// Run every observer subscribed to `source`, in creation order.
pub(crate) fn notify(core: &Rc<RuntimeCore>, source: SourceId) {
    let ids: Vec<ObserverId> = match core.subscribers.borrow().get(&source) {
        Some(set) => set.iter().copied().collect(),
        None => return,
    };
    for id in ids {
        run_observer(core, id);
    }
}

pub(crate) fn run_observer(core: &Rc<RuntimeCore>, id: ObserverId) {
    let observer = match core.observers.borrow().get(&id) {
        Some(observer) => observer.clone(),
        None => return,
    };
    if let Some(depth) = &observer.suppress {
        // Skip entirely so the fixed subscription stays intact.
        if depth.get() > 0 {
            return;
        }
    }
    if observer.running.get() {
        tracing::trace!(observer = id, "skipped re-entrant observer run");
        return;
    }
    if observer.tracked {
        core.clear_dependencies(id);
    }
    let previous = core.current.replace(observer.tracked.then_some(id));
    observer.running.set(true);
    (observer.func.borrow_mut())();
    observer.running.set(false);
    core.current.set(previous);
}

/// Cell factory and effect scheduler.
///
/// Cheap to clone; clones share one observer registry. Everything runs on a
/// single thread and notification is synchronous, in creation order.
#[derive(Clone, Default)]
pub struct Runtime {
    core: Rc<RuntimeCore>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an observable cell holding `value`.
    pub fn signal<T>(&self, value: T) -> Signal<T> {
        Signal::new(self.core.alloc_id(), value, Rc::downgrade(&self.core))
    }

    /// Register an auto-tracked effect and run it once immediately.
    ///
    /// The effect re-runs synchronously whenever a cell it read during its
    /// previous run is written.
    pub fn effect(&self, func: impl FnMut() + 'static) -> Subscription {
        let id = self.core.alloc_id();
        let observer = Observer {
            func: Rc::new(RefCell::new(func)),
            tracked: true,
            suppress: None,
            running: Cell::new(false),
        };
        self.core.observers.borrow_mut().insert(id, Rc::new(observer));
        run_observer(&self.core, id);
        Subscription {
            id,
            core: Rc::downgrade(&self.core),
        }
    }

    pub(crate) fn register_watch(
        &self,
        source: SourceId,
        func: impl FnMut() + 'static,
        suppress: Option<Rc<Cell<u32>>>,
    ) -> Subscription {
        let id = self.core.alloc_id();
        let observer = Observer {
            func: Rc::new(RefCell::new(func)),
            tracked: false,
            suppress,
            running: Cell::new(false),
        };
        self.core.observers.borrow_mut().insert(id, Rc::new(observer));
        self.core
            .subscribers
            .borrow_mut()
            .entry(source)
            .or_default()
            .insert(id);
        self.core
            .depends_on
            .borrow_mut()
            .entry(id)
            .or_default()
            .insert(source);
        Subscription {
            id,
            core: Rc::downgrade(&self.core),
        }
    }
}

/// Handle to a registered effect or watch. Disposes on drop.
pub struct Subscription {
    id: ObserverId,
    core: Weak<RuntimeCore>,
}

impl Subscription {
    /// Unregister the callback; it will never run again.
    pub fn dispose(&self) {
        if let Some(core) = self.core.upgrade() {
            core.remove_observer(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
