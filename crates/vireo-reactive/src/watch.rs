//! Watches
//!
//! Explicit single-cell subscriptions, plus the suppression guard used to
//! break feedback loops between paired writers.

use std::cell::Cell;
use std::rc::Rc;

use crate::runtime::{Runtime, Subscription};
use crate::signal::Signal;

impl Runtime {
    /// Subscribe `func` to writes of `signal`.
    ///
    /// Unlike an effect, the subscription is fixed: the callback runs with
    /// the fresh value on every write and never tracks other cells.
    pub fn watch<T: Clone + 'static>(
        &self,
        signal: &Signal<T>,
        mut func: impl FnMut(&T) + 'static,
    ) -> Subscription {
        let cell = signal.clone();
        self.register_watch(signal.raw_id(), move || func(&cell.peek()), None)
    }

    /// Like [`watch`](Runtime::watch), but paired with a [`Suppression`]
    /// guard that can mute the callback for writes performed inside
    /// [`Suppression::run`].
    pub fn watch_suppressible<T: Clone + 'static>(
        &self,
        signal: &Signal<T>,
        mut func: impl FnMut(&T) + 'static,
    ) -> (Subscription, Suppression) {
        let depth = Rc::new(Cell::new(0u32));
        let cell = signal.clone();
        let subscription = self.register_watch(
            signal.raw_id(),
            move || func(&cell.peek()),
            Some(depth.clone()),
        );
        (subscription, Suppression { depth })
    }
}

/// Depth-counted mute guard for a suppressible watch.
///
/// Writes performed inside [`run`](Suppression::run) still update the cell
/// and notify every other subscriber; only the paired watch callback is
/// skipped. The depth counter keeps nested runs from lifting the guard
/// early.
#[derive(Clone)]
pub struct Suppression {
    depth: Rc<Cell<u32>>,
}

impl Suppression {
    pub fn run<R>(&self, func: impl FnOnce() -> R) -> R {
        self.depth.set(self.depth.get() + 1);
        let out = func();
        self.depth.set(self.depth.get() - 1);
        out
    }

    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}
