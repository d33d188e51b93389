//! Deferred Results
//!
//! Single-settle asynchronous outcomes with inspectable state.

use std::cell::RefCell;
use std::rc::Rc;

/// Settlement state of a [`Deferred`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredState<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

/// A single-settle deferred result.
///
/// Clones share the settlement. The first resolve or reject wins; later
/// settles are ignored.
pub struct Deferred<T, E> {
    inner: Rc<RefCell<DeferredInner<T, E>>>,
}

struct DeferredInner<T, E> {
    outcome: Option<Rc<Result<T, E>>>,
    callbacks: Vec<Box<dyn FnOnce(&Result<T, E>)>>,
}

impl<T, E> Deferred<T, E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DeferredInner {
                outcome: None,
                callbacks: Vec::new(),
            })),
        }
    }

    /// An already-resolved deferred.
    pub fn resolved(value: T) -> Self {
        let deferred = Self::new();
        deferred.resolve(value);
        deferred
    }

    /// An already-rejected deferred.
    pub fn rejected(error: E) -> Self {
        let deferred = Self::new();
        deferred.reject(error);
        deferred
    }

    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(&self, error: E) {
        self.settle(Err(error));
    }

    fn settle(&self, outcome: Result<T, E>) {
        let (callbacks, shared) = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                return;
            }
            let shared = Rc::new(outcome);
            inner.outcome = Some(shared.clone());
            (std::mem::take(&mut inner.callbacks), shared)
        };
        for callback in callbacks {
            callback(&shared);
        }
    }

    /// Run `func` once the deferred settles; immediately if it already
    /// has.
    pub fn on_settle(&self, func: impl FnOnce(&Result<T, E>) + 'static) {
        let settled = self.inner.borrow().outcome.clone();
        match settled {
            Some(outcome) => func(&outcome),
            None => self.inner.borrow_mut().callbacks.push(Box::new(func)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.borrow().outcome.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&self.inner.borrow().outcome, Some(outcome) if outcome.is_ok())
    }

    pub fn is_rejected(&self) -> bool {
        matches!(&self.inner.borrow().outcome, Some(outcome) if outcome.is_err())
    }
}

impl<T: Clone, E: Clone> Deferred<T, E> {
    pub fn state(&self) -> DeferredState<T, E> {
        match &self.inner.borrow().outcome {
            None => DeferredState::Pending,
            Some(outcome) => match outcome.as_ref() {
                Ok(value) => DeferredState::Resolved(value.clone()),
                Err(error) => DeferredState::Rejected(error.clone()),
            },
        }
    }

    pub fn outcome(&self) -> Option<Result<T, E>> {
        self.inner
            .borrow()
            .outcome
            .as_ref()
            .map(|outcome| outcome.as_ref().clone())
    }
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_settle_wins() {
        let deferred: Deferred<i32, String> = Deferred::new();
        assert!(deferred.is_pending());

        deferred.resolve(1);
        deferred.resolve(2);
        deferred.reject("late".into());

        assert_eq!(deferred.state(), DeferredState::Resolved(1));
    }

    #[test]
    fn test_on_settle_before_and_after() {
        let deferred: Deferred<i32, String> = Deferred::new();
        let early = Rc::new(Cell::new(0));
        let late = Rc::new(Cell::new(0));

        let sink = early.clone();
        deferred.on_settle(move |outcome| sink.set(*outcome.as_ref().ok().unwrap_or(&0)));

        deferred.resolve(7);
        assert_eq!(early.get(), 7);

        let sink = late.clone();
        deferred.on_settle(move |outcome| sink.set(*outcome.as_ref().ok().unwrap_or(&0)));
        assert_eq!(late.get(), 7, "late subscriber fires immediately");
    }

    #[test]
    fn test_rejected_constructor() {
        let deferred: Deferred<(), String> = Deferred::rejected("no".into());

        assert!(deferred.is_rejected());
        assert_eq!(deferred.outcome(), Some(Err("no".into())));
    }

    #[test]
    fn test_clones_share_settlement() {
        let deferred: Deferred<i32, String> = Deferred::new();
        let alias = deferred.clone();

        alias.resolve(3);
        assert!(deferred.is_resolved());
    }
}
