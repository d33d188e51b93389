//! Vireo Reactive
//!
//! Single-threaded observable cells and effects for the vireo player stack.
//!
//! Features:
//! - `Signal<T>` value cells with synchronous change notification
//! - Auto-tracked effects that re-run when a cell they read changes
//! - Explicit watches, with a suppressible variant for feedback guards
//! - `EventHook<T>` subscribable callback lists

pub mod runtime;
pub mod signal;
pub mod watch;
pub mod hook;

pub use runtime::{Runtime, Subscription};
pub use signal::Signal;
pub use watch::Suppression;
pub use hook::{EventHook, HookHandle};
