//! Media Events
//!
//! Event kinds and listener registries for the element and its track list.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Standard media element events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEventKind {
    Play,
    Pause,
    Playing,
    Waiting,
    Seeking,
    Seeked,
    TimeUpdate,
    DurationChange,
    Progress,
    RateChange,
    VolumeChange,
    Stalled,
    Ended,
    LoadedData,
    EnterPictureInPicture,
    LeavePictureInPicture,
}

impl MediaEventKind {
    /// DOM event name.
    pub fn as_name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Playing => "playing",
            Self::Waiting => "waiting",
            Self::Seeking => "seeking",
            Self::Seeked => "seeked",
            Self::TimeUpdate => "timeupdate",
            Self::DurationChange => "durationchange",
            Self::Progress => "progress",
            Self::RateChange => "ratechange",
            Self::VolumeChange => "volumechange",
            Self::Stalled => "stalled",
            Self::Ended => "ended",
            Self::LoadedData => "loadeddata",
            Self::EnterPictureInPicture => "enterpictureinpicture",
            Self::LeavePictureInPicture => "leavepictureinpicture",
        }
    }
}

/// Keyed listener registry.
///
/// Callbacks for a key run in registration order. The callback list is
/// snapshotted before dispatch, so listeners may attach or detach other
/// listeners mid-event.
pub(crate) struct ListenerSet<K, E> {
    inner: Rc<ListenerInner<K, E>>,
}

struct ListenerInner<K, E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<ListenerEntry<K, E>>>,
}

struct ListenerEntry<K, E> {
    id: u64,
    key: K,
    callback: Rc<dyn Fn(&E)>,
}

impl<K: Copy + PartialEq + 'static, E: 'static> ListenerSet<K, E> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(ListenerInner {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn add(&self, key: K, callback: impl Fn(&E) + 'static) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.entries.borrow_mut().push(ListenerEntry {
            id,
            key,
            callback: Rc::new(callback),
        });
        id
    }

    /// Register and wrap the id in a guard that detaches on drop.
    pub(crate) fn add_guarded(&self, key: K, callback: impl Fn(&E) + 'static) -> ListenerGuard {
        let id = self.add(key, callback);
        let inner = Rc::downgrade(&self.inner);
        ListenerGuard::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.entries.borrow_mut().retain(|entry| entry.id != id);
            }
        })
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.inner.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub(crate) fn emit(&self, key: K, event: &E) {
        let callbacks: Vec<Rc<dyn Fn(&E)>> = self
            .inner
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.key == key)
            .map(|entry| entry.callback.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }
}

/// Detaches one registered listener when dropped.
pub struct ListenerGuard {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub(crate) fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}
