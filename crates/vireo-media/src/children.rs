//! Generated Children
//!
//! Source and track child nodes, and the document-like context that
//! creates them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::events::ListenerSet;
use crate::pip::PendingRequest;
use crate::tracks::TextTrackKind;

/// Failed source load notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub url: String,
    pub message: String,
}

/// A generated source child.
///
/// Clones are handles to the same node.
#[derive(Clone)]
pub struct SourceElement {
    inner: Rc<SourceInner>,
}

struct SourceInner {
    url: String,
    codec: String,
    errors: ListenerSet<(), SourceError>,
}

impl SourceElement {
    pub(crate) fn new(url: &str, codec: &str) -> Self {
        Self {
            inner: Rc::new(SourceInner {
                url: url.to_string(),
                codec: codec.to_string(),
                errors: ListenerSet::new(),
            }),
        }
    }

    pub fn url(&self) -> String {
        self.inner.url.clone()
    }

    pub fn codec(&self) -> String {
        self.inner.codec.clone()
    }

    /// Register an error listener; the returned id deregisters it.
    pub fn on_error(&self, func: impl Fn(&SourceError) + 'static) -> u64 {
        self.inner.errors.add((), func)
    }

    pub fn remove_error_listener(&self, id: u64) {
        self.inner.errors.remove(id);
    }

    pub fn error_listener_count(&self) -> usize {
        self.inner.errors.len()
    }

    /// Script a load failure for this source.
    pub fn fire_error(&self, message: &str) {
        tracing::debug!(url = %self.inner.url, message, "source load error");
        self.inner.errors.emit(
            (),
            &SourceError {
                url: self.inner.url.clone(),
                message: message.to_string(),
            },
        );
    }

    pub fn same_node(&self, other: &SourceElement) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A generated track child.
///
/// Inert descriptor node; the owning element materializes the live text
/// track when the child is appended.
#[derive(Clone)]
pub struct TrackElement {
    inner: Rc<TrackInner>,
}

struct TrackInner {
    url: String,
    label: String,
    language: String,
    kind: TextTrackKind,
    default: bool,
}

impl TrackElement {
    pub(crate) fn new(
        url: &str,
        label: &str,
        language: &str,
        kind: TextTrackKind,
        default: bool,
    ) -> Self {
        Self {
            inner: Rc::new(TrackInner {
                url: url.to_string(),
                label: label.to_string(),
                language: language.to_string(),
                kind,
                default,
            }),
        }
    }

    pub fn url(&self) -> String {
        self.inner.url.clone()
    }

    pub fn label(&self) -> String {
        self.inner.label.clone()
    }

    pub fn language(&self) -> String {
        self.inner.language.clone()
    }

    pub fn kind(&self) -> TextTrackKind {
        self.inner.kind
    }

    pub fn is_default(&self) -> bool {
        self.inner.default
    }

    pub fn same_node(&self, other: &TrackElement) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Document-like creation context.
///
/// Hands out generated children and carries the document-level
/// picture-in-picture surface (see [`crate::pip`]).
pub struct MediaDocument {
    pub(crate) pip_enabled: Cell<bool>,
    pub(crate) auto_respond: Cell<bool>,
    pub(crate) pending: RefCell<Vec<PendingRequest>>,
}

impl MediaDocument {
    pub fn new() -> Self {
        Self {
            pip_enabled: Cell::new(true),
            auto_respond: Cell::new(true),
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn create_source(&self, url: &str, codec: &str) -> SourceElement {
        SourceElement::new(url, codec)
    }

    pub fn create_track(
        &self,
        url: &str,
        label: &str,
        language: &str,
        kind: TextTrackKind,
        default: bool,
    ) -> TrackElement {
        TrackElement::new(url, label, language, kind, default)
    }
}

impl Default for MediaDocument {
    fn default() -> Self {
        Self::new()
    }
}
