//! Vireo Media
//!
//! Synthetic media playback model for the Vireo player.
//!
//! Features:
//! - Scriptable media element with the standard event surface
//! - Text tracks with cue timing and a live track list
//! - Generated source and track children
//! - Document-level Picture-in-Picture brokering

pub mod element;
pub mod events;
pub mod tracks;
pub mod children;
pub mod deferred;
pub mod pip;

pub use element::{ElementStats, MediaElement, PreloadHint, ReadyState, TimeRanges};
pub use events::{ListenerGuard, MediaEventKind};
pub use tracks::{
    TextTrack, TextTrackCue, TextTrackKind, TextTrackList, TextTrackMode, TrackListEvent,
    TrackListEventKind,
};
pub use children::{MediaDocument, SourceElement, SourceError, TrackElement};
pub use deferred::{Deferred, DeferredState};
pub use pip::PipDirection;

/// Media error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Picture-in-Picture not supported")]
    PipUnsupported,

    #[error("Picture-in-Picture denied: {0}")]
    PipDenied(String),

    #[error("No media element bound")]
    NotBound,
}
