//! Vireo Controls
//!
//! A reactive playback controller for media elements.
//!
//! # Goals
//! - One observable cell per playback fact, writable from either side
//! - Feedback-free mirroring between cells and the element
//! - Declarative source and track children, rebuilt wholesale on change
//!
//! # Example
//! ```rust,ignore
//! use vireo_controls::{MediaController, MediaOptions};
//!
//! let runtime = Runtime::new();
//! let controller = MediaController::new(&runtime, Some(document), MediaOptions {
//!     src: Some("intro.mp4".into()),
//!     ..MediaOptions::default()
//! });
//! controller.bind(element);
//! controller.state().playing.set(true);
//! ```

mod controller;
mod state;
mod options;

pub use controller::MediaController;
pub use state::{PlaybackState, TextTrackInfo};
pub use options::{MediaOptions, OptionCells, SourceDescriptor, SourceInput, TrackDescriptor};

// Re-export sub-crates for advanced usage
pub use vireo_media as media;
pub use vireo_reactive as reactive;

/// Controller version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
