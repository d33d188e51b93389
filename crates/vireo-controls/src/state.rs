//! Playback state
//!
//! One observable cell per playback fact. Derived cells are written by the
//! controller from element events; `current_time`, `playing`, and `volume`
//! also accept host writes, which drive the element.

use vireo_media::{TextTrackCue, TextTrackKind, TextTrackList, TextTrackMode};
use vireo_reactive::{Runtime, Signal};

/// Snapshot of one text track in the element's live list.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTrackInfo {
    /// Ordinal position in the track list, used as the selection id.
    pub id: usize,
    pub label: String,
    pub language: String,
    pub kind: TextTrackKind,
    pub mode: TextTrackMode,
    pub in_band_dispatch: String,
    pub cues: Vec<TextTrackCue>,
    pub active_cues: Vec<usize>,
}

/// The observable cells for one controlled element.
#[derive(Clone)]
pub struct PlaybackState {
    /// Playback position in seconds. Writing seeks the element.
    pub current_time: Signal<f64>,
    /// Media duration in seconds, 0 until known.
    pub duration: Signal<f64>,
    /// Whether playback is running. Writing plays or pauses the element.
    pub playing: Signal<bool>,
    /// Output volume in `[0, 1]`. Writing pushes it onto the element.
    pub volume: Signal<f64>,
    pub seeking: Signal<bool>,
    pub waiting: Signal<bool>,
    pub stalled: Signal<bool>,
    pub ended: Signal<bool>,
    /// True while playback is held up by a rebuffer or a stall.
    pub buffering: Signal<bool>,
    /// Buffered ranges as (start, end) second pairs, replaced wholesale.
    pub buffered: Signal<Vec<(f64, f64)>>,
    pub rate: Signal<f64>,
    /// Text track snapshots, rebuilt on any change to the live list.
    pub tracks: Signal<Vec<TextTrackInfo>>,
    /// Index of the showing track, or -1 when none is selected.
    pub selected_track: Signal<i32>,
    pub is_picture_in_picture: Signal<bool>,
}

impl PlaybackState {
    pub fn new(runtime: &Runtime) -> Self {
        Self {
            current_time: runtime.signal(0.0),
            duration: runtime.signal(0.0),
            playing: runtime.signal(false),
            volume: runtime.signal(1.0),
            seeking: runtime.signal(false),
            waiting: runtime.signal(false),
            stalled: runtime.signal(false),
            ended: runtime.signal(false),
            buffering: runtime.signal(false),
            buffered: runtime.signal(Vec::new()),
            rate: runtime.signal(1.0),
            tracks: runtime.signal(Vec::new()),
            selected_track: runtime.signal(-1),
            is_picture_in_picture: runtime.signal(false),
        }
    }
}

/// Rebuild the track snapshot list from a live collection.
pub(crate) fn track_snapshot(list: &TextTrackList) -> Vec<TextTrackInfo> {
    list.snapshot()
        .into_iter()
        .enumerate()
        .map(|(index, track)| TextTrackInfo {
            id: index,
            label: track.label,
            language: track.language,
            kind: track.kind,
            mode: track.mode,
            in_band_dispatch: track.in_band_dispatch,
            cues: track.cues,
            active_cues: track.active_cues,
        })
        .collect()
}
