//! Text Tracks
//!
//! Track and cue model plus the live, observable track list.

use std::cell::RefCell;

use crate::events::{ListenerGuard, ListenerSet};

/// Text track kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackKind {
    Subtitles,
    #[default]
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

/// Text track mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextTrackMode {
    #[default]
    Disabled,
    Hidden,
    Showing,
}

/// Text track cue
#[derive(Debug, Clone, PartialEq)]
pub struct TextTrackCue {
    pub id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub pause_on_exit: bool,
    pub text: String,
}

/// Text track
#[derive(Debug, Clone, PartialEq)]
pub struct TextTrack {
    pub id: String,
    pub kind: TextTrackKind,
    pub label: String,
    pub language: String,
    pub mode: TextTrackMode,
    pub in_band_dispatch: String,
    pub cues: Vec<TextTrackCue>,
    pub active_cues: Vec<usize>,
}

impl TextTrack {
    pub fn new(kind: TextTrackKind, label: &str, language: &str) -> Self {
        Self {
            id: String::new(),
            kind,
            label: label.to_string(),
            language: language.to_string(),
            mode: TextTrackMode::Disabled,
            in_band_dispatch: String::new(),
            cues: Vec::new(),
            active_cues: Vec::new(),
        }
    }

    pub fn add_cue(&mut self, cue: TextTrackCue) {
        self.cues.push(cue);
    }

    pub fn remove_cue(&mut self, id: &str) {
        self.cues.retain(|cue| cue.id != id);
    }

    /// Recompute which cues cover `current_time`. Returns true when the
    /// active set changed.
    pub fn update_active(&mut self, current_time: f64) -> bool {
        let active: Vec<usize> = self
            .cues
            .iter()
            .enumerate()
            .filter(|(_, cue)| cue.start_time <= current_time && cue.end_time > current_time)
            .map(|(index, _)| index)
            .collect();
        if active == self.active_cues {
            return false;
        }
        self.active_cues = active;
        true
    }
}

/// Track list change kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackListEventKind {
    Added,
    Removed,
    Changed,
}

/// Track list change notification.
#[derive(Debug, Clone, Copy)]
pub struct TrackListEvent {
    pub kind: TrackListEventKind,
    pub index: usize,
}

/// Live text track collection.
///
/// Mutations fire the matching add/remove/change listeners synchronously.
pub struct TextTrackList {
    tracks: RefCell<Vec<TextTrack>>,
    listeners: ListenerSet<TrackListEventKind, TrackListEvent>,
}

impl TextTrackList {
    pub fn new() -> Self {
        Self {
            tracks: RefCell::new(Vec::new()),
            listeners: ListenerSet::new(),
        }
    }

    pub fn length(&self) -> usize {
        self.tracks.borrow().len()
    }

    pub fn get(&self, index: usize) -> Option<TextTrack> {
        self.tracks.borrow().get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<TextTrack> {
        self.tracks.borrow().clone()
    }

    /// Append a track and fire the added listeners.
    pub fn add_track(&self, track: TextTrack) {
        let index = {
            let mut tracks = self.tracks.borrow_mut();
            tracks.push(track);
            tracks.len() - 1
        };
        self.emit(TrackListEventKind::Added, index);
    }

    /// Remove the track at `index`, firing the removed listeners.
    pub fn remove_track(&self, index: usize) -> Option<TextTrack> {
        let removed = {
            let mut tracks = self.tracks.borrow_mut();
            if index < tracks.len() {
                Some(tracks.remove(index))
            } else {
                None
            }
        };
        if removed.is_some() {
            self.emit(TrackListEventKind::Removed, index);
        }
        removed
    }

    /// Set the display mode of the track at `index`.
    ///
    /// Panics if `index` is out of range, like native list indexing.
    pub fn set_mode(&self, index: usize, mode: TextTrackMode) {
        {
            let mut tracks = self.tracks.borrow_mut();
            tracks[index].mode = mode;
        }
        self.emit(TrackListEventKind::Changed, index);
    }

    pub fn mode(&self, index: usize) -> Option<TextTrackMode> {
        self.tracks.borrow().get(index).map(|track| track.mode)
    }

    /// Add a cue to the track at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn add_cue(&self, index: usize, cue: TextTrackCue) {
        {
            let mut tracks = self.tracks.borrow_mut();
            tracks[index].add_cue(cue);
        }
        self.emit(TrackListEventKind::Changed, index);
    }

    /// Recompute active cues for every track, firing changed for each
    /// track whose active set moved.
    pub fn update_active_cues(&self, current_time: f64) {
        let changed: Vec<usize> = {
            let mut tracks = self.tracks.borrow_mut();
            tracks
                .iter_mut()
                .enumerate()
                .filter_map(|(index, track)| track.update_active(current_time).then_some(index))
                .collect()
        };
        for index in changed {
            self.emit(TrackListEventKind::Changed, index);
        }
    }

    pub fn on(
        &self,
        kind: TrackListEventKind,
        func: impl Fn(&TrackListEvent) + 'static,
    ) -> ListenerGuard {
        self.listeners.add_guarded(kind, func)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self, kind: TrackListEventKind, index: usize) {
        self.listeners.emit(kind, &TrackListEvent { kind, index });
    }
}

impl Default for TextTrackList {
    fn default() -> Self {
        Self::new()
    }
}
