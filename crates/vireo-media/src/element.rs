//! Media Element
//!
//! A synthetic, scriptable playback element with the standard attribute
//! and event surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::children::{SourceElement, TrackElement};
use crate::events::{ListenerGuard, ListenerSet, MediaEventKind};
use crate::tracks::{TextTrack, TextTrackList};

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Preload hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreloadHint {
    None,
    #[default]
    Metadata,
    Auto,
}

/// Time ranges
#[derive(Debug, Clone, Default)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, start: f64, end: f64) {
        self.ranges.push((start, end));
    }

    pub fn length(&self) -> usize {
        self.ranges.len()
    }

    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(start, _)| *start)
    }

    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(_, end)| *end)
    }

    /// Flatten to (start, end) pairs.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.ranges.clone()
    }
}

/// Call counters for host and test inspection.
#[derive(Debug, Default)]
pub struct ElementStats {
    pub play_calls: Cell<u32>,
    pub pause_calls: Cell<u32>,
    pub seek_calls: Cell<u32>,
    pub load_calls: Cell<u32>,
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get() + 1);
}

/// Synthetic media element.
///
/// Interior-mutable so listeners firing mid-operation can read attributes
/// through a shared handle. Hosts drive it with the scripting helpers
/// (`finish_loading`, `advance_time`, `buffer_range`, ...); every
/// operation fires the same events a native element would.
pub struct MediaElement {
    // Playback
    current_time: Cell<f64>,
    duration: Cell<f64>,
    paused: Cell<bool>,
    ended: Cell<bool>,
    seeking: Cell<bool>,
    playback_rate: Cell<f64>,
    ready_state: Cell<ReadyState>,
    buffered: RefCell<TimeRanges>,

    // Volume
    volume: Cell<f64>,
    muted: Cell<bool>,

    // Declarative attributes
    autoplay: Cell<bool>,
    looping: Cell<bool>,
    controls: Cell<bool>,
    preload: Cell<PreloadHint>,
    poster: RefCell<String>,
    plays_inline: Cell<bool>,
    auto_picture_in_picture: Cell<bool>,

    // Children
    sources: RefCell<Vec<SourceElement>>,
    track_children: RefCell<Vec<TrackElement>>,
    text_tracks: Rc<TextTrackList>,

    in_picture_in_picture: Cell<bool>,

    listeners: ListenerSet<MediaEventKind, MediaEventKind>,
    pub stats: ElementStats,
}

impl MediaElement {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            paused: Cell::new(true),
            ended: Cell::new(false),
            seeking: Cell::new(false),
            playback_rate: Cell::new(1.0),
            // Born ready; hosts script lower states when they need the
            // loading phases.
            ready_state: Cell::new(ReadyState::HaveEnoughData),
            buffered: RefCell::new(TimeRanges::new()),
            volume: Cell::new(1.0),
            muted: Cell::new(false),
            autoplay: Cell::new(false),
            looping: Cell::new(false),
            controls: Cell::new(false),
            preload: Cell::new(PreloadHint::Metadata),
            poster: RefCell::new(String::new()),
            plays_inline: Cell::new(false),
            auto_picture_in_picture: Cell::new(false),
            sources: RefCell::new(Vec::new()),
            track_children: RefCell::new(Vec::new()),
            text_tracks: Rc::new(TextTrackList::new()),
            in_picture_in_picture: Cell::new(false),
            listeners: ListenerSet::new(),
            stats: ElementStats::default(),
        }
    }

    // Attribute reads

    pub fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    pub fn duration(&self) -> f64 {
        self.duration.get()
    }

    pub fn paused(&self) -> bool {
        self.paused.get()
    }

    pub fn ended(&self) -> bool {
        self.ended.get()
    }

    pub fn seeking(&self) -> bool {
        self.seeking.get()
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate.get()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state.get()
    }

    pub fn buffered_ranges(&self) -> Vec<(f64, f64)> {
        self.buffered.borrow().pairs()
    }

    pub fn volume(&self) -> f64 {
        self.volume.get()
    }

    pub fn muted(&self) -> bool {
        self.muted.get()
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay.get()
    }

    pub fn looping(&self) -> bool {
        self.looping.get()
    }

    pub fn controls(&self) -> bool {
        self.controls.get()
    }

    pub fn preload(&self) -> PreloadHint {
        self.preload.get()
    }

    pub fn poster(&self) -> String {
        self.poster.borrow().clone()
    }

    pub fn plays_inline(&self) -> bool {
        self.plays_inline.get()
    }

    pub fn auto_picture_in_picture(&self) -> bool {
        self.auto_picture_in_picture.get()
    }

    pub fn is_picture_in_picture(&self) -> bool {
        self.in_picture_in_picture.get()
    }

    // Declarative attribute writes, no events

    pub fn set_autoplay(&self, autoplay: bool) {
        self.autoplay.set(autoplay);
    }

    pub fn set_looping(&self, looping: bool) {
        self.looping.set(looping);
    }

    pub fn set_controls(&self, controls: bool) {
        self.controls.set(controls);
    }

    pub fn set_preload(&self, preload: PreloadHint) {
        self.preload.set(preload);
    }

    pub fn set_poster(&self, poster: &str) {
        *self.poster.borrow_mut() = poster.to_string();
    }

    pub fn set_plays_inline(&self, plays_inline: bool) {
        self.plays_inline.set(plays_inline);
    }

    pub fn set_auto_picture_in_picture(&self, auto: bool) {
        self.auto_picture_in_picture.set(auto);
    }

    pub fn set_ready_state(&self, ready_state: ReadyState) {
        self.ready_state.set(ready_state);
    }

    pub(crate) fn set_picture_in_picture(&self, active: bool) {
        self.in_picture_in_picture.set(active);
    }

    // Events

    /// Register a listener for `kind`. Dropping the guard detaches it.
    pub fn on(
        &self,
        kind: MediaEventKind,
        func: impl Fn(&MediaEventKind) + 'static,
    ) -> ListenerGuard {
        self.listeners.add_guarded(kind, func)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Fire `kind` at this element's listeners.
    pub fn dispatch(&self, kind: MediaEventKind) {
        tracing::trace!(event = kind.as_name(), "media event");
        self.listeners.emit(kind, &kind);
    }

    // Playback operations

    /// Begin playback. Every call is counted; the play event only fires
    /// on an actual paused-to-playing transition.
    pub fn play(&self) {
        bump(&self.stats.play_calls);
        if !self.paused.get() {
            return;
        }
        self.paused.set(false);
        self.ended.set(false);
        self.dispatch(MediaEventKind::Play);
        if self.ready_state.get() >= ReadyState::HaveFutureData {
            self.dispatch(MediaEventKind::Playing);
        }
    }

    pub fn pause(&self) {
        bump(&self.stats.pause_calls);
        if self.paused.get() {
            return;
        }
        self.paused.set(true);
        self.dispatch(MediaEventKind::Pause);
    }

    /// Seek, clamped to the media duration. Fires the full seek event
    /// sequence synchronously.
    pub fn set_current_time(&self, time: f64) {
        bump(&self.stats.seek_calls);
        let duration = self.duration.get();
        let clamped = if duration.is_nan() {
            time.max(0.0)
        } else {
            time.clamp(0.0, duration)
        };
        self.seeking.set(true);
        self.dispatch(MediaEventKind::Seeking);
        self.current_time.set(clamped);
        self.dispatch(MediaEventKind::TimeUpdate);
        self.seeking.set(false);
        self.dispatch(MediaEventKind::Seeked);
    }

    /// Re-examine source children. The synthetic element keeps its
    /// decoded state; hosts observe the call through `stats`.
    pub fn load(&self) {
        bump(&self.stats.load_calls);
        tracing::debug!(sources = self.sources.borrow().len(), "media load requested");
    }

    pub fn set_volume(&self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        if self.volume.get() == volume {
            return;
        }
        self.volume.set(volume);
        self.dispatch(MediaEventKind::VolumeChange);
    }

    pub fn set_muted(&self, muted: bool) {
        if self.muted.get() == muted {
            return;
        }
        self.muted.set(muted);
        self.dispatch(MediaEventKind::VolumeChange);
    }

    pub fn set_playback_rate(&self, rate: f64) {
        if self.playback_rate.get() == rate {
            return;
        }
        self.playback_rate.set(rate);
        self.dispatch(MediaEventKind::RateChange);
    }

    // Host scripting

    /// Finish the load: set the real duration and announce readiness.
    pub fn finish_loading(&self, duration: f64) {
        self.duration.set(duration);
        self.ready_state.set(ReadyState::HaveEnoughData);
        self.dispatch(MediaEventKind::DurationChange);
        self.dispatch(MediaEventKind::LoadedData);
        if self.autoplay.get() && self.paused.get() {
            self.play();
        }
    }

    /// Playback progress to `time`: fires time-update, refreshes active
    /// cues, and handles the end of media (loop or ended).
    pub fn advance_time(&self, time: f64) {
        let duration = self.duration.get();
        let clamped = if duration.is_nan() {
            time.max(0.0)
        } else {
            time.clamp(0.0, duration)
        };
        self.current_time.set(clamped);
        self.dispatch(MediaEventKind::TimeUpdate);
        self.text_tracks.update_active_cues(clamped);
        if !duration.is_nan() && clamped >= duration {
            if self.looping.get() {
                self.current_time.set(0.0);
                self.dispatch(MediaEventKind::TimeUpdate);
            } else {
                self.paused.set(true);
                self.ended.set(true);
                self.dispatch(MediaEventKind::Pause);
                self.dispatch(MediaEventKind::Ended);
            }
        }
    }

    /// Append a buffered range and fire progress.
    pub fn buffer_range(&self, start: f64, end: f64) {
        self.buffered.borrow_mut().add(start, end);
        self.dispatch(MediaEventKind::Progress);
    }

    /// Script a rebuffer pause.
    pub fn begin_waiting(&self) {
        self.dispatch(MediaEventKind::Waiting);
    }

    /// Script a network stall.
    pub fn begin_stall(&self) {
        self.dispatch(MediaEventKind::Stalled);
    }

    /// Script rendering picking back up after a stall or rebuffer.
    pub fn resume_playing(&self) {
        self.dispatch(MediaEventKind::Playing);
    }

    // Generated children

    pub fn append_source(&self, child: SourceElement) {
        self.sources.borrow_mut().push(child);
    }

    pub fn remove_source(&self, child: &SourceElement) {
        self.sources
            .borrow_mut()
            .retain(|existing| !existing.same_node(child));
    }

    pub fn sources(&self) -> Vec<SourceElement> {
        self.sources.borrow().clone()
    }

    pub fn source_count(&self) -> usize {
        self.sources.borrow().len()
    }

    /// Append a track child, materializing its text track in the live
    /// list.
    pub fn append_track(&self, child: TrackElement) {
        let track = TextTrack::new(child.kind(), &child.label(), &child.language());
        self.track_children.borrow_mut().push(child);
        self.text_tracks.add_track(track);
    }

    /// Remove a track child and its materialized text track. Unknown
    /// children are ignored.
    pub fn remove_track(&self, child: &TrackElement) {
        let index = self
            .track_children
            .borrow()
            .iter()
            .position(|existing| existing.same_node(child));
        let Some(index) = index else { return };
        self.track_children.borrow_mut().remove(index);
        self.text_tracks.remove_track(index);
    }

    pub fn track_children(&self) -> Vec<TrackElement> {
        self.track_children.borrow().clone()
    }

    pub fn text_tracks(&self) -> Rc<TextTrackList> {
        self.text_tracks.clone()
    }
}

impl Default for MediaElement {
    fn default() -> Self {
        Self::new()
    }
}
