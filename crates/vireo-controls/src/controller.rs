//! Media Controller
//!
//! Reconciles observable playback cells with a bound media element:
//! options flow onto element attributes, element events flow back into
//! state, and the two-way cells drive the element without feeding back
//! into themselves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vireo_media::{
    Deferred, ListenerGuard, MediaDocument, MediaElement, MediaError, MediaEventKind,
    SourceElement, SourceError, TextTrackMode, TrackListEventKind,
};
use vireo_reactive::{EventHook, HookHandle, Runtime, Signal, Subscription, Suppression};

use crate::options::{MediaOptions, OptionCells};
use crate::state::{PlaybackState, track_snapshot};

/// Reactive adapter around one media element.
///
/// Construction wires every watch and effect immediately; all of them stay
/// inert until an element is bound, and they re-target whenever the bound
/// element changes. Dropping the controller, or calling
/// [`dispose`](MediaController::dispose), releases every element and
/// track-list listener it ever attached.
pub struct MediaController {
    runtime: Runtime,
    document: Option<Rc<MediaDocument>>,
    element: Signal<Option<Rc<MediaElement>>>,
    state: PlaybackState,
    options: OptionCells,
    source_errors: EventHook<SourceError>,
    supports_pip: bool,
    subscriptions: Vec<Subscription>,
    element_guards: Rc<RefCell<Vec<ListenerGuard>>>,
    tracklist_guards: Rc<RefCell<Vec<ListenerGuard>>>,
    source_children: Rc<RefCell<Vec<(SourceElement, u64)>>>,
    disposed: Cell<bool>,
}

impl MediaController {
    pub fn new(
        runtime: &Runtime,
        document: Option<Rc<MediaDocument>>,
        options: MediaOptions,
    ) -> Self {
        let element: Signal<Option<Rc<MediaElement>>> = runtime.signal(None);
        let state = PlaybackState::new(runtime);
        let options = OptionCells::new(runtime, options);
        let source_errors = EventHook::new();
        let supports_pip = document
            .as_ref()
            .is_some_and(|document| document.picture_in_picture_enabled());

        let element_guards = Rc::new(RefCell::new(Vec::new()));
        let tracklist_guards = Rc::new(RefCell::new(Vec::new()));
        let source_children: Rc<RefCell<Vec<(SourceElement, u64)>>> =
            Rc::new(RefCell::new(Vec::new()));
        let mut subscriptions = Vec::new();

        // Writable cells onto the element. The element's event echo lands
        // back in each cell under suppression, so neither watch re-fires
        // for a write it caused itself.
        let watch_element = element.clone();
        let (time_sub, suppress_time) =
            runtime.watch_suppressible(&state.current_time, move |time: &f64| {
                if let Some(el) = watch_element.peek() {
                    el.set_current_time(*time);
                }
            });
        subscriptions.push(time_sub);

        let watch_element = element.clone();
        let (playing_sub, suppress_playing) =
            runtime.watch_suppressible(&state.playing, move |playing: &bool| {
                let Some(el) = watch_element.peek() else { return };
                if *playing {
                    el.play();
                } else {
                    el.pause();
                }
            });
        subscriptions.push(playing_sub);

        // Element listeners follow the bound element.
        let attach_element = element.clone();
        let attach_state = state.clone();
        let attach_guards = element_guards.clone();
        let attach_time = suppress_time.clone();
        let attach_playing = suppress_playing.clone();
        subscriptions.push(runtime.effect(move || {
            let el = attach_element.get();
            attach_guards.borrow_mut().clear();
            let Some(el) = el else { return };
            let guards = attach_listeners(&el, &attach_state, &attach_time, &attach_playing);
            tracing::debug!(listeners = guards.len(), "element listeners attached");
            *attach_guards.borrow_mut() = guards;
        }));

        // Scalar option reconciliation. Every input is read up front so an
        // unset field still re-runs the effect once it gains a value.
        let option_element = element.clone();
        let option_cells = options.clone();
        let option_volume = state.volume.clone();
        subscriptions.push(runtime.effect(move || {
            let el = option_element.get();
            let looping = option_cells.looping.get();
            let controls = option_cells.controls.get();
            let muted = option_cells.muted.get();
            let preload = option_cells.preload.get();
            let autoplay = option_cells.autoplay.get();
            let poster = option_cells.poster.get();
            let plays_inline = option_cells.plays_inline.get();
            let auto_pip = option_cells.auto_picture_in_picture.get();
            let volume = option_volume.get();
            let Some(el) = el else { return };
            if let Some(looping) = looping {
                el.set_looping(looping);
            }
            if let Some(controls) = controls {
                el.set_controls(controls);
            }
            if let Some(muted) = muted {
                el.set_muted(muted);
            }
            if let Some(preload) = preload {
                el.set_preload(preload);
            }
            if let Some(autoplay) = autoplay {
                el.set_autoplay(autoplay);
            }
            if let Some(poster) = poster {
                el.set_poster(&poster);
            }
            if let Some(plays_inline) = plays_inline {
                el.set_plays_inline(plays_inline);
            }
            if let Some(auto_pip) = auto_pip {
                el.set_auto_picture_in_picture(auto_pip);
            }
            el.set_volume(volume);
        }));

        // Source reconciliation: wholesale rebuild of the source children.
        let source_element = element.clone();
        let source_option = options.src.clone();
        let source_document = document.clone();
        let source_tracked = source_children.clone();
        let source_hook = source_errors.clone();
        subscriptions.push(runtime.effect(move || {
            let input = source_option.get();
            let el = source_element.get();
            let Some(document) = source_document.clone() else {
                return;
            };
            let Some(el) = el else { return };
            let entries = match &input {
                Some(input) => input.normalize(),
                None => Vec::new(),
            };
            if entries.is_empty() {
                return;
            }
            for (child, listener) in source_tracked.borrow_mut().drain(..) {
                child.remove_error_listener(listener);
                el.remove_source(&child);
            }
            for child in el.sources() {
                el.remove_source(&child);
            }
            for entry in &entries {
                let child = document.create_source(&entry.url, &entry.codec);
                let hook = source_hook.clone();
                let listener = child.on_error(move |error| hook.emit(error));
                el.append_source(child.clone());
                source_tracked.borrow_mut().push((child, listener));
            }
            el.load();
            tracing::debug!(sources = entries.len(), "source children rebuilt");
        }));

        // Track-list listeners, wired once against the first bound element.
        let wire_element = element.clone();
        let wire_tracks = state.tracks.clone();
        let wire_guards = tracklist_guards.clone();
        let wired = Cell::new(false);
        subscriptions.push(runtime.effect(move || {
            let el = wire_element.get();
            if wired.get() {
                return;
            }
            let Some(el) = el else { return };
            wired.set(true);
            let list = el.text_tracks();
            let mut guards = wire_guards.borrow_mut();
            for kind in [
                TrackListEventKind::Added,
                TrackListEventKind::Removed,
                TrackListEventKind::Changed,
            ] {
                let cell = wire_tracks.clone();
                let source = list.clone();
                guards.push(list.on(kind, move |_| cell.set(track_snapshot(&source))));
            }
        }));

        // Track reconciliation: wholesale rebuild of the track children,
        // recording the last default descriptor as the selection.
        let track_element = element.clone();
        let track_option = options.tracks.clone();
        let track_document = document.clone();
        let track_selected = state.selected_track.clone();
        subscriptions.push(runtime.effect(move || {
            let descriptors = track_option.get();
            let el = track_element.get();
            let Some(document) = track_document.clone() else {
                return;
            };
            let Some(el) = el else { return };
            let descriptors = descriptors.unwrap_or_default();
            if descriptors.is_empty() {
                return;
            }
            for child in el.track_children() {
                el.remove_track(&child);
            }
            for (position, descriptor) in descriptors.iter().enumerate() {
                let child = document.create_track(
                    &descriptor.url,
                    &descriptor.label,
                    &descriptor.language,
                    descriptor.kind,
                    descriptor.default,
                );
                if descriptor.default {
                    track_selected.set_neq(position as i32);
                }
                el.append_track(child);
            }
            tracing::debug!(tracks = descriptors.len(), "track children rebuilt");
        }));

        tracing::debug!(
            picture_in_picture = supports_pip,
            "media controller created"
        );

        Self {
            runtime: runtime.clone(),
            document,
            element,
            state,
            options,
            source_errors,
            supports_pip,
            subscriptions,
            element_guards,
            tracklist_guards,
            source_children,
            disposed: Cell::new(false),
        }
    }

    /// Bind `element`, activating every wired effect against it.
    pub fn bind(&self, element: Rc<MediaElement>) {
        tracing::debug!("element bound");
        self.element.set(Some(element));
    }

    /// Detach from the current element, releasing its listeners. The
    /// controller goes inert until the next [`bind`](MediaController::bind).
    pub fn unbind(&self) {
        self.element.set(None);
    }

    pub fn element(&self) -> &Signal<Option<Rc<MediaElement>>> {
        &self.element
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn options(&self) -> &OptionCells {
        &self.options
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Set the track at `track` to showing and record it as selected.
    ///
    /// With `disable_others` (the usual call), every other track is
    /// disabled first. No-op when no element is bound; an out-of-range
    /// index panics like native list indexing.
    pub fn enable_track(&self, track: usize, disable_others: bool) {
        let Some(el) = self.element.peek() else { return };
        if disable_others {
            self.disable_track(None);
        }
        el.text_tracks().set_mode(track, TextTrackMode::Showing);
        self.state.selected_track.set_neq(track as i32);
    }

    /// Disable the track at `track`, or every track when `None`. Either
    /// way the selection resets to -1. No-op when no element is bound.
    pub fn disable_track(&self, track: Option<usize>) {
        let Some(el) = self.element.peek() else { return };
        let list = el.text_tracks();
        match track {
            Some(index) => list.set_mode(index, TextTrackMode::Disabled),
            None => {
                for index in 0..list.length() {
                    list.set_mode(index, TextTrackMode::Disabled);
                }
            }
        }
        self.state.selected_track.set_neq(-1);
    }

    pub fn supports_picture_in_picture(&self) -> bool {
        self.supports_pip
    }

    /// Request entry when outside picture-in-picture, exit when inside.
    ///
    /// The returned deferred mirrors the document's verdict. Without
    /// support or without a bound element it rejects immediately; the
    /// `is_picture_in_picture` cell only moves on the element's own
    /// enter and leave events, never from this call.
    pub fn toggle_picture_in_picture(&self) -> Deferred<(), MediaError> {
        let Some(document) = &self.document else {
            return Deferred::rejected(MediaError::PipUnsupported);
        };
        if !self.supports_pip {
            return Deferred::rejected(MediaError::PipUnsupported);
        }
        let Some(el) = self.element.peek() else {
            return Deferred::rejected(MediaError::NotBound);
        };
        if self.state.is_picture_in_picture.peek() {
            document.request_pip_exit(&el)
        } else {
            document.request_pip_enter(&el)
        }
    }

    /// Subscribe to load failures reported by generated source children.
    pub fn on_source_error(&self, func: impl Fn(&SourceError) + 'static) -> HookHandle<SourceError> {
        self.source_errors.on(func)
    }

    /// Release every subscription and listener. Safe to call more than
    /// once; the controller is inert afterwards.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
        self.element_guards.borrow_mut().clear();
        self.tracklist_guards.borrow_mut().clear();
        // Source nodes stay with the element; only our listeners go.
        for (child, listener) in self.source_children.borrow_mut().drain(..) {
            child.remove_error_listener(listener);
        }
        tracing::debug!("media controller disposed");
    }
}

impl Drop for MediaController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Attach the one-listener-per-fact event surface to `el`.
///
/// Writes to the two-way cells run under the matching suppression so an
/// element-initiated change never loops back into a second element call.
/// Scalar writes skip unchanged values; the list cells replace wholesale.
fn attach_listeners(
    el: &Rc<MediaElement>,
    state: &PlaybackState,
    suppress_time: &Suppression,
    suppress_playing: &Suppression,
) -> Vec<ListenerGuard> {
    let mut guards = Vec::new();

    let cell = state.current_time.clone();
    let guard = suppress_time.clone();
    let source = el.clone();
    guards.push(el.on(MediaEventKind::TimeUpdate, move |_| {
        guard.run(|| cell.set_neq(source.current_time()));
    }));

    let cell = state.duration.clone();
    let source = el.clone();
    guards.push(el.on(MediaEventKind::DurationChange, move |_| {
        cell.set_neq(source.duration());
    }));

    let cell = state.buffered.clone();
    let source = el.clone();
    guards.push(el.on(MediaEventKind::Progress, move |_| {
        cell.set(source.buffered_ranges());
    }));

    let cell = state.seeking.clone();
    guards.push(el.on(MediaEventKind::Seeking, move |_| cell.set_neq(true)));

    let cell = state.seeking.clone();
    guards.push(el.on(MediaEventKind::Seeked, move |_| cell.set_neq(false)));

    let cell = state.playing.clone();
    let guard = suppress_playing.clone();
    guards.push(el.on(MediaEventKind::Play, move |_| {
        guard.run(|| cell.set_neq(true));
    }));

    let cell = state.playing.clone();
    let guard = suppress_playing.clone();
    guards.push(el.on(MediaEventKind::Pause, move |_| {
        guard.run(|| cell.set_neq(false));
    }));

    let waiting = state.waiting.clone();
    let buffering = state.buffering.clone();
    let playing = state.playing.clone();
    let guard = suppress_playing.clone();
    guards.push(el.on(MediaEventKind::Waiting, move |_| {
        waiting.set_neq(true);
        buffering.set_neq(true);
        guard.run(|| playing.set_neq(false));
    }));

    let waiting = state.waiting.clone();
    let ended = state.ended.clone();
    let buffering = state.buffering.clone();
    let playing = state.playing.clone();
    let guard = suppress_playing.clone();
    guards.push(el.on(MediaEventKind::Playing, move |_| {
        waiting.set_neq(false);
        ended.set_neq(false);
        buffering.set_neq(false);
        guard.run(|| playing.set_neq(true));
    }));

    let waiting = state.waiting.clone();
    let buffering = state.buffering.clone();
    guards.push(el.on(MediaEventKind::LoadedData, move |_| {
        waiting.set_neq(false);
        buffering.set_neq(false);
    }));

    let cell = state.rate.clone();
    let source = el.clone();
    guards.push(el.on(MediaEventKind::RateChange, move |_| {
        cell.set_neq(source.playback_rate());
    }));

    let stalled = state.stalled.clone();
    let buffering = state.buffering.clone();
    guards.push(el.on(MediaEventKind::Stalled, move |_| {
        stalled.set_neq(true);
        buffering.set_neq(true);
    }));

    let cell = state.ended.clone();
    guards.push(el.on(MediaEventKind::Ended, move |_| cell.set_neq(true)));

    let cell = state.volume.clone();
    let source = el.clone();
    guards.push(el.on(MediaEventKind::VolumeChange, move |_| {
        cell.set_neq(source.volume());
    }));

    let cell = state.is_picture_in_picture.clone();
    guards.push(el.on(MediaEventKind::EnterPictureInPicture, move |_| {
        cell.set_neq(true)
    }));

    let cell = state.is_picture_in_picture.clone();
    guards.push(el.on(MediaEventKind::LeavePictureInPicture, move |_| {
        cell.set_neq(false)
    }));

    guards
}
