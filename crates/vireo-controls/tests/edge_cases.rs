//! Edge case tests for vireo-controls
//!
//! Covers absent collaborators, late binding, element swaps, option
//! churn, and the deliberate quirks of the reconciliation guards.

use std::cell::RefCell;
use std::rc::Rc;

use vireo_controls::media::{
    MediaDocument, MediaElement, MediaError, TextTrackCue, TextTrackKind,
};
use vireo_controls::reactive::Runtime;
use vireo_controls::{MediaController, MediaOptions, SourceInput, TrackDescriptor};

fn controller_with(options: MediaOptions) -> (Runtime, Rc<MediaDocument>, MediaController) {
    let runtime = Runtime::new();
    let document = Rc::new(MediaDocument::new());
    let controller = MediaController::new(&runtime, Some(document.clone()), options);
    (runtime, document, controller)
}

fn subtitle_track(url: &str, label: &str, language: &str, default: bool) -> TrackDescriptor {
    TrackDescriptor {
        url: url.to_string(),
        label: label.to_string(),
        language: language.to_string(),
        kind: TextTrackKind::Subtitles,
        default,
    }
}

// ============================================================================
// RECONCILIATION GUARDS
// ============================================================================

#[test]
fn test_empty_source_list_keeps_existing_children() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert_eq!(el.source_count(), 1);

    // An empty list exits before touching the children.
    controller.options().src.set(Some(SourceInput::Many(Vec::new())));
    assert_eq!(el.source_count(), 1);
    assert_eq!(el.sources()[0].url(), "a.mp4");
    assert_eq!(el.stats.load_calls.get(), 1);
}

#[test]
fn test_empty_url_keeps_existing_children() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    controller.options().src.set(Some("".into()));
    assert_eq!(el.source_count(), 1);
    assert_eq!(el.stats.load_calls.get(), 1);
}

#[test]
fn test_unset_src_keeps_existing_children() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    controller.options().src.set(None);
    assert_eq!(el.source_count(), 1);
}

#[test]
fn test_empty_track_list_keeps_existing_children() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![subtitle_track("en.vtt", "EN", "en", false)]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert_eq!(el.text_tracks().length(), 1);

    controller.options().tracks.set(Some(Vec::new()));
    assert_eq!(el.text_tracks().length(), 1);
}

#[test]
fn test_no_document_context_creates_nothing() {
    let runtime = Runtime::new();
    let controller = MediaController::new(
        &runtime,
        None,
        MediaOptions {
            src: Some("a.mp4".into()),
            tracks: Some(vec![subtitle_track("en.vtt", "EN", "en", true)]),
            ..MediaOptions::default()
        },
    );
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    assert_eq!(el.source_count(), 0);
    assert_eq!(el.text_tracks().length(), 0);
    assert_eq!(el.stats.load_calls.get(), 0);
    assert_eq!(controller.state().selected_track.get(), -1);

    assert!(!controller.supports_picture_in_picture());
    let deferred = controller.toggle_picture_in_picture();
    assert!(matches!(
        deferred.outcome(),
        Some(Err(MediaError::PipUnsupported))
    ));
}

// ============================================================================
// BINDING LIFECYCLE
// ============================================================================

#[test]
fn test_late_binding_applies_pending_configuration() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        muted: Some(true),
        tracks: Some(vec![subtitle_track("fr.vtt", "FR", "fr", true)]),
        ..MediaOptions::default()
    });

    // Nothing to act on yet.
    assert_eq!(controller.state().selected_track.get(), -1);

    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    assert!(el.muted());
    assert_eq!(el.source_count(), 1);
    assert_eq!(el.text_tracks().length(), 1);
    assert_eq!(controller.state().selected_track.get(), 0);
}

#[test]
fn test_element_swap_moves_listeners_and_children() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    let first = Rc::new(MediaElement::new());
    controller.bind(first.clone());
    assert!(first.listener_count() > 0);

    let second = Rc::new(MediaElement::new());
    controller.bind(second.clone());

    assert_eq!(first.listener_count(), 0, "old element fully released");
    assert!(second.listener_count() > 0);
    assert_eq!(second.source_count(), 1);
    assert_eq!(second.stats.load_calls.get(), 1);

    // Track-list wiring stays with the first element it ever saw.
    assert_eq!(first.text_tracks().listener_count(), 3);
    assert_eq!(second.text_tracks().listener_count(), 0);

    second.advance_time(4.0);
    assert_eq!(controller.state().current_time.get(), 4.0);
}

#[test]
fn test_unbind_detaches_and_goes_inert() {
    let (_runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    el.finish_loading(30.0);
    controller.bind(el.clone());
    assert!(el.listener_count() > 0);

    controller.unbind();
    assert_eq!(el.listener_count(), 0);

    controller.state().playing.set(true);
    el.advance_time(5.0);
    assert_eq!(el.stats.play_calls.get(), 0);
    assert_eq!(controller.state().current_time.get(), 0.0);
}

#[test]
fn test_rebind_after_unbind_reactivates() {
    let (_runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    el.finish_loading(30.0);
    controller.bind(el.clone());
    controller.unbind();

    controller.bind(el.clone());
    el.advance_time(7.0);
    assert_eq!(controller.state().current_time.get(), 7.0);
}

// ============================================================================
// TRACK SELECTION EDGES
// ============================================================================

#[test]
#[should_panic]
fn test_enable_track_out_of_range_panics() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![subtitle_track("en.vtt", "EN", "en", false)]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el);

    controller.enable_track(5, true);
}

#[test]
fn test_multiple_defaults_last_wins() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![
            subtitle_track("en.vtt", "EN", "en", true),
            subtitle_track("fr.vtt", "FR", "fr", true),
            subtitle_track("de.vtt", "DE", "de", true),
        ]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el);

    assert_eq!(controller.state().selected_track.get(), 2);
}

#[test]
fn test_disabling_any_track_clears_selection() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![
            subtitle_track("en.vtt", "EN", "en", false),
            subtitle_track("fr.vtt", "FR", "fr", false),
        ]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el);

    controller.enable_track(1, true);
    assert_eq!(controller.state().selected_track.get(), 1);

    // Disabling a non-selected track still resets the selection.
    controller.disable_track(Some(0));
    assert_eq!(controller.state().selected_track.get(), -1);
}

#[test]
fn test_track_churn_keeps_three_list_listeners() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![subtitle_track("en.vtt", "EN", "en", false)]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    controller.options().tracks.set(Some(vec![
        subtitle_track("fr.vtt", "FR", "fr", false),
        subtitle_track("de.vtt", "DE", "de", true),
    ]));

    assert_eq!(el.text_tracks().listener_count(), 3);
    assert_eq!(el.text_tracks().length(), 2);
    assert_eq!(controller.state().selected_track.get(), 1);

    let tracks = controller.state().tracks.get();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].label, "FR");
    assert_eq!(tracks[1].label, "DE");
}

#[test]
fn test_cue_changes_flow_into_track_state() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        tracks: Some(vec![subtitle_track("en.vtt", "EN", "en", false)]),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    el.finish_loading(30.0);

    el.text_tracks().add_cue(
        0,
        TextTrackCue {
            id: "c1".to_string(),
            start_time: 1.0,
            end_time: 3.0,
            pause_on_exit: false,
            text: "hello".to_string(),
        },
    );
    assert_eq!(controller.state().tracks.get()[0].cues.len(), 1);
    assert!(controller.state().tracks.get()[0].active_cues.is_empty());

    el.advance_time(2.0);
    assert_eq!(controller.state().tracks.get()[0].active_cues, vec![0]);

    el.advance_time(5.0);
    assert!(controller.state().tracks.get()[0].active_cues.is_empty());
}

// ============================================================================
// OPTION CHURN
// ============================================================================

#[test]
fn test_rapid_source_churn_rebuilds_every_time() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    controller.options().src.set(Some("b.mp4".into()));
    controller.options().src.set(Some("c.mp4".into()));
    controller.options().src.set(Some("d.mp4".into()));

    assert_eq!(el.source_count(), 1);
    assert_eq!(el.sources()[0].url(), "d.mp4");
    assert_eq!(el.stats.load_calls.get(), 4);
}

#[test]
fn test_scalar_option_flip_applies_immediately() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        muted: Some(true),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert!(el.muted());

    controller.options().muted.set(Some(false));
    assert!(!el.muted());

    // Clearing the option leaves the element value where it was.
    controller.options().muted.set(None);
    assert!(!el.muted());
}

// ============================================================================
// SEEK EDGES
// ============================================================================

#[test]
fn test_seek_beyond_duration_clamps_state_through_echo() {
    let (_runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    el.finish_loading(60.0);

    controller.state().current_time.set(120.0);
    assert_eq!(el.current_time(), 60.0);
    assert_eq!(
        controller.state().current_time.get(),
        60.0,
        "echo lands the clamped position back in the cell"
    );
    assert_eq!(el.stats.seek_calls.get(), 1);
}

#[test]
fn test_seek_before_metadata_does_not_panic() {
    let (_runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert!(el.duration().is_nan());

    controller.state().current_time.set(5.0);
    assert_eq!(el.current_time(), 5.0);

    controller.state().current_time.set(-2.0);
    assert_eq!(el.current_time(), 0.0);
}

#[test]
fn test_suppressed_echo_still_notifies_other_observers() {
    let (runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    el.finish_loading(30.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let cell = controller.state().current_time.clone();
    let _sub = runtime.effect(move || log.borrow_mut().push(cell.get()));

    el.advance_time(5.0);
    assert_eq!(*seen.borrow(), vec![0.0, 5.0]);
    assert_eq!(el.stats.seek_calls.get(), 0);
}

// ============================================================================
// PICTURE-IN-PICTURE EDGES
// ============================================================================

#[test]
fn test_pip_denial_leaves_flag_false() {
    let (_runtime, document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el);
    document.set_auto_respond(false);

    let deferred = controller.toggle_picture_in_picture();
    document.settle_pending(Err(MediaError::PipDenied("user dismissed".to_string())));

    assert!(deferred.is_rejected());
    assert!(!controller.state().is_picture_in_picture.get());

    // A later grant still works.
    let retry = controller.toggle_picture_in_picture();
    document.settle_pending(Ok(()));
    assert!(retry.is_resolved());
    assert!(controller.state().is_picture_in_picture.get());
}

#[test]
fn test_pip_settlement_callback_fires_on_late_settle() {
    let (_runtime, document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el);
    document.set_auto_respond(false);

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let log = outcomes.clone();
    let deferred = controller.toggle_picture_in_picture();
    deferred.on_settle(move |outcome| log.borrow_mut().push(outcome.is_ok()));

    assert!(outcomes.borrow().is_empty());
    document.settle_pending(Ok(()));
    assert_eq!(*outcomes.borrow(), vec![true]);
}

// ============================================================================
// TEARDOWN EDGES
// ============================================================================

#[test]
fn test_dispose_twice_is_safe() {
    let (_runtime, _document, controller) = controller_with(MediaOptions::default());
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());

    controller.dispose();
    controller.dispose();
    assert_eq!(el.listener_count(), 0);
}

#[test]
fn test_dispose_without_ever_binding() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        src: Some("a.mp4".into()),
        ..MediaOptions::default()
    });
    controller.dispose();

    // Binding after teardown stays inert.
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert_eq!(el.listener_count(), 0);
    assert_eq!(el.source_count(), 0);
}

#[test]
fn test_autoplay_option_starts_playback_on_load() {
    let (_runtime, _document, controller) = controller_with(MediaOptions {
        autoplay: Some(true),
        ..MediaOptions::default()
    });
    let el = Rc::new(MediaElement::new());
    controller.bind(el.clone());
    assert!(el.autoplay());
    assert!(el.paused());

    el.finish_loading(30.0);
    assert!(!el.paused());
    assert!(controller.state().playing.get());
}
