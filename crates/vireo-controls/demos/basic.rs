//! Example: Basic usage of Vireo Controls
//!
//! Drives a scripted element through a load/play/seek session and prints
//! what the observable cells see.

use std::error::Error;
use std::rc::Rc;

use vireo_controls::media::{MediaDocument, MediaElement};
use vireo_controls::reactive::Runtime;
use vireo_controls::{MediaController, MediaOptions};

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("starting vireo controls demo");

    // Options arrive the way a host page would hand them over.
    let options: MediaOptions = serde_json::from_str(
        r#"{
            "src": "intro.mp4",
            "loop": false,
            "tracks": [
                {
                    "url": "intro.en.vtt",
                    "label": "English",
                    "language": "en",
                    "kind": "subtitles",
                    "default": true
                }
            ]
        }"#,
    )?;

    let runtime = Runtime::new();
    let document = Rc::new(MediaDocument::new());
    let controller = MediaController::new(&runtime, Some(document.clone()), options);
    println!("Vireo Controls v{} initialized", vireo_controls::VERSION);

    let _errors = controller.on_source_error(|error| {
        eprintln!("source failed: {} ({})", error.url, error.message);
    });

    // Observe the two-way cells like a UI would.
    let time = controller.state().current_time.clone();
    let playing = controller.state().playing.clone();
    let _observer = runtime.effect(move || {
        println!("t={:>5.1}s playing={}", time.get(), playing.get());
    });

    // Bind a scripted element and walk it through a session.
    let element = Rc::new(MediaElement::new());
    controller.bind(element.clone());
    element.finish_loading(120.0);
    element.buffer_range(0.0, 30.0);

    controller.state().playing.set(true);
    for second in 1..=3 {
        element.advance_time(second as f64);
    }
    controller.state().current_time.set(90.0);

    controller.enable_track(0, true);
    let labels: Vec<String> = controller
        .state()
        .tracks
        .get()
        .iter()
        .map(|track| track.label.clone())
        .collect();
    println!(
        "tracks: {labels:?} selected={}",
        controller.state().selected_track.get()
    );

    if controller.supports_picture_in_picture() {
        let request = controller.toggle_picture_in_picture();
        println!(
            "picture-in-picture: resolved={} active={}",
            request.is_resolved(),
            controller.state().is_picture_in_picture.get()
        );
    }

    controller.state().playing.set(false);
    println!(
        "buffered={:?} duration={}s ended={}",
        controller.state().buffered.get(),
        controller.state().duration.get(),
        controller.state().ended.get()
    );

    controller.dispose();
    tracing::info!("controller released");

    Ok(())
}
