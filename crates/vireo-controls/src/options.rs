//! Options
//!
//! Caller-supplied configuration. Every field is independently optional;
//! once handed to a controller each becomes its own reactive cell, so
//! options can keep changing after construction. Unset fields leave the
//! matching element attribute alone.

use vireo_media::{PreloadHint, TextTrackKind};
use vireo_reactive::{Runtime, Signal};

/// One playable source with its codec string.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SourceDescriptor {
    pub url: String,
    pub codec: String,
}

/// The `src` option: one URL, one descriptor, or an ordered list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SourceInput {
    Url(String),
    Single(SourceDescriptor),
    Many(Vec<SourceDescriptor>),
}

impl SourceInput {
    /// Normalize to an ordered descriptor list.
    ///
    /// A bare URL becomes one descriptor with an empty codec; an empty URL
    /// normalizes to no sources at all.
    pub fn normalize(&self) -> Vec<SourceDescriptor> {
        match self {
            SourceInput::Url(url) if url.is_empty() => Vec::new(),
            SourceInput::Url(url) => vec![SourceDescriptor {
                url: url.clone(),
                codec: String::new(),
            }],
            SourceInput::Single(descriptor) => vec![descriptor.clone()],
            SourceInput::Many(descriptors) => descriptors.clone(),
        }
    }
}

impl From<&str> for SourceInput {
    fn from(url: &str) -> Self {
        SourceInput::Url(url.to_string())
    }
}

impl From<String> for SourceInput {
    fn from(url: String) -> Self {
        SourceInput::Url(url)
    }
}

impl From<SourceDescriptor> for SourceInput {
    fn from(descriptor: SourceDescriptor) -> Self {
        SourceInput::Single(descriptor)
    }
}

impl From<Vec<SourceDescriptor>> for SourceInput {
    fn from(descriptors: Vec<SourceDescriptor>) -> Self {
        SourceInput::Many(descriptors)
    }
}

/// One text track child to generate.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackDescriptor {
    pub url: String,
    pub label: String,
    pub language: String,
    pub kind: TextTrackKind,
    /// Marks the track as initially selected. When several descriptors
    /// carry it, the last one wins.
    pub default: bool,
}

/// Initial controller configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaOptions {
    pub src: Option<SourceInput>,
    pub poster: Option<String>,
    pub autoplay: Option<bool>,
    pub preload: Option<PreloadHint>,
    #[serde(rename = "loop")]
    pub looping: Option<bool>,
    pub controls: Option<bool>,
    pub muted: Option<bool>,
    pub plays_inline: Option<bool>,
    pub auto_picture_in_picture: Option<bool>,
    pub tracks: Option<Vec<TrackDescriptor>>,
}

/// Reactive view of [`MediaOptions`], one cell per field.
#[derive(Clone)]
pub struct OptionCells {
    pub src: Signal<Option<SourceInput>>,
    pub poster: Signal<Option<String>>,
    pub autoplay: Signal<Option<bool>>,
    pub preload: Signal<Option<PreloadHint>>,
    pub looping: Signal<Option<bool>>,
    pub controls: Signal<Option<bool>>,
    pub muted: Signal<Option<bool>>,
    pub plays_inline: Signal<Option<bool>>,
    pub auto_picture_in_picture: Signal<Option<bool>>,
    pub tracks: Signal<Option<Vec<TrackDescriptor>>>,
}

impl OptionCells {
    pub(crate) fn new(runtime: &Runtime, options: MediaOptions) -> Self {
        Self {
            src: runtime.signal(options.src),
            poster: runtime.signal(options.poster),
            autoplay: runtime.signal(options.autoplay),
            preload: runtime.signal(options.preload),
            looping: runtime.signal(options.looping),
            controls: runtime.signal(options.controls),
            muted: runtime.signal(options.muted),
            plays_inline: runtime.signal(options.plays_inline),
            auto_picture_in_picture: runtime.signal(options.auto_picture_in_picture),
            tracks: runtime.signal(options.tracks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_url() {
        let input = SourceInput::from("a.mp4");
        assert_eq!(
            input.normalize(),
            vec![SourceDescriptor {
                url: "a.mp4".to_string(),
                codec: String::new(),
            }]
        );
    }

    #[test]
    fn test_normalize_empty_url_is_no_sources() {
        assert!(SourceInput::from("").normalize().is_empty());
    }

    #[test]
    fn test_normalize_keeps_list_order() {
        let descriptors = vec![
            SourceDescriptor {
                url: "a.mp4".to_string(),
                codec: "video/mp4".to_string(),
            },
            SourceDescriptor {
                url: "a.ogv".to_string(),
                codec: "video/ogg".to_string(),
            },
        ];
        let input = SourceInput::from(descriptors.clone());
        assert_eq!(input.normalize(), descriptors);
    }

    #[test]
    fn test_options_parse_loop_and_untagged_src() {
        let options: MediaOptions = serde_json::from_str(
            r#"{
                "src": "intro.mp4",
                "loop": true,
                "preload": "auto"
            }"#,
        )
        .unwrap();

        assert_eq!(options.src, Some(SourceInput::Url("intro.mp4".to_string())));
        assert_eq!(options.looping, Some(true));
        assert_eq!(options.preload, Some(PreloadHint::Auto));
        assert_eq!(options.poster, None);
    }

    #[test]
    fn test_options_parse_descriptor_list_src() {
        let options: MediaOptions = serde_json::from_str(
            r#"{
                "src": [
                    {"url": "a.mp4", "codec": "video/mp4"},
                    {"url": "a.ogv"}
                ],
                "tracks": [
                    {"url": "fr.vtt", "label": "FR", "language": "fr",
                     "kind": "subtitles", "default": true}
                ]
            }"#,
        )
        .unwrap();

        let entries = options.src.unwrap().normalize();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].codec, "video/mp4");
        assert_eq!(entries[1].codec, "");

        let tracks = options.tracks.unwrap();
        assert_eq!(tracks[0].kind, TextTrackKind::Subtitles);
        assert!(tracks[0].default);
    }
}
