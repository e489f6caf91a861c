/// Playlist structure: chapters, tracks and the content document
use super::icon::{Display, IconRef, MEDIA_REF_PREFIX};
use crate::hash::ContentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Codec assumed when the platform reports none
pub const DEFAULT_FORMAT: &str = "aac";

/// Duration (seconds) assumed when the platform reports none
pub const DEFAULT_DURATION: f64 = 1.0;

/// Byte size assumed when the platform reports none
pub const DEFAULT_FILE_SIZE: u64 = 1;

/// Zero-padded two digit key ("00", "01", ... "99", "100")
pub fn pad2(n: usize) -> String {
    format!("{n:02}")
}

/// Reference from a track to transcoded audio (`trackUrl` on the wire).
///
/// Unique within a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a reference read from an existing document
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Reference to transcoded content hosted by the platform
    pub fn for_content(id: &ContentId) -> Self {
        Self(format!("{MEDIA_REF_PREFIX}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Channel layout of transcoded audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    /// Map a numeric channel count; anything but 1 or 2 has no layout
    pub fn from_count(count: u64) -> Option<Self> {
        match count {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }

    /// Map an untrusted `channels` value (number, numeric string or name)
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
                .and_then(Self::from_count),
            Value::String(s) => match s.trim() {
                "1" | "mono" => Some(Self::Mono),
                "2" | "stereo" => Some(Self::Stereo),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Track type marker; the platform only accepts audio tracks here
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Audio,
}

/// Playable leaf node referencing transcoded media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub key: String,
    pub title: String,
    pub format: String,
    pub track_url: MediaRef,
    #[serde(rename = "type", default)]
    pub kind: TrackKind,
    pub overlay_label: String,
    pub duration: f64,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
}

/// Addressable playlist unit holding exactly one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub key: String,
    pub title: String,
    pub overlay_label: String,
    #[serde(default)]
    pub display: Display,
    pub tracks: Vec<Track>,
}

impl Chapter {
    /// Wrap a single track, taking the chapter title from it
    pub fn wrapping(key: String, overlay_label: String, icon: Option<IconRef>, track: Track) -> Self {
        Self {
            key,
            title: track.title.clone(),
            overlay_label,
            display: Display::new(icon),
            tracks: vec![track],
        }
    }

    /// The chapter's track, when it holds exactly one
    pub fn track(&self) -> Option<&Track> {
        match self.tracks.as_slice() {
            [track] => Some(track),
            _ => None,
        }
    }
}

/// Ordered chapters plus platform-specific flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistContent {
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl PlaylistContent {
    /// Total number of tracks across all chapters
    pub fn track_count(&self) -> usize {
        self.chapters.iter().map(|c| c.tracks.len()).sum()
    }

    /// Media references of every track, in playlist order
    pub fn media_refs(&self) -> impl Iterator<Item = &MediaRef> {
        self.chapters
            .iter()
            .flat_map(|c| c.tracks.iter().map(|t| &t.track_url))
    }

    /// Whether keys and labels are positional and every chapter holds one
    /// track keyed "01"
    pub fn is_canonical(&self) -> bool {
        self.chapters.iter().enumerate().all(|(i, chapter)| {
            let label = (i + 1).to_string();
            chapter.key == pad2(i)
                && chapter.overlay_label == label
                && chapter
                    .track()
                    .is_some_and(|t| t.key == "01" && t.overlay_label == label)
        })
    }
}
