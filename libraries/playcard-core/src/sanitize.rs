//! Sanitize-on-read boundary for playlist documents stored on the platform.
//!
//! Stored documents may come from older clients or the platform's own app,
//! so every field is coerced to a safe default instead of failing the read.
//! The only hard failure is a track with no media reference.

use crate::error::{ContentError, Result};
use crate::types::{
    ChannelLayout, Chapter, Display, IconRef, MediaRef, PlaylistContent, Track, TrackKind,
    DEFAULT_DURATION, DEFAULT_FILE_SIZE, DEFAULT_FORMAT,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Locate the content object inside a fetched document.
///
/// Accepts `{card: {content}}`, `{content}` or a bare content object.
pub fn content_section(document: &Value) -> Option<&Map<String, Value>> {
    if let Some(content) = document.pointer("/card/content").and_then(Value::as_object) {
        return Some(content);
    }
    if let Some(content) = document.get("content").and_then(Value::as_object) {
        return Some(content);
    }
    document
        .as_object()
        .filter(|object| object.contains_key("chapters"))
}

/// Sanitize a whole fetched document (or nothing at all) into content whose
/// chapters each hold exactly one track.
///
/// Keys and labels are left as found; the merger recomputes them.
pub fn sanitize_content(document: Option<&Value>) -> Result<PlaylistContent> {
    let Some(section) = document.and_then(content_section) else {
        return Ok(PlaylistContent::default());
    };

    let raw_chapters = section
        .get("chapters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut chapters = Vec::with_capacity(raw_chapters.len());
    for (index, raw) in raw_chapters.iter().enumerate() {
        let chapter = sanitize_chapter(raw, index)?;
        match chapter.tracks.len() {
            0 => warn!(chapter = index, title = %chapter.title, "Dropping chapter without tracks"),
            1 => chapters.push(chapter),
            n => {
                warn!(chapter = index, tracks = n, "Splitting multi-track chapter");
                chapters.extend(split_tracks(chapter));
            }
        }
    }

    let config = section
        .get("config")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(PlaylistContent { chapters, config })
}

/// Sanitize one stored chapter; tracks sharing a media reference collapse
/// to the first.
pub fn sanitize_chapter(raw: &Value, index: usize) -> Result<Chapter> {
    let mut seen = HashSet::new();
    let mut tracks = Vec::new();

    if let Some(raw_tracks) = raw.get("tracks").and_then(Value::as_array) {
        for (track_index, raw_track) in raw_tracks.iter().enumerate() {
            let track = sanitize_track(raw_track, index, track_index)?;
            if seen.insert(track.track_url.clone()) {
                tracks.push(track);
            }
        }
    }

    Ok(Chapter {
        key: text(raw.get("key")).unwrap_or_else(|| "00".to_string()),
        title: text(raw.get("title")).unwrap_or_default(),
        overlay_label: text(raw.get("overlayLabel")).unwrap_or_else(|| "1".to_string()),
        display: Display::new(icon(raw.pointer("/display/icon16x16"))),
        tracks,
    })
}

/// Sanitize one stored track. `chapter` and `track` locate it for errors.
pub fn sanitize_track(raw: &Value, chapter: usize, track: usize) -> Result<Track> {
    let track_url = text(raw.get("trackUrl"))
        .filter(|url| !url.trim().is_empty())
        .ok_or(ContentError::MissingMediaReference { chapter, track })?;

    let display = raw
        .get("display")
        .and_then(Value::as_object)
        .filter(|display| display.contains_key("icon16x16"))
        .map(|display| Display::new(icon(display.get("icon16x16"))));

    Ok(Track {
        key: text(raw.get("key")).unwrap_or_else(|| "01".to_string()),
        title: text(raw.get("title")).unwrap_or_else(|| "Track".to_string()),
        format: text(raw.get("format"))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        track_url: MediaRef::new(track_url),
        kind: TrackKind::Audio,
        overlay_label: text(raw.get("overlayLabel")).unwrap_or_else(|| "1".to_string()),
        duration: raw
            .get("duration")
            .and_then(Value::as_f64)
            .filter(|d| d.is_finite())
            .unwrap_or(DEFAULT_DURATION),
        file_size: raw
            .get("fileSize")
            .and_then(byte_count)
            .unwrap_or(DEFAULT_FILE_SIZE),
        channels: raw.get("channels").and_then(ChannelLayout::from_value),
        display,
    })
}

/// Split a chapter into consecutive single-track chapters. The first keeps
/// the chapter title; the rest are titled after their track.
pub fn split_tracks(chapter: Chapter) -> Vec<Chapter> {
    let Chapter {
        key,
        title,
        overlay_label,
        display,
        tracks,
    } = chapter;

    tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| Chapter {
            key: key.clone(),
            title: if i == 0 { title.clone() } else { track.title.clone() },
            overlay_label: overlay_label.clone(),
            display: display.clone(),
            tracks: vec![track],
        })
        .collect()
}

/// Scalar JSON values as text; `null`, arrays and objects count as missing
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn icon(value: Option<&Value>) -> Option<IconRef> {
    value.and_then(Value::as_str).and_then(IconRef::parse)
}

/// Non-negative byte count from an untrusted number; floats are rounded
pub fn byte_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.round() as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_defaults() {
        let track = sanitize_track(&json!({ "trackUrl": "yoto:#abc" }), 0, 0).unwrap();
        assert_eq!(track.key, "01");
        assert_eq!(track.title, "Track");
        assert_eq!(track.format, "aac");
        assert_eq!(track.overlay_label, "1");
        assert_eq!(track.duration, 1.0);
        assert_eq!(track.file_size, 1);
        assert_eq!(track.channels, None);
        assert_eq!(track.display, None);
    }

    #[test]
    fn test_track_coercions() {
        let track = sanitize_track(
            &json!({
                "key": 3,
                "title": "Song",
                "format": "",
                "trackUrl": "yoto:#abc",
                "overlayLabel": 7,
                "duration": "long",
                "fileSize": 2048.4,
                "channels": "2",
                "display": { "icon16x16": "" }
            }),
            0,
            0,
        )
        .unwrap();

        assert_eq!(track.key, "3");
        assert_eq!(track.format, "aac");
        assert_eq!(track.overlay_label, "7");
        assert_eq!(track.duration, 1.0);
        assert_eq!(track.file_size, 2048);
        assert_eq!(track.channels, Some(ChannelLayout::Stereo));
        assert_eq!(track.display, Some(Display::new(None)));
    }

    #[test]
    fn test_track_without_reference_is_rejected() {
        let err = sanitize_track(&json!({ "title": "x" }), 2, 1).unwrap_err();
        assert_eq!(err, ContentError::MissingMediaReference { chapter: 2, track: 1 });

        assert!(sanitize_track(&json!({ "trackUrl": "  " }), 0, 0).is_err());
        assert!(sanitize_track(&json!(null), 0, 0).is_err());
    }

    #[test]
    fn test_chapter_dedupes_tracks_and_normalizes_icon() {
        let chapter = sanitize_chapter(
            &json!({
                "title": "Ch",
                "display": { "icon16x16": "mediaid" },
                "tracks": [
                    { "trackUrl": "yoto:#a" },
                    { "trackUrl": "yoto:#a", "title": "dup" },
                    { "trackUrl": "yoto:#b" }
                ]
            }),
            0,
        )
        .unwrap();

        assert_eq!(chapter.key, "00");
        assert_eq!(chapter.tracks.len(), 2);
        assert_eq!(chapter.display.icon, Some(IconRef::media("mediaid")));
    }

    #[test]
    fn test_content_section_shapes() {
        let chapters = json!([{ "tracks": [{ "trackUrl": "yoto:#a" }] }]);

        for document in [
            json!({ "card": { "content": { "chapters": chapters } } }),
            json!({ "content": { "chapters": chapters } }),
            json!({ "chapters": chapters }),
        ] {
            let content = sanitize_content(Some(&document)).unwrap();
            assert_eq!(content.track_count(), 1);
        }

        let content = sanitize_content(Some(&json!({ "card": { "title": "x" } }))).unwrap();
        assert!(content.chapters.is_empty());
        assert!(sanitize_content(Some(&json!("garbage"))).unwrap().chapters.is_empty());
        assert!(sanitize_content(None).unwrap().chapters.is_empty());
    }

    #[test]
    fn test_multi_track_chapters_split_and_empty_dropped() {
        let document = json!({
            "content": {
                "chapters": [
                    { "title": "Empty", "tracks": [] },
                    {
                        "title": "Album",
                        "tracks": [
                            { "trackUrl": "yoto:#a", "title": "One" },
                            { "trackUrl": "yoto:#b", "title": "Two" }
                        ]
                    },
                    { "title": "NoTracks" }
                ],
                "config": { "onlineOnly": true, "resumeTimeout": 30 }
            }
        });

        let content = sanitize_content(Some(&document)).unwrap();
        assert_eq!(content.chapters.len(), 2);
        assert_eq!(content.chapters[0].title, "Album");
        assert_eq!(content.chapters[1].title, "Two");
        assert!(content.chapters.iter().all(|c| c.tracks.len() == 1));
        assert_eq!(content.config["resumeTimeout"], 30);
    }
}
