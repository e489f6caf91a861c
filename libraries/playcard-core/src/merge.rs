//! Merges newly built chapters into an existing playlist.
//!
//! Tracks are the unit of de-duplication: a new track is kept only if its
//! media reference is not already in the playlist (or earlier in the same
//! batch). After concatenation every chapter and track is re-keyed by
//! position, so merging the same batch twice leaves the playlist unchanged.

use crate::error::Result;
use crate::sanitize::{sanitize_content, split_tracks};
use crate::types::{pad2, Chapter, IconRef, MediaRef, PlaylistContent};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Platform flags every playlist starts from
pub fn default_config() -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("onlineOnly".to_string(), Value::Bool(false));
    config
}

/// Merge `new_chapters` into the document fetched for an existing playlist.
///
/// `existing` may be absent (new playlist) or any shape the platform
/// returned; it is sanitized first. New chapters without an icon get
/// `default_icon`.
pub fn merge_chapters(
    existing: Option<&Value>,
    new_chapters: Vec<Chapter>,
    default_icon: Option<&IconRef>,
) -> Result<PlaylistContent> {
    let sanitized = sanitize_content(existing)?;
    Ok(merge_into(sanitized, new_chapters, default_icon))
}

/// Merge `new_chapters` into already sanitized content
pub fn merge_into(
    existing: PlaylistContent,
    new_chapters: Vec<Chapter>,
    default_icon: Option<&IconRef>,
) -> PlaylistContent {
    let mut seen: HashSet<MediaRef> = HashSet::new();
    let mut chapters = Vec::with_capacity(existing.chapters.len() + new_chapters.len());

    for chapter in existing.chapters {
        match retain_unseen(chapter, &mut seen) {
            Some(chapter) => chapters.extend(split_tracks(chapter)),
            None => warn!("Dropping existing chapter whose track already appears earlier"),
        }
    }
    let existing_count = chapters.len();

    for chapter in new_chapters {
        let Some(mut chapter) = retain_unseen(chapter, &mut seen) else {
            debug!("Skipping new chapter already present in playlist");
            continue;
        };
        if chapter.display.icon.is_none() {
            chapter.display.icon = default_icon.cloned();
        }
        chapters.extend(split_tracks(chapter));
    }

    debug!(
        existing = existing_count,
        added = chapters.len() - existing_count,
        "Merged chapters"
    );

    rekey(&mut chapters);

    let mut config = default_config();
    config.extend(existing.config);

    PlaylistContent { chapters, config }
}

/// Reassign positional keys and labels. Each chapter's track is keyed "01"
/// and shares the chapter's 1-based label.
pub fn rekey(chapters: &mut [Chapter]) {
    for (i, chapter) in chapters.iter_mut().enumerate() {
        let label = (i + 1).to_string();
        chapter.key = pad2(i);
        chapter.overlay_label.clone_from(&label);
        for track in &mut chapter.tracks {
            track.key = "01".to_string();
            track.overlay_label.clone_from(&label);
        }
    }
}

/// Keep only tracks whose reference has not been seen, recording the kept
/// ones. Returns `None` when nothing survives.
fn retain_unseen(mut chapter: Chapter, seen: &mut HashSet<MediaRef>) -> Option<Chapter> {
    chapter
        .tracks
        .retain(|track| seen.insert(track.track_url.clone()));
    (!chapter.tracks.is_empty()).then_some(chapter)
}
