//! Turns ingested files into chapters, one track per chapter.

use crate::types::{pad2, Chapter, Display, IconRef, IngestedFile, MediaRef, Track, TrackKind};
use std::collections::HashSet;
use tracing::debug;

/// Drop files whose transcoded content was already seen earlier in the batch.
///
/// Two differently named local files can transcode to identical media;
/// the first one in selection order wins.
pub fn dedupe_by_content(items: Vec<IngestedFile>) -> Vec<IngestedFile> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let fresh = seen.insert(item.descriptor.content_id.clone());
            if !fresh {
                debug!(
                    file = %item.file_name,
                    content_id = %item.descriptor.content_id,
                    "Dropping duplicate transcoded content"
                );
            }
            fresh
        })
        .collect()
}

/// Build one chapter per ingested file.
///
/// Tracks are keyed from "01" and chapters from "00"; both carry the same
/// 1-based overlay label. A file's own icon wins over the batch `icon`.
pub fn build_chapters(items: &[IngestedFile], icon: Option<&IconRef>) -> Vec<Chapter> {
    dedupe_by_content(items.to_vec())
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let icon = item.icon.as_ref().or(icon);
            let track = build_track(i, &item, icon);
            Chapter::wrapping(pad2(i), (i + 1).to_string(), icon.cloned(), track)
        })
        .collect()
}

fn build_track(index: usize, item: &IngestedFile, icon: Option<&IconRef>) -> Track {
    let descriptor = &item.descriptor;
    let title = descriptor
        .source_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| strip_extension(&item.file_name).to_string(), str::to_string);

    Track {
        key: pad2(index + 1),
        title,
        format: descriptor.codec_format.clone(),
        track_url: MediaRef::for_content(&descriptor.content_id),
        kind: TrackKind::Audio,
        overlay_label: (index + 1).to_string(),
        duration: descriptor.duration,
        file_size: descriptor.byte_size,
        channels: descriptor.channel_layout,
        display: Some(Display::new(icon.cloned())),
    }
}

/// File name without its last extension ("a.b.mp3" -> "a.b")
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() => &file_name[..dot],
        _ => file_name,
    }
}
