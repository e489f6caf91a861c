//! Merge scenarios against stored playlist documents.

use playcard_core::{
    build_chapters, compose_body, content_id, merge_chapters, BodyOptions, ContentError,
    ContentId, IconRef, IngestedFile, MediaTotals, TranscodeDescriptor,
};
use serde_json::{json, Value};

// =============================================================================
// Helpers
// =============================================================================

fn ingested(name: &str, transcoded: &str) -> IngestedFile {
    IngestedFile {
        file_name: name.to_string(),
        file_size: 2048,
        local_id: content_id(name.as_bytes()),
        descriptor: TranscodeDescriptor {
            duration: 60.0,
            byte_size: 4096,
            ..TranscodeDescriptor::new(ContentId::new(transcoded))
        },
        icon: None,
    }
}

fn stored(urls: &[&str]) -> Value {
    let chapters: Vec<Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "key": format!("{i:02}"),
                "title": format!("Stored {i}"),
                "overlayLabel": (i + 1).to_string(),
                "display": { "icon16x16": null },
                "tracks": [{
                    "key": "01",
                    "title": format!("Stored {i}"),
                    "trackUrl": url,
                    "format": "aac",
                    "type": "audio",
                    "overlayLabel": (i + 1).to_string(),
                    "duration": 10,
                    "fileSize": 100
                }]
            })
        })
        .collect();

    json!({ "card": { "cardId": "card-1", "title": "Stored", "content": { "chapters": chapters } } })
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_chapter_into_empty_playlist() {
    let chapters = build_chapters(&[ingested("song.mp3", "abc123")], None);
    let merged = merge_chapters(None, chapters, None).unwrap();

    assert_eq!(merged.chapters.len(), 1);
    assert_eq!(merged.chapters[0].key, "00");
    assert_eq!(merged.chapters[0].tracks.len(), 1);
    assert_eq!(merged.chapters[0].tracks[0].key, "01");
    assert_eq!(merged.chapters[0].tracks[0].overlay_label, "1");
    assert_eq!(merged.chapters[0].tracks[0].track_url.as_str(), "yoto:#abc123");
}

#[test]
fn test_duplicate_of_existing_track_leaves_playlist_unchanged() {
    let document = stored(&["yoto:#abc123"]);
    let before = merge_chapters(Some(&document), vec![], None).unwrap();

    let chapters = build_chapters(&[ingested("again.mp3", "abc123")], None);
    let after = merge_chapters(Some(&document), chapters, None).unwrap();

    assert_eq!(after, before);
    assert_eq!(after.chapters.len(), 1);
    assert_eq!(after.track_count(), 1);
}

#[test]
fn test_new_tracks_appended_after_existing() {
    let document = stored(&["yoto:#a", "yoto:#b"]);
    let chapters = build_chapters(
        &[ingested("b.mp3", "b"), ingested("c.mp3", "c"), ingested("d.mp3", "d")],
        Some(&IconRef::media("icon")),
    );

    let merged = merge_chapters(Some(&document), chapters, None).unwrap();

    let urls: Vec<_> = merged.media_refs().map(|r| r.as_str()).collect();
    assert_eq!(urls, ["yoto:#a", "yoto:#b", "yoto:#c", "yoto:#d"]);
    assert!(merged.is_canonical());
    assert_eq!(merged.chapters[2].title, "c");
    assert_eq!(merged.chapters[3].key, "03");
    assert_eq!(merged.chapters[3].overlay_label, "4");
}

#[test]
fn test_merge_twice_is_noop() {
    let document = stored(&["yoto:#a"]);
    let batch = build_chapters(&[ingested("x.mp3", "x"), ingested("y.mp3", "y")], None);

    let once = merge_chapters(Some(&document), batch.clone(), None).unwrap();
    let once_json = serde_json::to_value(&once).unwrap();
    let twice = merge_chapters(Some(&json!({ "content": once_json })), batch, None).unwrap();

    assert_eq!(twice, once);
}

#[test]
fn test_drifted_document_is_sanitized_not_rejected() {
    let document = json!({
        "content": {
            "chapters": [
                {
                    "title": 42,
                    "display": { "icon16x16": "" },
                    "tracks": [{ "trackUrl": "yoto:#legacy", "duration": null, "channels": 6 }]
                },
                "not a chapter",
                { "tracks": "nope" }
            ],
            "config": "bad"
        }
    });

    let merged = merge_chapters(Some(&document), vec![], None).unwrap();
    assert_eq!(merged.chapters.len(), 1);
    assert_eq!(merged.chapters[0].title, "42");
    assert_eq!(merged.chapters[0].display.icon, None);
    assert_eq!(merged.chapters[0].tracks[0].duration, 1.0);
    assert_eq!(merged.chapters[0].tracks[0].format, "aac");
    assert_eq!(merged.chapters[0].tracks[0].channels, None);
    assert_eq!(merged.config["onlineOnly"], false);
}

#[test]
fn test_track_without_reference_fails_merge() {
    let document = json!({
        "content": { "chapters": [{ "tracks": [{ "title": "orphan" }] }] }
    });

    let err = merge_chapters(Some(&document), vec![], None).unwrap_err();
    assert!(matches!(
        err,
        ContentError::MissingMediaReference { chapter: 0, track: 0 }
    ));
}

#[test]
fn test_update_body_from_merge() {
    let document = stored(&["yoto:#a"]);
    let chapters = build_chapters(&[ingested("b.mp3", "b")], None);
    let merged = merge_chapters(Some(&document), chapters, None).unwrap();

    let options = BodyOptions {
        totals: Some(MediaTotals::of(&merged)),
        ..BodyOptions::default()
    };
    let body = serde_json::to_value(compose_body("Stored", &merged, &options, Some("card-1")))
        .unwrap();

    assert_eq!(body["cardId"], "card-1");
    assert_eq!(body["content"]["chapters"].as_array().unwrap().len(), 2);
    assert_eq!(body["content"]["chapters"][1]["key"], "01");
    assert_eq!(body["content"]["chapters"][1]["tracks"][0]["key"], "01");
}
