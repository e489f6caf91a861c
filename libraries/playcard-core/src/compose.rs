//! Request bodies for the platform's playlist create/update endpoint.
//!
//! Both requests go to the same endpoint; the presence of `cardId` selects
//! an update. The shapes differ in their top-level keys, so they are kept
//! as separate types.

use crate::types::{Chapter, PlaylistContent};
use serde::Serialize;
use serde_json::{Map, Value};

/// Activity the platform's player runs for audio playlists
pub const ACTIVITY: &str = "yoto_Player";

/// Content schema version
pub const CONTENT_VERSION: &str = "1";

/// Playback mode sent on update
pub const PLAYBACK_LINEAR: &str = "linear";

/// Aggregate duration and size of a playlist's media
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTotals {
    pub duration: f64,
    pub file_size: u64,
}

impl MediaTotals {
    /// Sum the first track of every chapter
    pub fn of(content: &PlaylistContent) -> Self {
        content
            .chapters
            .iter()
            .filter_map(|chapter| chapter.tracks.first())
            .fold(Self::default(), |totals, track| Self {
                duration: totals.duration + track.duration,
                file_size: totals.file_size + track.file_size,
            })
    }

    fn is_empty(&self) -> bool {
        self.duration == 0.0 && self.file_size == 0
    }
}

/// Optional metadata placed on a create request
#[derive(Debug, Clone, Default)]
pub struct BodyOptions {
    /// Large cover image URL
    pub cover_image: Option<String>,
    pub totals: Option<MediaTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBody {
    pub activity: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_type: Option<&'static str>,
    pub chapters: Vec<Chapter>,
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverMetadata {
    #[serde(rename = "imageL")]
    pub image_l: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaTotals>,
}

/// Body creating a new playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBody {
    pub title: String,
    pub content: ContentBody,
    pub metadata: CreateMetadata,
}

/// Body replacing an existing playlist's content in full
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub card_id: String,
    pub title: String,
    pub content: ContentBody,
}

/// A create or update request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlaylistBody {
    Create(CreateBody),
    Update(UpdateBody),
}

impl PlaylistBody {
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }
}

/// Compose the body for `content`: an update when `card_id` is given,
/// otherwise a create carrying `options`.
pub fn compose_body(
    title: &str,
    content: &PlaylistContent,
    options: &BodyOptions,
    card_id: Option<&str>,
) -> PlaylistBody {
    match card_id {
        Some(card_id) => PlaylistBody::Update(compose_update_body(card_id, title, content)),
        None => PlaylistBody::Create(compose_create_body(title, content, options)),
    }
}

pub fn compose_create_body(
    title: &str,
    content: &PlaylistContent,
    options: &BodyOptions,
) -> CreateBody {
    CreateBody {
        title: title.to_string(),
        content: ContentBody {
            activity: ACTIVITY,
            version: CONTENT_VERSION,
            playback_type: None,
            chapters: content.chapters.clone(),
            config: content.config.clone(),
        },
        metadata: CreateMetadata {
            cover: options.cover_image.clone().map(|image_l| CoverMetadata { image_l }),
            media: options.totals.filter(|totals| !totals.is_empty()),
        },
    }
}

pub fn compose_update_body(card_id: &str, title: &str, content: &PlaylistContent) -> UpdateBody {
    UpdateBody {
        card_id: card_id.to_string(),
        title: title.to_string(),
        content: ContentBody {
            activity: ACTIVITY,
            version: CONTENT_VERSION,
            playback_type: Some(PLAYBACK_LINEAR),
            chapters: content.chapters.clone(),
            config: content.config.clone(),
        },
    }
}
