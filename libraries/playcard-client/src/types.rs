//! Types for platform API requests and responses, plus call-time settings.

use playcard_core::{byte_count, ChannelLayout, ContentId, TranscodeDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default platform API base URL
pub const DEFAULT_API_URL: &str = "https://api.yotoplay.com";

/// Configuration for connecting to the platform.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.yotoplay.com")
    pub api_url: String,
    /// Bearer token obtained by the login flow
    pub access_token: String,
}

impl ClientConfig {
    /// Config for the default API with the given token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_url(DEFAULT_API_URL, access_token)
    }

    /// Config for a specific API base URL.
    pub fn with_url(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            access_token: access_token.into(),
        }
    }
}

// =============================================================================
// Upload Types
// =============================================================================

/// Negotiated destination for a file's bytes.
///
/// A missing `destination_url` means the platform already holds content
/// with this identifier and the transfer must be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSlot {
    #[serde(rename = "uploadUrl", default)]
    pub destination_url: Option<String>,
    #[serde(rename = "uploadId")]
    pub slot_id: String,
}

impl UploadSlot {
    /// Destination to PUT bytes to, if a transfer is needed
    pub fn destination(&self) -> Option<&str> {
        self.destination_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Response from the upload URL endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadUrlResponse {
    pub upload: UploadSlot,
}

/// Extract a ready descriptor from a transcode status response.
///
/// Returns `None` until `transcode.transcodedSha256` is a non-empty string.
/// Every other field is optional and falls back to the platform defaults.
pub fn descriptor_from_status(status: &Value) -> Option<TranscodeDescriptor> {
    let transcode = status.get("transcode")?;
    let sha = transcode
        .get("transcodedSha256")
        .and_then(Value::as_str)
        .filter(|sha| !sha.is_empty())?;

    let mut descriptor = TranscodeDescriptor::new(ContentId::new(sha));
    let Some(info) = transcode.get("transcodedInfo") else {
        return Some(descriptor);
    };

    if let Some(duration) = info
        .get("duration")
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite())
    {
        descriptor.duration = duration;
    }
    if let Some(size) = info.get("fileSize").and_then(byte_count) {
        descriptor.byte_size = size;
    }
    if let Some(format) = info
        .get("format")
        .and_then(Value::as_str)
        .filter(|f| !f.is_empty())
    {
        descriptor.codec_format = format.to_string();
    }
    descriptor.channel_layout = info.get("channels").and_then(ChannelLayout::from_value);
    descriptor.source_title = info
        .pointer("/metadata/title")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(descriptor)
}

// =============================================================================
// Playlist Types
// =============================================================================

/// Entry in the list of the user's playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub card_id: String,
    pub title: String,
}

impl CardSummary {
    /// Read one entry of `content/mine`; the title falls back to
    /// `metadata.title` and then the id.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let card_id = value.get("cardId").and_then(Value::as_str)?.to_string();
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .or_else(|| value.pointer("/metadata/title").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .unwrap_or(&card_id)
            .to_string();
        Some(Self { card_id, title })
    }
}

/// A playlist document as stored on the platform.
#[derive(Debug, Clone)]
pub struct StoredPlaylist {
    pub card_id: String,
    /// Raw document; sanitized by the merger before use
    pub document: Value,
}

impl StoredPlaylist {
    /// Title from `card.title` or a top-level `title`
    pub fn title(&self) -> Option<&str> {
        self.document
            .pointer("/card/title")
            .or_else(|| self.document.get("title"))
            .and_then(Value::as_str)
    }
}

/// Result of a create/update request.
#[derive(Debug, Clone)]
pub struct SavedPlaylist {
    /// Id assigned on create (also echoed by most updates)
    pub card_id: Option<String>,
    /// Response body as returned, `Value::Null` when empty
    pub response: Value,
}

impl SavedPlaylist {
    pub(crate) fn from_response(response: Value) -> Self {
        let card_id = response
            .pointer("/card/cardId")
            .or_else(|| response.get("cardId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { card_id, response }
    }
}

// =============================================================================
// Ingest Settings
// =============================================================================

/// How often and how long to wait for a transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Ask the platform for loudness-normalised output
    pub loudnorm: bool,
}

impl PollSettings {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            loudnorm: false,
        }
    }

    /// Upper bound on time spent sleeping between checks
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 120)
    }
}

/// What the orchestrator does when one file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the batch at the first failure
    #[default]
    Abort,
    /// Record the failure and carry on with the next file
    SkipAndContinue,
}

/// Call-time parameters for a batch ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub poll: PollSettings,
    /// Number of files in flight at once; 1 keeps the batch strictly sequential
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            poll: PollSettings::default(),
            concurrency: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Progress information after each file completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestProgress {
    pub completed: usize,
    pub total: usize,
    pub current_file: String,
}
