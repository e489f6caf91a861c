/// Transcode results reported by the platform
use super::icon::IconRef;
use super::playlist::{ChannelLayout, DEFAULT_DURATION, DEFAULT_FILE_SIZE, DEFAULT_FORMAT};
use crate::hash::ContentId;
use serde::{Deserialize, Serialize};

/// Server-reported outcome of processing uploaded bytes into playable media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeDescriptor {
    /// Identifier of the transcoded media (not of the uploaded bytes)
    pub content_id: ContentId,
    /// Duration in seconds
    pub duration: f64,
    pub byte_size: u64,
    pub codec_format: String,
    pub channel_layout: Option<ChannelLayout>,
    /// Title found in the source file's tags, if any
    pub source_title: Option<String>,
}

impl TranscodeDescriptor {
    /// Descriptor with platform defaults for everything but the identifier
    pub fn new(content_id: ContentId) -> Self {
        Self {
            content_id,
            duration: DEFAULT_DURATION,
            byte_size: DEFAULT_FILE_SIZE,
            codec_format: DEFAULT_FORMAT.to_string(),
            channel_layout: None,
            source_title: None,
        }
    }
}

/// One successfully ingested local file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedFile {
    /// File name as selected by the user
    pub file_name: String,
    pub file_size: u64,
    /// Identifier of the local bytes that were negotiated
    pub local_id: ContentId,
    pub descriptor: TranscodeDescriptor,
    /// Icon chosen for this file, overriding the batch default
    #[serde(default)]
    pub icon: Option<IconRef>,
}
