//! The media operations the upload pipeline needs from the platform.

use crate::error::Result;
use crate::types::UploadSlot;
use async_trait::async_trait;
use bytes::Bytes;
use playcard_core::{ContentId, TranscodeDescriptor};

/// Media endpoints used by the poller and the upload orchestrator.
///
/// Implementations must be safe to call again with the same arguments:
/// negotiation is keyed by content id and status queries by slot id.
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// Request a destination for content with this identifier
    async fn negotiate_upload(
        &self,
        content_id: &ContentId,
        filename: Option<&str>,
    ) -> Result<UploadSlot>;

    /// PUT bytes to a negotiated destination
    async fn transfer(&self, destination: &str, bytes: Bytes, content_type: &str) -> Result<()>;

    /// Query once; `None` while the transcode is still running
    async fn transcode_status(
        &self,
        slot_id: &str,
        loudnorm: bool,
    ) -> Result<Option<TranscodeDescriptor>>;
}
