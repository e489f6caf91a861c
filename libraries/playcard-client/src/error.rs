//! Error types for the platform client.

use playcard_core::ContentError;
use thiserror::Error;

/// Errors that can occur when talking to the content platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Transport failure outside of a byte transfer
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform refused to issue an upload slot
    #[error("Upload negotiation failed ({status}): {body}")]
    NegotiationFailed { status: u16, body: String },

    /// Transport error or non-success response while sending bytes
    #[error("Transfer failed: {message}")]
    TransferFailed {
        status: Option<u16>,
        message: String,
    },

    /// Bytes arrived but no transcode was reported in time
    #[error("Transcoding timed out for upload {slot_id} after {attempts} status checks")]
    TranscodeTimedOut { slot_id: String, attempts: u32 },

    /// Transcode status endpoint returned an error response
    #[error("Transcode status query failed ({status}): {body}")]
    StatusQueryFailed { status: u16, body: String },

    /// Playlist endpoint returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Token missing, expired or rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse platform response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error while reading a source file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored playlist content could not be merged
    #[error("Invalid playlist content: {0}")]
    Content(#[from] ContentError),
}

impl PlatformError {
    /// Whether polling alone can be retried without re-uploading
    pub fn is_transcode_timeout(&self) -> bool {
        matches!(self, Self::TranscodeTimedOut { .. })
    }
}

/// Result type for platform client operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
