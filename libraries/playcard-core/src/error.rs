/// Error types for playlist content handling
use thiserror::Error;

/// Result type alias using `ContentError`
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while building or merging playlist content.
///
/// Existing documents are sanitized rather than rejected, so the only
/// failure left is input that cannot be turned into a playable track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// A track carries no media reference at all
    #[error("Track {track} of chapter {chapter} has no media reference")]
    MissingMediaReference { chapter: usize, track: usize },
}
