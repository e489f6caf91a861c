//! Playcard Platform Client
//!
//! HTTP client library for the content platform's media and playlist API.
//!
//! # Features
//!
//! - **Upload**: negotiate a slot by content id, transfer bytes only when
//!   the platform does not already hold them
//! - **Transcode polling**: bounded, cancellable wait for the transcoded
//!   descriptor
//! - **Batch ingest**: de-duplicated, ordered ingestion of many files with
//!   progress reporting and a configurable failure policy
//! - **Playlists**: fetch, list and save card content
//!
//! # Example
//!
//! ```ignore
//! use playcard_client::{ClientConfig, PlatformClient};
//! use playcard_core::{compose_body, merge_chapters, build_chapters, BodyOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformClient::new(ClientConfig::new("token"))?;
//!
//!     let stored = client.content().fetch("card-id").await?;
//!     let content = merge_chapters(Some(&stored.document), build_chapters(&[], None), None)?;
//!     let body = compose_body("Bedtime", &content, &BodyOptions::default(), Some("card-id"));
//!     client.content().save(&body).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod content;
mod error;
mod ingest;
mod platform;
mod poller;
mod source;
mod types;
mod upload;

// Re-export main types
pub use client::PlatformClient;
pub use error::{PlatformError, Result};
pub use ingest::{ingest_files, IngestFailure, IngestReport};
pub use platform::MediaPlatform;
pub use poller::{poll_transcode, PollOutcome};
pub use source::{dedupe_files, FileIdentity, SourceFile};
pub use types::{
    descriptor_from_status, CardSummary, ClientConfig, FailurePolicy, IngestOptions,
    IngestProgress, PollSettings, SavedPlaylist, StoredPlaylist, UploadSlot, DEFAULT_API_URL,
};

// Re-export sub-clients for direct use if needed
pub use content::ContentClient;
pub use upload::{mime_type_for_file, UploadClient};
