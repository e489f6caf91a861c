//! Playcard Core
//!
//! Platform-agnostic playlist logic for Playcard: everything between
//! "these files were transcoded" and "this is the body to send".
//!
//! # Architecture
//!
//! - **Hashing**: [`content_id`] derives the identifier the platform uses
//!   to recognise audio it already holds
//! - **Types**: [`Chapter`], [`Track`], [`PlaylistContent`] in the platform's
//!   wire shape
//! - **Builder**: [`build_chapters`] turns ingested files into one chapter
//!   per track
//! - **Merger**: [`merge_chapters`] sanitizes a stored playlist, drops
//!   duplicate tracks and re-keys everything by position
//! - **Composer**: [`compose_body`] renders the create/update request
//!
//! # Example
//!
//! ```rust
//! use playcard_core::{build_chapters, compose_body, merge_chapters, BodyOptions};
//!
//! let chapters = build_chapters(&[], None);
//! let content = merge_chapters(None, chapters, None).unwrap();
//! let body = compose_body("Bedtime", &content, &BodyOptions::default(), None);
//! assert!(!body.is_update());
//! ```

#![forbid(unsafe_code)]

pub mod builder;
pub mod compose;
pub mod error;
pub mod hash;
pub mod merge;
pub mod sanitize;
pub mod types;

pub use builder::{build_chapters, dedupe_by_content};
pub use compose::{compose_body, BodyOptions, MediaTotals, PlaylistBody};
pub use error::{ContentError, Result};
pub use hash::{content_id, ContentId};
pub use merge::{merge_chapters, merge_into, rekey};
pub use sanitize::{byte_count, sanitize_content};
pub use types::{
    ChannelLayout, Chapter, Display, IconRef, IngestedFile, MediaRef, PlaylistContent, Track,
    TrackKind, TranscodeDescriptor,
};
