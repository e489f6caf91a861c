//! Playcard command-line tool
//!
//! Builds card playlists from local audio files: uploads each file once,
//! waits for the platform to transcode it and writes the resulting chapters
//! into a new or existing playlist.

pub mod config;
pub mod error;
pub mod workflow;

pub use config::CliConfig;
pub use error::{CliError, Result};
