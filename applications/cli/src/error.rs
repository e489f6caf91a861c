/// Error types for the command-line workflows
use playcard_client::PlatformError;
use playcard_core::ContentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The batch stopped at a failing file; nothing was saved
    #[error("{file} failed after {ingested} file(s) were uploaded: {source}")]
    IngestAborted {
        file: String,
        ingested: usize,
        #[source]
        source: PlatformError,
    },

    #[error("Cancelled; {ingested} file(s) were uploaded but the playlist was not saved")]
    Cancelled { ingested: usize },

    #[error("No audio files to add")]
    NothingToAdd,
}

pub type Result<T> = std::result::Result<T, CliError>;
