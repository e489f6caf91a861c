//! Local files selected for upload.

use crate::error::Result;
use crate::upload::mime_type_for_file;
use bytes::Bytes;
use playcard_core::IconRef;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

#[derive(Debug, Clone)]
enum Origin {
    Path(PathBuf),
    Memory(Bytes),
}

/// A file handle as selected by the user, not yet read or hashed.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    size: u64,
    /// Modification time in milliseconds since the epoch, 0 when unknown
    modified_ms: u64,
    origin: Origin,
    icon: Option<IconRef>,
}

/// What makes two selections "the same file" before any bytes are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub name: String,
    pub size: u64,
    pub modified_ms: u64,
}

impl SourceFile {
    /// Stat a file on disk; bytes are read later.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;

        let modified_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| u64::try_from(d.as_millis()).ok())
            .unwrap_or(0);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            modified_ms,
            origin: Origin::Path(path.to_path_buf()),
            icon: None,
        })
    }

    /// An in-memory file, e.g. bytes received from another process.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>, modified_ms: u64) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            modified_ms,
            origin: Origin::Memory(bytes),
            icon: None,
        }
    }

    /// Attach an icon used for this file's chapter instead of the batch default.
    #[must_use]
    pub fn with_icon(mut self, icon: Option<IconRef>) -> Self {
        self.icon = icon;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn icon(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn identity(&self) -> FileIdentity {
        FileIdentity {
            name: self.name.clone(),
            size: self.size,
            modified_ms: self.modified_ms,
        }
    }

    /// Content-Type hint for the transfer, from the file name's extension
    pub fn content_type(&self) -> &'static str {
        mime_type_for_file(Path::new(&self.name))
    }

    /// Read the whole file.
    pub async fn read(&self) -> Result<Bytes> {
        match &self.origin {
            Origin::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
            Origin::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Drop repeated selections of the same file, keeping the first.
pub fn dedupe_files(files: Vec<SourceFile>) -> Vec<SourceFile> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| {
            let fresh = seen.insert(file.identity());
            if !fresh {
                debug!(file = %file.name, "Skipping repeated selection");
            }
            fresh
        })
        .collect()
}
