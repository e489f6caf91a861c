//! Main Playcard platform client.

use crate::content::ContentClient;
use crate::error::{PlatformError, Result};
use crate::ingest::{ingest_files, IngestReport};
use crate::platform::MediaPlatform;
use crate::poller::{poll_transcode, PollOutcome};
use crate::source::SourceFile;
use crate::types::{ClientConfig, IngestOptions, IngestProgress, PollSettings, UploadSlot};
use crate::upload::UploadClient;
use async_trait::async_trait;
use bytes::Bytes;
use playcard_core::{ContentId, TranscodeDescriptor};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Client for the content platform's media and playlist endpoints.
///
/// # Example
///
/// ```ignore
/// use playcard_client::{ClientConfig, IngestOptions, PlatformClient, SourceFile};
/// use tokio_util::sync::CancellationToken;
///
/// let client = PlatformClient::new(ClientConfig::new(token))?;
///
/// let files = vec![SourceFile::open("chapter-1.mp3").await?];
/// let report = client
///     .ingest(files, &IngestOptions::default(), &CancellationToken::new(), |p| {
///         println!("{}/{}", p.completed, p.total);
///     })
///     .await;
/// println!("Ingested {} files", report.ingested.len());
/// ```
pub struct PlatformClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl PlatformClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_url = normalize_url(&config.api_url)?;

        // Transfers of long recordings can take minutes
        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Playcard/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(api_url = %api_url, "Platform client ready");

        Ok(Self {
            http,
            api_url,
            access_token: config.access_token,
        })
    }

    /// Get the API base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.api_url
    }

    /// Upload negotiation, transfer and status queries.
    pub fn uploads(&self) -> UploadClient<'_> {
        UploadClient::new(&self.http, &self.api_url, &self.access_token)
    }

    /// Playlist fetch, list and save.
    pub fn content(&self) -> ContentClient<'_> {
        ContentClient::new(&self.http, &self.api_url, &self.access_token)
    }

    /// Poll a slot until its transcode is ready.
    ///
    /// Use this to resume after [`PlatformError::TranscodeTimedOut`]: the
    /// bytes already arrived, so nothing is uploaded again.
    pub async fn await_transcode(
        &self,
        slot_id: &str,
        settings: &PollSettings,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome> {
        poll_transcode(self, slot_id, settings, cancel).await
    }

    /// Ingest a batch of files. See [`ingest_files`].
    pub async fn ingest<F>(
        &self,
        files: Vec<SourceFile>,
        options: &IngestOptions,
        cancel: &CancellationToken,
        progress: F,
    ) -> IngestReport
    where
        F: FnMut(IngestProgress) + Send,
    {
        ingest_files(self, files, options, cancel, progress).await
    }
}

#[async_trait]
impl MediaPlatform for PlatformClient {
    async fn negotiate_upload(
        &self,
        content_id: &ContentId,
        filename: Option<&str>,
    ) -> Result<UploadSlot> {
        self.uploads().negotiate(content_id, filename).await
    }

    async fn transfer(&self, destination: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        self.uploads().transfer(destination, bytes, content_type).await
    }

    async fn transcode_status(
        &self,
        slot_id: &str,
        loudnorm: bool,
    ) -> Result<Option<TranscodeDescriptor>> {
        self.uploads().transcode_status(slot_id, loudnorm).await
    }
}

fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(PlatformError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| PlatformError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PlatformError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Append path segments to the base URL, percent-encoding each one
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| PlatformError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| PlatformError::InvalidUrl(format!("{base_url} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
