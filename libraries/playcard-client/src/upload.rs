//! Upload negotiation, byte transfer and transcode status queries.

use crate::client::endpoint;
use crate::error::{PlatformError, Result};
use crate::types::{descriptor_from_status, UploadSlot, UploadUrlResponse};
use bytes::Bytes;
use playcard_core::{ContentId, TranscodeDescriptor};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Upload client for the platform's media endpoints.
pub struct UploadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Ask the platform where to upload content with this identifier.
    ///
    /// # Arguments
    /// * `content_id` - Digest of the file's bytes
    /// * `filename` - Optional name shown in the platform's media library
    ///
    /// # Returns
    /// A slot whose destination is absent when the content already exists.
    pub async fn negotiate(
        &self,
        content_id: &ContentId,
        filename: Option<&str>,
    ) -> Result<UploadSlot> {
        let url = format!("{}/media/transcode/audio/uploadUrl", self.base_url);

        let mut query = vec![("sha256", content_id.as_str())];
        if let Some(name) = filename {
            query.push(("filename", name));
        }

        debug!(content_id = %content_id, filename = ?filename, "Negotiating upload");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body: UploadUrlResponse = response.json().await.map_err(|e| {
                PlatformError::ParseError(format!("Failed to parse upload slot: {}", e))
            })?;

            debug!(
                slot_id = %body.upload.slot_id,
                needs_transfer = body.upload.destination().is_some(),
                "Upload slot issued"
            );

            Ok(body.upload)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::NegotiationFailed {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// PUT raw bytes to a negotiated destination.
    ///
    /// The destination is a pre-signed URL, so no bearer token is sent.
    /// Any transport error or non-2xx response is a `TransferFailed`.
    pub async fn transfer(&self, destination: &str, bytes: Bytes, content_type: &str) -> Result<()> {
        let size = bytes.len();

        let response = self
            .http
            .put(destination)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| PlatformError::TransferFailed {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            info!(size, content_type, "Bytes transferred");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(PlatformError::TransferFailed {
                status: Some(status.as_u16()),
                message: format!("{}: {}", status, error_text),
            })
        }
    }

    /// Query transcode status once.
    ///
    /// # Returns
    /// The descriptor once transcoding finished, `None` while still running.
    pub async fn transcode_status(
        &self,
        slot_id: &str,
        loudnorm: bool,
    ) -> Result<Option<TranscodeDescriptor>> {
        let url = endpoint(self.base_url, &["media", "upload", slot_id, "transcoded"])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token)
            .query(&[("loudnorm", loudnorm)])
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body: Value = response.json().await.map_err(|e| {
                PlatformError::ParseError(format!("Failed to parse transcode status: {}", e))
            })?;
            Ok(descriptor_from_status(&body))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PlatformError::StatusQueryFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Get MIME type for an audio file name.
pub fn mime_type_for_file(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("wav") => "audio/wav",
        Some("m4a" | "aac" | "m4b") => "audio/mp4",
        _ => "application/octet-stream",
    }
}
