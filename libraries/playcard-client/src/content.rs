//! Playlist (card content) operations.

use crate::client::endpoint;
use crate::error::{PlatformError, Result};
use crate::types::{CardSummary, SavedPlaylist, StoredPlaylist};
use playcard_core::PlaylistBody;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Content client for the platform's playlist endpoints.
pub struct ContentClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> ContentClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Fetch a stored playlist document.
    ///
    /// The document is returned as-is; the merger sanitizes it.
    pub async fn fetch(&self, card_id: &str) -> Result<StoredPlaylist> {
        let url = endpoint(self.base_url, &["content", card_id])?;
        debug!(url = %url, "Fetching playlist");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token)
            .send()
            .await?;

        let document = json_body(response, "playlist").await?;

        Ok(StoredPlaylist {
            card_id: card_id.to_string(),
            document,
        })
    }

    /// List the playlists owned by the token's account.
    pub async fn list_mine(&self, show_deleted: bool) -> Result<Vec<CardSummary>> {
        let url = format!("{}/content/mine", self.base_url);

        let mut request = self.http.get(&url).bearer_auth(self.access_token);
        if show_deleted {
            request = request.query(&[("showdeleted", "true")]);
        }

        let body = json_body(request.send().await?, "playlist list").await?;

        let cards: Vec<CardSummary> = body
            .get("cards")
            .and_then(Value::as_array)
            .map(|cards| cards.iter().filter_map(CardSummary::from_value).collect())
            .unwrap_or_default();

        debug!(count = cards.len(), "Fetched playlists");

        Ok(cards)
    }

    /// Create or update a playlist.
    ///
    /// An update replaces the stored content in full.
    pub async fn save(&self, body: &PlaylistBody) -> Result<SavedPlaylist> {
        let url = format!("{}/content", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for(response).await);
        }

        let text = response.text().await?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                PlatformError::ParseError(format!("Failed to parse save response: {}", e))
            })?
        };

        let saved = SavedPlaylist::from_response(value);

        if saved.card_id.is_none() && !body.is_update() {
            warn!("Create response carried no card id");
        }
        info!(card_id = ?saved.card_id, update = body.is_update(), "Playlist saved");

        Ok(saved)
    }
}

async fn json_body(response: Response, what: &str) -> Result<Value> {
    if !response.status().is_success() {
        return Err(error_for(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| PlatformError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

async fn error_for(response: Response) -> PlatformError {
    let status = response.status();
    if status.as_u16() == 401 {
        return PlatformError::AuthRequired;
    }

    let message = response.text().await.unwrap_or_default();
    PlatformError::ServerError {
        status: status.as_u16(),
        message,
    }
}
