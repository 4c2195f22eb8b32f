//! # Spotify Integration Module
//!
//! This module is the integration layer between Sortify and the Spotify Web API.
//! It covers the authorization code flow, the paginated track download and every
//! call needed to publish the sorted playlist.
//!
//! ## Architecture
//!
//! ```text
//! CLI / Pipeline
//!          ↓
//! Spotify Integration Layer
//!     ├── auth      (AuthFlow, TokenExchange)
//!     ├── tracks    (paginated playlist track download)
//!     ├── playlist  (user lookup, playlist creation, cover and track upload)
//!     └── cover     (cover image re-encoding)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Handling
//!
//! Every endpoint checks for its exact success status. A `401 Unauthorized` on
//! an authorized call becomes [`Error::CredentialExpired`]; any other
//! unexpected status becomes [`Error::Remote`]. Nothing is retried, a failed
//! call aborts the current run.

pub mod auth;
pub mod cover;
pub mod playlist;
pub mod tracks;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    Error, Res,
    types::{ApiErrorResponse, Credential},
};

/// Thin client over the Spotify Web API endpoints the sorter needs.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// First page of a playlist's tracks, the starting cursor for pagination.
    pub fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        format!(
            "{uri}/playlists/{playlist_id}/tracks",
            uri = self.api_url,
            playlist_id = playlist_id
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Sends an authorized request and checks the expected success status.
    async fn send_authorized(
        &self,
        request: RequestBuilder,
        credential: &Credential,
        expected: StatusCode,
    ) -> Res<Response> {
        let response = request.bearer_auth(credential.as_str()).send().await?;
        tracing::debug!(url = %response.url(), status = %response.status(), "spotify response");

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::CredentialExpired);
        }
        expect_status(response, expected).await
    }
}

/// Passes the response through when it carries `expected`, otherwise builds a
/// [`Error::Remote`] from the error body.
pub(crate) async fn expect_status(response: Response, expected: StatusCode) -> Res<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or(body);

    Err(Error::Remote {
        url,
        status: status.as_u16(),
        message,
    })
}

/// Decodes a JSON body. A body that does not fit `T` is an [`Error::Parse`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Res<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
