use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Opaque bearer token authorizing API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: Option<u16>,
    pub message: Option<String>,
}

/// One page of `GET /playlists/{id}/tracks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksPage {
    #[serde(default)]
    pub items: Vec<RawTrackEntry>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// A playlist item exactly as the API returns it; every nested level may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrackEntry {
    pub track: Option<RawTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrack {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub album: Option<RawAlbum>,
    pub artists: Option<Vec<RawArtist>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAlbum {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArtist {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Minimal track shape annotated with how often its album and artist occur.
///
/// `None` ids are the shared sentinel for "no id"; they group together and
/// order before every real id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistilledTrack {
    pub uri: String,
    pub name: String,
    pub album_name: String,
    pub artist_name: String,
    pub album_id: Option<String>,
    pub artist_id: Option<String>,
    pub album_count: usize,
    pub artist_count: usize,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artist: String,
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Metadata copied from the source playlist onto the sorted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDetails {
    pub name: String,
    pub description: String,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: Option<String>,
}
