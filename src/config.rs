//! Configuration management for Sortify.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files and turns them into one explicit [`Config`] value that is
//! handed to the authorization flow and the API client at construction.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private ugc-image-upload";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sortify/.env`
/// - macOS: `~/Library/Application Support/sortify/.env`
/// - Windows: `%LOCALAPPDATA%/sortify/.env`
///
/// A missing file is fine; variables already present in the process
/// environment are never overridden.
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Platform specific directory holding the `.env` file and the token cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sortify");
    path
}

/// Application identity, endpoints and local settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub token_path: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank optional variables fall back to the defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let or_default = |key: &str, default: &str| {
            var(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            client_id: var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            client_secret: var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
            redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            token_path: var("SORTIFY_TOKEN_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("cache").join("token")),
        }
    }

    /// Checks that an application identity is configured.
    ///
    /// Runs at startup, before any network I/O.
    pub fn validate(&self) -> Res<()> {
        if self.client_id.is_empty() {
            return Err(Error::Config(
                "SPOTIFY_CLIENT_ID is not set. Copy the Client ID of your application from the Spotify developer dashboard.".to_string(),
            ));
        }
        if self.client_secret.is_empty() {
            return Err(Error::Config(
                "SPOTIFY_CLIENT_SECRET is not set. Paste the Client Secret from the Spotify developer dashboard into your .env file, then run sortify again.".to_string(),
            ));
        }
        Ok(())
    }

    /// Developer dashboard page of the configured application.
    pub fn dashboard_url(&self) -> String {
        if self.client_id.is_empty() {
            "https://developer.spotify.com/dashboard".to_string()
        } else {
            format!(
                "https://developer.spotify.com/dashboard/applications/{}",
                self.client_id
            )
        }
    }
}
