use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;

use crate::{Error, Res};

pub const PLAYLIST_ID_LEN: usize = 22;

/// Random value tying an authorization redirect to the flow that started it.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Extracts the playlist id from `https://open.spotify.com/playlist/<id>`.
///
/// A query string or fragment after the id is accepted and ignored.
pub fn parse_playlist_id(input: &str) -> Res<String> {
    let invalid = || Error::InputValidation(format!("Provided playlist URL is invalid: {}", input));

    let url = Url::parse(input.trim()).map_err(|_| invalid())?;
    if url.scheme() != "https" || url.host_str() != Some("open.spotify.com") {
        return Err(invalid());
    }

    let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
    match segments.as_slice() {
        ["playlist", id]
            if id.len() == PLAYLIST_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            Ok(id.to_string())
        }
        _ => Err(invalid()),
    }
}
