//! One complete fetch → distill → sort → publish attempt, and the driver that
//! repeats it after a re-authorization.
//!
//! An attempt either finishes or fails as a whole. When it fails with
//! [`Error::CredentialExpired`] nothing of it is kept: the stored token is
//! forgotten, a fresh one is obtained and a new attempt starts from the first
//! page.

use crate::{
    Error, Res, info,
    management::CredentialStore,
    sorter,
    spotify::SpotifyClient,
    types::{Credential, DistilledTrack},
    warning,
};

/// Re-authorizations allowed within one run before giving up.
pub const MAX_REAUTHORIZATIONS: usize = 3;

/// What an attempt produced.
#[derive(Debug)]
pub enum Outcome {
    /// The sorted copy was published under this playlist id.
    Published(String),
    /// Dry run, the computed order was not published.
    Preview(Vec<DistilledTrack>),
}

pub async fn sort_playlist(
    client: &SpotifyClient,
    playlist_id: &str,
    credential: &Credential,
    dry_run: bool,
) -> Res<Outcome> {
    info!("Getting tracks:");
    let entries = client
        .fetch_all(&client.playlist_tracks_url(playlist_id), credential)
        .await?;
    info!("   # of tracks received: {}", entries.len());

    info!("Distilling tracks:");
    let distilled = sorter::distill(&entries);

    info!("Sorting {} tracks:", distilled.len());
    if dry_run {
        return Ok(Outcome::Preview(sorter::order(distilled)));
    }

    let uris = sorter::sort(distilled);
    let new_playlist_id = client.publish(&uris, playlist_id, credential).await?;
    Ok(Outcome::Published(new_playlist_id))
}

/// Runs attempts until one completes, re-authorizing through `reauthorize`
/// whenever the credential is rejected.
///
/// The stored token is cleared before every re-authorization and again when
/// the run gives up, so a rejected token is never sent twice. After
/// [`MAX_REAUTHORIZATIONS`] fresh tokens the next expiry is returned as is.
pub async fn sort_with_reauthorization<F, Fut>(
    client: &SpotifyClient,
    store: &CredentialStore,
    playlist_id: &str,
    mut credential: Credential,
    dry_run: bool,
    mut reauthorize: F,
) -> Res<Outcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Res<Credential>>,
{
    let mut reauthorizations = 0;
    loop {
        match sort_playlist(client, playlist_id, &credential, dry_run).await {
            Err(Error::CredentialExpired) => {
                store.clear().await?;
                if reauthorizations == MAX_REAUTHORIZATIONS {
                    return Err(Error::CredentialExpired);
                }
                reauthorizations += 1;
                warning!("Stored login was rejected, starting over after authorization");
                credential = reauthorize().await?;
            }
            result => return result,
        }
    }
}
