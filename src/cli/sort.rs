use std::io::{self, BufRead, Write};

use tabled::Table;

use crate::{
    Res,
    config::Config,
    info,
    management::CredentialStore,
    pipeline::{self, Outcome},
    spotify::{
        SpotifyClient,
        auth::{AuthFlow, LoginReason},
    },
    success,
    types::TrackTableRow,
    utils,
};

/// Sorts one playlist into a new `(Sorted)` copy.
///
/// A rejected token abandons the whole attempt: the token is forgotten, the
/// user authorizes again and the attempt restarts from the first page.
pub async fn sort(config: Config, url: Option<String>, dry_run: bool) -> Res<()> {
    let store = CredentialStore::from_config(&config);
    let flow = AuthFlow::new(config.clone(), store.clone())?;
    let client = SpotifyClient::new(config.api_url.clone());

    let credential = match store.load().await? {
        Some(credential) => credential,
        None => flow.obtain_credential(LoginReason::Initial).await?,
    };

    let input = match url {
        Some(url) => url,
        None => prompt_playlist_url()?,
    };
    let playlist_id = utils::parse_playlist_id(&input)?;

    let outcome = pipeline::sort_with_reauthorization(
        &client,
        &store,
        &playlist_id,
        credential,
        dry_run,
        || flow.obtain_credential(LoginReason::Expired),
    )
    .await?;
    report(outcome);
    Ok(())
}

/// Asks for the playlist URL on stdin.
pub fn prompt_playlist_url() -> Res<String> {
    print!("\nInput playlist URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Published(playlist_id) => {
            success!("Complete! https://open.spotify.com/playlist/{}", playlist_id)
        }
        Outcome::Preview(tracks) => {
            let rows: Vec<TrackTableRow> = tracks
                .into_iter()
                .enumerate()
                .map(|(i, t)| TrackTableRow {
                    position: i + 1,
                    name: t.name,
                    artist: t.artist_name,
                    album: t.album_name,
                })
                .collect();

            println!("{}", Table::new(rows));
            info!("Dry run, nothing was published.");
        }
    }
}
