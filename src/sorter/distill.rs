use std::collections::HashMap;

use crate::{
    types::{DistilledTrack, RawTrackEntry},
    warning,
};

/// Projects raw entries into distilled tracks annotated with group sizes.
///
/// Counts are taken over every kept entry, never per page. Entries without a
/// track or without a URI cannot be republished and are left out before
/// counting. Absent album or artist ids share the `None` bucket.
pub fn distill(entries: &[RawTrackEntry]) -> Vec<DistilledTrack> {
    let projected: Vec<DistilledTrack> = entries.iter().filter_map(project).collect();

    let skipped = entries.len() - projected.len();
    if skipped > 0 {
        warning!("Skipped {} playlist entries without a track URI", skipped);
    }

    let mut album_counts: HashMap<Option<String>, usize> = HashMap::new();
    let mut artist_counts: HashMap<Option<String>, usize> = HashMap::new();
    for track in &projected {
        *album_counts.entry(track.album_id.clone()).or_default() += 1;
        *artist_counts.entry(track.artist_id.clone()).or_default() += 1;
    }

    projected
        .into_iter()
        .map(|mut track| {
            track.album_count = album_counts[&track.album_id];
            track.artist_count = artist_counts[&track.artist_id];
            track
        })
        .collect()
}

/// Reads the fields we need, only the first artist counts.
fn project(entry: &RawTrackEntry) -> Option<DistilledTrack> {
    let track = entry.track.as_ref()?;
    let uri = track.uri.clone().filter(|uri| !uri.is_empty())?;
    let album = track.album.as_ref();
    let artist = track.artists.as_ref().and_then(|artists| artists.first());

    Some(DistilledTrack {
        uri,
        name: track.name.clone().unwrap_or_default(),
        album_name: album.and_then(|a| a.name.clone()).unwrap_or_default(),
        artist_name: artist.and_then(|a| a.name.clone()).unwrap_or_default(),
        album_id: album.and_then(|a| a.id.clone()),
        artist_id: artist.and_then(|a| a.id.clone()),
        album_count: 0,
        artist_count: 0,
    })
}
