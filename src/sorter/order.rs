use crate::types::DistilledTrack;

/// Clears grouping keys of trivially small groups.
///
/// A lone album by a recurring artist loses its album id so the track groups by
/// artist; a lone artist loses both ids. The album check runs first.
pub fn suppress(tracks: &mut [DistilledTrack]) {
    for track in tracks.iter_mut() {
        if track.album_count == 1 && track.artist_count != 1 {
            track.album_id = None;
        } else if track.artist_count == 1 {
            track.album_id = None;
            track.artist_id = None;
        }
    }
}

/// Suppresses trivial groups, then orders the tracks.
///
/// Four stable sorts run in sequence; `None` ids order first in every pass:
/// 1. album id, then the whole sequence is reversed
/// 2. album count
/// 3. artist id
/// 4. artist count, then the whole sequence is reversed
pub fn order(mut tracks: Vec<DistilledTrack>) -> Vec<DistilledTrack> {
    suppress(&mut tracks);

    // `sort_by` is stable, later passes keep ties in the order of earlier ones
    tracks.sort_by(|a, b| a.album_id.cmp(&b.album_id));
    tracks.reverse();
    tracks.sort_by(|a, b| a.album_count.cmp(&b.album_count));
    tracks.sort_by(|a, b| a.artist_id.cmp(&b.artist_id));
    tracks.sort_by(|a, b| a.artist_count.cmp(&b.artist_count));
    tracks.reverse();

    tracks
}

/// Final track order as URIs, the only thing publishing needs.
pub fn sort(tracks: Vec<DistilledTrack>) -> Vec<String> {
    order(tracks).into_iter().map(|track| track.uri).collect()
}
