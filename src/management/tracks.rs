use std::future::Future;

use crate::{
    error::ApiError,
    info,
    spotify::SpotifyApi,
    types::{InputToken, Page},
    utils, warning,
};

/// Most tracks taken from one artist search.
pub const MAX_ARTIST_TRACKS: usize = 100;

/// Largest page Spotify serves for track search.
pub const SEARCH_PAGE_LIMIT: usize = 50;

/// Page size for playlist item listings.
pub const ITEMS_PAGE_LIMIT: u32 = 100;

/// Largest page Spotify serves for album track listings.
pub const ALBUM_PAGE_LIMIT: u32 = 50;

const LOCAL_TRACK_PREFIX: &str = "spotify:local:";

/// Resolves every input into track URIs, keeping input order.
///
/// Track references are taken as they are, playlists and albums are listed in
/// full, anything else is searched as an artist name. A playlist or album that
/// cannot be found contributes nothing; other errors abort the collection.
pub async fn collect_tracks<A: SpotifyApi + ?Sized>(
    api: &A,
    inputs: &[String],
) -> Result<Vec<String>, ApiError> {
    let mut all_tracks = Vec::new();

    for input in inputs {
        match utils::classify_input(input) {
            InputToken::Track(uri) => {
                info!("Adding track {}", uri);
                all_tracks.push(uri);
            }
            InputToken::Playlist(id) => {
                info!("Fetching tracks of playlist {}", id);
                let tracks = not_found_as_empty(input, playlist_tracks(api, &id).await)?;
                all_tracks.extend(tracks);
            }
            InputToken::Album(id) => {
                info!("Fetching tracks of album {}", id);
                let tracks = not_found_as_empty(input, album_tracks(api, &id).await)?;
                all_tracks.extend(tracks);
            }
            InputToken::Artist(name) => {
                info!("Searching tracks by artist {}", name);
                let tracks = search_artist_tracks(api, &name, MAX_ARTIST_TRACKS).await?;
                if tracks.is_empty() {
                    warning!("No tracks found for artist {}", name);
                }
                all_tracks.extend(tracks);
            }
        }
    }

    Ok(all_tracks)
}

fn not_found_as_empty(
    input: &str,
    result: Result<Vec<String>, ApiError>,
) -> Result<Vec<String>, ApiError> {
    match result {
        Err(e) if e.is_not_found() => {
            warning!("Not accessible, skipping: {}", input);
            Ok(Vec::new())
        }
        other => other,
    }
}

/// All track URIs of a playlist, in playlist order.
///
/// Removed tracks are skipped, and so are local files: Spotify refuses to add
/// `spotify:local:` URIs to another playlist.
pub async fn playlist_tracks<A: SpotifyApi + ?Sized>(
    api: &A,
    playlist_id: &str,
) -> Result<Vec<String>, ApiError> {
    let items = fetch_all(|offset| api.playlist_items(playlist_id, offset, ITEMS_PAGE_LIMIT)).await?;

    let (local, uris): (Vec<String>, Vec<String>) = items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| track.uri)
        .partition(|uri| uri.starts_with(LOCAL_TRACK_PREFIX));

    if !local.is_empty() {
        warning!(
            "Skipping {} local file(s) in playlist {}",
            local.len(),
            playlist_id
        );
    }

    Ok(uris)
}

/// All track URIs of an album, in album order.
pub async fn album_tracks<A: SpotifyApi + ?Sized>(
    api: &A,
    album_id: &str,
) -> Result<Vec<String>, ApiError> {
    let tracks = fetch_all(|offset| api.album_tracks(album_id, offset, ALBUM_PAGE_LIMIT)).await?;

    Ok(tracks.into_iter().map(|track| track.uri).collect())
}

/// Up to `max_tracks` URIs from a track search on the artist field.
///
/// Stops early once a page comes back short, since that is the last page.
pub async fn search_artist_tracks<A: SpotifyApi + ?Sized>(
    api: &A,
    artist_name: &str,
    max_tracks: usize,
) -> Result<Vec<String>, ApiError> {
    let query = format!("artist:{}", artist_name);
    let mut tracks = Vec::new();
    let mut offset = 0;

    while tracks.len() < max_tracks {
        let batch_size = SEARCH_PAGE_LIMIT.min(max_tracks - tracks.len());
        let items = api
            .search_tracks(&query, offset as u32, batch_size as u32)
            .await?;
        if items.is_empty() {
            break;
        }

        let received = items.len();
        tracks.extend(items.into_iter().take(batch_size).map(|track| track.uri));

        if received < batch_size {
            break;
        }
        offset += batch_size;
    }

    Ok(tracks)
}

/// Follows offset pagination until a page reports no successor.
async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let received = page.items.len() as u32;
        let has_next = page.has_next();
        all.extend(page.items);

        if !has_next || received == 0 {
            break;
        }
        offset += received;
    }

    Ok(all)
}
