use super::state::StateStore;
use crate::{Res, info, spotify::SpotifyApi, success};

/// Store key holding the scratch playlist ID.
pub const PLAYLIST_KEY: &str = "playlist_id";

const PLAYLISTS_PAGE_LIMIT: u32 = 50;

/// Returns the ID of the scratch playlist, finding or creating it on first use.
///
/// A stored ID is trusted without asking Spotify. Otherwise the user's
/// playlists are searched for `name` (first match wins) and, failing that, a
/// private playlist is created. The ID is stored either way. The store stays
/// locked for the whole lookup so a concurrent run cannot create a second
/// playlist.
pub async fn resolve_scratch_playlist<A: SpotifyApi + ?Sized>(
    api: &A,
    store: &StateStore,
    user_id: &str,
    name: &str,
) -> Res<String> {
    let mut guard = store.lock().await?;

    if let Some(id) = guard.get::<String>(PLAYLIST_KEY).filter(|id| !id.is_empty()) {
        return Ok(id);
    }

    let id = match find_playlist_by_name(api, name).await? {
        Some(id) => {
            info!("Reusing existing playlist {}", name);
            id
        }
        None => {
            let id = api.create_playlist(user_id, name, false).await?;
            success!("Created private playlist {}", name);
            id
        }
    };

    guard.set(PLAYLIST_KEY, &id)?;
    guard.commit().await?;

    Ok(id)
}

/// Pages through the current user's playlists looking for an exact name match.
pub async fn find_playlist_by_name<A: SpotifyApi + ?Sized>(
    api: &A,
    name: &str,
) -> Res<Option<String>> {
    let mut offset = 0;

    loop {
        let page = api.user_playlists(offset, PLAYLISTS_PAGE_LIMIT).await?;

        if let Some(playlist) = page.items.iter().find(|p| p.name == name) {
            return Ok(Some(playlist.id.clone()));
        }

        if !page.has_next() || page.items.is_empty() {
            return Ok(None);
        }
        offset += page.items.len() as u32;
    }
}
