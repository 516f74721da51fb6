#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use spotplay::{
    error::ApiError,
    management::BatchPolicy,
    spotify::SpotifyApi,
    types::{Device, Page, Playlist, PlaylistItem, Track},
};

/// In-memory Spotify account used by the integration tests.
#[derive(Default)]
pub struct FakeState {
    pub user_id: String,
    pub devices: Vec<Device>,
    pub user_playlists: Vec<Playlist>,
    /// Playlist contents; `None` is a track removed from the catalogue.
    pub playlists: HashMap<String, Vec<Option<String>>>,
    pub albums: HashMap<String, Vec<String>>,
    /// Search results keyed by the full query string.
    pub search_results: HashMap<String, Vec<String>>,
    /// Playlists whose listing fails with a server error.
    pub broken_playlists: HashSet<String>,
    /// Errors returned by the next add calls, in order.
    pub add_failures: VecDeque<ApiError>,
    /// Errors returned by the next remove calls, in order.
    pub remove_failures: VecDeque<ApiError>,
    /// Every remove call fails with this status when set.
    pub remove_always_fails: Option<u16>,
    pub add_calls: usize,
    pub remove_calls: usize,
    pub user_playlist_calls: usize,
    pub search_calls: Vec<(String, u32, u32)>,
    pub created: Vec<String>,
    pub playback: Option<(String, String)>,
}

#[derive(Default)]
pub struct FakeSpotify {
    pub state: Mutex<FakeState>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.with(|s| s.user_id = "fake_user".to_string());
        fake
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn playlist(&self, id: &str) -> Vec<Option<String>> {
        self.with(|s| s.playlists.get(id).cloned().unwrap_or_default())
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Resource not found".to_string(),
    }
}

/// Spotify answers 400 when a listing is asked for more than its maximum page.
fn check_limit(limit: u32, max: u32) -> Result<(), ApiError> {
    if (1..=max).contains(&limit) {
        Ok(())
    } else {
        Err(ApiError::Status {
            status: 400,
            message: "Invalid limit".to_string(),
        })
    }
}

fn page<T: Clone>(all: &[T], offset: u32, limit: u32) -> Page<T> {
    let start = (offset as usize).min(all.len());
    let end = (start + limit as usize).min(all.len());
    Page {
        items: all[start..end].to_vec(),
        next: if end < all.len() {
            Some(format!("next?offset={}", end))
        } else {
            None
        },
        total: Some(all.len() as u32),
    }
}

fn track(uri: &str) -> Track {
    Track {
        id: uri.rsplit(':').next().map(str::to_string),
        uri: uri.to_string(),
        name: None,
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        Ok(self.with(|s| s.user_id.clone()))
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        Ok(self.with(|s| s.devices.clone()))
    }

    async fn user_playlists(&self, offset: u32, limit: u32) -> Result<Page<Playlist>, ApiError> {
        check_limit(limit, 50)?;
        Ok(self.with(|s| {
            s.user_playlist_calls += 1;
            page(&s.user_playlists, offset, limit)
        }))
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, ApiError> {
        Ok(self.with(|s| {
            let id = format!("created{}", s.created.len() + 1);
            s.created.push(name.to_string());
            s.user_playlists.push(Playlist {
                id: id.clone(),
                name: name.to_string(),
                public: Some(public),
            });
            s.playlists.insert(id.clone(), Vec::new());
            id
        }))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        check_limit(limit, 100)?;
        self.with(|s| {
            if s.broken_playlists.contains(playlist_id) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "Server error".to_string(),
                });
            }
            let items: Vec<PlaylistItem> = s
                .playlists
                .get(playlist_id)
                .ok_or_else(not_found)?
                .iter()
                .map(|slot| PlaylistItem {
                    track: slot.as_deref().map(track),
                })
                .collect();
            Ok(page(&items, offset, limit))
        })
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Track>, ApiError> {
        check_limit(limit, 50)?;
        self.with(|s| {
            let tracks: Vec<Track> = s
                .albums
                .get(album_id)
                .ok_or_else(not_found)?
                .iter()
                .map(|uri| track(uri))
                .collect();
            Ok(page(&tracks, offset, limit))
        })
    }

    async fn search_tracks(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        check_limit(limit, 50)?;
        Ok(self.with(|s| {
            s.search_calls.push((query.to_string(), offset, limit));
            let results: Vec<Track> = s
                .search_results
                .get(query)
                .map(|uris| uris.iter().map(|uri| track(uri)).collect())
                .unwrap_or_default();
            page(&results, offset, limit).items
        }))
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        self.with(|s| {
            s.add_calls += 1;
            if let Some(error) = s.add_failures.pop_front() {
                return Err(error);
            }
            if uris.len() > 100 || uris.iter().any(|uri| uri.starts_with("spotify:local:")) {
                return Err(ApiError::Status {
                    status: 400,
                    message: "Invalid track uri".to_string(),
                });
            }
            s.playlists
                .get_mut(playlist_id)
                .ok_or_else(not_found)?
                .extend(uris.iter().cloned().map(Some));
            Ok(())
        })
    }

    async fn remove_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        self.with(|s| {
            s.remove_calls += 1;
            if let Some(status) = s.remove_always_fails {
                return Err(ApiError::Status {
                    status,
                    message: "Cannot remove".to_string(),
                });
            }
            if let Some(error) = s.remove_failures.pop_front() {
                return Err(error);
            }
            s.playlists
                .get_mut(playlist_id)
                .ok_or_else(not_found)?
                .retain(|slot| slot.as_ref().is_none_or(|uri| !uris.contains(uri)));
            Ok(())
        })
    }

    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ApiError> {
        self.with(|s| s.playback = Some((device_id.to_string(), context_uri.to_string())));
        Ok(())
    }
}

pub fn device(id: &str, name: &str, is_active: bool, is_restricted: bool) -> Device {
    Device {
        id: Some(id.to_string()),
        name: name.to_string(),
        kind: "Computer".to_string(),
        is_active,
        is_restricted,
        volume_percent: Some(50),
    }
}

/// `count` distinct track URIs starting with `prefix`.
pub fn uris(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spotify:track:{}{:04}", prefix, i))
        .collect()
}

/// Batch policy without any waiting.
pub fn fast_policy() -> BatchPolicy {
    BatchPolicy {
        timeout_delay: Duration::ZERO,
        rate_limit_delay: Duration::ZERO,
        add_pause: Duration::ZERO,
        remove_pause: Duration::ZERO,
        ..BatchPolicy::default()
    }
}
