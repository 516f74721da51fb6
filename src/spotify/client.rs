use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use super::SpotifyApi;
use crate::{
    config,
    error::ApiError,
    types::{
        AddTracksRequest, CreatePlaylistRequest, Device, DevicesResponse, Page, Playlist,
        PlaylistItem, RemoveTracksRequest, SearchResponse, StartPlaybackRequest, Track, TrackUri,
        User,
    },
    warning,
};

/// Upper bound for a single request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_GET_RETRIES: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const PLAYLIST_ITEM_FIELDS: &str = "items(track(id,uri,name)),next,total";
const PLAYLIST_DESCRIPTION: &str = "Scratch playlist managed by spotplay. Contents are replaced on every run.";

/// HTTP implementation of [`SpotifyApi`] bound to one access token.
///
/// GET requests are retried up to five times on timeouts, connection errors,
/// 429 and 500/502/503/504, waiting `backoff * 2^n` (or the `Retry-After`
/// value for 429 when it is at most two minutes). Mutating requests are sent
/// once and any failure is returned as is.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
    get_backoff: Duration,
}

impl SpotifyClient {
    /// Client for the configured API base URL.
    pub fn new(access_token: &str) -> Result<Self, ApiError> {
        Self::with_api_url(&config::spotify_apiurl(), access_token)
    }

    pub fn with_api_url(api_url: &str, access_token: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
            access_token: access_token.to_string(),
            get_backoff: Duration::from_secs(1),
        })
    }

    /// Overrides the base delay between GET retries.
    pub fn with_get_backoff(mut self, backoff: Duration) -> Self {
        self.get_backoff = backoff;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| ApiError::Transport(format!("invalid API URL {}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid API URL {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let mut retries = 0;

        loop {
            let result = self
                .http
                .get(url.clone())
                .query(query)
                .bearer_auth(&self.access_token)
                .send()
                .await;

            match check(result).await {
                Ok(response) => return response.json::<T>().await.map_err(ApiError::from),
                Err(err) if err.is_transient() && retries < MAX_GET_RETRIES => {
                    let delay = match &err {
                        ApiError::RateLimited {
                            retry_after: Some(secs),
                        } if *secs > MAX_RETRY_AFTER_SECS => {
                            warning!(
                                "Spotify asks to wait {} seconds before retrying. Giving up on {}.",
                                secs,
                                url.path()
                            );
                            return Err(err);
                        }
                        ApiError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs),
                        _ => self.get_backoff * 2u32.pow(retries),
                    };
                    retries += 1;
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        check(request.bearer_auth(&self.access_token).send().await).await
    }
}

async fn check(result: Result<Response, reqwest::Error>) -> Result<Response, ApiError> {
    let response = result?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    Err(ApiError::from_status(status, retry_after, &body))
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, ApiError> {
        let user: User = self.get(&["me"], &[]).await?;
        Ok(user.id)
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        let res: DevicesResponse = self.get(&["me", "player", "devices"], &[]).await?;
        Ok(res.devices)
    }

    async fn user_playlists(&self, offset: u32, limit: u32) -> Result<Page<Playlist>, ApiError> {
        self.get(
            &["me", "playlists"],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(&["users", user_id, "playlists"])?;
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public,
        };

        let response = self.send(self.http.post(url).json(&body)).await?;
        let playlist = response.json::<Playlist>().await?;
        Ok(playlist.id)
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        self.get(
            &["playlists", playlist_id, "tracks"],
            &[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("fields", PLAYLIST_ITEM_FIELDS.to_string()),
            ],
        )
        .await
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Track>, ApiError> {
        self.get(
            &["albums", album_id, "tracks"],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn search_tracks(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let res: SearchResponse = self
            .get(
                &["search"],
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(res.tracks.map(|page| page.items).unwrap_or_default())
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        let body = AddTracksRequest {
            uris: uris.to_vec(),
        };

        self.send(self.http.post(url).json(&body)).await?;
        Ok(())
    }

    async fn remove_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        let body = RemoveTracksRequest {
            tracks: uris.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
        };

        self.send(self.http.delete(url).json(&body)).await?;
        Ok(())
    }

    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["me", "player", "play"])?;
        let body = StartPlaybackRequest {
            context_uri: context_uri.to_string(),
        };

        self.send(
            self.http
                .put(url)
                .query(&[("device_id", device_id)])
                .json(&body),
        )
        .await?;
        Ok(())
    }
}
