//! # Spotify Integration Module
//!
//! This module is the integration layer between spotplay and the Spotify Web API.
//! Everything above it talks to Spotify through the [`SpotifyApi`] trait, which
//! lists exactly the endpoints the tool needs; [`SpotifyClient`] implements it
//! over HTTP with `reqwest`.
//!
//! ## Architecture
//!
//! ```text
//! CLI (play, list devices, login)
//!          ↓
//! Management (device selection, collection, resync, retry)
//!          ↓
//! SpotifyApi trait  ←  SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization URL, code exchange and token refresh against the
//!   accounts service. These calls use the client credentials rather than an
//!   access token and therefore live outside the trait.
//! - [`client`] - [`SpotifyClient`], the HTTP implementation of [`SpotifyApi`].
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`], whose [`ApiError::kind`] tells callers
//! whether they are looking at a timeout, a rate limit, a missing resource or
//! something else. Idempotent GET requests are retried inside the client on
//! transient failures; mutating calls are returned to the caller untouched so
//! the batch retry policy in [`crate::management::retry`] stays in charge.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user
//! - `GET /me/player/devices` - playback devices
//! - `PUT /me/player/play` - start playback
//! - `GET /me/playlists` - the user's playlists
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `GET|POST|DELETE /playlists/{playlist_id}/tracks` - list, add, remove items
//! - `GET /albums/{album_id}/tracks` - album tracks
//! - `GET /search` - track search
//! - `POST /api/token` - token exchange and refresh

pub mod auth;
pub mod client;

use async_trait::async_trait;

pub use client::SpotifyClient;

use crate::{
    error::ApiError,
    types::{Device, Page, Playlist, PlaylistItem, Track},
};

/// The Spotify endpoints spotplay relies on.
///
/// Offsets and limits are passed through to Spotify unchanged; callers are
/// responsible for paging.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// ID of the user the access token belongs to.
    async fn current_user_id(&self) -> Result<String, ApiError>;

    /// Devices currently available for playback.
    async fn devices(&self) -> Result<Vec<Device>, ApiError>;

    /// One page of the current user's playlists.
    async fn user_playlists(&self, offset: u32, limit: u32) -> Result<Page<Playlist>, ApiError>;

    /// Creates a playlist owned by `user_id` and returns its ID.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, ApiError>;

    /// One page of the items of a playlist.
    async fn playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>, ApiError>;

    /// One page of the tracks of an album.
    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Track>, ApiError>;

    /// Track search; `query` uses Spotify's field filter syntax.
    async fn search_tracks(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError>;

    /// Appends up to 100 URIs to a playlist.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError>;

    /// Removes every occurrence of up to 100 URIs from a playlist.
    async fn remove_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError>;

    /// Starts playing `context_uri` on the given device.
    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ApiError>;
}
