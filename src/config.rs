//! Configuration management for spotplay.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Credentials must come from the environment; the
//! Spotify endpoints, the OAuth redirect and scope, and the batch policy are
//! compiled in and may be overridden.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the spotplay config directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::management::BatchPolicy;

/// Name of the playlist that is cleared and refilled on every run.
pub const SCRATCH_PLAYLIST_NAME: &str = "SpotplayList";

/// Permissions requested during authorization.
pub const SPOTIFY_SCOPE: &str = "playlist-modify-public playlist-modify-private user-modify-playback-state user-read-playback-state";

/// Redirect endpoint registered for the spotplay application.
pub const SPOTIFY_REDIRECT_URI: &str =
    "https://asia-east2-spotify-cli-283006.cloudfunctions.net/auth-redirect";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Returns the spotplay configuration directory.
///
/// - Linux: `~/.config/spotplay`
/// - macOS: `~/Library/Application Support/spotplay`
/// - Windows: `%APPDATA%/spotplay`
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotplay");
    path
}

/// Loads environment variables from the `.env` file in the config directory.
///
/// Creates the config directory if it doesn't exist. A missing `.env` file is
/// not an error, since the credentials may already be exported in the shell;
/// a malformed one is.
///
/// # Example
///
/// ```
/// use spotplay::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let dir = config_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Returns the Spotify client ID from `SPOTIFY_CLIENT_ID`.
pub fn spotify_client_id() -> Result<String, String> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify client secret from `SPOTIFY_CLIENT_SECRET`.
///
/// The secret authenticates the token requests and must never be logged.
pub fn spotify_client_secret() -> Result<String, String> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI, `SPOTPLAY_REDIRECT_URI` or the compiled-in endpoint.
///
/// Pointing it at a loopback address (e.g. `http://127.0.0.1:8888/callback`)
/// makes the login flow catch the callback itself instead of asking for the
/// code to be pasted.
pub fn spotify_redirect_uri() -> String {
    optional("SPOTPLAY_REDIRECT_URI").unwrap_or_else(|| SPOTIFY_REDIRECT_URI.to_string())
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Builds the batch policy used for playlist clear and insert calls.
///
/// Starts from [`BatchPolicy::default`] and applies these overrides when set
/// to a valid number:
///
/// - `SPOTPLAY_RETRY_ATTEMPTS` - attempts per batch
/// - `SPOTPLAY_TIMEOUT_DELAY_MS` - wait after a timed out batch
/// - `SPOTPLAY_RATE_LIMIT_DELAY_MS` - wait after a rate limited batch
pub fn batch_policy() -> BatchPolicy {
    let mut policy = BatchPolicy::default();

    if let Some(attempts) = parsed::<u32>("SPOTPLAY_RETRY_ATTEMPTS") {
        policy.max_attempts = attempts.max(1);
    }
    if let Some(ms) = parsed::<u64>("SPOTPLAY_TIMEOUT_DELAY_MS") {
        policy.timeout_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = parsed::<u64>("SPOTPLAY_RATE_LIMIT_DELAY_MS") {
        policy.rate_limit_delay = Duration::from_millis(ms);
    }

    policy
}

fn required(key: &str) -> Result<String, String> {
    optional(key).ok_or_else(|| {
        format!(
            "{} must be set (environment or {})",
            key,
            config_dir().join(".env").display()
        )
    })
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    optional(key).and_then(|v| v.parse().ok())
}
