use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;

use crate::types::InputToken;

/// Random value sent as the OAuth `state` parameter and checked on callback.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Classifies a command-line input.
///
/// Recognises `spotify:{track|playlist|album}:<id>` URIs and
/// `https://open.spotify.com/{track|playlist|album}/<id>` links (query string
/// and `intl-xx` locale segment ignored). Everything else is an artist query.
pub fn classify_input(input: &str) -> InputToken {
    let trimmed = input.trim();

    if let Some((kind, id)) = parse_uri(trimmed).or_else(|| parse_link(trimmed)) {
        match kind {
            "track" => return InputToken::Track(format!("spotify:track:{}", id)),
            "playlist" => return InputToken::Playlist(id),
            "album" => return InputToken::Album(id),
            _ => {}
        }
    }

    InputToken::Artist(trimmed.to_string())
}

fn parse_uri(input: &str) -> Option<(&str, String)> {
    let rest = input.strip_prefix("spotify:")?;
    let (kind, id) = rest.split_once(':')?;
    if is_id(id) {
        Some((kind, id.to_string()))
    } else {
        None
    }
}

fn parse_link(input: &str) -> Option<(&'static str, String)> {
    let url = Url::parse(input).ok()?;
    if url.host_str() != Some("open.spotify.com") {
        return None;
    }

    let segments: Vec<&str> = url
        .path_segments()?
        .filter(|s| !s.is_empty() && !s.starts_with("intl-"))
        .collect();

    match segments.as_slice() {
        [kind, id] if is_id(id) => {
            let kind = match *kind {
                "track" => "track",
                "playlist" => "playlist",
                "album" => "album",
                _ => return None,
            };
            Some((kind, id.to_string()))
        }
        _ => None,
    }
}

fn is_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Extracts the authorization code from what the user pasted after login.
///
/// Accepts either the bare code or the full redirected URL (`...?code=...`).
/// Returns `None` for empty input or a URL without a `code` parameter.
pub fn code_from_redirect(pasted: &str) -> Option<String> {
    let pasted = pasted.trim();
    if pasted.is_empty() {
        return None;
    }

    match Url::parse(pasted) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty()),
        Err(_) => Some(pasted.to_string()),
    }
}

/// Whether the redirect URI points at this machine, in which case the login
/// flow can receive the callback itself.
pub fn is_loopback_redirect(redirect_uri: &str) -> bool {
    Url::parse(redirect_uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .map(|host| matches!(host.as_str(), "127.0.0.1" | "localhost" | "[::1]"))
        .unwrap_or(false)
}
