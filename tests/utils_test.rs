use spotplay::types::InputToken;
use spotplay::utils::*;

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_classify_track_uri() {
    assert_eq!(
        classify_input("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
        InputToken::Track("spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string())
    );
}

#[test]
fn test_classify_playlist_and_album_uris() {
    assert_eq!(
        classify_input("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M"),
        InputToken::Playlist("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );
    assert_eq!(
        classify_input("spotify:album:1DFixLWuPkv3KT3TnV35m3"),
        InputToken::Album("1DFixLWuPkv3KT3TnV35m3".to_string())
    );
}

#[test]
fn test_classify_links() {
    assert_eq!(
        classify_input("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123"),
        InputToken::Track("spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string())
    );
    assert_eq!(
        classify_input("https://open.spotify.com/intl-de/album/1DFixLWuPkv3KT3TnV35m3"),
        InputToken::Album("1DFixLWuPkv3KT3TnV35m3".to_string())
    );
    assert_eq!(
        classify_input("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M"),
        InputToken::Playlist("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );
}

#[test]
fn test_classify_artist_names() {
    assert_eq!(
        classify_input("Daft Punk"),
        InputToken::Artist("Daft Punk".to_string())
    );
    assert_eq!(
        classify_input("  Radiohead "),
        InputToken::Artist("Radiohead".to_string())
    );
}

#[test]
fn test_classify_unsupported_references_as_artist() {
    // Kinds other than track, playlist and album are not resolved.
    assert_eq!(
        classify_input("spotify:artist:0TnOYISbd1XYRBk9myaseg"),
        InputToken::Artist("spotify:artist:0TnOYISbd1XYRBk9myaseg".to_string())
    );
    assert_eq!(
        classify_input("spotify:track:"),
        InputToken::Artist("spotify:track:".to_string())
    );
    assert_eq!(
        classify_input("https://example.com/track/4uLU6hMCjMI75M1A2tKUQC"),
        InputToken::Artist("https://example.com/track/4uLU6hMCjMI75M1A2tKUQC".to_string())
    );
}

#[test]
fn test_code_from_redirect() {
    assert_eq!(code_from_redirect("AQBx123"), Some("AQBx123".to_string()));
    assert_eq!(
        code_from_redirect("https://example.com/callback?code=AQBx123&state=xyz"),
        Some("AQBx123".to_string())
    );
    assert_eq!(
        code_from_redirect("  https://example.com/callback?code=AQBx123\n"),
        Some("AQBx123".to_string())
    );
}

#[test]
fn test_code_from_redirect_without_code() {
    assert_eq!(code_from_redirect(""), None);
    assert_eq!(code_from_redirect("   "), None);
    assert_eq!(
        code_from_redirect("https://example.com/callback?error=access_denied"),
        None
    );
}

#[test]
fn test_is_loopback_redirect() {
    assert!(is_loopback_redirect("http://127.0.0.1:8888/callback"));
    assert!(is_loopback_redirect("http://localhost:8888/callback"));
    assert!(is_loopback_redirect("http://[::1]:8888/callback"));
    assert!(!is_loopback_redirect("https://example.com/callback"));
    assert!(!is_loopback_redirect("not a url"));
}
