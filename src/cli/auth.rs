use std::{io::Write, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Mutex,
};

use crate::{
    Res, config,
    error::ErrorKind,
    info,
    management::{StateStore, TokenManager},
    server::start_callback_server,
    spotify::{
        SpotifyClient,
        auth::{self, Credentials},
    },
    success,
    types::{PendingAuth, Token},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Returns a client authorized with a valid access token.
///
/// Uses the cached token (refreshing it when it is about to expire) and falls
/// back to the interactive login when nothing is cached or Spotify rejects the
/// refresh token. Token changes are written back to the store.
pub async fn authorized_client(store: &StateStore) -> Res<SpotifyClient> {
    let credentials = Credentials::new(config::spotify_client_id()?, config::spotify_client_secret()?);
    let token_url = config::spotify_apitoken_url();

    let mut guard = store.lock().await?;
    let access_token = match TokenManager::load(&guard, credentials.clone(), &token_url) {
        Some(mut manager) => match manager.get_valid_token().await {
            Ok((access_token, refreshed)) => {
                if refreshed {
                    manager.persist(&mut guard)?;
                    guard.commit().await?;
                }
                access_token
            }
            Err(e) if matches!(e.kind(), ErrorKind::Client | ErrorKind::Unauthorized) => {
                warning!("Stored login is no longer valid ({}). Please log in again.", e);
                drop(guard);
                login_and_store(store, credentials, &token_url).await?
            }
            Err(e) => return Err(e.into()),
        },
        None => {
            drop(guard);
            login_and_store(store, credentials, &token_url).await?
        }
    };

    Ok(SpotifyClient::new(&access_token)?)
}

async fn login_and_store(
    store: &StateStore,
    credentials: Credentials,
    token_url: &str,
) -> Res<String> {
    let token = login(&credentials).await?;
    let access_token = token.access_token.clone();

    let mut guard = store.lock().await?;
    TokenManager::new(token, credentials, token_url).persist(&mut guard)?;
    guard.commit().await?;

    Ok(access_token)
}

/// Runs the OAuth authorization-code flow and returns the new token.
///
/// With a loopback redirect URI the callback is caught by a temporary local
/// server; otherwise the user logs in (possibly on another device) and pastes
/// the code or the redirected URL.
pub async fn login(credentials: &Credentials) -> Res<Token> {
    let redirect_uri = config::spotify_redirect_uri();
    let state = utils::generate_state();
    let auth_url = auth::authorize_url(
        &config::spotify_apiauth_url(),
        &credentials.client_id,
        &redirect_uri,
        config::SPOTIFY_SCOPE,
        &state,
    )?;

    let code = if utils::is_loopback_redirect(&redirect_uri) {
        code_from_callback(&redirect_uri, &auth_url, state).await?
    } else {
        code_from_prompt(&auth_url).await?
    };

    let token = auth::exchange_code(
        &config::spotify_apitoken_url(),
        credentials,
        &code,
        &redirect_uri,
    )
    .await?;

    success!("Authentication successful!");
    Ok(token)
}

async fn code_from_callback(redirect_uri: &str, auth_url: &str, state: String) -> Res<String> {
    let shared_state = Arc::new(Mutex::new(Some(PendingAuth { state, code: None })));
    let server = start_callback_server(redirect_uri, Arc::clone(&shared_state)).await?;

    if webbrowser::open(auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let code = wait_for_code(shared_state).await;
    server.abort();

    code.ok_or_else(|| "Authentication failed or timed out.".into())
}

async fn wait_for_code(shared_state: Arc<Mutex<Option<PendingAuth>>>) -> Option<String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(code) = lock.as_ref().and_then(|pending| pending.code.clone()) {
            return Some(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

async fn code_from_prompt(auth_url: &str) -> Res<String> {
    info!("Open the following URL, log in and paste the code (or the whole redirected URL):");
    println!("{}", auth_url);
    let _ = webbrowser::open(auth_url);

    print!("Authorization code: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;

    utils::code_from_redirect(&line).ok_or_else(|| "No authorization code entered.".into())
}
