use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::client::REQUEST_TIMEOUT;
use crate::{error::ApiError, types::Token};

/// Application credentials sent with every token request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn basic_auth_header(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Builds the URL the user opens to grant spotplay access.
///
/// `show_dialog=true` makes Spotify ask again even when the app is already
/// authorized, so a different account can be chosen.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<String, ApiError> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| ApiError::Transport(format!("invalid authorization URL {}: {}", auth_url, e)))?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for an access and refresh token.
pub async fn exchange_code(
    token_url: &str,
    credentials: &Credentials,
    code: &str,
    redirect_uri: &str,
) -> Result<Token, ApiError> {
    let response = request_token(
        token_url,
        credentials,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ],
    )
    .await?;

    Ok(response.into_token(None))
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when the response carries
/// none, the one passed in is kept.
pub async fn refresh_token(
    token_url: &str,
    credentials: &Credentials,
    refresh_token: &str,
) -> Result<Token, ApiError> {
    let response = request_token(
        token_url,
        credentials,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await?;

    Ok(response.into_token(Some(refresh_token)))
}

async fn request_token(
    token_url: &str,
    credentials: &Credentials,
    form: &[(&str, &str)],
) -> Result<TokenResponse, ApiError> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let response = client
        .post(token_url)
        .header(reqwest::header::AUTHORIZATION, credentials.basic_auth_header())
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, None, &body));
    }

    Ok(response.json::<TokenResponse>().await?)
}
