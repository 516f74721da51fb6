use chrono::Utc;

use super::state::{StoreError, StoreGuard};
use crate::{
    error::ApiError,
    spotify::auth::{self, Credentials},
    types::Token,
};

/// Store key holding the cached [`Token`].
pub const TOKEN_KEY: &str = "token";

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    credentials: Credentials,
    token_url: String,
}

impl TokenManager {
    pub fn new(token: Token, credentials: Credentials, token_url: &str) -> Self {
        TokenManager {
            token,
            credentials,
            token_url: token_url.to_string(),
        }
    }

    /// Manager for the token cached in the store, if there is one.
    pub fn load(guard: &StoreGuard, credentials: Credentials, token_url: &str) -> Option<Self> {
        guard
            .get::<Token>(TOKEN_KEY)
            .filter(|token| !token.refresh_token.is_empty())
            .map(|token| Self::new(token, credentials, token_url))
    }

    pub fn persist(&self, guard: &mut StoreGuard) -> Result<(), StoreError> {
        guard.set(TOKEN_KEY, &self.token)
    }

    /// Returns an access token that is valid for at least four more minutes,
    /// refreshing it first when needed. Returns whether a refresh happened, so
    /// the caller knows the store has to be written back.
    pub async fn get_valid_token(&mut self) -> Result<(String, bool), ApiError> {
        let mut refreshed = false;
        if self.is_expired() {
            self.token =
                auth::refresh_token(&self.token_url, &self.credentials, &self.token.refresh_token)
                    .await?;
            refreshed = true;
        }

        Ok((self.token.access_token.clone(), refreshed))
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
