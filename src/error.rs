use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of an [`ApiError`].
///
/// Retry decisions are made on this value only; the message text of an error
/// is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request did not complete within the client timeout.
    Timeout,
    /// Spotify answered 429 Too Many Requests.
    RateLimited,
    /// The referenced resource does not exist or is not visible to the user.
    NotFound,
    /// The access token was rejected.
    Unauthorized,
    /// Any other 4xx answer.
    Client,
    /// A 5xx answer.
    Server,
    /// Connection level failure (DNS, TLS, reset).
    Transport,
    /// The response body did not have the expected shape.
    Decode,
}

/// Errors returned by the Spotify Web API layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited by Spotify (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("Spotify API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-success HTTP status.
    ///
    /// `body` is the raw response body; Spotify wraps errors as
    /// `{"error": {"status": 404, "message": "..."}}` and the inner message is
    /// used when present.
    pub fn from_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return ApiError::RateLimited { retry_after };
        }

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json["error"]["message"]
                    .as_str()
                    .or_else(|| json["error_description"].as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::RateLimited { .. } => ErrorKind::RateLimited,
            ApiError::Status { status, .. } => match *status {
                404 => ErrorKind::NotFound,
                401 => ErrorKind::Unauthorized,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::Server,
                _ => ErrorKind::Client,
            },
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether an idempotent request failing this way is worth sending again.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => matches!(
                self.kind(),
                ErrorKind::Timeout | ErrorKind::RateLimited | ErrorKind::Transport
            ),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status, None, "")
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
