use std::{future::Future, time::Duration};

use tokio::time::sleep;

use crate::{
    error::{ApiError, ErrorKind},
    warning,
};

/// Spotify accepts at most 100 URIs per add or remove call.
pub const MAX_BATCH_SIZE: usize = 100;

/// How playlist mutations are split, paced and retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    /// URIs per add/remove call, at most [`MAX_BATCH_SIZE`].
    pub batch_size: usize,
    /// Attempts per batch, the first one included.
    pub max_attempts: u32,
    /// Wait after a timed out attempt.
    pub timeout_delay: Duration,
    /// Wait after a rate limited attempt.
    pub rate_limit_delay: Duration,
    /// Pause after each successful add batch.
    pub add_pause: Duration,
    /// Pause after each successful remove batch.
    pub remove_pause: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            max_attempts: 5,
            timeout_delay: Duration::from_secs(2),
            rate_limit_delay: Duration::from_secs(1),
            add_pause: Duration::from_millis(200),
            remove_pause: Duration::from_millis(500),
        }
    }
}

impl BatchPolicy {
    pub(crate) fn chunk_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

/// Result of one batch call after retries.
#[derive(Debug)]
pub enum BatchOutcome {
    Applied { attempts: u32 },
    Abandoned { attempts: u32, error: ApiError },
}

impl BatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, BatchOutcome::Applied { .. })
    }
}

/// Runs one mutating batch call under `policy`.
///
/// Timeouts and rate limits are retried after the matching delay until
/// `max_attempts` is used up; any other error abandons the batch at once.
/// The outcome is always returned to the caller, nothing is dropped silently.
pub async fn run_batch<F, Fut>(policy: &BatchPolicy, label: &str, mut operation: F) -> BatchOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match operation().await {
            Ok(()) => return BatchOutcome::Applied { attempts },
            Err(error) => error,
        };

        let delay = match error.kind() {
            ErrorKind::Timeout => policy.timeout_delay,
            ErrorKind::RateLimited => policy.rate_limit_delay,
            _ => {
                warning!("{} failed: {}", label, error);
                return BatchOutcome::Abandoned { attempts, error };
            }
        };

        if attempts >= max_attempts {
            warning!(
                "{} failed after {} attempts: {}",
                label,
                attempts,
                error
            );
            return BatchOutcome::Abandoned { attempts, error };
        }

        warning!(
            "{}: {}, retrying ({}/{})",
            label,
            error,
            attempts,
            max_attempts
        );
        sleep(delay).await;
    }
}
