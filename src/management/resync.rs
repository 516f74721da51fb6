use std::collections::HashSet;

use rand::seq::SliceRandom;
use tokio::time::sleep;

use super::retry::{BatchOutcome, BatchPolicy, run_batch};
use crate::{error::ApiError, spotify::SpotifyApi, warning};

/// What a sequence of add or remove batches achieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Batch calls issued (each possibly retried).
    pub batches: usize,
    /// Tracks in batches that went through.
    pub applied: usize,
    /// Tracks in batches that were abandoned.
    pub failed: usize,
    /// Number of abandoned batches.
    pub abandoned_batches: usize,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.abandoned_batches == 0
    }

    fn record(&mut self, outcome: &BatchOutcome, size: usize) {
        self.batches += 1;
        if outcome.is_applied() {
            self.applied += size;
        } else {
            self.failed += size;
            self.abandoned_batches += 1;
        }
    }
}

/// Removes every track from a playlist.
///
/// Reads the first page of items, removes those URIs in batches and reads
/// again, until a read comes back empty. A round in which every batch was
/// abandoned ends the loop, since reading again would return the same items.
pub async fn clear_playlist<A: SpotifyApi + ?Sized>(
    api: &A,
    playlist_id: &str,
    policy: &BatchPolicy,
) -> Result<BatchReport, ApiError> {
    let chunk_size = policy.chunk_size();
    let mut report = BatchReport::default();

    loop {
        let page = api.playlist_items(playlist_id, 0, chunk_size as u32).await?;

        let mut seen = HashSet::new();
        let uris: Vec<String> = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| track.uri)
            .filter(|uri| seen.insert(uri.clone()))
            .collect();

        if uris.is_empty() {
            break;
        }

        let applied_before = report.applied;
        for chunk in uris.chunks(chunk_size) {
            let outcome = run_batch(policy, "Removing tracks", || {
                api.remove_tracks(playlist_id, chunk)
            })
            .await;

            report.record(&outcome, chunk.len());
            if outcome.is_applied() {
                sleep(policy.remove_pause).await;
            }
        }

        if report.applied == applied_before {
            warning!("Could not remove any of the remaining tracks, leaving them in place");
            break;
        }
    }

    Ok(report)
}

/// Shuffles `tracks` and appends them to a playlist in batches.
pub async fn insert_tracks<A: SpotifyApi + ?Sized>(
    api: &A,
    playlist_id: &str,
    mut tracks: Vec<String>,
    policy: &BatchPolicy,
) -> BatchReport {
    tracks.shuffle(&mut rand::rng());

    let mut report = BatchReport::default();
    for chunk in tracks.chunks(policy.chunk_size()) {
        let outcome = run_batch(policy, "Adding tracks", || api.add_tracks(playlist_id, chunk)).await;

        report.record(&outcome, chunk.len());
        if outcome.is_applied() {
            sleep(policy.add_pause).await;
        }
    }

    report
}
