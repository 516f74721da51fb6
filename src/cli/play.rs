use thiserror::Error;

use super::auth::authorized_client;
use crate::{
    Res, config, info,
    management::{
        BatchPolicy, BatchReport, SelectionSource, StateStore, clear_playlist, collect_tracks,
        insert_tracks, resolve_scratch_playlist, select_device,
    },
    output::Spinner,
    spotify::SpotifyApi,
    success,
    types::Device,
    warning,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("None of the {0} collected tracks could be added to the playlist")]
    NothingAdded(usize),
}

#[derive(Debug, Clone, Default)]
pub struct PlayRequest {
    pub inputs: Vec<String>,
    /// Requested device name, matched case-insensitively.
    pub device: Option<String>,
}

/// Summary of a session that reached playback.
#[derive(Debug, Clone)]
pub struct PlayReport {
    pub device: Device,
    pub playlist_id: String,
    pub collected: usize,
    pub cleared: BatchReport,
    pub inserted: BatchReport,
}

/// Entry point of the default command: log in, then run a session.
pub async fn play(inputs: Vec<String>, device: Option<String>) -> Res<()> {
    let store = StateStore::default_location();
    let client = authorized_client(&store).await?;
    let request = PlayRequest { inputs, device };

    let Some(report) = run_session(&client, &store, &request, &config::batch_policy()).await?
    else {
        return Ok(());
    };

    if !report.cleared.is_complete() {
        warning!(
            "{} previous tracks could not be removed from {}",
            report.cleared.failed,
            config::SCRATCH_PLAYLIST_NAME
        );
    }

    if report.inserted.is_complete() {
        success!(
            "Done: playing {} tracks on {}",
            report.inserted.applied,
            report.device.name
        );
    } else {
        warning!(
            "Playing {} of {} tracks on {}; {} could not be added",
            report.inserted.applied,
            report.collected,
            report.device.name,
            report.inserted.failed
        );
    }

    Ok(())
}

/// Refills the scratch playlist from `request.inputs` and starts playing it.
///
/// Steps, in order: current user, device selection, scratch playlist
/// resolution, clear, collect, insert, playback. Returns `None` when the
/// inputs resolved to no tracks, in which case nothing is played.
pub async fn run_session<A: SpotifyApi + ?Sized>(
    api: &A,
    store: &StateStore,
    request: &PlayRequest,
    policy: &BatchPolicy,
) -> Res<Option<PlayReport>> {
    let user_id = api.current_user_id().await?;

    let devices = api.devices().await?;
    let selection = select_device(&devices, request.device.as_deref())?;
    if let Some(name) = &selection.missing_request {
        warning!(
            "Device '{}' not found. Playing on an available device instead.",
            name
        );
    }
    match selection.source {
        SelectionSource::Requested => success!("{} set as playback device", selection.device.name),
        _ => info!("Using playback device {}", selection.device.name),
    }

    let playlist_id =
        resolve_scratch_playlist(api, store, &user_id, config::SCRATCH_PLAYLIST_NAME).await?;

    let spinner = Spinner::start(format!("Clearing {}...", config::SCRATCH_PLAYLIST_NAME));
    let cleared = clear_playlist(api, &playlist_id, policy).await;
    drop(spinner);
    let cleared = cleared?;

    info!("Collecting tracks...");
    let tracks = collect_tracks(api, &request.inputs).await?;
    if tracks.is_empty() {
        warning!("No tracks found to add.");
        return Ok(None);
    }

    let collected = tracks.len();
    let spinner = Spinner::start(format!("Adding {} tracks to the playlist...", collected));
    let inserted = insert_tracks(api, &playlist_id, tracks, policy).await;
    drop(spinner);

    if inserted.applied == 0 {
        return Err(SessionError::NothingAdded(collected).into());
    }

    info!("Starting playback...");
    api.start_playback(
        &selection.device_id,
        &format!("spotify:playlist:{}", playlist_id),
    )
    .await?;

    Ok(Some(PlayReport {
        device: selection.device,
        playlist_id,
        collected,
        cleared,
        inserted,
    }))
}
