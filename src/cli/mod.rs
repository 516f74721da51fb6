//! # CLI Module
//!
//! Command implementations behind the `spotplay` binary. Each command loads
//! what it needs (credentials, cached token, scratch playlist ID), talks to
//! Spotify through [`crate::spotify::SpotifyApi`] and reports progress with the
//! crate's status macros.
//!
//! ## Commands
//!
//! - [`play`] - The default command. Collects tracks from the inputs, refills
//!   the scratch playlist in random order and starts playback. The work itself
//!   is done by [`run_session`], which takes the API and the state store as
//!   parameters.
//! - [`list_devices`] - Prints the available playback devices.
//! - [`login`] - The OAuth authorization-code flow, run automatically when no
//!   token is cached.
//!
//! ## Error Handling
//!
//! Commands return [`crate::Res`]; `main` turns an error into a `[!]` line and
//! exit status 1. Conditions the run can survive (a missing playlist, a
//! requested device that does not exist, batches that could not be applied)
//! are printed as warnings instead.

mod auth;
mod devices;
mod play;

pub use auth::authorized_client;
pub use auth::login;
pub use devices::device_rows;
pub use devices::list_devices;
pub use devices::print_devices;
pub use play::PlayReport;
pub use play::PlayRequest;
pub use play::SessionError;
pub use play::play;
pub use play::run_session;
