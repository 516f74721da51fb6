//! Spotplay Library
//!
//! This library backs the `spotplay` command-line tool. It turns a list of
//! Spotify references (tracks, playlists, albums) and free-text artist names into
//! a flat list of tracks, refills a single reusable "scratch" playlist with them
//! in random order and starts playback on one of the user's devices.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the loopback OAuth callback server
//! - `cli` - Command implementations (`play`, `list_devices`, `login`)
//! - `config` - Configuration management and environment variables
//! - `error` - Structured Spotify API errors
//! - `management` - Token and state persistence, device selection, track
//!   collection and playlist resync
//! - `output` - Status line printing and progress spinners
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotplay::{config, cli};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> spotplay::Res<()> {
//!     config::load_env().await?;
//!     cli::play(vec!["spotify:track:4uLU6hMCjMI75M1A2tKUQC".into()], None).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod output;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the top-level operations that combine several error sources
/// (API errors, state store errors, device selection). Layer-specific code
/// returns its own error types, which convert into this boxed form with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Collecting tracks...");
/// info!("Found {} devices", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::output::print_line(std::format!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*)));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::output::print_line(std::format!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*)));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only used at
/// the command layer for errors that end the run.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::output::eprint_line(std::format!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*)));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable conditions: a reference that could not be found, a
/// batch being retried, a requested device that does not exist.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::output::print_line(std::format!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*)));
  })
}
