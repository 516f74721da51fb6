//! Terminal output shared by the status macros and the progress spinner.
//!
//! While a [`Spinner`] is running, status lines are printed through
//! [`ProgressBar::suspend`], which clears the spinner line first and redraws it
//! afterwards.

use std::{borrow::Cow, sync::Mutex, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

static ACTIVE_SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> Option<ProgressBar> {
    ACTIVE_SPINNER.lock().ok().and_then(|active| active.clone())
}

/// Prints one line to stdout without tearing the active spinner.
pub fn print_line(line: String) {
    match active() {
        Some(pb) => pb.suspend(|| println!("{}", line)),
        None => println!("{}", line),
    }
}

/// Prints one line to stderr without tearing the active spinner.
pub fn eprint_line(line: String) {
    match active() {
        Some(pb) => pb.suspend(|| eprintln!("{}", line)),
        None => eprintln!("{}", line),
    }
}

/// Whether a spinner is currently drawing.
pub fn spinner_active() -> bool {
    active().is_some()
}

/// A steady-ticking spinner for a long remote phase.
///
/// Registers itself as the active spinner until dropped; dropping clears the
/// line.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<Cow<'static, str>>) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }

        if let Ok(mut active) = ACTIVE_SPINNER.lock() {
            *active = Some(pb.clone());
        }
        Self { pb }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE_SPINNER.lock() {
            *active = None;
        }
        self.pb.finish_and_clear();
    }
}
