use spotplay::{
    info,
    output::{self, Spinner},
    warning,
};

// The active spinner is process-wide, so the whole lifecycle is one test.
#[test]
fn test_status_lines_while_spinner_runs() {
    assert!(!output::spinner_active());

    let spinner = Spinner::start("Adding 3 tracks to the playlist...");
    assert!(output::spinner_active());
    warning!("Adding tracks: request timed out, retrying (1/5)");
    info!("still running");
    output::eprint_line("to stderr".to_string());
    assert!(output::spinner_active());

    drop(spinner);
    assert!(!output::spinner_active());
    info!("after the spinner");
}
