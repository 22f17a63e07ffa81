//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the gridpad application.
// CONTEXT: Wires configuration, logging and the durable store into one
//          `Session`, then serves JSON commands line by line.

use std::io::{BufRead, Write};

pub mod api_types;
pub mod commands;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod session;

pub use api_types::{CellView, CommandOutcome, SheetTab, SheetView};
pub use commands::{Command, IndexList};
pub use config::AppConfig;
pub use error::AppError;
pub use keys::{command_for_key, KeyPress};
pub use logging::{get_log_path, init_log_file, next_seq, write_log};
pub use session::Session;

use persistence::JsonFileStore;

/// Reads one JSON command per line from `input` and writes one JSON
/// outcome per line to `output`. Blank lines are skipped; a line that is
/// not a command gets a failed outcome and serving continues.
pub fn serve<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> Result<(), AppError> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = match serde_json::from_str::<Command>(&line) {
            Ok(command) => session.dispatch(command),
            Err(e) => session.failure(&AppError::from(e)),
        };
        serde_json::to_writer(&mut output, &outcome)?;
        writeln!(output)?;
        output.flush()?;
    }
    Ok(())
}

// ============================================================================
// APP ENTRY
// ============================================================================

pub fn run() -> Result<(), AppError> {
    let config = AppConfig::discover()?;

    match init_log_file(&config.log_path) {
        Ok(path) => eprintln!("[LOG_INIT] SUCCESS - Log file: {:?}", path),
        Err(e) => {
            eprintln!("[LOG_INIT] FAILED: {}", e);
            eprintln!("[LOG_INIT] Continuing with console-only logging");
        }
    }
    logging::install_facade(log::LevelFilter::Debug);
    log_info!("SYS", "gridpad starting, store={}", config.storage_path.display());

    let store = JsonFileStore::open(&config.storage_path)?;
    let mut session = Session::open(config, Box::new(store));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(&mut session, stdin.lock(), stdout.lock())?;

    log_info!("SYS", "input closed, exiting");
    Ok(())
}
