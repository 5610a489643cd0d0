//! Diagnostic logging.
//!
//! The TUI owns the terminal, so diagnostics go to a file instead of stderr.
//! Nothing is logged unless `GLIMMER_LOG` selects a filter (e.g.
//! `GLIMMER_LOG=debug`); the output lands in `glimmer.log` under the data
//! directory.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_diagnostics(data_dir: &Path) {
    let Ok(filter) = std::env::var("GLIMMER_LOG") else {
        return;
    };

    let log_path = data_dir.join("glimmer.log");
    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open {}: {e}", log_path.display());
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}
