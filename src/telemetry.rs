use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize tracing to a log file. The dashboard owns the terminal, so
/// nothing may ever be written to stdout or stderr while it runs.
pub fn init_telemetry(log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,occupancy_dash=debug"));

    let file = File::create(log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    info!(path = %log_file.display(), "telemetry initialized");
    Ok(())
}
