use connectors::influx::error::InfluxError;
use engine_config::settings::error::SettingsError;
use engine_core::error::{ExtractError, SinkError, SupervisorError};
use thiserror::Error;

/// Anything that aborts a single sync cycle. Caught by the scheduler loop.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Supervisor error: {0}")]
    Supervisor(#[from] SupervisorError),
}

/// Top‐level errors for the sync bridge.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Setting error.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The InfluxDB client could not be built.
    #[error("Initialization error: {0}")]
    Initialization(#[from] InfluxError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}
