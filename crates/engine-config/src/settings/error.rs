use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating bridge settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has mistyped keys.
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    /// A stall timeout below one poll interval would restart on every empty poll.
    #[error("Stall timeout ({stall}s) is shorter than the poll interval ({poll}s)")]
    StallShorterThanPoll { stall: u64, poll: u64 },

    #[error("Stall timeout ({stall}s) spans too many poll intervals ({poll}s each)")]
    StallThresholdTooLarge { stall: u64, poll: u64 },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Executable path has no file name: {0}")]
    MissingExecutableName(PathBuf),

    #[error("Setting '{0}' must not be empty")]
    Empty(&'static str),

    #[error("Invalid lookback duration: {0}")]
    InvalidLookback(String),
}
