use crate::settings::{station::StationSettings, timers::TimerSettings};
use chrono_tz::Tz;
use connectors::influx::config::InfluxConfig;
use engine_core::supervisor::MonitoredProcess;
use std::{path::PathBuf, time::Duration};

/// Immutable, validated configuration handed to the runtime.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub timers: TimerSettings,
    pub influx: InfluxConfig,
    /// Source table path
    pub dbf_path: PathBuf,
    /// Zone of the station clock
    pub timezone: Tz,
    /// Logger process under supervision
    pub process: MonitoredProcess,
    /// Consecutive empty polls before a restart
    pub stall_threshold: u32,
}

impl ValidatedSettings {
    pub fn poll_interval(&self) -> Duration {
        self.timers.poll_interval()
    }

    pub fn error_backoff(&self) -> Duration {
        self.timers.error_backoff()
    }

    pub fn kill_wait(&self) -> Duration {
        self.timers.kill_wait()
    }

    pub fn measurement(&self) -> &str {
        &self.influx.measurement
    }
}

/// Derives the supervised process from the executable path: the file name
/// identifies it, the parent directory is its working directory.
pub fn monitored_process(station: &StationSettings) -> Option<MonitoredProcess> {
    let name = station.executable.file_name()?.to_string_lossy().into_owned();
    let working_dir = station
        .executable
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();

    Some(MonitoredProcess {
        name,
        program: station.executable.clone(),
        working_dir,
    })
}
