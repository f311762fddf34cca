use crate::error::SupervisorError;
use connectors::process::error::ProcessError;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::{Instant, sleep};
use tracing::{error, info};

/// How often liveness is re-checked while waiting for a killed process to exit.
pub const TERMINATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Operations on the OS process table, keyed by executable name.
pub trait ProcessControl: Send {
    fn is_running(&mut self, name: &str) -> bool;

    fn launch(&mut self, program: &Path, working_dir: &Path) -> Result<(), ProcessError>;

    /// Forcefully kills every process named `name`.
    fn kill_all(&mut self, name: &str) -> Result<(), ProcessError>;
}

/// The logger process kept alive by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredProcess {
    pub name: String,
    pub program: PathBuf,
    pub working_dir: PathBuf,
}

#[derive(Debug)]
pub enum Termination {
    /// Nothing matched the name; no kill was requested.
    NotRunning,
    /// The process disappeared after the kill request.
    Terminated { waited: Duration },
    /// The kill request itself failed; liveness was not polled.
    KillFailed(ProcessError),
}

pub struct ProcessSupervisor {
    control: Box<dyn ProcessControl>,
    target: MonitoredProcess,
    poll_interval: Duration,
}

impl ProcessSupervisor {
    pub fn new(control: Box<dyn ProcessControl>, target: MonitoredProcess) -> Self {
        Self {
            control,
            target,
            poll_interval: TERMINATION_POLL_INTERVAL,
        }
    }

    pub fn target(&self) -> &MonitoredProcess {
        &self.target
    }

    pub fn is_running(&mut self) -> bool {
        self.control.is_running(&self.target.name)
    }

    /// Starts the process unless one with the same name is alive.
    /// Returns whether a launch happened.
    pub fn ensure_running(&mut self) -> Result<bool, SupervisorError> {
        if self.is_running() {
            return Ok(false);
        }

        self.control
            .launch(&self.target.program, &self.target.working_dir)?;
        info!(process = %self.target.name, "Started {}", self.target.name);
        Ok(true)
    }

    /// Kills the process and waits up to `timeout` for it to disappear.
    ///
    /// Running → KillRequested → polling every second → Terminated or timed
    /// out. A timeout is an error; a rejected kill request is reported as
    /// [`Termination::KillFailed`] without waiting.
    pub async fn terminate(&mut self, timeout: Duration) -> Result<Termination, SupervisorError> {
        let name = self.target.name.clone();

        if !self.is_running() {
            info!(process = %name, "Process {name} is not running");
            return Ok(Termination::NotRunning);
        }

        if let Err(e) = self.control.kill_all(&name) {
            error!(process = %name, error = %e, "Failed to terminate {name}");
            return Ok(Termination::KillFailed(e));
        }
        info!(process = %name, "Attempted to kill {name}");

        let start = Instant::now();
        loop {
            if !self.is_running() {
                let waited = start.elapsed();
                info!(process = %name, waited_secs = waited.as_secs(), "Process {name} has been terminated");
                return Ok(Termination::Terminated { waited });
            }

            if start.elapsed() > timeout {
                return Err(SupervisorError::TerminationTimeout { name, timeout });
            }

            sleep(self.poll_interval).await;
        }
    }
}
