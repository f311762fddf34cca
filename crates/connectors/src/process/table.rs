use crate::process::error::ProcessError;
use std::{
    path::Path,
    process::{Command, Stdio},
};
use sysinfo::{Process, ProcessStatus, ProcessesToUpdate, System};
use tracing::debug;

/// Live view of the OS process table, matched by executable name.
pub struct ProcessTable {
    system: System,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh(&mut self) {
        self.system.refresh_processes(ProcessesToUpdate::All);
    }

    /// Re-enumerates processes and reports whether any is named `name`.
    pub fn is_running(&mut self, name: &str) -> bool {
        self.refresh();
        self.system
            .processes()
            .values()
            .any(|p| matches_name(p, name))
    }

    /// Spawns `program` detached from this process. A background thread
    /// waits on the child so a killed logger does not linger as a zombie.
    pub fn launch(&self, program: &Path, working_dir: &Path) -> Result<(), ProcessError> {
        let mut cmd = Command::new(program);
        cmd.current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            cmd.creation_flags(DETACHED_PROCESS);
        }

        let mut child = cmd.spawn().map_err(|source| ProcessError::Launch {
            path: program.to_path_buf(),
            source,
        })?;
        let pid = child.id();
        debug!(pid, program = %program.display(), "Spawned process");

        std::thread::spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "Launched process exited"),
            Err(e) => debug!(pid, error = %e, "Failed to wait on launched process"),
        });
        Ok(())
    }

    /// Sends a kill signal to every process named `name`. Fails when no
    /// signal could be delivered.
    pub fn kill_all(&mut self, name: &str) -> Result<usize, ProcessError> {
        self.refresh();
        let mut delivered = 0;
        let mut attempted = 0;
        for process in self.system.processes().values() {
            if !matches_name(process, name) {
                continue;
            }
            attempted += 1;
            if process.kill() {
                delivered += 1;
            }
        }

        if attempted > 0 && delivered == 0 {
            return Err(ProcessError::KillRejected(name.to_string()));
        }
        debug!(name, delivered, "Kill signal sent");
        Ok(delivered)
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

// Zombies keep their name in the table until reaped but are already dead.
fn matches_name(process: &Process, name: &str) -> bool {
    process.status() != ProcessStatus::Zombie
        && process.name().to_string_lossy().eq_ignore_ascii_case(name)
}
