use crate::supervisor::ProcessControl;
use connectors::process::{error::ProcessError, table::ProcessTable};
use std::path::Path;

impl ProcessControl for ProcessTable {
    fn is_running(&mut self, name: &str) -> bool {
        ProcessTable::is_running(self, name)
    }

    fn launch(&mut self, program: &Path, working_dir: &Path) -> Result<(), ProcessError> {
        ProcessTable::launch(self, program, working_dir)
    }

    fn kill_all(&mut self, name: &str) -> Result<(), ProcessError> {
        ProcessTable::kill_all(self, name).map(|_| ())
    }
}
