use chrono::DateTime;
use chrono_tz::Tz;

/// Counters owned by the scheduler loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopState {
    pub iterations: u64,
    /// Consecutive polls that found no new rows.
    pub zeros: u32,
    pub restarts: u64,
    /// Bridge start until the first restart, then the latest restart.
    pub last_restart: DateTime<Tz>,
}

impl LoopState {
    pub fn new(started_at: DateTime<Tz>) -> Self {
        Self {
            iterations: 0,
            zeros: 0,
            restarts: 0,
            last_restart: started_at,
        }
    }

    pub fn record_restart(&mut self, at: DateTime<Tz>) {
        self.restarts += 1;
        self.last_restart = at;
        self.zeros = 0;
    }
}
