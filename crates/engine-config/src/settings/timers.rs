use serde::Deserialize;
use std::time::Duration;

/// Scheduler timing, all in whole seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    /// Pause between successful cycles.
    pub poll_interval: u64,
    /// Pause after a failed cycle or connect attempt.
    pub error_backoff: u64,
    /// How long without new rows before the logger is restarted.
    pub stall_timeout: u64,
    /// How long to wait for the logger to exit after a kill.
    pub kill_wait: u64,
}

impl TimerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff)
    }

    pub fn kill_wait(&self) -> Duration {
        Duration::from_secs(self.kill_wait)
    }

    /// Number of consecutive empty polls that make up a stall. Rounds down.
    /// `None` for a zero poll interval or a count that does not fit a `u32`.
    pub fn stall_threshold(&self) -> Option<u32> {
        let polls = self.stall_timeout.checked_div(self.poll_interval)?;
        u32::try_from(polls).ok()
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            poll_interval: 30,
            error_backoff: 120,
            stall_timeout: 180,
            kill_wait: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_six_polls() {
        assert_eq!(TimerSettings::default().stall_threshold(), Some(6));
    }

    #[test]
    fn threshold_rounds_down() {
        let timers = TimerSettings {
            poll_interval: 40,
            stall_timeout: 180,
            ..Default::default()
        };
        assert_eq!(timers.stall_threshold(), Some(4));
    }

    #[test]
    fn threshold_beyond_u32_is_none() {
        let timers = TimerSettings {
            poll_interval: 1,
            stall_timeout: u64::from(u32::MAX) + 1,
            ..Default::default()
        };
        assert_eq!(timers.stall_threshold(), None);

        let zero = TimerSettings {
            poll_interval: 0,
            ..Default::default()
        };
        assert_eq!(zero.stall_threshold(), None);
    }
}
