use crate::settings::{
    Settings,
    error::SettingsError,
    validated::{ValidatedSettings, monitored_process},
};
use chrono_tz::Tz;

const LOOKBACK_UNITS: &[&str] = &["ns", "us", "µs", "ms", "mo", "s", "m", "h", "d", "w", "y"];

pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: Settings) -> Result<ValidatedSettings, SettingsError> {
        let timers = &settings.timers;
        if timers.poll_interval == 0 {
            return Err(SettingsError::ZeroPollInterval);
        }
        if timers.stall_timeout < timers.poll_interval {
            return Err(SettingsError::StallShorterThanPoll {
                stall: timers.stall_timeout,
                poll: timers.poll_interval,
            });
        }

        let timezone = settings
            .station
            .timezone
            .parse::<Tz>()
            .map_err(|_| SettingsError::UnknownTimezone(settings.station.timezone.clone()))?;

        let process = monitored_process(&settings.station)
            .ok_or_else(|| SettingsError::MissingExecutableName(settings.station.executable.clone()))?;

        let influx = &settings.influx;
        for (key, value) in [
            ("influx.org", &influx.org),
            ("influx.bucket", &influx.bucket),
            ("influx.measurement", &influx.measurement),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::Empty(key));
            }
        }

        if !is_flux_duration(&influx.lookback) {
            return Err(SettingsError::InvalidLookback(influx.lookback.clone()));
        }

        let stall_threshold = timers.stall_threshold().ok_or(SettingsError::StallThresholdTooLarge {
            stall: timers.stall_timeout,
            poll: timers.poll_interval,
        })?;

        Ok(ValidatedSettings {
            timers: settings.timers,
            influx: settings.influx,
            dbf_path: settings.station.dbf_path,
            timezone,
            process,
            stall_threshold,
        })
    }
}

/// Accepts Flux duration literals such as `1y`, `30d` or `1h30m`.
fn is_flux_duration(input: &str) -> bool {
    let mut rest = input;
    if rest.is_empty() {
        return false;
    }

    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];

        match LOOKBACK_UNITS.iter().find(|unit| rest.starts_with(**unit)) {
            Some(unit) => rest = &rest[unit.len()..],
            None => return false,
        }
    }
    true
}
