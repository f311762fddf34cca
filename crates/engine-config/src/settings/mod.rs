use crate::settings::{
    env::apply_env_overrides, error::SettingsError, station::StationSettings,
    timers::TimerSettings, validated::ValidatedSettings, validator::SettingsValidator,
};
use connectors::influx::config::InfluxConfig;
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::info;

pub mod env;
pub mod error;
pub mod station;
pub mod timers;
pub mod validated;
pub mod validator;

/// Default settings file, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "meteoflux.toml";

/// Settings as written in the TOML file. Every section and key is optional;
/// missing values fall back to the stock station deployment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timers: TimerSettings,
    pub influx: InfluxConfig,
    pub station: StationSettings,
}

impl Settings {
    pub fn from_toml_str(path: &Path, contents: &str) -> Result<Self, SettingsError> {
        toml::from_str(contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`. A missing file at the default location yields the
    /// defaults; any other read failure is an error.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(path, &contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG_PATH) => {
                info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(self) -> Result<ValidatedSettings, SettingsError> {
        SettingsValidator::validate(self)
    }
}

/// File, then environment overrides, then validation.
pub fn load(path: &Path, vars: &HashMap<String, String>) -> Result<ValidatedSettings, SettingsError> {
    let mut settings = Settings::from_file(path)?;
    apply_env_overrides(&mut settings, vars);
    settings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let toml = r#"
[timers]
poll_interval = 60

[influx]
bucket = "meteo"
"#;
        let settings = Settings::from_toml_str(Path::new("test.toml"), toml).unwrap();
        assert_eq!(settings.timers.poll_interval, 60);
        assert_eq!(settings.timers.stall_timeout, 180);
        assert_eq!(settings.influx.bucket, "meteo");
        assert_eq!(settings.influx.measurement, "winmeteo");
        assert_eq!(settings.station.timezone, "Europe/Prague");
    }

    #[test]
    fn mistyped_value_is_a_parse_error() {
        let err = Settings::from_toml_str(Path::new("bad.toml"), "[timers]\npoll_interval = \"soon\"")
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::from_file(Path::new("/nonexistent/meteoflux.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn load_applies_env_then_validates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[station]\ntimezone = \"UTC\"\n\n[timers]\npoll_interval = 30\nstall_timeout = 100"
        )
        .unwrap();

        let vars = HashMap::from([(env::INFLUX_ORG_VAR.to_string(), "home".to_string())]);
        let settings = load(file.path(), &vars).unwrap();

        assert_eq!(settings.influx.org, "home");
        assert_eq!(settings.timezone, chrono_tz::Tz::UTC);
        assert_eq!(settings.stall_threshold, 3);
    }
}
