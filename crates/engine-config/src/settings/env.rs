use crate::settings::Settings;
use std::collections::HashMap;
use tracing::debug;

/// Selects the settings file when `--config` is not given.
pub const CONFIG_PATH_VAR: &str = "METEOFLUX_CONFIG";

pub const INFLUX_URL_VAR: &str = "METEOFLUX_INFLUX_URL";
pub const INFLUX_TOKEN_VAR: &str = "METEOFLUX_INFLUX_TOKEN";
pub const INFLUX_ORG_VAR: &str = "METEOFLUX_INFLUX_ORG";
pub const INFLUX_BUCKET_VAR: &str = "METEOFLUX_INFLUX_BUCKET";

/// Overlays sink connection values from the environment onto `settings`.
/// Unset variables leave the file value alone.
pub fn apply_env_overrides(settings: &mut Settings, vars: &HashMap<String, String>) {
    let influx = &mut settings.influx;
    let targets: [(&str, &mut String); 4] = [
        (INFLUX_URL_VAR, &mut influx.url),
        (INFLUX_TOKEN_VAR, &mut influx.token),
        (INFLUX_ORG_VAR, &mut influx.org),
        (INFLUX_BUCKET_VAR, &mut influx.bucket),
    ];

    for (var, slot) in targets {
        if let Some(value) = vars.get(var) {
            debug!(var, "Applying environment override");
            *slot = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_present_variables() {
        let mut settings = Settings::default();
        let vars = HashMap::from([
            (INFLUX_TOKEN_VAR.to_string(), "secret".to_string()),
            (INFLUX_BUCKET_VAR.to_string(), "station".to_string()),
        ]);

        apply_env_overrides(&mut settings, &vars);

        assert_eq!(settings.influx.token, "secret");
        assert_eq!(settings.influx.bucket, "station");
        assert_eq!(settings.influx.url, "http://localhost:8086");
        assert_eq!(settings.influx.org, "org");
    }
}
