use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file. File values win over the process
    /// environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn all(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// The value of `key` fit for printing: sensitive values are masked.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        if self.is_sensitive(key) {
            return Some("********".to_string());
        }
        Some(value.to_string())
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.sensitive_patterns.iter().any(|p| key.contains(p.as_str()))
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "passwd", "secret", "token", "key", "auth", "credential"]
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn empty() -> EnvManager {
        EnvManager {
            vars: HashMap::new(),
            sensitive_patterns: EnvManager::default_sensitive_patterns(),
        }
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
METEOFLUX_INFLUX_ORG=home
export METEOFLUX_INFLUX_BUCKET=station
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("METEOFLUX_INFLUX_ORG"), Some("home"));
        assert_eq!(env.get("METEOFLUX_INFLUX_BUCKET"), Some("station"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
URL=http://influx:8086/?a=b
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("URL"), Some("http://influx:8086/?a=b"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_tokens_are_masked() {
        let mut env = empty();
        env.parse_env_content("METEOFLUX_INFLUX_TOKEN=abc\nMETEOFLUX_INFLUX_URL=http://x")
            .unwrap();

        assert_eq!(
            env.display_value("METEOFLUX_INFLUX_TOKEN").as_deref(),
            Some("********")
        );
        assert_eq!(
            env.display_value("METEOFLUX_INFLUX_URL").as_deref(),
            Some("http://x")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "METEOFLUX_INFLUX_TOKEN=\"s3cr3t\"").unwrap();

        let mut env = empty();
        env.load_from_file(file.path()).unwrap();
        assert_eq!(env.get("METEOFLUX_INFLUX_TOKEN"), Some("s3cr3t"));
        assert!(env.load_from_file("/nonexistent/.env").is_err());
    }
}
