use serde::Deserialize;
use std::{fmt, time::Duration};

/// Connection parameters for an InfluxDB v2 server.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub measurement: String,
    /// Flux duration literal bounding the watermark lookup, e.g. `1y`.
    pub lookback: String,
    /// Per-request timeout in seconds.
    pub request_timeout: u64,
}

impl InfluxConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8086".into(),
            token: String::new(),
            org: "org".into(),
            bucket: "bucket".into(),
            measurement: "winmeteo".into(),
            lookback: "1y".into(),
            request_timeout: 30,
        }
    }
}

impl fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("measurement", &self.measurement)
            .field("lookback", &self.lookback)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
