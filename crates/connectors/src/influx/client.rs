use crate::influx::{config::InfluxConfig, error::InfluxError, query};
use chrono::{DateTime, Utc};
use reqwest::{Response, header};
use serde_json::json;
use tracing::debug;

/// Thin client over the InfluxDB v2 HTTP API.
#[derive(Clone)]
pub struct InfluxClient {
    http: reqwest::Client,
    config: InfluxConfig,
}

impl InfluxClient {
    pub fn new(config: InfluxConfig) -> Result<Self, InfluxError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn auth(&self) -> String {
        format!("Token {}", self.config.token)
    }

    pub async fn health(&self) -> Result<(), InfluxError> {
        let resp = self.http.get(self.endpoint("health")).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// Writes a line-protocol body with nanosecond precision.
    pub async fn write_lines(&self, body: String) -> Result<(), InfluxError> {
        let resp = self
            .http
            .post(self.endpoint("api/v2/write"))
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(header::AUTHORIZATION, self.auth())
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Runs a Flux query and returns the raw CSV response.
    pub async fn query_csv(&self, flux: &str) -> Result<String, InfluxError> {
        debug!(query = flux, "Running Flux query");
        let body = json!({
            "query": flux,
            "type": "flux",
            "dialect": { "header": true, "annotations": [], "delimiter": "," },
        });

        let resp = self
            .http
            .post(self.endpoint("api/v2/query"))
            .query(&[("org", self.config.org.as_str())])
            .header(header::AUTHORIZATION, self.auth())
            .header(header::ACCEPT, "application/csv")
            .json(&body)
            .send()
            .await?;

        Ok(check(resp).await?.text().await?)
    }

    /// Time of the newest point of the configured measurement, if any.
    pub async fn last_time(&self, measurement: &str) -> Result<Option<DateTime<Utc>>, InfluxError> {
        let flux = query::last_point_query(&self.config.bucket, measurement, &self.config.lookback);
        let csv = self.query_csv(&flux).await?;
        query::parse_latest_time(&csv)
    }
}

async fn check(resp: Response) -> Result<Response, InfluxError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(InfluxError::Status {
        status: status.as_u16(),
        body,
    })
}
