use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfluxError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("InfluxDB responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode query response: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid timestamp '{value}' in query response: {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Point '{0}' has no fields")]
    EmptyPoint(String),

    #[error("Point '{measurement}' at {timestamp} is outside the nanosecond range")]
    TimestampOutOfRange {
        measurement: String,
        timestamp: String,
    },
}
