use crate::{connectors::sink::WatermarkStore, error::SinkError};
use chrono::DateTime;
use chrono_tz::Tz;
use model::core::time::Watermark;
use std::sync::Arc;

/// Recovers the ingestion watermark from the sink at startup.
pub struct WatermarkAdapter {
    store: Arc<dyn WatermarkStore>,
    tz: Tz,
}

impl WatermarkAdapter {
    pub fn new(store: Arc<dyn WatermarkStore>, tz: Tz) -> Self {
        Self { store, tz }
    }

    /// Newest persisted timestamp of `series`, converted from UTC to local time.
    pub async fn last_timestamp(&self, series: &str) -> Result<Option<DateTime<Tz>>, SinkError> {
        let last = self.store.last_timestamp(series).await?;
        Ok(last.map(|ts| ts.with_timezone(&self.tz)))
    }

    /// Watermark to start from: the newest persisted point, or the beginning
    /// of time when the series is empty.
    pub async fn initial_watermark(&self, series: &str) -> Result<Watermark, SinkError> {
        Ok(match self.last_timestamp(series).await? {
            Some(ts) => Watermark::new(ts),
            None => Watermark::beginning(self.tz),
        })
    }
}
