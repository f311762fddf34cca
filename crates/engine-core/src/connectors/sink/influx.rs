use crate::{
    connectors::sink::{PointSink, WatermarkStore},
    error::SinkError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use connectors::influx::{client::InfluxClient, line_protocol::LineProtocolWriter};
use model::records::point::Point;
use tracing::{debug, warn};

pub struct InfluxSink {
    client: InfluxClient,
}

impl InfluxSink {
    pub fn new(client: InfluxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PointSink for InfluxSink {
    async fn ping(&self) -> Result<(), SinkError> {
        self.client.health().await?;
        debug!(url = %self.client.config().url, "InfluxDB is reachable");
        Ok(())
    }

    async fn write_points(&self, points: &[Point]) -> Result<usize, SinkError> {
        let mut writer = LineProtocolWriter::new();
        for point in points {
            if let Err(e) = writer.push(point) {
                warn!(error = %e, "Skipping point");
            }
        }

        if writer.is_empty() {
            return Ok(0);
        }

        let written = writer.len();
        self.client.write_lines(writer.finish()).await?;
        Ok(written)
    }
}

#[async_trait]
impl WatermarkStore for InfluxSink {
    async fn last_timestamp(&self, measurement: &str) -> Result<Option<DateTime<Utc>>, SinkError> {
        Ok(self.client.last_time(measurement).await?)
    }
}
