use crate::{
    connectors::sink::PointSink,
    error::SinkError,
    mapping::{FieldOutcome, map_field},
    metrics::Metrics,
};
use chrono::Utc;
use model::records::{point::Point, row::RawRecord};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns extracted rows into points and submits them as one batch.
pub struct SinkWriter {
    sink: Arc<dyn PointSink>,
    measurement: String,
    metrics: Metrics,
}

impl SinkWriter {
    pub fn new(sink: Arc<dyn PointSink>, measurement: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            sink,
            measurement: measurement.into(),
            metrics,
        }
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Maps every column of `record`. Unknown columns and values that do not
    /// coerce are logged and left out; the rest of the row is kept.
    pub fn build_point(&self, record: &RawRecord) -> Point {
        let mut point = Point::new(&self.measurement, record.timestamp.with_timezone(&Utc));

        for field in &record.fields {
            match map_field(&field.name, &field.value) {
                Ok(FieldOutcome::Mapped { name, value }) => {
                    point.field(name, value);
                }
                Ok(FieldOutcome::Ignored) => {}
                Ok(FieldOutcome::Unknown) => {
                    warn!(column = %field.name, timestamp = %record.timestamp, "Unknown column {}", field.name);
                    self.metrics.increment_unknown_fields(1);
                }
                Err(e) => {
                    warn!(column = %e.column, value = %e.value, error = %e.source, "Dropping field");
                    self.metrics.increment_dropped_fields(1);
                }
            }
        }

        point
    }

    pub fn build_points(&self, records: &[RawRecord]) -> Vec<Point> {
        records
            .iter()
            .map(|r| self.build_point(r))
            .filter(|p| {
                if p.is_empty() {
                    warn!(timestamp = %p.timestamp, "Row produced no fields, skipping");
                    return false;
                }
                true
            })
            .collect()
    }

    /// Writes `records` in a single request. Either every point is accepted
    /// or the call fails; resending the same rows overwrites.
    pub async fn write_batch(&self, records: &[RawRecord]) -> Result<usize, SinkError> {
        let points = self.build_points(records);
        if points.is_empty() {
            return Ok(0);
        }

        let written = self.sink.write_points(&points).await?;
        self.metrics.increment_points(written as u64);
        debug!(measurement = %self.measurement, points = written, "Batch written");
        Ok(written)
    }
}
