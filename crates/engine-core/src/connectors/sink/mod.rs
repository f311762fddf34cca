use crate::error::SinkError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::records::point::Point;

pub mod influx;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

/// Time-series store accepting batched point writes.
///
/// Writing a point whose series and timestamp already exist overwrites it,
/// so a failed batch can be resent whole.
#[async_trait]
pub trait PointSink: Send + Sync {
    async fn ping(&self) -> Result<(), SinkError>;

    /// Writes all points in one request. Returns how many were submitted.
    async fn write_points(&self, points: &[Point]) -> Result<usize, SinkError>;
}

/// Read side of the sink used to recover the watermark at startup.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    async fn last_timestamp(&self, measurement: &str) -> Result<Option<DateTime<Utc>>, SinkError>;
}
