use crate::{
    connectors::sink::{PointSink, WatermarkStore},
    error::SinkError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::records::point::Point;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

type SeriesKey = (String, DateTime<Utc>);

/// In-process sink with the same overwrite semantics as InfluxDB: a point
/// for an existing series and timestamp merges into the stored field set.
#[derive(Default)]
pub struct MemorySink {
    points: Mutex<BTreeMap<SeriesKey, BTreeMap<String, f64>>>,
    offline: AtomicBool,
    failing_writes: AtomicUsize,
    write_calls: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every request fail until set back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fails the next `n` writes.
    pub fn fail_next_writes(&self, n: usize) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.points.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, measurement: &str, at: DateTime<Utc>) -> Option<BTreeMap<String, f64>> {
        self.points
            .lock()
            .ok()?
            .get(&(measurement.to_string(), at))
            .cloned()
    }

    fn check_online(&self) -> Result<(), SinkError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("memory sink is offline".into()));
        }
        Ok(())
    }

    fn poisoned() -> SinkError {
        SinkError::Unavailable("memory sink lock poisoned".into())
    }
}

#[async_trait]
impl PointSink for MemorySink {
    async fn ping(&self) -> Result<(), SinkError> {
        self.check_online()
    }

    async fn write_points(&self, points: &[Point]) -> Result<usize, SinkError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let pending = self.failing_writes.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_writes.store(pending - 1, Ordering::SeqCst);
            return Err(SinkError::Unavailable("injected write failure".into()));
        }

        let mut stored = self.points.lock().map_err(|_| Self::poisoned())?;
        for point in points {
            stored
                .entry((point.measurement.clone(), point.timestamp))
                .or_default()
                .extend(point.fields.iter().map(|(k, v)| (k.clone(), *v)));
        }
        Ok(points.len())
    }
}

#[async_trait]
impl WatermarkStore for MemorySink {
    async fn last_timestamp(&self, measurement: &str) -> Result<Option<DateTime<Utc>>, SinkError> {
        self.check_online()?;
        let stored = self.points.lock().map_err(|_| Self::poisoned())?;
        Ok(stored
            .keys()
            .filter(|(m, _)| m == measurement)
            .map(|(_, ts)| *ts)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(temp: f64) -> Point {
        let mut p = Point::new("winmeteo", Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        p.field("temp", temp);
        p
    }

    #[tokio::test]
    async fn rewriting_a_point_overwrites() {
        let sink = MemorySink::new();
        sink.write_points(&[point(3.4)]).await.unwrap();
        sink.write_points(&[point(3.6)]).await.unwrap();

        assert_eq!(sink.len(), 1);
        let fields = sink.get("winmeteo", point(0.0).timestamp).unwrap();
        assert_eq!(fields.get("temp"), Some(&3.6));
    }

    #[tokio::test]
    async fn reports_latest_timestamp_per_measurement() {
        let sink = MemorySink::new();
        assert_eq!(sink.last_timestamp("winmeteo").await.unwrap(), None);

        let mut later = point(1.0);
        later.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        sink.write_points(&[later.clone(), point(2.0)]).await.unwrap();

        assert_eq!(
            sink.last_timestamp("winmeteo").await.unwrap(),
            Some(later.timestamp)
        );
        assert_eq!(sink.last_timestamp("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_failures_store_nothing() {
        let sink = MemorySink::new();
        sink.fail_next_writes(1);
        assert!(sink.write_points(&[point(1.0)]).await.is_err());
        assert!(sink.is_empty());
        assert!(sink.write_points(&[point(1.0)]).await.is_ok());
        assert_eq!(sink.write_calls(), 2);
    }
}
