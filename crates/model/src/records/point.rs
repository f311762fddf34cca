use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A sink-ready measurement derived from one station row.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub timestamp: DateTime<Utc>,
    pub fields: BTreeMap<String, f64>,
}

impl Point {
    pub fn new(measurement: &str, timestamp: DateTime<Utc>) -> Self {
        Point {
            measurement: measurement.to_string(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&mut self, name: &str, value: f64) -> &mut Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Nanoseconds since the Unix epoch, `None` outside 1677-09-21..2262-04-11.
    pub fn timestamp_nanos(&self) -> Option<i64> {
        self.timestamp.timestamp_nanos_opt()
    }
}
