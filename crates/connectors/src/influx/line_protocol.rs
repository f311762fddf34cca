use crate::influx::error::InfluxError;
use model::records::point::Point;
use std::fmt::Write;

/// Accumulates points as InfluxDB line protocol with nanosecond timestamps.
///
/// ```text
/// winmeteo humi=55.2,temp=3.4 1704099600000000000
/// ```
#[derive(Debug, Default)]
pub struct LineProtocolWriter {
    buf: String,
    lines: usize,
}

impl LineProtocolWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one point. Points without fields or outside the nanosecond
    /// range are rejected and leave the buffer untouched.
    pub fn push(&mut self, point: &Point) -> Result<(), InfluxError> {
        let line = encode_point(point)?;
        if self.lines > 0 {
            self.buf.push('\n');
        }
        self.buf.push_str(&line);
        self.lines += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

pub fn encode_point(point: &Point) -> Result<String, InfluxError> {
    if point.is_empty() {
        return Err(InfluxError::EmptyPoint(point.measurement.clone()));
    }

    let nanos = point
        .timestamp_nanos()
        .ok_or_else(|| InfluxError::TimestampOutOfRange {
            measurement: point.measurement.clone(),
            timestamp: point.timestamp.to_rfc3339(),
        })?;

    let mut line = escape_measurement(&point.measurement);
    line.push(' ');
    for (idx, (name, value)) in point.fields.iter().enumerate() {
        if idx > 0 {
            line.push(',');
        }
        // Writing into a String cannot fail
        let _ = write!(line, "{}={}", escape_key(name), value);
    }
    let _ = write!(line, " {nanos}");

    Ok(line)
}

fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if special.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point() -> Point {
        let mut p = Point::new("winmeteo", Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        p.field("temp", 3.4).field("humi", 55.2);
        p
    }

    #[test]
    fn encodes_sorted_fields_with_nanos() {
        assert_eq!(
            encode_point(&point()).unwrap(),
            "winmeteo humi=55.2,temp=3.4 1704099600000000000"
        );
    }

    #[test]
    fn whole_numbers_stay_floats() {
        let mut p = point();
        p.fields.clear();
        p.field("rain", 0.0);
        // No `i` suffix: InfluxDB reads a bare number as float
        assert!(encode_point(&p).unwrap().starts_with("winmeteo rain=0 "));
    }

    #[test]
    fn escapes_special_characters() {
        let mut p = Point::new("station one", point().timestamp);
        p.field("wind,dir=avg", 1.5);
        assert!(
            encode_point(&p)
                .unwrap()
                .starts_with(r"station\ one wind\,dir\=avg=1.5 ")
        );
    }

    #[test]
    fn rejects_empty_point() {
        let p = Point::new("winmeteo", point().timestamp);
        assert!(matches!(encode_point(&p), Err(InfluxError::EmptyPoint(_))));
    }

    #[test]
    fn rejects_timestamp_outside_nano_range() {
        let mut p = Point::new("winmeteo", Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap());
        p.field("temp", 1.0);
        assert!(matches!(
            encode_point(&p),
            Err(InfluxError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn writer_joins_lines() {
        let mut writer = LineProtocolWriter::new();
        writer.push(&point()).unwrap();
        writer.push(&point()).unwrap();
        assert!(writer.push(&Point::new("winmeteo", point().timestamp)).is_err());
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.finish().lines().count(), 2);
    }
}
