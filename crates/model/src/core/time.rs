use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;

/// Format of the combined `DAT` + `CAS` columns.
pub const STATION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error, PartialEq)]
#[error("malformed station timestamp '{input}': {reason}")]
pub struct TimestampError {
    pub input: String,
    pub reason: String,
}

/// Parses a station date (`YYYY-MM-DD`) and time (`HH:MM`) and attaches `tz`.
pub fn parse_station_time(date: &str, time: &str, tz: Tz) -> Result<DateTime<Tz>, TimestampError> {
    let input = format!("{} {}", date.trim(), time.trim());
    let naive = NaiveDateTime::parse_from_str(&input, STATION_TIMESTAMP_FORMAT).map_err(|e| {
        TimestampError {
            input: input.clone(),
            reason: e.to_string(),
        }
    })?;
    Ok(localize(&naive, tz))
}

/// Attaches `tz` to a wall-clock time.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// inside a gap (clocks going forward) are read with the offset in force just
/// before the gap.
pub fn localize(naive: &NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before_gap = naive
                .checked_sub_signed(TimeDelta::hours(24))
                .unwrap_or(*naive);
            let offset = tz.offset_from_utc_datetime(&before_gap).fix();
            let utc = naive
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(*naive);
            tz.from_utc_datetime(&utc)
        }
    }
}

/// The boundary below which every station row is considered ingested.
///
/// A watermark only ever moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark(DateTime<Tz>);

impl Watermark {
    pub fn new(at: DateTime<Tz>) -> Self {
        Watermark(at)
    }

    /// The earliest representable wall time, `0001-01-01 00:00` local.
    pub fn beginning(tz: Tz) -> Self {
        let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
        Watermark(localize(&date.and_time(chrono::NaiveTime::MIN), tz))
    }

    /// Builds a watermark from a sink timestamp, normalized to `tz`.
    pub fn from_utc(at: DateTime<Utc>, tz: Tz) -> Self {
        Watermark(at.with_timezone(&tz))
    }

    pub fn timestamp(&self) -> &DateTime<Tz> {
        &self.0
    }

    /// True when `at` is strictly newer than the watermark.
    pub fn admits(&self, at: &DateTime<Tz>) -> bool {
        *at > self.0
    }

    /// Moves the watermark to `candidate` if it is newer. Returns whether it moved.
    pub fn advance(&mut self, candidate: DateTime<Tz>) -> bool {
        if candidate > self.0 {
            self.0 = candidate;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Europe::Prague;

    #[test]
    fn parses_winter_time() {
        let ts = parse_station_time("2024-01-01", "10:00", Prague).unwrap();
        let utc = ts.with_timezone(&Utc);
        assert_eq!((utc.hour(), utc.minute()), (9, 0));
    }

    #[test]
    fn parses_summer_time() {
        let ts = parse_station_time("2024-07-01", "10:00", Prague).unwrap();
        assert_eq!(ts.with_timezone(&Utc).hour(), 8);
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse_station_time("2024-13-01", "10:00", Prague).unwrap_err();
        assert_eq!(err.input, "2024-13-01 10:00");
        assert!(parse_station_time("2024-01-01", "10:00:00", Prague).is_err());
        assert!(parse_station_time("", "", Prague).is_err());
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // 2024-10-27 02:30 happens twice in Prague
        let ts = parse_station_time("2024-10-27", "02:30", Prague).unwrap();
        assert_eq!(ts.with_timezone(&Utc).hour(), 0);
    }

    #[test]
    fn gap_time_uses_offset_before_gap() {
        // 2024-03-31 02:30 does not exist in Prague
        let ts = parse_station_time("2024-03-31", "02:30", Prague).unwrap();
        let utc = ts.with_timezone(&Utc);
        assert_eq!((utc.hour(), utc.minute()), (1, 30));
    }

    #[test]
    fn beginning_is_year_one() {
        let wm = Watermark::beginning(Prague);
        assert_eq!(wm.timestamp().year(), 1);
        let any = parse_station_time("1900-01-01", "00:00", Prague).unwrap();
        assert!(wm.admits(&any));
    }

    #[test]
    fn advance_never_rewinds() {
        let early = parse_station_time("2024-01-01", "10:00", Prague).unwrap();
        let late = parse_station_time("2024-01-01", "10:15", Prague).unwrap();

        let mut wm = Watermark::new(late);
        assert!(!wm.advance(early));
        assert_eq!(wm.timestamp(), &late);
        assert!(!wm.admits(&late));
    }

    #[test]
    fn from_utc_normalizes_to_local_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let wm = Watermark::from_utc(utc, Prague);
        assert_eq!(wm.timestamp().hour(), 10);
    }
}
