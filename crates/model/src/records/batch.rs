use crate::records::row::RawRecord;
use chrono::DateTime;
use chrono_tz::Tz;

/// The newest timestamp in a batch, independent of row order.
pub fn latest_timestamp(records: &[RawRecord]) -> Option<DateTime<Tz>> {
    records.iter().map(|r| r.timestamp).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::parse_station_time;
    use chrono_tz::Europe::Prague;

    fn at(time: &str) -> RawRecord {
        RawRecord::new(
            Vec::new(),
            parse_station_time("2024-01-01", time, Prague).unwrap(),
        )
    }

    #[test]
    fn picks_maximum_not_last() {
        let batch = vec![at("10:00"), at("10:15"), at("10:05")];
        assert_eq!(latest_timestamp(&batch), Some(batch[1].timestamp));
    }

    #[test]
    fn empty_batch_has_no_latest() {
        assert_eq!(latest_timestamp(&[]), None);
    }
}
