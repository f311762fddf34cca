use crate::influx::error::InfluxError;
use chrono::{DateTime, Utc};

const TIME_COLUMN: &str = "_time";

/// Flux query returning the last point of `measurement` within `lookback`.
pub fn last_point_query(bucket: &str, measurement: &str, lookback: &str) -> String {
    format!(
        "from(bucket: \"{}\")\n  |> range(start: -{})\n  |> filter(fn: (r) => r[\"_measurement\"] == \"{}\")\n  |> last()",
        escape_string(bucket),
        lookback,
        escape_string(measurement)
    )
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Extracts the newest `_time` from a CSV query response.
///
/// `last()` yields one table per field; every table repeats its header row,
/// so the `_time` position is re-read whenever a header shows up.
pub fn parse_latest_time(body: &str) -> Result<Option<DateTime<Utc>>, InfluxError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut time_idx: Option<usize> = None;
    let mut latest: Option<DateTime<Utc>> = None;

    for record in reader.records() {
        let record = record?;

        if let Some(pos) = record.iter().position(|cell| cell == TIME_COLUMN) {
            time_idx = Some(pos);
            continue;
        }

        let Some(raw) = time_idx.and_then(|idx| record.get(idx)) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let ts = DateTime::parse_from_rfc3339(raw)
            .map_err(|source| InfluxError::InvalidTime {
                value: raw.to_string(),
                source,
            })?
            .with_timezone(&Utc);

        latest = Some(latest.map_or(ts, |cur| cur.max(ts)));
    }

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builds_last_point_query() {
        let flux = last_point_query("bucket", "winmeteo", "1y");
        assert!(flux.starts_with("from(bucket: \"bucket\")"));
        assert!(flux.contains("range(start: -1y)"));
        assert!(flux.contains("r[\"_measurement\"] == \"winmeteo\""));
        assert!(flux.ends_with("|> last()"));
    }

    #[test]
    fn escapes_quotes_in_names() {
        let flux = last_point_query("b", "we\"ird", "1y");
        assert!(flux.contains(r#"== "we\"ird""#));
    }

    #[test]
    fn picks_latest_time_across_tables() {
        let body = "\
,result,table,_start,_stop,_time,_value,_field,_measurement\r
,_result,0,2023-01-01T00:00:00Z,2024-01-01T12:00:00Z,2024-01-01T09:00:00Z,55.2,humi,winmeteo\r
\r
,result,table,_start,_stop,_time,_value,_field,_measurement\r
,_result,1,2023-01-01T00:00:00Z,2024-01-01T12:00:00Z,2024-01-01T09:15:00Z,3.4,temp,winmeteo\r
";
        let latest = parse_latest_time(body).unwrap();
        assert_eq!(latest, Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap()));
    }

    #[test]
    fn empty_response_means_no_data() {
        assert_eq!(parse_latest_time("").unwrap(), None);
        assert_eq!(parse_latest_time("\r\n").unwrap(), None);
    }

    #[test]
    fn malformed_time_is_an_error() {
        let body = ",result,table,_time\n,_result,0,yesterday\n";
        assert!(matches!(
            parse_latest_time(body),
            Err(InfluxError::InvalidTime { .. })
        ));
    }
}
