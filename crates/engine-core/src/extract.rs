use crate::{connectors::source::RecordSource, error::ExtractError};
use chrono::DateTime;
use chrono_tz::Tz;
use model::{
    core::time::{Watermark, parse_station_time},
    records::row::{DATE_COLUMN, RawField, RawRecord, TIME_COLUMN, get_value},
};
use std::sync::Arc;
use tracing::debug;

/// Pulls rows newer than the watermark out of the station source.
pub struct RecordExtractor {
    source: Arc<dyn RecordSource>,
    tz: Tz,
}

impl RecordExtractor {
    pub fn new(source: Arc<dyn RecordSource>, tz: Tz) -> Self {
        Self { source, tz }
    }

    /// Reads the whole source and keeps rows strictly newer than `watermark`,
    /// in source order. Any row with a missing or malformed timestamp fails
    /// the whole call.
    pub async fn extract(&self, watermark: &Watermark) -> Result<Vec<RawRecord>, ExtractError> {
        let rows = self.source.read_rows().await?;
        let total = rows.len();

        let mut fresh = Vec::new();
        for (idx, fields) in rows.into_iter().enumerate() {
            let timestamp = row_timestamp(idx, &fields, self.tz)?;
            if watermark.admits(&timestamp) {
                fresh.push(RawRecord::new(fields, timestamp));
            }
        }

        debug!(
            source = %self.source.describe(),
            total,
            fresh = fresh.len(),
            watermark = %watermark,
            "Extracted rows"
        );
        Ok(fresh)
    }
}

/// Local timestamp of a row from its `DAT` and `CAS` columns.
pub fn row_timestamp(row: usize, fields: &[RawField], tz: Tz) -> Result<DateTime<Tz>, ExtractError> {
    let text = |column: &str| {
        get_value(fields, column)
            .and_then(|v| v.as_text())
            .ok_or_else(|| ExtractError::MissingColumn {
                row,
                column: column.to_string(),
            })
    };

    let date = text(DATE_COLUMN)?;
    let time = text(TIME_COLUMN)?;
    parse_station_time(&date, &time, tz).map_err(|source| ExtractError::Timestamp { row, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Prague;
    use model::core::value::RawValue;

    struct StaticSource(Vec<Vec<RawField>>);

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn read_rows(&self) -> Result<Vec<Vec<RawField>>, SourceError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    fn row(date: &str, time: &str, temp: &str) -> Vec<RawField> {
        vec![
            RawField::new("DAT", date),
            RawField::new("CAS", time),
            RawField::new("TEP2M", temp),
        ]
    }

    fn extractor(rows: Vec<Vec<RawField>>) -> RecordExtractor {
        RecordExtractor::new(Arc::new(StaticSource(rows)), Prague)
    }

    fn wm(date: &str, time: &str) -> Watermark {
        Watermark::new(parse_station_time(date, time, Prague).unwrap())
    }

    #[tokio::test]
    async fn keeps_only_rows_strictly_after_watermark() {
        let ex = extractor(vec![
            row("2024-01-01", "09:45", "1"),
            row("2024-01-01", "10:00", "2"),
            row("2024-01-01", "10:15", "3"),
        ]);

        let rows = ex.extract(&wm("2024-01-01", "10:00")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("TEP2M"), Some(&RawValue::from("3")));
    }

    #[tokio::test]
    async fn preserves_source_order() {
        let ex = extractor(vec![
            row("2024-01-01", "10:00", "a"),
            row("2024-01-01", "10:15", "b"),
            row("2024-01-01", "10:05", "c"),
        ]);

        let rows = ex.extract(&Watermark::beginning(Prague)).await.unwrap();
        let order = rows
            .iter()
            .map(|r| r.get("TEP2M").cloned())
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                Some(RawValue::from("a")),
                Some(RawValue::from("b")),
                Some(RawValue::from("c"))
            ]
        );
    }

    #[tokio::test]
    async fn repeated_extraction_is_idempotent() {
        let ex = extractor(vec![
            row("2024-01-01", "10:00", "1"),
            row("2024-01-01", "10:15", "2"),
        ]);
        let mark = wm("2024-01-01", "09:00");

        let first = ex.extract(&mark).await.unwrap();
        let second = ex.extract(&mark).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn date_typed_column_is_accepted() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ex = extractor(vec![vec![
            RawField::new("DAT", RawValue::Date(date)),
            RawField::new("CAS", "10:00"),
        ]]);

        let rows = ex.extract(&Watermark::beginning(Prague)).await.unwrap();
        assert_eq!(rows[0].timestamp, parse_station_time("2024-01-01", "10:00", Prague).unwrap());
    }

    #[tokio::test]
    async fn malformed_timestamp_fails_the_call() {
        let ex = extractor(vec![
            row("2024-01-01", "10:00", "1"),
            row("2024-01-01", "25:99", "2"),
        ]);

        let err = ex.extract(&Watermark::beginning(Prague)).await.unwrap_err();
        assert!(matches!(err, ExtractError::Timestamp { row: 1, .. }));
    }

    #[tokio::test]
    async fn missing_time_column_fails_the_call() {
        let ex = extractor(vec![vec![RawField::new("DAT", "2024-01-01")]]);

        let err = ex.extract(&Watermark::beginning(Prague)).await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingColumn { row: 0, ref column } if column == "CAS"));
    }
}
