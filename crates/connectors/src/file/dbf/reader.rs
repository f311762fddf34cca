use crate::file::dbf::error::DbfError;
use chrono::NaiveDate;
use dbase::FieldValue;
use model::{core::value::RawValue, records::row::RawField};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fully loaded contents of a DBF table.
#[derive(Debug, Clone, Default)]
pub struct DbfTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawField>>,
}

/// Reads the station's DBF file. Every call loads the whole table; station
/// files are small and are rewritten in place by the logger.
#[derive(Debug, Clone)]
pub struct DbfReader {
    path: PathBuf,
}

impl DbfReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbfReader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_table(&self) -> Result<DbfTable, DbfError> {
        let mut reader = dbase::Reader::from_path(&self.path).map_err(|source| DbfError::Open {
            path: self.path.clone(),
            source,
        })?;

        let columns = reader
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect::<Vec<_>>();

        let records = reader.read().map_err(|source| DbfError::Read {
            path: self.path.clone(),
            source,
        })?;

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .filter_map(|name| {
                        record
                            .get(name)
                            .map(|value| RawField::new(name.as_str(), to_raw_value(value)))
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        debug!(
            path = %self.path.display(),
            columns = columns.len(),
            rows = rows.len(),
            "Loaded DBF table"
        );

        Ok(DbfTable { columns, rows })
    }
}

/// Normalizes a dBase cell into a [`RawValue`].
pub fn to_raw_value(value: &FieldValue) -> RawValue {
    match value {
        FieldValue::Character(Some(s)) => RawValue::Text(s.clone()),
        FieldValue::Memo(s) => RawValue::Text(s.clone()),
        FieldValue::Numeric(Some(v)) => RawValue::Number(*v),
        FieldValue::Float(Some(v)) => RawValue::Number(f64::from(*v)),
        FieldValue::Double(v) => RawValue::Number(*v),
        FieldValue::Currency(v) => RawValue::Number(*v),
        FieldValue::Integer(v) => RawValue::Integer(i64::from(*v)),
        FieldValue::Logical(Some(v)) => RawValue::Bool(*v),
        FieldValue::Date(Some(d)) => {
            match NaiveDate::from_ymd_opt(d.year() as i32, d.month(), d.day()) {
                Some(date) => RawValue::Date(date),
                None => RawValue::Null,
            }
        }
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None)
        | FieldValue::Date(None) => RawValue::Null,
        other => RawValue::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbase::{Date, Record, TableWriterBuilder};
    use tempfile::NamedTempFile;

    fn station_record(day: u32, time: &str, temp: Option<f64>) -> Record {
        let mut record = Record::default();
        record.insert("DAT".into(), FieldValue::Date(Some(Date::new(day, 3, 2024))));
        record.insert("CAS".into(), FieldValue::Character(Some(time.into())));
        record.insert("TEP2M".into(), FieldValue::Numeric(temp));
        record
    }

    fn station_table(records: &[Record]) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        TableWriterBuilder::new()
            .add_date_field("DAT".try_into().unwrap())
            .add_character_field("CAS".try_into().unwrap(), 5)
            .add_numeric_field("TEP2M".try_into().unwrap(), 8, 2)
            .build_with_file_dest(file.path())
            .unwrap()
            .write_records(records)
            .unwrap();
        file
    }

    #[test]
    fn reads_station_table_in_file_order() {
        let file = station_table(&[
            station_record(30, "10:00", Some(3.4)),
            station_record(31, "10:15", None),
        ]);

        let table = DbfReader::new(file.path()).read_table().unwrap();
        assert_eq!(table.columns, vec!["DAT", "CAS", "TEP2M"]);
        assert_eq!(table.rows.len(), 2);

        let names = table.rows[0].iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["DAT", "CAS", "TEP2M"]);

        let first = &table.rows[0];
        assert_eq!(first[0].value.as_text().as_deref(), Some("2024-03-30"));
        assert_eq!(first[1].value, RawValue::Text("10:00".into()));
        assert_eq!(first[2].value, RawValue::Number(3.4));

        let second = &table.rows[1];
        assert_eq!(second[0].value.as_text().as_deref(), Some("2024-03-31"));
        assert_eq!(second[2].value, RawValue::Null);
    }

    #[test]
    fn converts_character_and_numeric_cells() {
        assert_eq!(
            to_raw_value(&FieldValue::Character(Some("10:00".into()))),
            RawValue::Text("10:00".into())
        );
        assert_eq!(
            to_raw_value(&FieldValue::Numeric(Some(55.2))),
            RawValue::Number(55.2)
        );
        assert_eq!(to_raw_value(&FieldValue::Integer(3)), RawValue::Integer(3));
    }

    #[test]
    fn empty_cells_become_null() {
        assert_eq!(to_raw_value(&FieldValue::Numeric(None)), RawValue::Null);
        assert_eq!(to_raw_value(&FieldValue::Character(None)), RawValue::Null);
        assert_eq!(to_raw_value(&FieldValue::Date(None)), RawValue::Null);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let reader = DbfReader::new("/nonexistent/meteo.DBF");
        assert!(matches!(reader.read_table(), Err(DbfError::Open { .. })));
    }
}
