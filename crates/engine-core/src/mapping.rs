//! Station column → canonical metric translation.
//!
//! Every column the logger is known to write appears in exactly one of the
//! tables below. Anything else is reported as unknown so operators notice
//! firmware or configuration changes on the station.

use crate::error::MappingError;
use lazy_static::lazy_static;
use model::core::value::RawValue;
use std::collections::HashMap;

/// Bookkeeping columns written by the logger itself.
pub const RESERVED_COLUMNS: &[&str] = &["DAT", "CAS", "EX", "RESETCNT", "RESETTYP", "_NullFlags"];

/// Present weather detector channels, not wired on this station.
pub const UNUSED_COLUMNS: &[&str] = &[
    "PWD_ERR", "PWD_V01", "PWD_V10", "PWD_P01", "PWD_P15", "PWD_WI", "PWD_WS", "PWD_SS", "PWD_T",
    "PWD_BL",
];

/// Sensor column → canonical metric name.
pub const METRIC_COLUMNS: &[(&str, &str)] = &[
    ("VLVZD", "humi"),
    ("TEP2M", "temp"),
    ("TEP2M_I", "temp_min"),
    ("TEP2M_X", "temp_max"),
    ("TLAK", "press"),
    ("TLAK_M", "press_sea"),
    ("SRAZKY", "rain"),
    ("RYCHV", "wind_speed"),
    ("SMERV", "wind_dir"),
    ("RYCHV_P", "wind_speed_avg"),
    ("SMERV_P", "wind_dir_avg"),
    ("RYCHV_X", "wind_speed_max"),
    ("SMERV_X", "wind_dir_max"),
    ("CASV_X", "wind_time_max"),
    ("NABAT_E", "volt_exp"),
    ("NABAT", "volt"),
    ("NABAT_I", "volt_min"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Reserved,
    Unused,
    Metric(&'static str),
}

lazy_static! {
    static ref COLUMN_ROLES: HashMap<&'static str, ColumnRole> = {
        let mut roles = HashMap::new();
        for col in RESERVED_COLUMNS {
            roles.insert(*col, ColumnRole::Reserved);
        }
        for col in UNUSED_COLUMNS {
            roles.insert(*col, ColumnRole::Unused);
        }
        for (col, metric) in METRIC_COLUMNS {
            roles.insert(*col, ColumnRole::Metric(*metric));
        }
        roles
    };
}

/// Result of mapping one column of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    Mapped { name: &'static str, value: f64 },
    Ignored,
    Unknown,
}

pub fn classify(column: &str) -> Option<ColumnRole> {
    COLUMN_ROLES.get(column).copied()
}

/// Maps a raw column to its canonical metric.
///
/// A value that cannot be read as a finite float is an error for this field
/// only; callers keep the rest of the row.
pub fn map_field(column: &str, value: &RawValue) -> Result<FieldOutcome, MappingError> {
    match classify(column) {
        Some(ColumnRole::Reserved) | Some(ColumnRole::Unused) => Ok(FieldOutcome::Ignored),
        Some(ColumnRole::Metric(name)) => {
            let value = value.as_f64().map_err(|source| MappingError {
                column: column.to_string(),
                value: value.to_string(),
                source,
            })?;
            Ok(FieldOutcome::Mapped { name, value })
        }
        None => Ok(FieldOutcome::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::CoercionError;
    use std::collections::HashSet;

    #[test]
    fn tables_do_not_overlap() {
        let total = RESERVED_COLUMNS.len() + UNUSED_COLUMNS.len() + METRIC_COLUMNS.len();
        assert_eq!(COLUMN_ROLES.len(), total);
    }

    #[test]
    fn metric_names_are_unique() {
        let names = METRIC_COLUMNS.iter().map(|(_, m)| *m).collect::<HashSet<_>>();
        assert_eq!(names.len(), METRIC_COLUMNS.len());
    }

    #[test]
    fn system_and_unused_columns_are_ignored() {
        for col in RESERVED_COLUMNS.iter().chain(UNUSED_COLUMNS) {
            assert_eq!(
                map_field(col, &RawValue::from("1")).unwrap(),
                FieldOutcome::Ignored,
                "{col}"
            );
        }
    }

    #[test]
    fn every_sensor_column_maps_to_its_metric() {
        for (col, metric) in METRIC_COLUMNS {
            assert_eq!(
                map_field(col, &RawValue::from("1.5")).unwrap(),
                FieldOutcome::Mapped {
                    name: *metric,
                    value: 1.5
                }
            );
        }
    }

    #[test]
    fn known_examples() {
        assert_eq!(
            map_field("VLVZD", &RawValue::from("55.2")).unwrap(),
            FieldOutcome::Mapped {
                name: "humi",
                value: 55.2
            }
        );
        assert_eq!(
            map_field("TEP2M", &RawValue::Number(3.4)).unwrap(),
            FieldOutcome::Mapped {
                name: "temp",
                value: 3.4
            }
        );
    }

    #[test]
    fn anything_else_is_unknown() {
        for col in ["", "dat", "TEP3M", "humi", "VLVZD "] {
            assert_eq!(
                map_field(col, &RawValue::from("1")).unwrap(),
                FieldOutcome::Unknown,
                "{col:?}"
            );
        }
    }

    #[test]
    fn ignored_columns_never_coerce() {
        assert_eq!(
            map_field("_NullFlags", &RawValue::Null).unwrap(),
            FieldOutcome::Ignored
        );
    }

    #[test]
    fn coercion_failure_names_the_column() {
        let err = map_field("TLAK", &RawValue::from("---")).unwrap_err();
        assert_eq!(err.column, "TLAK");
        assert_eq!(err.source, CoercionError::NotNumeric("---".into()));
    }
}
