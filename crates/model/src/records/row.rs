use crate::core::value::RawValue;
use chrono::DateTime;
use chrono_tz::Tz;

/// Column holding the row date (`YYYY-MM-DD`).
pub const DATE_COLUMN: &str = "DAT";
/// Column holding the row time of day (`HH:MM`).
pub const TIME_COLUMN: &str = "CAS";

#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub value: RawValue,
}

impl RawField {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        RawField {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One station row, columns in file order, tagged with its local timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub fields: Vec<RawField>,
    pub timestamp: DateTime<Tz>,
}

impl RawRecord {
    pub fn new(fields: Vec<RawField>, timestamp: DateTime<Tz>) -> Self {
        RawRecord { fields, timestamp }
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        get_value(&self.fields, column)
    }
}

/// Looks up a column by exact name.
pub fn get_value<'a>(fields: &'a [RawField], column: &str) -> Option<&'a RawValue> {
    fields.iter().find(|f| f.name == column).map(|f| &f.value)
}
