use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// A cell value as read from the station file, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoercionError {
    #[error("value is null")]
    Null,

    #[error("cannot parse '{0}' as a number")]
    NotNumeric(String),

    #[error("date value {0} has no numeric form")]
    Date(NaiveDate),

    #[error("value {0} is not finite")]
    NotFinite(f64),
}

impl RawValue {
    /// Coerces the value into a finite float.
    pub fn as_f64(&self) -> Result<f64, CoercionError> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Integer(v) => *v as f64,
            RawValue::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            RawValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CoercionError::NotNumeric(s.clone()))?,
            RawValue::Date(d) => return Err(CoercionError::Date(*d)),
            RawValue::Null => return Err(CoercionError::Null),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(CoercionError::NotFinite(value))
        }
    }

    /// Textual form used when a cell takes part in timestamp parsing.
    /// Dates render as `YYYY-MM-DD`, text is trimmed, null has no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.trim().to_string()),
            RawValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            RawValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Number(v) => write!(f, "{v}"),
            RawValue::Integer(v) => write!(f, "{v}"),
            RawValue::Bool(v) => write!(f, "{v}"),
            RawValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            RawValue::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_before_parsing() {
        assert_eq!(RawValue::from(" 55.2 ").as_f64(), Ok(55.2));
    }

    #[test]
    fn integers_and_bools_coerce() {
        assert_eq!(RawValue::Integer(7).as_f64(), Ok(7.0));
        assert_eq!(RawValue::Bool(true).as_f64(), Ok(1.0));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(
            RawValue::from("n/a").as_f64(),
            Err(CoercionError::NotNumeric("n/a".into()))
        );
    }

    #[test]
    fn rejects_null_and_nan() {
        assert_eq!(RawValue::Null.as_f64(), Err(CoercionError::Null));
        assert!(matches!(
            RawValue::Number(f64::NAN).as_f64(),
            Err(CoercionError::NotFinite(_))
        ));
    }

    #[test]
    fn date_renders_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(RawValue::Date(d).as_text().as_deref(), Some("2024-01-01"));
        assert_eq!(RawValue::Null.as_text(), None);
    }
}
