use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Wire format for every date-like field: `DD.MM.YYYY`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Birthdays further back than this many (365-day) years are rejected
pub const MAX_AGE_YEARS: i64 = 70;

/// Why a single raw value was rejected by its field kind
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("value is not a string")]
    NotText,

    #[error("value is not a dictionary")]
    NotMapping,

    #[error("value is not an email")]
    NotEmail,

    #[error("value is not a date")]
    NotDate,

    #[error("age is greater than {0}")]
    TooOld(i64),

    #[error("value is not valid gender")]
    NotGender,

    #[error("value is not a client ids list")]
    NotClientIds,
}

/// Closed set of genders accepted by the gender field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Unknown = 0,
    Male = 1,
    Female = 2,
}

impl Gender {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Every kind of field a request schema can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Mapping,
    Email,
    Phone,
    Date,
    BirthDate,
    Gender,
    ClientIds,
}

/// Typed value produced by a successful field validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Mapping(Map<String, Value>),
    Date(NaiveDate),
    Gender(Gender),
    ClientIds(Vec<i64>),
    /// An empty raw value kept as-is because the field is nullable
    Raw(Value),
}

impl FieldValue {
    /// Presence as seen by composite rules: empty strings, lists and raw
    /// empties are absent, everything typed is present (including gender 0)
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Mapping(m) => !m.is_empty(),
            FieldValue::Date(_) | FieldValue::Gender(_) => true,
            FieldValue::ClientIds(ids) => !ids.is_empty(),
            FieldValue::Raw(v) => !is_empty_value(v),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Raw(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_gender(&self) -> Option<Gender> {
        match self {
            FieldValue::Gender(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_client_ids(&self) -> Option<&[i64]> {
        match self {
            FieldValue::ClientIds(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            FieldValue::Mapping(m) => Some(m),
            FieldValue::Raw(Value::Object(m)) => Some(m),
            _ => None,
        }
    }
}

/// Emptiness as the validation pipeline sees it. Numbers and booleans are
/// never empty, so `0` and `false` always reach type validation.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(_) | Value::Number(_) => false,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl FieldKind {
    /// Validate one non-empty raw value against today's local date.
    ///
    /// `Ok(None)` means the field accepted the input without producing a
    /// value; only the phone kind does that.
    pub fn validate(&self, raw: &Value) -> Result<Option<FieldValue>, FieldError> {
        self.validate_at(raw, Local::now().date_naive())
    }

    pub fn validate_at(&self, raw: &Value, today: NaiveDate) -> Result<Option<FieldValue>, FieldError> {
        match self {
            FieldKind::Text => text(raw).map(|s| Some(FieldValue::Text(s.to_string()))),
            FieldKind::Mapping => match raw {
                Value::Object(m) => Ok(Some(FieldValue::Mapping(m.clone()))),
                _ => Err(FieldError::NotMapping),
            },
            FieldKind::Email => {
                let s = text(raw)?;
                if s.contains('@') {
                    Ok(Some(FieldValue::Text(s.to_string())))
                } else {
                    Err(FieldError::NotEmail)
                }
            }
            FieldKind::Phone => Ok(phone(raw).map(FieldValue::Text)),
            FieldKind::Date => date(raw).map(|d| Some(FieldValue::Date(d))),
            FieldKind::BirthDate => {
                let born = date(raw)?;
                let years = (today - born).num_days().div_euclid(365);
                if years > MAX_AGE_YEARS {
                    return Err(FieldError::TooOld(MAX_AGE_YEARS));
                }
                Ok(Some(FieldValue::Date(born)))
            }
            FieldKind::Gender => integer(raw)
                .and_then(Gender::from_code)
                .map(|g| Some(FieldValue::Gender(g)))
                .ok_or(FieldError::NotGender),
            FieldKind::ClientIds => {
                let items = raw.as_array().ok_or(FieldError::NotClientIds)?;
                items
                    .iter()
                    .map(|item| integer(item).ok_or(FieldError::NotClientIds))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|ids| Some(FieldValue::ClientIds(ids)))
            }
        }
    }
}

// Booleans are integers on the wire: `false` is 0 and `true` is 1
fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Bool(b) => Some(i64::from(*b)),
        other => other.as_i64(),
    }
}

fn text(raw: &Value) -> Result<&str, FieldError> {
    raw.as_str().ok_or(FieldError::NotText)
}

fn date(raw: &Value) -> Result<NaiveDate, FieldError> {
    let s = text(raw).map_err(|_| FieldError::NotDate)?;
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| FieldError::NotDate)
}

// A phone that does not look like 7XXXXXXXXXX yields no value and no error.
fn phone(raw: &Value) -> Option<String> {
    let coerced = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let well_formed = !coerced.is_empty()
        && coerced.chars().all(|c| c.is_ascii_digit())
        && coerced.starts_with('7');
    well_formed.then_some(coerced)
}
