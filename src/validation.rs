//! Field-level checks shared by the resource validators.
//!
//! Validators work on the raw `serde_json::Value` body rather than a derived
//! struct: a missing field, a field of the wrong JSON type and an empty field
//! must all collapse into the same typed failure, which serde would report as
//! three different deserialization errors.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Typed outcome of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The path identifier is not an integer greater than zero.
    InvalidIdentifier,
    /// A required string field is absent, not a string, or blank once trimmed.
    MissingOrEmptyField(&'static str),
    /// A required numeric field is absent, not a number, or not strictly positive.
    InvalidPositiveNumber(&'static str),
    /// An optional field is present with a value of the wrong type.
    InvalidField(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::InvalidIdentifier => write!(f, "invalid identifier"),
            ValidationError::MissingOrEmptyField(field) => {
                write!(f, "field `{}` is missing or empty", field)
            }
            ValidationError::InvalidPositiveNumber(field) => {
                write!(f, "field `{}` must be a positive number", field)
            }
            ValidationError::InvalidField(field) => write!(f, "field `{}` is invalid", field),
        }
    }
}

/// Parses a path identifier. Only a plain decimal integer above zero is accepted,
/// so `"12abc"`, `"0"`, `"-3"` and `"1.5"` are all rejected.
pub fn parse_identifier(raw: &str) -> Result<i32, ValidationError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidIdentifier),
    }
}

/// Returns the trimmed value of a required, non-blank string field.
pub fn required_string(body: &Value, field: &'static str) -> Result<String, ValidationError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingOrEmptyField(field))
}

/// Returns a required number that is strictly greater than zero, unchanged.
pub fn positive_number(body: &Value, field: &'static str) -> Result<f64, ValidationError> {
    body.get(field)
        .and_then(Value::as_f64)
        .filter(|value| *value > 0.0)
        .ok_or(ValidationError::InvalidPositiveNumber(field))
}

/// Reads an optional field of type `T`. Absent and `null` both yield `None`;
/// any other value must deserialize as `T`.
pub fn optional<T: DeserializeOwned>(
    body: &Value,
    field: &'static str,
) -> Result<Option<T>, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| ValidationError::InvalidField(field)),
    }
}

/// Reads an optional RFC 3339 timestamp.
pub fn optional_timestamp(
    body: &Value,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|_| ValidationError::InvalidField(field)),
        Some(_) => Err(ValidationError::InvalidField(field)),
    }
}
