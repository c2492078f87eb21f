//! Helpers for validating untyped request payloads.

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Current calendar date (UTC).
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn as_object(data: &Value) -> Result<&Map<String, Value>, ValidationError> {
    data.as_object().ok_or(ValidationError::BadPayload)
}

/// Required field that must be an integer ≥ 0.
pub(crate) fn non_negative_int(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, ValidationError> {
    let value = map.get(field).ok_or(ValidationError::MissingField(field))?;
    match value.as_i64() {
        Some(v) if v >= 0 => Ok(v),
        _ => Err(ValidationError::InvalidField {
            field,
            expected: "a non-negative integer",
        }),
    }
}

/// Required field that must be an integer ≥ 1.
pub(crate) fn positive_int(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, ValidationError> {
    let value = map.get(field).ok_or(ValidationError::MissingField(field))?;
    match value.as_i64() {
        Some(v) if v >= 1 => Ok(v),
        _ => Err(ValidationError::InvalidField {
            field,
            expected: "a positive integer",
        }),
    }
}

/// Required field that must be a number ≥ 0. Integers are accepted.
pub(crate) fn non_negative_number(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, ValidationError> {
    let value = map.get(field).ok_or(ValidationError::MissingField(field))?;
    match value.as_f64() {
        Some(v) if v >= 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidField {
            field,
            expected: "a non-negative number",
        }),
    }
}

/// Optional integer field. Absent and explicit-null both read as `None`.
pub(crate) fn optional_int(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match map.get(field) {
        None => Ok(None),
        Some(value) if value.is_null() => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or(ValidationError::InvalidField {
                field,
                expected: "an integer",
            }),
    }
}
