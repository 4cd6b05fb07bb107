//! Shared query-parameter parsing for inbound HTTP adapters.
//!
//! Discovery parameters are parsed leniently: a malformed optional value is
//! treated as absent. Required parameters fail with an `invalid_request`
//! error whose details name the field and a machine-readable code.

use serde_json::json;

use crate::domain::{Coordinates, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    OutOfRange,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn invalid_number_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::InvalidNumber,
        format!("{name} must be a number"),
    )
}

pub(crate) fn out_of_range_error(field: FieldName, message: String) -> Error {
    field_error(field, ErrorCode::OutOfRange, message)
}

pub(crate) fn invalid_body_error(message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "code": ErrorCode::InvalidBody.as_str(),
    }))
}

/// Parse a float, treating blank, malformed, and non-finite input as absent.
pub(crate) fn lenient_f64(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parse an integer, treating blank and malformed input as absent.
pub(crate) fn lenient_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Parse a boolean flag; only `true` and `1` enable it.
pub(crate) fn lenient_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| {
        let trimmed = value.trim();
        trimmed.eq_ignore_ascii_case("true") || trimmed == "1"
    })
}

/// Coordinates from optional `lat`/`lng`, or `None` when either is missing
/// or invalid.
pub(crate) fn lenient_location(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    Coordinates::from_parts(lenient_f64(lat), lenient_f64(lng))
}

/// Parse a required float field.
pub(crate) fn required_f64(raw: Option<&str>, field: FieldName) -> Result<f64, Error> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| invalid_number_error(field))
}

/// Parse required `lat`/`lng` into validated coordinates.
pub(crate) fn required_location(
    lat: Option<&str>,
    lng: Option<&str>,
) -> Result<Coordinates, Error> {
    const LAT: FieldName = FieldName::new("lat");
    const LNG: FieldName = FieldName::new("lng");

    let latitude = required_f64(lat, LAT)?;
    let longitude = required_f64(lng, LNG)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(out_of_range_error(
            LAT,
            "lat must be within [-90, 90]".to_owned(),
        ));
    }
    Coordinates::try_new(latitude, longitude).map_err(|err| out_of_range_error(LNG, err.to_string()))
}
