//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{
    Coordinates, CoordinatesValidationError, Error, RequestId, RequestType, TechnicianId,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidCoordinates,
    InvalidRequestType,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidCoordinates => "invalid_coordinates",
            Self::InvalidRequestType => "invalid_request_type",
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

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ValidationCode,
    message: String,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Unwrap a required body field, treating blank strings as missing.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_request_id(raw: &str) -> Result<RequestId, Error> {
    let field = FieldName::new("id");
    RequestId::parse(raw).map_err(|_| {
        field_value_error(
            field,
            ValidationCode::InvalidId,
            "request id must be a positive integer".to_owned(),
            raw,
        )
    })
}

pub(crate) fn parse_technician_id(raw: &str) -> Result<TechnicianId, Error> {
    let field = FieldName::new("id");
    TechnicianId::parse(raw).map_err(|err| {
        field_value_error(field, ValidationCode::InvalidId, err.to_string(), raw)
    })
}

pub(crate) fn parse_request_type(
    value: Option<String>,
    field: FieldName,
) -> Result<RequestType, Error> {
    let raw = require_text(value, field)?;
    raw.parse::<RequestType>().map_err(|err| {
        field_value_error(field, ValidationCode::InvalidRequestType, err.to_string(), &raw)
    })
}

fn coordinates_error(error: CoordinatesValidationError) -> Error {
    let field = match error {
        CoordinatesValidationError::LongitudeOutOfRange { .. } => FieldName::new("longitude"),
        CoordinatesValidationError::LatitudeOutOfRange { .. }
        | CoordinatesValidationError::Incomplete => FieldName::new("latitude"),
    };
    field_error(field, ValidationCode::InvalidCoordinates, error.to_string())
}

/// Optional destination: both components or neither.
pub(crate) fn parse_optional_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinates>, Error> {
    Coordinates::from_optional(latitude, longitude).map_err(coordinates_error)
}

/// Required position: both components must be present and in range.
pub(crate) fn parse_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Coordinates, Error> {
    let latitude = latitude.ok_or_else(|| missing_field_error(FieldName::new("latitude")))?;
    let longitude = longitude.ok_or_else(|| missing_field_error(FieldName::new("longitude")))?;
    Coordinates::new(latitude, longitude).map_err(coordinates_error)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode;

    fn detail_code(error: &Error) -> Option<&str> {
        error.details().and_then(|d| d.get("code")).and_then(Value::as_str)
    }

    #[rstest]
    #[case("0")]
    #[case("abc")]
    #[case("-3")]
    fn rejects_non_positive_ids(#[case] raw: &str) {
        let err = parse_request_id(raw).expect_err("invalid id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail_code(&err), Some("invalid_id"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("  ".to_owned()))]
    fn request_type_is_required(#[case] value: Option<String>) {
        let err = parse_request_type(value, FieldName::new("requestType")).expect_err("missing");
        assert_eq!(detail_code(&err), Some("missing_field"));
    }

    #[rstest]
    fn unknown_request_type_is_rejected() {
        let err = parse_request_type(Some("Mudanza".to_owned()), FieldName::new("requestType"))
            .expect_err("unknown type");
        assert_eq!(detail_code(&err), Some("invalid_request_type"));
    }

    #[rstest]
    fn position_requires_both_components() {
        let err = parse_coordinates(Some(4.0), None).expect_err("missing longitude");
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
            Some("longitude")
        );
    }

    #[rstest]
    fn out_of_range_longitude_names_the_field() {
        let err = parse_optional_coordinates(Some(4.0), Some(200.0)).expect_err("out of range");
        assert_eq!(detail_code(&err), Some("invalid_coordinates"));
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
            Some("longitude")
        );
    }
}
