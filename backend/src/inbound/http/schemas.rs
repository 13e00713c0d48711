//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`; these
//! wrappers mirror their wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The request or technician does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request is not in a state the operation requires.
    #[schema(rename = "precondition_failed")]
    PreconditionFailed,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "request not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::RequestStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RequestStatus)]
pub enum RequestStatusSchema {
    #[schema(rename = "Pendiente")]
    Pending,
    #[schema(rename = "Asignada")]
    Assigned,
    #[schema(rename = "En camino")]
    EnRoute,
    #[schema(rename = "En progreso")]
    InProgress,
    #[schema(rename = "Terminado")]
    Done,
}

/// OpenAPI schema for [`crate::domain::RequestType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RequestType)]
pub enum RequestTypeSchema {
    #[schema(rename = "Servicio Técnico")]
    TechnicalService,
    #[schema(rename = "Entrega")]
    Delivery,
    #[schema(rename = "Recogida")]
    Pickup,
    #[schema(rename = "Diligencias Bancarias")]
    BankErrand,
    #[schema(rename = "Otros")]
    Other,
}

#[cfg(test)]
mod tests {
    use utoipa::PartialSchema;

    use super::*;
    use crate::domain::{RequestStatus, RequestType};

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "precondition_failed",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_describes_message() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_to_json::<ErrorSchema>().contains("message"));
    }

    #[test]
    fn status_schema_uses_wire_labels() {
        let json = schema_to_json::<RequestStatusSchema>();
        for status in [
            RequestStatus::Pending,
            RequestStatus::Assigned,
            RequestStatus::EnRoute,
            RequestStatus::InProgress,
            RequestStatus::Done,
        ] {
            assert!(json.contains(status.as_str()), "missing {status}");
        }
    }

    #[test]
    fn request_type_schema_uses_wire_labels() {
        let json = schema_to_json::<RequestTypeSchema>();
        for kind in RequestType::ALL {
            assert!(json.contains(kind.as_str()), "missing {kind}");
        }
    }
}
