//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives.
//!
//! The document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary for client generation.

use utoipa::OpenApi;

use crate::inbound::http::requests::{
    AssignTechnicianBody, AutoStatusBody, AutoStatusResponse, CreateRequestBody, DocumentsToCarry,
    HelpRequestResponse, UpdateStatusBody,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, RequestStatusSchema, RequestTypeSchema,
};
use crate::inbound::http::technicians::TechnicianResponse;

/// OpenAPI document for the help desk REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Help desk API",
        description = "Register help requests, dispatch technicians and track field progress."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::requests::create_request,
        crate::inbound::http::requests::list_requests,
        crate::inbound::http::requests::get_request,
        crate::inbound::http::requests::assign_technician,
        crate::inbound::http::requests::update_status,
        crate::inbound::http::requests::auto_update_status,
        crate::inbound::http::requests::list_requests_for_technician,
        crate::inbound::http::technicians::list_technicians,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RequestStatusSchema,
        RequestTypeSchema,
        CreateRequestBody,
        DocumentsToCarry,
        AssignTechnicianBody,
        UpdateStatusBody,
        AutoStatusBody,
        HelpRequestResponse,
        AutoStatusResponse,
        TechnicianResponse,
    )),
    tags(
        (name = "requests", description = "Help request lifecycle"),
        (name = "technicians", description = "Technician directory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
