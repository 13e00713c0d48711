//! Help request HTTP handlers.
//!
//! ```text
//! POST /requests
//! GET  /requests
//! GET  /requests/{id}
//! PUT  /requests/{id}/assign
//! PUT  /requests/{id}/status
//! PUT  /requests/{id}/auto-status
//! GET  /requests/technician/{id}
//! ```
//!
//! Request bodies are camelCase; responses keep the snake_case row shape the
//! dispatch clients already consume.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AssignTechnicianRequest, AutoStatusRequest, GeofenceOutcome, RegisterRequest,
    UpdateStatusRequest,
};
use crate::domain::{HelpRequest, RequestDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_coordinates, parse_optional_coordinates,
    parse_request_id, parse_request_type, parse_technician_id,
};

/// `documentsToCarry` accepts either a list or a single free-text entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DocumentsToCarry {
    List(Vec<String>),
    Text(String),
}

impl DocumentsToCarry {
    /// A blank text entry means no documents.
    fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Text(text) if text.trim().is_empty() => Vec::new(),
            Self::Text(text) => vec![text],
        }
    }
}

/// Registration payload. Only `requestType` is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Servicio Técnico")]
    pub request_type: Option<String>,
    pub reference: Option<String>,
    pub is_client_owned: Option<bool>,
    pub asset_tag: Option<String>,
    pub fault_description: Option<String>,
    pub task_to_perform: Option<String>,
    pub documents_to_carry: Option<DocumentsToCarry>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CreateRequestBody {
    fn into_register_request(self) -> ApiResult<RegisterRequest> {
        let request_type = parse_request_type(self.request_type, FieldName::new("requestType"))?;
        let destination = parse_optional_coordinates(self.latitude, self.longitude)?;
        let mut details = RequestDetails::new(request_type);
        details.company_name = self.company_name.unwrap_or_default();
        details.address = self.address.unwrap_or_default();
        details.contact_name = self.contact_name.unwrap_or_default();
        details.phone = self.phone.unwrap_or_default();
        details.reference = self.reference.unwrap_or_default();
        details.is_client_owned = self.is_client_owned.unwrap_or(false);
        details.asset_tag = self.asset_tag.unwrap_or_default();
        details.fault_description = self.fault_description.unwrap_or_default();
        details.task_to_perform = self.task_to_perform.unwrap_or_default();
        details.documents_to_carry = self
            .documents_to_carry
            .map(DocumentsToCarry::into_list)
            .unwrap_or_default();
        Ok(RegisterRequest {
            details,
            destination,
        })
    }
}

/// Assignment payload; `technician` is accepted as an alias.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTechnicianBody {
    #[serde(alias = "technician")]
    #[schema(example = "ANA ORTIZ")]
    pub technician_name: Option<String>,
}

/// Manual status payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusBody {
    #[schema(example = "En camino")]
    pub status: Option<String>,
}

/// Technician position for the geofence check.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AutoStatusBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Help request as returned to clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct HelpRequestResponse {
    pub id: i32,
    pub company_name: String,
    pub address: String,
    pub contact_name: String,
    pub phone: String,
    #[schema(example = "Entrega")]
    pub request_type: String,
    pub reference: String,
    pub is_client_owned: bool,
    pub asset_tag: String,
    pub fault_description: String,
    pub task_to_perform: String,
    pub documents_to_carry: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub technician_id: Option<i32>,
    pub assigned_to: Option<String>,
    pub technician_name: Option<String>,
    #[schema(example = "Pendiente")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<HelpRequest> for HelpRequestResponse {
    fn from(value: HelpRequest) -> Self {
        let technician_id = value.assignment().map(|a| a.technician_id().get());
        let technician_name = value
            .assignment()
            .map(|a| a.technician_name().as_str().to_owned());
        let latitude = value.destination().map(|d| d.latitude());
        let longitude = value.destination().map(|d| d.longitude());
        let status = value.status().as_str().to_owned();
        let id = value.id().get();
        let created_at = value.created_at();
        let RequestDetails {
            company_name,
            contact_name,
            phone,
            address,
            request_type,
            reference,
            is_client_owned,
            asset_tag,
            fault_description,
            task_to_perform,
            documents_to_carry,
        } = value.details().clone();

        Self {
            id,
            company_name,
            address,
            contact_name,
            phone,
            request_type: request_type.as_str().to_owned(),
            reference,
            is_client_owned,
            asset_tag,
            fault_description,
            task_to_perform,
            documents_to_carry,
            latitude,
            longitude,
            technician_id,
            assigned_to: technician_name.clone(),
            technician_name,
            status,
            created_at,
        }
    }
}

/// Geofence evaluation result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AutoStatusResponse {
    /// The request moved to `En progreso`.
    Transitioned {
        #[schema(example = "En progreso")]
        status: String,
        request: HelpRequestResponse,
    },
    /// Nothing changed; `distance` is in metres.
    Unchanged { status: String, distance: f64 },
}

impl From<GeofenceOutcome> for AutoStatusResponse {
    fn from(value: GeofenceOutcome) -> Self {
        match value {
            GeofenceOutcome::Transitioned { request } => Self::Transitioned {
                status: request.status().as_str().to_owned(),
                request: request.into(),
            },
            GeofenceOutcome::Unchanged {
                status,
                distance_metres,
            } => Self::Unchanged {
                status: status.as_str().to_owned(),
                distance: distance_metres,
            },
        }
    }
}

fn to_responses(requests: Vec<HelpRequest>) -> Vec<HelpRequestResponse> {
    requests.into_iter().map(HelpRequestResponse::from).collect()
}

/// Register a new help request in status `Pendiente`.
#[utoipa::path(
    post,
    path = "/requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request registered", body = HelpRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "createRequest"
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_register_request()?;
    let created = state.requests.register(request).await?;
    Ok(HttpResponse::Created().json(HelpRequestResponse::from(created)))
}

/// List every request, newest first.
#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Requests", body = [HelpRequestResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listRequests"
)]
#[get("/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<HelpRequestResponse>>> {
    let requests = state.requests_query.list_requests().await?;
    Ok(web::Json(to_responses(requests)))
}

/// Fetch one request.
#[utoipa::path(
    get,
    path = "/requests/{id}",
    params(("id" = i32, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Request", body = HelpRequestResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "getRequest"
)]
#[get("/requests/{id}")]
pub async fn get_request(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<HelpRequestResponse>> {
    let id = parse_request_id(&path.into_inner())?;
    let request = state.requests_query.get_request(id).await?;
    Ok(web::Json(request.into()))
}

/// Assign a technician by name; the request moves to `Asignada`.
#[utoipa::path(
    put,
    path = "/requests/{id}/assign",
    params(("id" = i32, Path, description = "Request identifier")),
    request_body = AssignTechnicianBody,
    responses(
        (status = 200, description = "Technician assigned", body = HelpRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Request or technician not found", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "assignTechnician"
)]
#[put("/requests/{id}/assign")]
pub async fn assign_technician(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AssignTechnicianBody>,
) -> ApiResult<web::Json<HelpRequestResponse>> {
    let request_id = parse_request_id(&path.into_inner())?;
    let technician_name = payload
        .into_inner()
        .technician_name
        .ok_or_else(|| missing_field_error(FieldName::new("technicianName")))?;
    let updated = state
        .requests
        .assign_technician(AssignTechnicianRequest {
            request_id,
            technician_name,
        })
        .await?;
    Ok(web::Json(updated.into()))
}

/// Set `En camino`, `En progreso` or `Terminado` on an assigned request.
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    params(("id" = i32, Path, description = "Request identifier")),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Status updated", body = HelpRequestResponse),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema),
        (status = 409, description = "Request not assigned", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "updateRequestStatus"
)]
#[put("/requests/{id}/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<web::Json<HelpRequestResponse>> {
    let request_id = parse_request_id(&path.into_inner())?;
    let status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(FieldName::new("status")))?;
    let updated = state
        .requests
        .update_status(UpdateStatusRequest { request_id, status })
        .await?;
    Ok(web::Json(updated.into()))
}

/// Evaluate the geofence for the technician's current position.
#[utoipa::path(
    put,
    path = "/requests/{id}/auto-status",
    params(("id" = i32, Path, description = "Request identifier")),
    request_body = AutoStatusBody,
    responses(
        (status = 200, description = "Geofence evaluated", body = AutoStatusResponse),
        (status = 400, description = "Invalid coordinates", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema),
        (status = 409, description = "Request not assigned or without destination", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "autoUpdateRequestStatus"
)]
#[put("/requests/{id}/auto-status")]
pub async fn auto_update_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AutoStatusBody>,
) -> ApiResult<web::Json<AutoStatusResponse>> {
    let request_id = parse_request_id(&path.into_inner())?;
    let AutoStatusBody {
        latitude,
        longitude,
    } = payload.into_inner();
    let position = parse_coordinates(latitude, longitude)?;
    let outcome = state
        .requests
        .auto_update_status(AutoStatusRequest {
            request_id,
            position,
        })
        .await?;
    Ok(web::Json(outcome.into()))
}

/// Requests assigned to a technician, newest first.
#[utoipa::path(
    get,
    path = "/requests/technician/{id}",
    params(("id" = i32, Path, description = "Technician identifier")),
    responses(
        (status = 200, description = "Requests", body = [HelpRequestResponse]),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listRequestsForTechnician"
)]
#[get("/requests/technician/{id}")]
pub async fn list_requests_for_technician(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<HelpRequestResponse>>> {
    let technician_id = parse_technician_id(&path.into_inner())?;
    let requests = state
        .requests_query
        .list_requests_for_technician(technician_id)
        .await?;
    Ok(web::Json(to_responses(requests)))
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
