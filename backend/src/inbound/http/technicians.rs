//! Technician directory HTTP handlers.
//!
//! ```text
//! GET /technicians
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Technician;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Technician directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TechnicianResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "ANA ORTIZ")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Technician> for TechnicianResponse {
    fn from(value: Technician) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().as_str().to_owned(),
            created_at: value.created_at(),
        }
    }
}

/// List technicians ordered by name.
#[utoipa::path(
    get,
    path = "/technicians",
    responses(
        (status = 200, description = "Technicians", body = [TechnicianResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["technicians"],
    operation_id = "listTechnicians"
)]
#[get("/technicians")]
pub async fn list_technicians(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TechnicianResponse>>> {
    let technicians = state.technicians.list_technicians().await?;
    Ok(web::Json(
        technicians.into_iter().map(TechnicianResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::TimeZone;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{FixtureRequestCommand, FixtureRequestQuery, MockTechniciansQuery};
    use crate::domain::{Error, TechnicianId, TechnicianName};

    fn technician(id: i64, name: &str) -> Technician {
        Technician::new(
            TechnicianId::new(id).expect("valid id"),
            TechnicianName::new(name).expect("valid name"),
            Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    async fn call(query: MockTechniciansQuery) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(
            Arc::new(FixtureRequestCommand),
            Arc::new(FixtureRequestQuery),
            Arc::new(query),
        );
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(list_technicians),
        )
        .await;
        let request = actix_test::TestRequest::get().uri("/technicians").to_request();
        actix_test::call_service(&app, request).await
    }

    #[actix_web::test]
    async fn lists_technicians_in_directory_order() {
        let mut query = MockTechniciansQuery::new();
        query.expect_list_technicians().times(1).return_once(|| {
            Ok(vec![technician(4, "ANA ORTIZ"), technician(1, "LUIS PEREZ")])
        });

        let response = call(query).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body[0]["id"], 4);
        assert_eq!(body[0]["name"], "ANA ORTIZ");
        assert_eq!(body[0]["created_at"], "2024-01-10T08:00:00Z");
        assert_eq!(body[1]["name"], "LUIS PEREZ");
    }

    #[actix_web::test]
    async fn unavailable_store_maps_to_503() {
        let mut query = MockTechniciansQuery::new();
        query
            .expect_list_technicians()
            .return_once(|| Err(Error::service_unavailable("database unavailable")));

        let response = call(query).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
