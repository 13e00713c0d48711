//! PostgreSQL-backed `HelpRequestRepository` implementation using Diesel ORM.
//!
//! Rows are rebuilt through [`HelpRequest::new`] so a corrupt row surfaces as
//! a query error instead of an invalid aggregate.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HelpRequestRepository, HelpRequestRepositoryError};
use crate::domain::{
    Assignment, Coordinates, HelpRequest, HelpRequestDraft, NewHelpRequest, RequestDetails,
    RequestId, RequestStatus, RequestType, TechnicianId, TechnicianName,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AssignmentUpdate, NewRequestRow, RequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::requests;

/// Diesel-backed implementation of the help request repository port.
#[derive(Clone)]
pub struct DieselHelpRequestRepository {
    pool: DbPool,
}

impl DieselHelpRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HelpRequestRepositoryError {
    map_basic_pool_error(error, HelpRequestRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HelpRequestRepositoryError {
    map_basic_diesel_error(
        error,
        HelpRequestRepositoryError::query,
        HelpRequestRepositoryError::connection,
    )
}

fn corrupt_row(id: i32, reason: impl std::fmt::Display) -> HelpRequestRepositoryError {
    HelpRequestRepositoryError::query(format!("request {id} is corrupt: {reason}"))
}

/// The assignment only exists while the technician reference does; a name
/// left behind by `ON DELETE SET NULL` is ignored.
fn row_assignment(
    id: i32,
    technician_id: Option<i32>,
    assigned_to: Option<String>,
) -> Result<Option<Assignment>, HelpRequestRepositoryError> {
    let Some(raw_id) = technician_id else {
        return Ok(None);
    };
    let technician_id =
        TechnicianId::new(i64::from(raw_id)).map_err(|err| corrupt_row(id, err))?;
    let name = assigned_to.ok_or_else(|| corrupt_row(id, "technician without name"))?;
    let technician_name = TechnicianName::new(name).map_err(|err| corrupt_row(id, err))?;
    Ok(Some(Assignment::new(technician_id, technician_name)))
}

/// Convert a database row into a validated help request.
fn row_to_help_request(row: RequestRow) -> Result<HelpRequest, HelpRequestRepositoryError> {
    let RequestRow {
        id,
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
        latitude,
        longitude,
        technician_id,
        assigned_to,
        status,
        created_at,
    } = row;

    let request_type = request_type
        .parse::<RequestType>()
        .map_err(|err| corrupt_row(id, err))?;
    let status = status
        .parse::<RequestStatus>()
        .map_err(|err| corrupt_row(id, err))?;
    let destination =
        Coordinates::from_optional(latitude, longitude).map_err(|err| corrupt_row(id, err))?;
    let assignment = row_assignment(id, technician_id, assigned_to)?;
    let request_id = RequestId::new(i64::from(id)).map_err(|err| corrupt_row(id, err))?;

    HelpRequest::new(HelpRequestDraft {
        id: request_id,
        details: RequestDetails {
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
        },
        destination,
        assignment,
        status,
        created_at,
    })
    .map_err(|err| corrupt_row(id, err))
}

fn rows_to_help_requests(
    rows: Vec<RequestRow>,
) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
    rows.into_iter().map(row_to_help_request).collect()
}

#[async_trait]
impl HelpRequestRepository for DieselHelpRequestRepository {
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = &request.details;
        let new_row = NewRequestRow {
            company_name: &details.company_name,
            contact_name: &details.contact_name,
            phone: &details.phone,
            address: &details.address,
            request_type: details.request_type.as_str(),
            reference: &details.reference,
            is_client_owned: details.is_client_owned,
            asset_tag: &details.asset_tag,
            fault_description: &details.fault_description,
            task_to_perform: &details.task_to_perform,
            documents_to_carry: &details.documents_to_carry,
            latitude: request.destination.map(|d| d.latitude()),
            longitude: request.destination.map(|d| d.longitude()),
            created_at: request.created_at,
        };

        let row = diesel::insert_into(requests::table)
            .values(&new_row)
            .returning(RequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_help_request(row)
    }

    async fn list_all(&self) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = requests::table
            .select(RequestRow::as_select())
            .order((requests::created_at.desc(), requests::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_help_requests(rows)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = requests::table
            .find(id.get())
            .select(RequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_help_request).transpose()
    }

    async fn list_by_technician(
        &self,
        technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = requests::table
            .filter(requests::technician_id.eq(technician_id.get()))
            .select(RequestRow::as_select())
            .order((requests::created_at.desc(), requests::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_help_requests(rows)
    }

    async fn assign(
        &self,
        id: RequestId,
        assignment: &Assignment,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AssignmentUpdate {
            technician_id: Some(assignment.technician_id().get()),
            assigned_to: Some(assignment.technician_name().as_str()),
            status: RequestStatus::Assigned.as_str(),
        };
        let row = diesel::update(requests::table.find(id.get()))
            .set(&changes)
            .returning(RequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_help_request).transpose()
    }

    async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(requests::table.find(id.get()))
            .set(requests::status.eq(status.as_str()))
            .returning(RequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_help_request).transpose()
    }
}
