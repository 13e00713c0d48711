//! Help request workflow service.
//!
//! Implements the request driving ports: registration, technician assignment,
//! manual status updates, the geofence auto-transition and the read side.
//! There is no locking around read-then-write sequences; concurrent updates
//! resolve as last write wins.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AssignTechnicianRequest, AutoStatusRequest, GeofenceOutcome, HelpRequestRepository,
    HelpRequestRepositoryError, RegisterRequest, RequestCommand, RequestQuery,
    TechnicianRepository, TechnicianRepositoryError, UpdateStatusRequest,
};
use crate::domain::{
    Assignment, Error, HelpRequest, NewHelpRequest, RequestId,
    RequestStatus, TechnicianId, TechnicianName,
};

/// Status the geofence advances from.
const GEOFENCE_SOURCE_STATUS: RequestStatus = RequestStatus::EnRoute;
/// Status the geofence advances to.
const GEOFENCE_TARGET_STATUS: RequestStatus = RequestStatus::InProgress;

pub(crate) fn map_request_repository_error(error: HelpRequestRepositoryError) -> Error {
    warn!(%error, "help request repository failure");
    match error {
        // Pool and driver messages can name hosts; they stay in the log.
        HelpRequestRepositoryError::Connection { .. } => {
            Error::service_unavailable("request store unavailable")
        }
        HelpRequestRepositoryError::Query { message } => {
            Error::internal(format!("request store error: {message}"))
        }
    }
}

pub(crate) fn map_technician_repository_error(error: TechnicianRepositoryError) -> Error {
    warn!(%error, "technician repository failure");
    match error {
        TechnicianRepositoryError::Connection { .. } => {
            Error::service_unavailable("technician directory unavailable")
        }
        TechnicianRepositoryError::Query { message } => {
            Error::internal(format!("technician directory error: {message}"))
        }
    }
}

fn request_not_found() -> Error {
    Error::not_found("request not found")
}

fn request_not_assigned() -> Error {
    Error::precondition_failed("request not assigned")
}

/// Service implementing [`RequestCommand`] and [`RequestQuery`].
#[derive(Clone)]
pub struct RequestWorkflowService<R, T> {
    requests: Arc<R>,
    technicians: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, T> RequestWorkflowService<R, T> {
    /// Create a workflow service over the request and technician stores.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use helpdesk::domain::RequestWorkflowService;
    /// use helpdesk::domain::ports::{FixtureHelpRequestRepository, FixtureTechnicianRepository};
    ///
    /// let service = RequestWorkflowService::new(
    ///     Arc::new(FixtureHelpRequestRepository),
    ///     Arc::new(FixtureTechnicianRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(requests: Arc<R>, technicians: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            technicians,
            clock,
        }
    }
}

impl<R, T> RequestWorkflowService<R, T>
where
    R: HelpRequestRepository,
{
    async fn load(&self, id: RequestId) -> Result<HelpRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_request_repository_error)?
            .ok_or_else(request_not_found)
    }
}

#[async_trait]
impl<R, T> RequestCommand for RequestWorkflowService<R, T>
where
    R: HelpRequestRepository,
    T: TechnicianRepository,
{
    async fn register(&self, request: RegisterRequest) -> Result<HelpRequest, Error> {
        let new_request = NewHelpRequest {
            details: request.details,
            destination: request.destination,
            created_at: self.clock.utc(),
        };
        let stored = self
            .requests
            .insert(&new_request)
            .await
            .map_err(map_request_repository_error)?;
        info!(
            request_id = %stored.id(),
            request_type = %stored.details().request_type,
            "help request registered"
        );
        Ok(stored)
    }

    async fn assign_technician(
        &self,
        request: AssignTechnicianRequest,
    ) -> Result<HelpRequest, Error> {
        let name = TechnicianName::new(&request.technician_name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let technician = self
            .technicians
            .find_by_name(&name)
            .await
            .map_err(map_technician_repository_error)?
            .ok_or_else(|| Error::not_found("technician not found"))?;

        let assignment = Assignment::new(technician.id(), technician.name().clone());
        let updated = self
            .requests
            .assign(request.request_id, &assignment)
            .await
            .map_err(map_request_repository_error)?
            .ok_or_else(request_not_found)?;
        info!(
            request_id = %updated.id(),
            technician_id = %technician.id(),
            technician = %technician.name(),
            "technician assigned"
        );
        Ok(updated)
    }

    async fn update_status(&self, request: UpdateStatusRequest) -> Result<HelpRequest, Error> {
        let status = RequestStatus::parse_manual_target(&request.status).map_err(|err| {
            Error::invalid_request(format!(
                "status must be one of En camino, En progreso, Terminado: {err}"
            ))
        })?;

        let current = self.load(request.request_id).await?;
        if !current.is_assigned() {
            return Err(request_not_assigned());
        }

        let updated = self
            .requests
            .update_status(request.request_id, status)
            .await
            .map_err(map_request_repository_error)?
            .ok_or_else(request_not_found)?;
        info!(
            request_id = %updated.id(),
            from = %current.status(),
            to = %status,
            "status updated"
        );
        Ok(updated)
    }

    async fn auto_update_status(
        &self,
        request: AutoStatusRequest,
    ) -> Result<GeofenceOutcome, Error> {
        let current = self.load(request.request_id).await?;
        let destination = current
            .destination()
            .copied()
            .ok_or_else(|| Error::precondition_failed("no destination coordinates"))?;
        if !current.is_assigned() {
            return Err(request_not_assigned());
        }

        let distance_metres = request.position.distance_to(&destination);
        if current.status() != GEOFENCE_SOURCE_STATUS
            || !request.position.within_geofence(&destination)
        {
            debug!(
                request_id = %current.id(),
                status = %current.status(),
                distance_metres,
                "geofence not triggered"
            );
            return Ok(GeofenceOutcome::Unchanged {
                status: current.status(),
                distance_metres,
            });
        }

        let updated = self
            .requests
            .update_status(request.request_id, GEOFENCE_TARGET_STATUS)
            .await
            .map_err(map_request_repository_error)?
            .ok_or_else(request_not_found)?;
        info!(
            request_id = %updated.id(),
            distance_metres,
            "technician arrived; request in progress"
        );
        Ok(GeofenceOutcome::Transitioned { request: updated })
    }
}

#[async_trait]
impl<R, T> RequestQuery for RequestWorkflowService<R, T>
where
    R: HelpRequestRepository,
    T: TechnicianRepository,
{
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, Error> {
        self.requests
            .list_all()
            .await
            .map_err(map_request_repository_error)
    }

    async fn get_request(&self, id: RequestId) -> Result<HelpRequest, Error> {
        self.load(id).await
    }

    async fn list_requests_for_technician(
        &self,
        technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, Error> {
        self.requests
            .list_by_technician(technician_id)
            .await
            .map_err(map_request_repository_error)
    }
}

#[cfg(test)]
#[path = "request_workflow_service_tests.rs"]
mod tests;
