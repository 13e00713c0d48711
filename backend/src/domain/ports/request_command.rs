//! Driving port for help request mutations.
//!
//! Inbound adapters register tickets, assign technicians and move requests
//! through the status lifecycle through this port, without knowing how the
//! requests are stored.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Coordinates, Error, HelpRequest, NewHelpRequest, RequestDetails, RequestId, RequestStatus,
};

/// Request to register a new help request.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    pub details: RequestDetails,
    pub destination: Option<Coordinates>,
}

/// Request to bind a technician, looked up by name, to a help request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTechnicianRequest {
    pub request_id: RequestId,
    /// Raw name as supplied by the caller; validated by the command.
    pub technician_name: String,
}

/// Request to set a status by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    pub request_id: RequestId,
    /// Raw status label; only `En camino`, `En progreso` and `Terminado` are
    /// accepted.
    pub status: String,
}

/// Request to evaluate the geofence for a technician position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoStatusRequest {
    pub request_id: RequestId,
    pub position: Coordinates,
}

/// Result of a geofence evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeofenceOutcome {
    /// The technician arrived; the request is now `En progreso`.
    Transitioned { request: HelpRequest },
    /// Nothing was persisted.
    Unchanged {
        status: RequestStatus,
        distance_metres: f64,
    },
}

impl GeofenceOutcome {
    /// Status of the request after the evaluation.
    pub fn status(&self) -> RequestStatus {
        match self {
            Self::Transitioned { request } => request.status(),
            Self::Unchanged { status, .. } => *status,
        }
    }
}

/// Driving port for help request write operations.
///
/// # Examples
///
/// ```rust,no_run
/// # use helpdesk::domain::{RequestDetails, RequestType};
/// # use helpdesk::domain::ports::{FixtureRequestCommand, RegisterRequest, RequestCommand};
/// # async fn example() -> Result<(), helpdesk::domain::Error> {
/// let command = FixtureRequestCommand;
/// let request = command
///     .register(RegisterRequest {
///         details: RequestDetails::new(RequestType::Delivery),
///         destination: None,
///     })
///     .await?;
/// assert_eq!(request.status().as_str(), "Pendiente");
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestCommand: Send + Sync {
    /// Persist a new request in status `Pendiente`.
    async fn register(&self, request: RegisterRequest) -> Result<HelpRequest, Error>;

    /// Resolve the technician by name and bind it, setting status `Asignada`.
    ///
    /// Fails with `invalid_request` for a blank name and `not_found` when
    /// either the technician or the request does not exist.
    async fn assign_technician(
        &self,
        request: AssignTechnicianRequest,
    ) -> Result<HelpRequest, Error>;

    /// Overwrite the status of an assigned request.
    ///
    /// Fails with `invalid_request` for a disallowed target, `not_found` for
    /// an unknown request and `precondition_failed` when unassigned.
    async fn update_status(&self, request: UpdateStatusRequest) -> Result<HelpRequest, Error>;

    /// Advance `En camino` to `En progreso` when the technician is within the
    /// geofence radius of the destination.
    async fn auto_update_status(
        &self,
        request: AutoStatusRequest,
    ) -> Result<GeofenceOutcome, Error>;
}

/// Fixture command: registration echoes the request back as id `1`, every
/// other operation reports the request as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRequestCommand;

#[async_trait]
impl RequestCommand for FixtureRequestCommand {
    async fn register(&self, request: RegisterRequest) -> Result<HelpRequest, Error> {
        let id = RequestId::new(1).map_err(|err| Error::internal(err.to_string()))?;
        Ok(HelpRequest::registered(
            id,
            NewHelpRequest {
                details: request.details,
                destination: request.destination,
                created_at: Utc::now(),
            },
        ))
    }

    async fn assign_technician(
        &self,
        _request: AssignTechnicianRequest,
    ) -> Result<HelpRequest, Error> {
        Err(Error::not_found("request not found"))
    }

    async fn update_status(&self, _request: UpdateStatusRequest) -> Result<HelpRequest, Error> {
        Err(Error::not_found("request not found"))
    }

    async fn auto_update_status(
        &self,
        _request: AutoStatusRequest,
    ) -> Result<GeofenceOutcome, Error> {
        Err(Error::not_found("request not found"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, RequestType};

    #[rstest]
    #[tokio::test]
    async fn fixture_register_keeps_details() {
        let mut details = RequestDetails::new(RequestType::Pickup);
        details.company_name = "Acme".to_owned();

        let request = FixtureRequestCommand
            .register(RegisterRequest {
                details: details.clone(),
                destination: None,
            })
            .await
            .expect("fixture register succeeds");

        assert_eq!(request.details(), &details);
        assert_eq!(request.status(), RequestStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_mutations_report_not_found() {
        let id = RequestId::new(4).expect("valid id");
        let err = FixtureRequestCommand
            .update_status(UpdateStatusRequest {
                request_id: id,
                status: "Terminado".to_owned(),
            })
            .await
            .expect_err("fixture has no requests");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn unchanged_outcome_reports_its_status() {
        let outcome = GeofenceOutcome::Unchanged {
            status: RequestStatus::Assigned,
            distance_metres: 120.0,
        };
        assert_eq!(outcome.status(), RequestStatus::Assigned);
    }
}
