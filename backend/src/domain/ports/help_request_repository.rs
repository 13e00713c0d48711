//! Port for help request persistence.

use async_trait::async_trait;

use crate::domain::{
    Assignment, HelpRequest, NewHelpRequest, RequestId, RequestStatus, TechnicianId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by help request repository adapters.
    pub enum HelpRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "help request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "help request repository query failed: {message}",
    }
}

/// Port for reading and writing help requests.
///
/// Writes return the row as stored after the statement, or `None` when no
/// request has the given identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelpRequestRepository: Send + Sync {
    /// Persist a new request with status `Pendiente` and return it with its
    /// store-assigned identifier.
    async fn insert(&self, request: &NewHelpRequest)
    -> Result<HelpRequest, HelpRequestRepositoryError>;

    /// Every request, newest first (ties broken by descending identifier).
    async fn list_all(&self) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError>;

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError>;

    /// Requests assigned to `technician_id`, newest first.
    async fn list_by_technician(
        &self,
        technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError>;

    /// Write the technician reference, its name and status `Asignada` in one
    /// statement.
    async fn assign(
        &self,
        id: RequestId,
        assignment: &Assignment,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError>;

    /// Overwrite the status.
    async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise request persistence.
///
/// Inserts echo the request back with identifier `1`; reads find nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHelpRequestRepository;

#[async_trait]
impl HelpRequestRepository for FixtureHelpRequestRepository {
    async fn insert(
        &self,
        request: &NewHelpRequest,
    ) -> Result<HelpRequest, HelpRequestRepositoryError> {
        let id = RequestId::new(1)
            .map_err(|err| HelpRequestRepositoryError::query(err.to_string()))?;
        Ok(HelpRequest::registered(id, request.clone()))
    }

    async fn list_all(&self) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: RequestId,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        Ok(None)
    }

    async fn list_by_technician(
        &self,
        _technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, HelpRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn assign(
        &self,
        _id: RequestId,
        _assignment: &Assignment,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        Ok(None)
    }

    async fn update_status(
        &self,
        _id: RequestId,
        _status: RequestStatus,
    ) -> Result<Option<HelpRequest>, HelpRequestRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{RequestDetails, RequestType};

    #[rstest]
    #[tokio::test]
    async fn fixture_insert_returns_pending_request() {
        let repo = FixtureHelpRequestRepository;
        let stored = repo
            .insert(&NewHelpRequest {
                details: RequestDetails::new(RequestType::BankErrand),
                destination: None,
                created_at: Utc::now(),
            })
            .await
            .expect("fixture insert succeeds");

        assert_eq!(stored.id().get(), 1);
        assert_eq!(stored.status(), RequestStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_writes_report_unknown_ids() {
        let repo = FixtureHelpRequestRepository;
        let id = RequestId::new(9).expect("valid id");
        let updated = repo
            .update_status(id, RequestStatus::Done)
            .await
            .expect("fixture update succeeds");
        assert!(updated.is_none());
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = HelpRequestRepositoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
