//! Driving port for help request reads.

use async_trait::async_trait;

use crate::domain::{Error, HelpRequest, RequestId, TechnicianId};

/// Driving port for help request read operations.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), helpdesk::domain::Error> {
/// use helpdesk::domain::ports::{FixtureRequestQuery, RequestQuery};
///
/// let requests = FixtureRequestQuery.list_requests().await?;
/// assert!(requests.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestQuery: Send + Sync {
    /// Every request, newest first.
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, Error>;

    /// One request, or `not_found`.
    async fn get_request(&self, id: RequestId) -> Result<HelpRequest, Error>;

    /// Requests assigned to a technician, newest first.
    async fn list_requests_for_technician(
        &self,
        technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, Error>;
}

/// Fixture query implementation with no stored requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRequestQuery;

#[async_trait]
impl RequestQuery for FixtureRequestQuery {
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, Error> {
        Ok(Vec::new())
    }

    async fn get_request(&self, _id: RequestId) -> Result<HelpRequest, Error> {
        Err(Error::not_found("request not found"))
    }

    async fn list_requests_for_technician(
        &self,
        _technician_id: TechnicianId,
    ) -> Result<Vec<HelpRequest>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_query_returns_not_found_for_get() {
        let id = RequestId::new(3).expect("valid id");
        let err = FixtureRequestQuery.get_request(id).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fixture_query_lists_nothing() {
        let id = TechnicianId::new(1).expect("valid id");
        let listed = FixtureRequestQuery
            .list_requests_for_technician(id)
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }
}
