//! Help request aggregate.
//!
//! A help request is a ticket registered by field staff: who the client is,
//! what needs doing, optionally where, and how far the workflow has got. The
//! store assigns the identifier and creation instant; the workflow owns the
//! assignment and the status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::Coordinates;
use super::request_status::RequestStatus;
use super::request_type::RequestType;
use super::technician::{TechnicianId, TechnicianName};

/// Store-assigned help request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct RequestId(i32);

/// Raised when a value cannot identify a help request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request id must be a positive integer")]
pub struct InvalidRequestId;

impl RequestId {
    pub fn new(raw: i64) -> Result<Self, InvalidRequestId> {
        i32::try_from(raw)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(InvalidRequestId)
    }

    /// Parse a path segment such as `"42"`.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::RequestId;
    ///
    /// assert_eq!(RequestId::parse("42").map(|id| id.get()), Ok(42));
    /// assert!(RequestId::parse("-1").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, InvalidRequestId> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| InvalidRequestId)
            .and_then(Self::new)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for RequestId {
    type Error = InvalidRequestId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestId> for i32 {
    fn from(value: RequestId) -> Self {
        value.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields captured on the registration form.
///
/// Text fields are never absent; an omitted field is the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    pub company_name: String,
    pub contact_name: String,
    pub phone: String,
    pub address: String,
    pub request_type: RequestType,
    pub reference: String,
    pub is_client_owned: bool,
    pub asset_tag: String,
    pub fault_description: String,
    pub task_to_perform: String,
    pub documents_to_carry: Vec<String>,
}

impl RequestDetails {
    /// Details for `request_type` with every optional field at its default.
    pub fn new(request_type: RequestType) -> Self {
        Self {
            company_name: String::new(),
            contact_name: String::new(),
            phone: String::new(),
            address: String::new(),
            request_type,
            reference: String::new(),
            is_client_owned: false,
            asset_tag: String::new(),
            fault_description: String::new(),
            task_to_perform: String::new(),
            documents_to_carry: Vec::new(),
        }
    }
}

/// Binding between a request and the technician working on it.
///
/// The name is the technician's canonical name at assignment time and is
/// always written together with the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    technician_id: TechnicianId,
    technician_name: TechnicianName,
}

impl Assignment {
    pub fn new(technician_id: TechnicianId, technician_name: TechnicianName) -> Self {
        Self {
            technician_id,
            technician_name,
        }
    }

    pub fn technician_id(&self) -> TechnicianId {
        self.technician_id
    }

    pub fn technician_name(&self) -> &TechnicianName {
        &self.technician_name
    }
}

/// A request about to be persisted; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHelpRequest {
    pub details: RequestDetails,
    pub destination: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated field bundle used to rebuild a [`HelpRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct HelpRequestDraft {
    pub id: RequestId,
    pub details: RequestDetails,
    pub destination: Option<Coordinates>,
    pub assignment: Option<Assignment>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Validation errors raised by [`HelpRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HelpRequestValidationError {
    /// A pending request claims an assigned technician.
    #[error("pending request {id} must not have an assigned technician")]
    PendingWithAssignment { id: RequestId },
}

/// A persisted help request.
///
/// ## Invariants
/// - A `Pendiente` request has no assignment.
/// - `destination`, when present, holds a validated latitude/longitude pair.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpRequest {
    id: RequestId,
    details: RequestDetails,
    destination: Option<Coordinates>,
    assignment: Option<Assignment>,
    status: RequestStatus,
    created_at: DateTime<Utc>,
}

impl HelpRequest {
    pub fn new(draft: HelpRequestDraft) -> Result<Self, HelpRequestValidationError> {
        let HelpRequestDraft {
            id,
            details,
            destination,
            assignment,
            status,
            created_at,
        } = draft;
        if status == RequestStatus::Pending && assignment.is_some() {
            return Err(HelpRequestValidationError::PendingWithAssignment { id });
        }
        Ok(Self {
            id,
            details,
            destination,
            assignment,
            status,
            created_at,
        })
    }

    /// Materialise a freshly inserted request.
    pub fn registered(id: RequestId, new: NewHelpRequest) -> Self {
        let NewHelpRequest {
            details,
            destination,
            created_at,
        } = new;
        Self {
            id,
            details,
            destination,
            assignment: None,
            status: RequestStatus::Pending,
            created_at,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn details(&self) -> &RequestDetails {
        &self.details
    }

    pub fn destination(&self) -> Option<&Coordinates> {
        self.destination.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Bind a technician and move to `Asignada`, whatever the prior status.
    #[must_use]
    pub fn assign(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self.status = RequestStatus::Assigned;
        self
    }

    /// Overwrite the status, keeping the assignment.
    ///
    /// Reverting to `Pendiente` is ignored so the pending invariant holds.
    #[must_use]
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        if status != RequestStatus::Pending {
            self.status = status;
        }
        self
    }

    /// Drop the assignment while leaving the status untouched, as happens when
    /// the referenced technician row is deleted.
    #[must_use]
    pub fn without_technician(mut self) -> Self {
        self.assignment = None;
        self
    }
}
