//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed help desk model used by the API and
//! persistence layers and the services that drive the request lifecycle.
//! Types are immutable from the outside; invariants are documented on each
//! type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - HelpRequest and its parts: the ticket aggregate.
//! - Technician, TechnicianId, TechnicianName: directory entries.
//! - RequestStatus, RequestType: workflow and errand labels.
//! - Coordinates: validated positions and haversine distance.
//! - RequestWorkflowService, TechnicianDirectoryService,
//!   TechnicianDeduplicator, GeofenceWatcher: services over the ports.

pub mod error;
pub mod geo;
pub mod geofence_watcher;
pub mod help_request;
pub mod ports;
pub mod request_status;
pub mod request_type;
mod request_workflow_service;
pub mod technician;
pub mod technician_dedup;
mod technician_directory_service;
mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{
    Coordinates, CoordinatesValidationError, EARTH_RADIUS_METRES, GEOFENCE_RADIUS_METRES,
};
pub use self::geofence_watcher::{DEFAULT_POLL_INTERVAL, GeofenceWatcher, WatchExit, WatchHandle};
pub use self::help_request::{
    Assignment, HelpRequest, HelpRequestDraft, HelpRequestValidationError, InvalidRequestId,
    NewHelpRequest, RequestDetails, RequestId,
};
pub use self::request_status::{MANUAL_TARGETS, ParseRequestStatusError, RequestStatus};
pub use self::request_type::{ParseRequestTypeError, RequestType};
pub use self::request_workflow_service::RequestWorkflowService;
pub use self::technician::{
    DEFAULT_TECHNICIAN_ROSTER, TECHNICIAN_NAME_MAX, Technician, TechnicianId, TechnicianName,
    TechnicianValidationError,
};
pub use self::technician_dedup::{
    DeduplicationPlan, DeduplicationReport, DuplicateMerge, TechnicianDeduplicator,
    plan_deduplication,
};
pub use self::technician_directory_service::TechnicianDirectoryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use helpdesk::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("request not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
