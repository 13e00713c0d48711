//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`RequestCommand`, `RequestQuery`, `TechniciansQuery`) are
//! what inbound adapters call; driven ports (`HelpRequestRepository`,
//! `TechnicianRepository`, `PositionSource`) are what outbound adapters
//! implement.

mod macros;
pub(crate) use macros::define_port_error;

mod help_request_repository;
mod position_source;
mod request_command;
mod request_query;
mod technician_repository;
mod technicians_query;

#[cfg(test)]
pub use help_request_repository::MockHelpRequestRepository;
pub use help_request_repository::{
    FixtureHelpRequestRepository, HelpRequestRepository, HelpRequestRepositoryError,
};
#[cfg(test)]
pub use position_source::MockPositionSource;
pub use position_source::{FixedPositionSource, PositionError, PositionSource};
#[cfg(test)]
pub use request_command::MockRequestCommand;
pub use request_command::{
    AssignTechnicianRequest, AutoStatusRequest, FixtureRequestCommand, GeofenceOutcome,
    RegisterRequest, RequestCommand, UpdateStatusRequest,
};
#[cfg(test)]
pub use request_query::MockRequestQuery;
pub use request_query::{FixtureRequestQuery, RequestQuery};
#[cfg(test)]
pub use technician_repository::MockTechnicianRepository;
pub use technician_repository::{
    FixtureTechnicianRepository, TechnicianRepository, TechnicianRepositoryError,
};
#[cfg(test)]
pub use technicians_query::MockTechniciansQuery;
pub use technicians_query::{FixtureTechniciansQuery, TechniciansQuery};
