//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a shared `bb8` pool through
//! `diesel-async`, and every database error is mapped to the port's error
//! type.
//!
//! ```ignore
//! use helpdesk::outbound::persistence::{DbPool, DieselTechnicianRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
//! let technicians = DieselTechnicianRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_help_request_repository;
mod diesel_technician_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_help_request_repository::DieselHelpRequestRepository;
pub use diesel_technician_repository::DieselTechnicianRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
