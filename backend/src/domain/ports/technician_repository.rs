//! Port for the technician directory store.

use async_trait::async_trait;

use crate::domain::{Technician, TechnicianId, TechnicianName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by technician repository adapters.
    pub enum TechnicianRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "technician repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "technician repository query failed: {message}",
    }
}

/// Port for reading and maintaining technicians.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    /// Every technician ordered by name, then by identifier.
    async fn list(&self) -> Result<Vec<Technician>, TechnicianRepositoryError>;

    /// Exact match on the canonical name. When duplicates exist the most
    /// recently created one wins.
    async fn find_by_name(
        &self,
        name: &TechnicianName,
    ) -> Result<Option<Technician>, TechnicianRepositoryError>;

    /// Insert each name not already present and return how many were added.
    async fn insert_missing(
        &self,
        names: &[TechnicianName],
    ) -> Result<usize, TechnicianRepositoryError>;

    /// Re-point requests from `duplicate` to `survivor`, then delete
    /// `duplicate`, atomically.
    async fn merge_duplicate(
        &self,
        duplicate: TechnicianId,
        survivor: TechnicianId,
    ) -> Result<(), TechnicianRepositoryError>;
}

/// Fixture implementation backed by nothing: empty directory, no-op writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTechnicianRepository;

#[async_trait]
impl TechnicianRepository for FixtureTechnicianRepository {
    async fn list(&self) -> Result<Vec<Technician>, TechnicianRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_name(
        &self,
        _name: &TechnicianName,
    ) -> Result<Option<Technician>, TechnicianRepositoryError> {
        Ok(None)
    }

    async fn insert_missing(
        &self,
        _names: &[TechnicianName],
    ) -> Result<usize, TechnicianRepositoryError> {
        Ok(0)
    }

    async fn merge_duplicate(
        &self,
        _duplicate: TechnicianId,
        _survivor: TechnicianId,
    ) -> Result<(), TechnicianRepositoryError> {
        Ok(())
    }
}
