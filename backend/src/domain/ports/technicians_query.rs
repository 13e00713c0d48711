//! Driving port for the technician directory.

use async_trait::async_trait;

use crate::domain::{Error, Technician};

/// Driving port for technician reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TechniciansQuery: Send + Sync {
    /// Every technician ordered by name.
    async fn list_technicians(&self) -> Result<Vec<Technician>, Error>;
}

/// Fixture query with an empty directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTechniciansQuery;

#[async_trait]
impl TechniciansQuery for FixtureTechniciansQuery {
    async fn list_technicians(&self) -> Result<Vec<Technician>, Error> {
        Ok(Vec::new())
    }
}
