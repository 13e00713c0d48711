//! Technician directory service: reads plus startup seeding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{TechnicianRepository, TechniciansQuery};
use crate::domain::request_workflow_service::map_technician_repository_error;
use crate::domain::{DEFAULT_TECHNICIAN_ROSTER, Error, Technician, TechnicianName};

/// Service implementing [`TechniciansQuery`] over a technician repository.
#[derive(Clone)]
pub struct TechnicianDirectoryService<T> {
    technicians: Arc<T>,
}

impl<T> TechnicianDirectoryService<T> {
    pub fn new(technicians: Arc<T>) -> Self {
        Self { technicians }
    }
}

impl<T> TechnicianDirectoryService<T>
where
    T: TechnicianRepository,
{
    /// Insert every roster name that is not yet present.
    ///
    /// Idempotent: a second run inserts nothing. Returns the number of rows
    /// added.
    pub async fn seed_roster<I, S>(&self, roster: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = S> + Send,
        S: AsRef<str>,
    {
        let names = roster
            .into_iter()
            .map(|raw| {
                TechnicianName::new(raw.as_ref()).map_err(|err| {
                    Error::invalid_request(format!("invalid roster entry: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self
            .technicians
            .insert_missing(&names)
            .await
            .map_err(map_technician_repository_error)?;
        info!(inserted, roster_size = names.len(), "technician roster seeded");
        Ok(inserted)
    }

    /// Seed [`DEFAULT_TECHNICIAN_ROSTER`].
    pub async fn seed_default_roster(&self) -> Result<usize, Error> {
        self.seed_roster(DEFAULT_TECHNICIAN_ROSTER).await
    }
}

#[async_trait]
impl<T> TechniciansQuery for TechnicianDirectoryService<T>
where
    T: TechnicianRepository,
{
    async fn list_technicians(&self) -> Result<Vec<Technician>, Error> {
        self.technicians
            .list()
            .await
            .map_err(map_technician_repository_error)
    }
}
