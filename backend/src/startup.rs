//! Database bootstrap run before the HTTP server binds.

use std::sync::Arc;

use tracing::info;

use crate::domain::TechnicianDirectoryService;
use crate::outbound::persistence::{
    DbPool, DieselTechnicianRepository, MigrationError, PoolConfig, PoolError,
    run_pending_migrations,
};
use crate::settings::ServerSettings;

/// Failures that prevent the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("no database URL configured; set HELPDESK_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("migration task failed: {0}")]
    MigrationTask(String),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("technician seeding failed: {0}")]
    Seed(crate::domain::Error),
}

impl From<StartupError> for std::io::Error {
    fn from(value: StartupError) -> Self {
        Self::other(value.to_string())
    }
}

/// Apply migrations, open the pool and seed the roster as configured.
pub async fn prepare_database(settings: &ServerSettings) -> Result<DbPool, StartupError> {
    let database_url = settings
        .database_url()
        .ok_or(StartupError::MissingDatabaseUrl)?;

    if settings.run_migrations() {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|err| StartupError::MigrationTask(err.to_string()))??;
        info!(applied, "database migrations up to date");
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
    )
    .await?;

    if settings.seed_technicians() {
        let directory =
            TechnicianDirectoryService::new(Arc::new(DieselTechnicianRepository::new(pool.clone())));
        directory
            .seed_default_roster()
            .await
            .map_err(StartupError::Seed)?;
    }

    Ok(pool)
}
