//! PostgreSQL-backed `TechnicianRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TechnicianRepository, TechnicianRepositoryError};
use crate::domain::{Technician, TechnicianId, TechnicianName};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TechnicianRow;
use super::pool::{DbPool, PoolError};
use super::schema::{requests, technicians};

/// Names carry no unique constraint, so seeding guards with `NOT EXISTS`.
const INSERT_IF_ABSENT_SQL: &str = "INSERT INTO technicians (name) \
     SELECT $1 WHERE NOT EXISTS (SELECT 1 FROM technicians WHERE name = $1)";

/// Diesel-backed implementation of the technician repository port.
#[derive(Clone)]
pub struct DieselTechnicianRepository {
    pool: DbPool,
}

impl DieselTechnicianRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TechnicianRepositoryError {
    map_basic_pool_error(error, TechnicianRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TechnicianRepositoryError {
    map_basic_diesel_error(
        error,
        TechnicianRepositoryError::query,
        TechnicianRepositoryError::connection,
    )
}

fn row_to_technician(row: TechnicianRow) -> Result<Technician, TechnicianRepositoryError> {
    let TechnicianRow {
        id,
        name,
        created_at,
    } = row;
    let technician_id = TechnicianId::new(i64::from(id))
        .map_err(|err| TechnicianRepositoryError::query(format!("technician {id}: {err}")))?;
    let technician_name = TechnicianName::new(name)
        .map_err(|err| TechnicianRepositoryError::query(format!("technician {id}: {err}")))?;
    Ok(Technician::new(technician_id, technician_name, created_at))
}

#[async_trait]
impl TechnicianRepository for DieselTechnicianRepository {
    async fn list(&self) -> Result<Vec<Technician>, TechnicianRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = technicians::table
            .select(TechnicianRow::as_select())
            .order((technicians::name.asc(), technicians::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_technician).collect()
    }

    async fn find_by_name(
        &self,
        name: &TechnicianName,
    ) -> Result<Option<Technician>, TechnicianRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = technicians::table
            .filter(technicians::name.eq(name.as_str()))
            .select(TechnicianRow::as_select())
            .order((technicians::created_at.desc(), technicians::id.desc()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_technician).transpose()
    }

    async fn insert_missing(
        &self,
        names: &[TechnicianName],
    ) -> Result<usize, TechnicianRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for name in names {
                    inserted += sql_query(INSERT_IF_ABSENT_SQL)
                        .bind::<Text, _>(name.as_str())
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn merge_duplicate(
        &self,
        duplicate: TechnicianId,
        survivor: TechnicianId,
    ) -> Result<(), TechnicianRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::update(requests::table.filter(requests::technician_id.eq(duplicate.get())))
                    .set(requests::technician_id.eq(survivor.get()))
                    .execute(conn)
                    .await?;
                diesel::delete(technicians::table.find(duplicate.get()))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
