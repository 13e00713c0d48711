//! Technician deduplication.
//!
//! Names are the directory's natural key, but older databases may hold
//! several rows for one name. The newest row per name survives (ties go to the
//! highest id); requests pointing at a removed row are re-pointed first.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::ports::TechnicianRepository;
use crate::domain::request_workflow_service::map_technician_repository_error;
use crate::domain::{Error, Technician, TechnicianId, TechnicianName};

/// One duplicate row and the row that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMerge {
    pub name: TechnicianName,
    pub duplicate: TechnicianId,
    pub survivor: TechnicianId,
}

/// Every merge needed to leave one row per name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeduplicationPlan {
    pub merges: Vec<DuplicateMerge>,
}

impl DeduplicationPlan {
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Identifiers that the plan deletes, in plan order.
    pub fn removed_ids(&self) -> Vec<TechnicianId> {
        self.merges.iter().map(|merge| merge.duplicate).collect()
    }
}

/// Compute the merges for a directory snapshot.
///
/// Every name present in `technicians` keeps exactly one row.
pub fn plan_deduplication(technicians: &[Technician]) -> DeduplicationPlan {
    let mut by_name: BTreeMap<&TechnicianName, Vec<&Technician>> = BTreeMap::new();
    for technician in technicians {
        by_name.entry(technician.name()).or_default().push(technician);
    }

    let mut merges = Vec::new();
    for (name, rows) in by_name {
        let Some(survivor) = rows
            .iter()
            .max_by_key(|row| (row.created_at(), row.id()))
            .map(|row| row.id())
        else {
            continue;
        };
        merges.extend(
            rows.iter()
                .filter(|row| row.id() != survivor)
                .map(|row| DuplicateMerge {
                    name: name.clone(),
                    duplicate: row.id(),
                    survivor,
                }),
        );
    }
    DeduplicationPlan { merges }
}

/// Result of a deduplication run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeduplicationReport {
    pub plan: DeduplicationPlan,
    /// Whether the plan was applied or only computed.
    pub applied: bool,
}

/// Applies [`plan_deduplication`] against a technician repository.
pub struct TechnicianDeduplicator<T> {
    technicians: Arc<T>,
}

impl<T> TechnicianDeduplicator<T>
where
    T: TechnicianRepository,
{
    pub fn new(technicians: Arc<T>) -> Self {
        Self { technicians }
    }

    /// Plan and, unless `dry_run`, apply the merges one at a time.
    ///
    /// Each merge is atomic on its own; a failure part-way leaves earlier
    /// merges applied, and rerunning completes the rest.
    pub async fn run(&self, dry_run: bool) -> Result<DeduplicationReport, Error> {
        let technicians = self
            .technicians
            .list()
            .await
            .map_err(map_technician_repository_error)?;
        let plan = plan_deduplication(&technicians);
        info!(
            technicians = technicians.len(),
            duplicates = plan.merges.len(),
            dry_run,
            "technician deduplication planned"
        );

        if dry_run {
            return Ok(DeduplicationReport {
                plan,
                applied: false,
            });
        }

        for merge in &plan.merges {
            self.technicians
                .merge_duplicate(merge.duplicate, merge.survivor)
                .await
                .map_err(map_technician_repository_error)?;
            info!(
                name = %merge.name,
                duplicate = %merge.duplicate,
                survivor = %merge.survivor,
                "duplicate technician removed"
            );
        }
        Ok(DeduplicationReport {
            plan,
            applied: true,
        })
    }
}
