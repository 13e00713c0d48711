//! Periodic geofence evaluation for a technician's watched requests.
//!
//! The watcher polls a [`PositionSource`] on a fixed interval and feeds each
//! position to [`RequestCommand::auto_update_status`] for every request it
//! still watches. The task lives exactly as long as its [`WatchHandle`]:
//! dropping or cancelling the handle aborts it, so repeated start/stop cycles
//! never accumulate timers.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AutoStatusRequest, GeofenceOutcome, PositionError, PositionSource, RequestCommand,
};
use crate::domain::{ErrorCode, RequestId, RequestStatus, TraceId};

/// Poll period used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Why a watcher task stopped on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    /// The position source reported that location permission was withdrawn.
    PermissionRevoked,
    /// Every watched request reached a state the geofence no longer affects.
    Drained,
}

/// Owner of a running watcher task. Dropping it stops the task.
#[derive(Debug)]
pub struct WatchHandle {
    task: Option<JoinHandle<WatchExit>>,
}

impl WatchHandle {
    /// Stop the watcher immediately.
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the watcher to stop by itself.
    ///
    /// Returns `None` when the task was aborted or panicked.
    pub async fn join(mut self) -> Option<WatchExit> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns geofence polling tasks.
pub struct GeofenceWatcher;

impl GeofenceWatcher {
    /// Start watching `request_ids` on the current tokio runtime.
    ///
    /// A zero `interval` falls back to [`DEFAULT_POLL_INTERVAL`]. The first
    /// evaluation happens immediately.
    pub fn spawn(
        command: Arc<dyn RequestCommand>,
        positions: Arc<dyn PositionSource>,
        request_ids: impl IntoIterator<Item = RequestId>,
        interval: Duration,
    ) -> WatchHandle {
        let interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        let watched: BTreeSet<RequestId> = request_ids.into_iter().collect();
        let task = tokio::spawn(TraceId::scope_new(watch(
            command, positions, watched, interval,
        )));
        WatchHandle { task: Some(task) }
    }
}

async fn watch(
    command: Arc<dyn RequestCommand>,
    positions: Arc<dyn PositionSource>,
    mut watched: BTreeSet<RequestId>,
    interval: Duration,
) -> WatchExit {
    info!(requests = watched.len(), ?interval, "geofence watcher started");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        if watched.is_empty() {
            info!("geofence watcher drained");
            return WatchExit::Drained;
        }
        ticker.tick().await;

        let position = match positions.current_position().await {
            Ok(position) => position,
            Err(PositionError::PermissionRevoked) => {
                warn!("location permission revoked; geofence watcher stopping");
                return WatchExit::PermissionRevoked;
            }
            Err(error) => {
                warn!(%error, "position unavailable; retrying next tick");
                continue;
            }
        };

        let mut finished = Vec::new();
        for &request_id in &watched {
            let result = command
                .auto_update_status(AutoStatusRequest {
                    request_id,
                    position,
                })
                .await;
            if stops_watching(request_id, result) {
                finished.push(request_id);
            }
        }
        for request_id in finished {
            watched.remove(&request_id);
        }
    }
}

fn stops_watching(
    request_id: RequestId,
    result: Result<GeofenceOutcome, crate::domain::Error>,
) -> bool {
    match result {
        Ok(GeofenceOutcome::Transitioned { .. }) => true,
        Ok(GeofenceOutcome::Unchanged {
            status,
            distance_metres,
        }) => {
            debug!(%request_id, %status, distance_metres, "geofence evaluated");
            status == RequestStatus::Done
        }
        Err(error) => {
            let permanent = matches!(
                error.code(),
                ErrorCode::NotFound | ErrorCode::PreconditionFailed
            );
            warn!(%request_id, %error, permanent, "geofence evaluation failed");
            permanent
        }
    }
}

#[cfg(test)]
#[path = "geofence_watcher_tests.rs"]
mod tests;
