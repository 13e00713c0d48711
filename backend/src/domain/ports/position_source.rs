//! Port supplying the technician's live position to the geofence watcher.

use async_trait::async_trait;

use crate::domain::Coordinates;

use super::define_port_error;

define_port_error! {
    /// Errors raised by position sources.
    pub enum PositionError {
        /// The technician withdrew location permission; polling must stop.
        PermissionRevoked => "location permission revoked",
        /// No fix is available right now; polling may continue.
        Unavailable { message: String } => "position unavailable: {message}",
    }
}

/// Source of the technician's current position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}

/// Position source that always reports the same coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPositionSource(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}
