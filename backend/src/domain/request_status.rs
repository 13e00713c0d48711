//! Workflow status of a help request.
//!
//! The wire and storage representation is the Spanish label used by the
//! dispatch desk (`"Pendiente"`, `"Asignada"`, ...). The enum is the only place
//! that knows those labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle states of a help request.
///
/// `Pendiente → Asignada → En camino → En progreso → Terminado`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Registered, no technician yet.
    #[serde(rename = "Pendiente")]
    Pending,
    /// A technician has been bound to the request.
    #[serde(rename = "Asignada")]
    Assigned,
    /// The technician is travelling to the destination.
    #[serde(rename = "En camino")]
    EnRoute,
    /// The technician is on site.
    #[serde(rename = "En progreso")]
    InProgress,
    /// Work finished.
    #[serde(rename = "Terminado")]
    Done,
}

/// Statuses a technician may set by hand once a request is assigned.
pub const MANUAL_TARGETS: [RequestStatus; 3] = [
    RequestStatus::EnRoute,
    RequestStatus::InProgress,
    RequestStatus::Done,
];

impl RequestStatus {
    /// Label stored in the database and exchanged with clients.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Assigned => "Asignada",
            Self::EnRoute => "En camino",
            Self::InProgress => "En progreso",
            Self::Done => "Terminado",
        }
    }

    /// Whether a manual status update may target this status.
    ///
    /// Manual updates are not ordered: any target in [`MANUAL_TARGETS`] is
    /// accepted from any current state.
    pub fn is_manual_target(self) -> bool {
        MANUAL_TARGETS.contains(&self)
    }

    /// Parse a manual update target, rejecting statuses only the workflow may
    /// set.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::RequestStatus;
    ///
    /// assert_eq!(RequestStatus::parse_manual_target("En camino"), Ok(RequestStatus::EnRoute));
    /// assert!(RequestStatus::parse_manual_target("Asignada").is_err());
    /// ```
    pub fn parse_manual_target(raw: &str) -> Result<Self, ParseRequestStatusError> {
        let status = Self::from_str(raw)?;
        if status.is_manual_target() {
            Ok(status)
        } else {
            Err(ParseRequestStatusError::NotManualTarget {
                value: raw.to_owned(),
            })
        }
    }
}

/// Errors raised when decoding a status label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRequestStatusError {
    /// The label is not a known status.
    #[error("unknown request status: {value}")]
    Unknown { value: String },
    /// The status exists but cannot be set by a manual update.
    #[error("status {value} cannot be set manually")]
    NotManualTarget { value: String },
}

impl FromStr for RequestStatus {
    type Err = ParseRequestStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(Self::Pending),
            "Asignada" => Ok(Self::Assigned),
            "En camino" => Ok(Self::EnRoute),
            "En progreso" => Ok(Self::InProgress),
            "Terminado" => Ok(Self::Done),
            other => Err(ParseRequestStatusError::Unknown {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
