//! Kind of errand a help request describes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errand categories offered on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// On-site technical service; carries equipment reference and fault.
    #[serde(rename = "Servicio Técnico")]
    TechnicalService,
    /// Deliver something to the client.
    #[serde(rename = "Entrega")]
    Delivery,
    /// Collect something from the client.
    #[serde(rename = "Recogida")]
    Pickup,
    /// Bank errands.
    #[serde(rename = "Diligencias Bancarias")]
    BankErrand,
    /// Anything else.
    #[serde(rename = "Otros")]
    Other,
}

impl RequestType {
    /// Every request type, in form order.
    pub const ALL: [Self; 5] = [
        Self::TechnicalService,
        Self::Delivery,
        Self::Pickup,
        Self::BankErrand,
        Self::Other,
    ];

    /// Label stored in the database and exchanged with clients.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TechnicalService => "Servicio Técnico",
            Self::Delivery => "Entrega",
            Self::Pickup => "Recogida",
            Self::BankErrand => "Diligencias Bancarias",
            Self::Other => "Otros",
        }
    }

    /// Technical service requests describe equipment; every other kind
    /// describes a task.
    pub const fn describes_equipment(self) -> bool {
        matches!(self, Self::TechnicalService)
    }
}

/// Raised when a label does not name a request type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request type: {value}")]
pub struct ParseRequestTypeError {
    /// The rejected label.
    pub value: String,
}

impl FromStr for RequestType {
    type Err = ParseRequestTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| ParseRequestTypeError {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
