//! Technician directory entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a technician name.
pub const TECHNICIAN_NAME_MAX: usize = 100;

/// Technicians inserted on startup when absent.
pub const DEFAULT_TECHNICIAN_ROSTER: [&str; 7] = [
    "DANIEL DIAZ",
    "ANDERSSON FLOR",
    "BREYNER LONDONO",
    "LUIS ÑAÑEZ",
    "CARLOS LUJAN",
    "ANA ORTIZ",
    "Pedro López",
];

/// Validation errors for technician identifiers and names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechnicianValidationError {
    /// The identifier is zero, negative or does not fit the store's integer.
    InvalidId,
    /// The name is blank.
    EmptyName,
    /// The name exceeds [`TECHNICIAN_NAME_MAX`] characters.
    NameTooLong { max: usize },
}

impl fmt::Display for TechnicianValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "technician id must be a positive integer"),
            Self::EmptyName => write!(f, "technician name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "technician name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for TechnicianValidationError {}

/// Store-assigned technician identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct TechnicianId(i32);

impl TechnicianId {
    /// Validate a positive identifier.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::TechnicianId;
    ///
    /// assert_eq!(TechnicianId::new(3).map(|id| id.get()), Ok(3));
    /// assert!(TechnicianId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, TechnicianValidationError> {
        i32::try_from(raw)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(TechnicianValidationError::InvalidId)
    }

    /// Parse a path segment such as `"7"`.
    pub fn parse(raw: &str) -> Result<Self, TechnicianValidationError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| TechnicianValidationError::InvalidId)
            .and_then(Self::new)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for TechnicianId {
    type Error = TechnicianValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TechnicianId> for i32 {
    fn from(value: TechnicianId) -> Self {
        value.0
    }
}

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical technician display name; the natural key of the directory.
///
/// Input is trimmed; matching is exact on the trimmed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TechnicianName(String);

impl TechnicianName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TechnicianValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TechnicianValidationError::EmptyName);
        }
        if trimmed.chars().count() > TECHNICIAN_NAME_MAX {
            return Err(TechnicianValidationError::NameTooLong {
                max: TECHNICIAN_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for TechnicianName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TechnicianName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TechnicianName {
    type Error = TechnicianValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TechnicianName> for String {
    fn from(value: TechnicianName) -> Self {
        value.0
    }
}

/// A technician known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    id: TechnicianId,
    name: TechnicianName,
    created_at: DateTime<Utc>,
}

impl Technician {
    pub fn new(id: TechnicianId, name: TechnicianName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    pub fn id(&self) -> TechnicianId {
        self.id
    }

    pub fn name(&self) -> &TechnicianName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
