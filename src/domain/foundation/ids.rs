//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Timestamp, ValidationError};

/// Unique identifier for one intake conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeSessionId(Uuid);

impl IntakeSessionId {
    /// Creates a new random IntakeSessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an IntakeSessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IntakeSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntakeSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IntakeSessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Number of low-order decimal digits of the start time kept in a record id.
const RECORD_ID_DIGITS: u64 = 1_000_000;

/// Human-readable record identifier such as `AST-482913`.
///
/// Combines a kind-specific prefix with the last six decimal digits of the
/// Unix time at which collection started.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a record id from a prefix and the collection start time.
    pub fn generate(prefix: &str, started_at: &Timestamp) -> Self {
        let digits = started_at.as_unix_secs() % RECORD_ID_DIGITS;
        Self(format!("{}{:06}", prefix, digits))
    }

    /// Wraps an existing identifier, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("record_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
