use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{FieldCode, Validate, ValidationError};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Creation and modification instants, flattened into each stored entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamped {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Timestamped {
    pub fn set_creation(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.modified = now;
    }

    pub fn set_modification(&mut self, now: DateTime<Utc>) {
        self.modified = now;
    }
}

/// A client-supplied identifier kept as text until it is validated, so a
/// malformed reference becomes a field error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeUuid(String);

impl SafeUuid {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(self.0.trim()).ok()
    }
}

impl From<Uuid> for SafeUuid {
    fn from(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }
}

impl fmt::Display for SafeUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Validate for SafeUuid {
    type Clean = SafeUuid;

    /// Normalizes to the lowercase hyphenated form. Errors carry an empty path.
    fn get_validated(&self) -> Result<SafeUuid, ValidationError> {
        self.to_uuid().map(SafeUuid::from).ok_or_else(|| {
            ValidationError::new(
                "",
                FieldCode::BadUuid,
                "Double-check the ID you're trying to reference, because this one doesn't look right. It should be in the format of a UUID.",
            )
        })
    }
}
