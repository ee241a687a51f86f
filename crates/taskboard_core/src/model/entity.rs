//! Entity domain model.
//!
//! # Responsibility
//! - Define the work-item record moved between status buckets.
//! - Provide the display projections used by item views.
//!
//! # Invariants
//! - `id` is generated once and never reused for another entity.
//! - `status` is the only field mutated after creation.
//! - `assignee_count` is checked by the form validator, never here.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one entity.
///
/// The hyphenated string form doubles as the drag transfer payload.
pub type EntityId = Uuid;

/// Status bucket an entity currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    /// Work still in progress. Every new entity starts here.
    Active,
    /// Work completed.
    Finished,
}

impl EntityStatus {
    /// All statuses in board column order.
    pub const ALL: [EntityStatus; 2] = [EntityStatus::Active, EntityStatus::Finished];

    /// Stable lowercase id used in element ids and CLI input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    /// Uppercase heading label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Finished => "FINISHED",
        }
    }

    /// Parses the lowercase id form, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, UnknownStatusError> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

impl Display for EntityStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is neither `active` nor `finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError(pub String);

impl Display for UnknownStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown entity status `{}`; expected active|finished",
            self.0
        )
    }
}

impl Error for UnknownStatusError {}

/// One work-item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub assignee_count: u32,
    pub status: EntityStatus,
}

impl Entity {
    /// Creates an `Active` entity with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assignee_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            assignee_count,
            status: EntityStatus::Active,
        }
    }

    /// Human label for the assignee count: `1 person` or `{n} persons`.
    pub fn assignee_label(&self) -> String {
        if self.assignee_count == 1 {
            "1 person".to_string()
        } else {
            format!("{} persons", self.assignee_count)
        }
    }
}
