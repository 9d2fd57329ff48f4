//! Team entity.
//!
//! # Invariants
//! - `id` is stable and never reused for another team.
//! - `name` is non-blank. No uniqueness constraint beyond the id.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a team row.
pub type TeamId = Uuid;

/// Team record, the one side of the member/team association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable global ID used for lookups and upserts.
    pub id: TeamId,
    /// Team display name.
    pub name: String,
}

/// Validation failures for team write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamValidationError {
    BlankName,
}

impl Display for TeamValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "team name must not be blank"),
        }
    }
}

impl Error for TeamValidationError {}

impl Team {
    /// Creates a team with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a team with a caller-provided stable ID.
    pub fn with_id(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Checks write-path invariants.
    pub fn validate(&self) -> Result<(), TeamValidationError> {
        if self.name.trim().is_empty() {
            return Err(TeamValidationError::BlankName);
        }
        Ok(())
    }

    /// Renames the team. In-memory only until saved.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

#[cfg(test)]
mod tests {
    use super::{Team, TeamValidationError};

    #[test]
    fn validate_rejects_blank_name() {
        let blank = Team::new("");
        assert_eq!(blank.validate(), Err(TeamValidationError::BlankName));
        assert_eq!(Team::new("teamA").validate(), Ok(()));
    }

    #[test]
    fn rename_replaces_name_in_memory() {
        let mut team = Team::new("teamA");
        team.rename("teamB");
        assert_eq!(team.name, "teamB");
    }
}
