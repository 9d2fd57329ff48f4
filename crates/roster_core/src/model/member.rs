//! Member entity.
//!
//! # Responsibility
//! - Define the member record persisted in the `members` table.
//! - Provide in-memory mutators for the team association.
//!
//! # Invariants
//! - `id` is stable and never reused for another member.
//! - `username` is non-blank; `age` is non-negative.
//! - `team_id` is the only link to a team; the reverse collection is a
//!   query, not a field.

use crate::model::team::TeamId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a member row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemberId = Uuid;

/// Member record, the many side of the member/team association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable global ID used for lookups and upserts.
    pub id: MemberId,
    /// Display/login name. No uniqueness constraint beyond the id.
    pub username: String,
    /// Age in whole years. Non-negative.
    pub age: i64,
    /// Owning team, if the member belongs to one.
    pub team_id: Option<TeamId>,
}

/// Validation failures for member write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    BlankUsername,
    NegativeAge(i64),
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "member username must not be blank"),
            Self::NegativeAge(age) => write!(f, "member age must be non-negative, got {age}"),
        }
    }
}

impl Error for MemberValidationError {}

impl Member {
    /// Creates a member with a generated stable ID and no team.
    pub fn new(username: impl Into<String>, age: i64) -> Self {
        Self::with_id(Uuid::new_v4(), username, age)
    }

    /// Creates a member with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: MemberId, username: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            username: username.into(),
            age,
            team_id: None,
        }
    }

    /// Checks write-path invariants.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.username.trim().is_empty() {
            return Err(MemberValidationError::BlankUsername);
        }
        if self.age < 0 {
            return Err(MemberValidationError::NegativeAge(self.age));
        }
        Ok(())
    }

    /// Points this member at a team. In-memory only until saved.
    pub fn join_team(&mut self, team_id: TeamId) {
        self.team_id = Some(team_id);
    }

    /// Clears the team association. In-memory only until saved.
    pub fn leave_team(&mut self) {
        self.team_id = None;
    }
}
