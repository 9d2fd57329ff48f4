//! Core data-access library for the roster workspace.
//! This crate is the single source of truth for roster persistence contracts.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{Member, MemberId, MemberValidationError};
pub use model::team::{Team, TeamId, TeamValidationError};
pub use query::{AgeFilter, MemberQuery, Page, PageRequest, Sort, SortDirection, SortKey};
pub use repo::member_repo::{
    MemberRepository, MemberSummary, MemberWithTeam, RepoError, RepoResult,
    SqliteMemberRepository,
};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use service::member_service::{MemberService, RegisterMemberRequest};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
