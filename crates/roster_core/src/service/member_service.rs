//! Member use-case service.
//!
//! # Responsibility
//! - Provide stable roster entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::member::{Member, MemberId};
use crate::model::team::TeamId;
use crate::query::{Page, PageRequest};
use crate::repo::member_repo::{MemberRepository, MemberSummary, RepoError, RepoResult};

/// Use-case service wrapper for member operations.
pub struct MemberService<R: MemberRepository> {
    repo: R,
}

/// Request model for registering a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterMemberRequest {
    /// Display/login name stored in `username`.
    pub username: String,
    /// Age in whole years.
    pub age: i64,
    /// Optional team to enroll the member into immediately.
    pub team_id: Option<TeamId>,
}

impl<R: MemberRepository> MemberService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a member and returns the created stable ID.
    pub fn register_member(&self, request: &RegisterMemberRequest) -> RepoResult<MemberId> {
        let mut member = Member::new(request.username.clone(), request.age);
        if let Some(team_id) = request.team_id {
            member.join_team(team_id);
        }
        self.repo.save(&member)
    }

    /// Moves an existing member to a team and persists the change.
    pub fn transfer_to_team(&self, member_id: MemberId, team_id: TeamId) -> RepoResult<Member> {
        let mut member = self
            .repo
            .find_by_id(member_id)?
            .ok_or(RepoError::MemberNotFound(member_id))?;
        member.join_team(team_id);
        self.repo.save(&member)?;
        Ok(member)
    }

    /// Gets one member by ID.
    pub fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        self.repo.find_by_id(id)
    }

    /// Returns one page of members with the given age.
    pub fn members_of_age(&self, age: i64, request: &PageRequest) -> RepoResult<Page<Member>> {
        self.repo.page_by_age(age, request)
    }

    /// Joined member/team projection rows.
    pub fn roster_summaries(&self) -> RepoResult<Vec<MemberSummary>> {
        self.repo.list_summaries()
    }

    /// Bumps the age of every member at or above `min_age` by one year.
    /// Returns the number of updated members.
    pub fn celebrate_birthdays(&self, min_age: i64) -> RepoResult<usize> {
        self.repo.bulk_age_plus(min_age)
    }
}
