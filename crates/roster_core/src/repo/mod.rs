//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce entity `validate()` before persistence.
//! - Repository APIs return semantic errors (`MemberNotFound`,
//!   `NonUniqueResult`) in addition to DB transport errors.

pub mod member_repo;
pub mod team_repo;
