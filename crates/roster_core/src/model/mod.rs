//! Domain model for roster entities.
//!
//! # Responsibility
//! - Define the persistent entities managed by the repository layer.
//! - Own per-entity validation rules applied before every write.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at construction.
//! - Entities are plain values: mutating one never touches storage until a
//!   repository `save` call.

pub mod member;
pub mod team;
