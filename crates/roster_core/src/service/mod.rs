//! Use-case services orchestrating repository calls.

pub mod member_service;
