//! # thr-core
//!
//! Core types, ID prefixes, and error types for Threshold.
//!
//! This crate provides the foundational types shared across all Threshold crates:
//! - Entity structs for identities, staff memberships, client records and hints
//! - The `Destination` variant produced by route resolution
//! - Role, context, and reason enums with their storage/wire strings
//! - ID prefix constants
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
