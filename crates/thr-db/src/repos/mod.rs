//! Repository modules for identities, staff memberships, and client records.
//!
//! Each module adds methods to `AccessService` via `impl AccessService` blocks.

pub mod client;
pub mod identity;
pub mod membership;
