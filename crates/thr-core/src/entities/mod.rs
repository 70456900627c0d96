//! Entity structs for the Threshold data model.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod client;
mod destination;
mod form;
mod hint;
mod identity;
mod membership;

pub use client::{ClientRecord, TokenState};
pub use destination::Destination;
pub use form::PublicForm;
pub use hint::Hint;
pub use identity::Identity;
pub use membership::StaffMembership;
