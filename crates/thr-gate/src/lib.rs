//! # thr-gate
//!
//! Post-authentication identity-and-route resolution.
//!
//! - [`SessionGate`] runs once per [`AuthEvent`] and always produces a
//!   [`GateOutcome`]: a destination plus an optional notice.
//! - [`resolver`] is the pure decision table behind it.
//! - [`ClientTokenResolver`] handles bearer access-link visits.
//! - [`ClientAutoProvisioner`] creates client records from public form access.
//! - [`HintStore`] and [`IdentificationStore`] keep the small amount of state
//!   that survives a redirect, over pluggable [`slots`].
//!
//! Storage is reached only through the traits in [`lookup`]; [`adapters`]
//! implements them for `thr_db`.

pub mod adapters;
pub mod error;
pub mod event;
pub mod gate;
pub mod hint_store;
pub mod identification;
pub mod lookup;
pub mod provision;
pub mod resolver;
pub mod slots;
mod test_support;
pub mod token;

pub use error::GateError;
pub use event::{AuthEvent, ProviderError};
pub use gate::{GateOutcome, Notice, NoticeLevel, SessionGate};
pub use hint_store::HintStore;
pub use identification::{IdentificationStore, TokenIdentification};
pub use provision::{ClientAutoProvisioner, Provisioned};
pub use token::ClientTokenResolver;
