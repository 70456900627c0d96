mod client;
mod form;
mod hint;
mod identity;
mod member;

pub use client::ClientCommands;
pub use form::FormCommands;
pub use hint::HintCommands;
pub use identity::IdentityCommands;
pub use member::MemberCommands;
