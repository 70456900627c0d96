pub mod choose_role;
pub mod client;
pub mod dispatch;
pub mod form;
pub mod hint;
pub mod identity;
pub mod init;
pub mod member;
pub mod resolve;
pub mod schema;
pub mod visit;
