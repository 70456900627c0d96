//! ID prefix constants.
//!
//! IDs are `{prefix}-{8 hex}`, generated in SQL by `ThresholdDb::generate_id`.
//! Organization and form ids come from the surrounding product and are opaque
//! strings here.

pub const PREFIX_IDENTITY: &str = "usr";
pub const PREFIX_CLIENT: &str = "cli";
