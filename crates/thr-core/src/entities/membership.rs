use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::StaffRole;

/// An identity's membership in an organization workspace.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StaffMembership {
    pub identity_id: String,
    pub organization_id: String,
    pub role: StaffRole,
}
