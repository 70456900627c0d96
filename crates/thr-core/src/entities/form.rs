use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A public intake form owned by one organization.
///
/// Only the owning organization matters for routing; form content is handled
/// elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PublicForm {
    pub id: String,
    pub organization_id: String,
}
