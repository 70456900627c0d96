use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::HintContext;

/// Advisory routing signal carried through a redirect.
///
/// Never an authorization: the resolver only honors a hint after checking the
/// identity actually holds the named organization in the named context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Hint {
    pub context: HintContext,
    pub organization_id: String,
}

impl Hint {
    #[must_use]
    pub fn new(context: HintContext, organization_id: impl Into<String>) -> Self {
        Self {
            context,
            organization_id: organization_id.into(),
        }
    }

    /// Build a hint from the raw `context` / `orgId` pair found in a query
    /// string or in storage.
    ///
    /// Both parts are required. An unknown context, a blank org id, or a lone
    /// half yields `None`.
    #[must_use]
    pub fn from_parts(context: Option<&str>, organization_id: Option<&str>) -> Option<Self> {
        let context = context?.trim().parse::<HintContext>().ok()?;
        let organization_id = organization_id?.trim();
        if organization_id.is_empty() {
            return None;
        }
        Some(Self::new(context, organization_id))
    }
}
