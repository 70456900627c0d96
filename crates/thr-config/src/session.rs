//! Session-gate behaviour and client token issuance settings.

use serde::{Deserialize, Serialize};

const fn default_touch_last_seen() -> bool {
    true
}

const fn default_token_ttl_hours() -> u32 {
    7 * 24
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Record `last_seen_at` when a resolution lands in the staff workspace.
    #[serde(default = "default_touch_last_seen")]
    pub touch_last_seen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            touch_last_seen: default_touch_last_seen(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Lifetime of newly issued client access tokens, in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub default_ttl_hours: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_ttl_hours: default_token_ttl_hours(),
        }
    }
}
