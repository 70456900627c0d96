//! Routing-hint storage configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_dir() -> String {
    ".threshold/hints".into()
}

/// Default hint lifetime: 30 minutes.
const fn default_ttl_secs() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HintConfig {
    /// Directory holding the hint and token-identification slot files.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Seconds a stored hint stays usable. `0` disables expiry.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl HintConfig {
    /// Hint lifetime, or `None` when expiry is disabled.
    pub const fn ttl(&self) -> Option<Duration> {
        if self.ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.ttl_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_thirty_minutes() {
        assert_eq!(HintConfig::default().ttl(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let config = HintConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.ttl().is_none());
    }
}
