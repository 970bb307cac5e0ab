//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "Life Expectancy Dashboard".to_string()
}

/// Default number of audit entries shown.
const fn default_audit_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page title rendered in the dashboard layout.
    #[serde(default = "default_title")]
    pub title: String,

    /// How many audit entries the audit view lists.
    #[serde(default = "default_audit_limit")]
    pub audit_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            audit_limit: default_audit_limit(),
        }
    }
}
