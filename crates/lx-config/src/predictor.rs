//! Trend predictor defaults.

use serde::{Deserialize, Serialize};

const fn default_target_year() -> i32 {
    2030
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictorConfig {
    /// Target year used when a request does not supply one.
    #[serde(default = "default_target_year")]
    pub default_target_year: i32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            default_target_year: default_target_year(),
        }
    }
}
