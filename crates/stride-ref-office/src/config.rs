//! The office deployment's TOML document: policy plus `[gateway]`.
//!
//! ```toml
//! [limits]
//! default_max_steps = 8
//!
//! [[rules]]
//! id = "mail-read-only"
//! tool = "send_email"
//! verdict = "deny"
//!
//! [gateway]
//! model = "gpt-4o-mini"
//! ```

use std::path::Path;

use serde::Deserialize;

use stride_contracts::error::{StrideError, StrideResult};
use stride_gateway::GatewayConfig;
use stride_policy::PolicyConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficeConfig {
    #[serde(flatten)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl OfficeConfig {
    pub fn from_toml_str(s: &str) -> StrideResult<Self> {
        toml::from_str(s).map_err(|e| StrideError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> StrideResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StrideError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
