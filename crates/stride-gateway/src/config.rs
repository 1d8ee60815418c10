//! Gateway configuration, read from the `[gateway]` table.
//!
//! ```toml
//! [gateway]
//! model = "gpt-4o-mini"
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//! timeout_secs = 60
//! temperature = 0.2
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use stride_contracts::error::{StrideError, StrideResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: String,

    /// Any OpenAI-compatible endpoint; `/chat/completions` is appended.
    pub base_url: String,

    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,

    /// HTTP timeout for a single request.
    pub timeout_secs: u64,

    pub temperature: f32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
            temperature: 0.2,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> StrideResult<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(StrideError::ConfigError {
                reason: format!("environment variable '{}' is not set", self.api_key_env),
            }),
        }
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
