//! Router configuration.
//!
//! Can be specified in `restgql.toml` under the `[router]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [router]
//! body_limit_bytes = 1048576
//! ```

use serde::{Deserialize, Serialize};

/// HTTP router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum request body size read by a handler.
    /// Larger bodies are rejected with 413.
    /// Default: 2 MiB
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_body_limit_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl RouterConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.body_limit_bytes == 0 {
            return Err("router.body_limit_bytes must be > 0".into());
        }
        Ok(())
    }
}
