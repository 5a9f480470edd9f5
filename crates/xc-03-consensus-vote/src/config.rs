//! # Vote Engine Configuration

use serde::{Deserialize, Serialize};

/// Vote engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    /// Largest message accepted for voting, in bytes.
    pub max_message_len: usize,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            max_message_len: 64 * 1024,
        }
    }
}

impl VoteConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            max_message_len: 1024,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_message_len == 0 {
            return Err("max_message_len must be positive".to_string());
        }
        Ok(())
    }
}
