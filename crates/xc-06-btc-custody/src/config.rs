//! # Custody Configuration

use serde::{Deserialize, Serialize};

use crate::domain::ScriptKind;

/// Standard relay dust threshold for P2WSH/P2SH outputs.
pub const DEFAULT_DUST_LIMIT_SAT: u64 = 546;

/// Custody configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustodyConfig {
    /// Change at or below this value is left to the fee.
    pub dust_limit_sat: u64,
    /// Locking script used for change paid back into custody.
    pub script_kind: ScriptKind,
    /// Most inputs one draft may spend.
    pub max_inputs: usize,
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            dust_limit_sat: DEFAULT_DUST_LIMIT_SAT,
            script_kind: ScriptKind::P2wsh,
            max_inputs: 100,
        }
    }
}

impl CustodyConfig {
    /// Create a config for testing (small drafts).
    pub fn for_testing() -> Self {
        Self {
            max_inputs: 8,
            ..Self::default()
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_inputs == 0 {
            return Err("max_inputs must be > 0".to_string());
        }
        Ok(())
    }
}
