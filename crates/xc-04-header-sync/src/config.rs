//! # Header Sync Configuration

use serde::{Deserialize, Serialize};

/// Default blocks per validator epoch.
pub const DEFAULT_EPOCH_LENGTH: u64 = 200;

/// Lowest acceptable gas limit.
pub const MIN_GAS_LIMIT: u64 = 5000;

/// Highest acceptable gas limit (`2^63 - 1`).
pub const MAX_GAS_LIMIT: u64 = 0x7fff_ffff_ffff_ffff;

/// Header sync configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSyncConfig {
    /// Blocks per validator epoch; boundary headers carry the next set.
    pub epoch_length: u64,

    /// Allowed lead of a header's time over the host timestamp.
    pub max_future_drift_secs: u64,

    /// Minimum spacing between a header and its parent.
    pub block_period_secs: u64,

    /// Gas-limit change must stay below `parent.gas_limit / divisor`.
    pub gas_limit_bound_divisor: u64,

    /// Longest header batch accepted in one call.
    pub max_batch_size: usize,
}

impl Default for HeaderSyncConfig {
    fn default() -> Self {
        Self {
            epoch_length: DEFAULT_EPOCH_LENGTH,
            max_future_drift_secs: 15,
            block_period_secs: 3,
            gas_limit_bound_divisor: 256,
            max_batch_size: 500,
        }
    }
}

impl HeaderSyncConfig {
    /// Create a config for testing (short epochs, one-second blocks).
    pub fn for_testing() -> Self {
        Self {
            epoch_length: 8,
            max_future_drift_secs: 15,
            block_period_secs: 1,
            gas_limit_bound_divisor: 256,
            max_batch_size: 64,
        }
    }

    /// Whether `number` is an epoch boundary.
    pub fn is_epoch_boundary(&self, number: u64) -> bool {
        self.epoch_length != 0 && number % self.epoch_length == 0
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.epoch_length == 0 {
            return Err("epoch_length must be positive".into());
        }
        if self.gas_limit_bound_divisor == 0 {
            return Err("gas_limit_bound_divisor must be positive".into());
        }
        if self.max_batch_size == 0 {
            return Err("max_batch_size must be positive".into());
        }
        Ok(())
    }
}
