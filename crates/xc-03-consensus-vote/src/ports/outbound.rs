//! # Outbound Ports (Driven Ports)
//!
//! Governance owns validator epochs; the bridge only reads them.

use crate::domain::ValidatorEpoch;

/// Source of validator epochs for relay voting.
pub trait ValidatorEpochSource: Send + Sync {
    /// The newest epoch.
    fn current_epoch(&self) -> Option<ValidatorEpoch>;

    /// The epoch governing `height`: the one with the greatest start at or below it.
    fn epoch_at_height(&self, height: u64) -> Option<ValidatorEpoch>;
}
