//! In-memory validator epoch source.

use std::collections::BTreeMap;

use crate::domain::ValidatorEpoch;
use crate::ports::ValidatorEpochSource;

/// Epoch snapshots keyed by start height.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEpochSource {
    epochs: BTreeMap<u64, ValidatorEpoch>,
}

impl InMemoryEpochSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source seeded with one epoch.
    pub fn with_epoch(epoch: ValidatorEpoch) -> Self {
        let mut source = Self::new();
        source.insert(epoch);
        source
    }

    /// Add or replace the epoch starting at `epoch.start_height`.
    pub fn insert(&mut self, epoch: ValidatorEpoch) {
        self.epochs.insert(epoch.start_height, epoch);
    }
}

impl ValidatorEpochSource for InMemoryEpochSource {
    fn current_epoch(&self) -> Option<ValidatorEpoch> {
        self.epochs.values().next_back().cloned()
    }

    fn epoch_at_height(&self, height: u64) -> Option<ValidatorEpoch> {
        self.epochs
            .range(..=height)
            .next_back()
            .map(|(_, epoch)| epoch.clone())
    }
}
