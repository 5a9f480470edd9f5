//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};

use super::errors::HeaderSyncError;
use super::header::PoaHeader;

/// Light client lifecycle for one foreign chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightClientState {
    /// No genesis stored.
    Uninitialized,
    /// Genesis stored, no header accepted after it.
    GenesisSet,
    /// At least one header accepted after genesis.
    Synced,
}

/// A trusted foreign header with its fork-choice weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHeader {
    /// `header.hash()`.
    pub hash: Hash,
    /// The full header.
    pub header: PoaHeader,
    /// Producer recovered from the seal.
    pub signer: Address,
    /// Sum of difficulties from genesis.
    pub cumulative_weight: u128,
}

impl StoredHeader {
    /// Height.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Parent hash.
    pub fn parent_hash(&self) -> Hash {
        self.header.parent_hash
    }
}

/// Marker written once by `sync_genesis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    /// Genesis header hash.
    pub hash: Hash,
    /// Genesis height.
    pub number: u64,
    /// Start height of the prior epoch snapshot.
    pub prior_epoch_start: u64,
}

/// Progress through a header batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Headers newly stored.
    pub accepted: usize,
    /// Headers already known.
    pub skipped: usize,
    /// Accepted headers that relabeled existing canonical heights.
    pub reorgs: usize,
    /// Canonical height after the batch.
    pub canonical_height: u64,
}

/// Header batch result that keeps the progress made before a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Headers applied before the batch stopped.
    pub report: SyncReport,
    /// Header that stopped the batch, if any.
    pub rejected: Option<HeaderSyncError>,
}

impl BatchOutcome {
    /// The report when every header applied, else the rejection.
    pub fn into_result(self) -> Result<SyncReport, HeaderSyncError> {
        match self.rejected {
            None => Ok(self.report),
            Some(e) => Err(e),
        }
    }
}
