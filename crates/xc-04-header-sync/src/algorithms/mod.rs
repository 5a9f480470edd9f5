//! # Algorithms
//!
//! Pure header checks, epoch resolution and fork choice. Storage access goes
//! through `ChainView` so each step can be tested against a plain map.

pub mod epochs;
pub mod fork_choice;
pub mod validation;

pub use epochs::*;
pub use fork_choice::*;
pub use validation::*;

use shared_types::Hash;

use crate::domain::{HeaderSyncError, StoredHeader};

/// Read access to the trusted headers of one chain.
pub trait ChainView {
    /// Stored header by hash.
    fn header(&self, hash: &Hash) -> Result<Option<StoredHeader>, HeaderSyncError>;

    /// Canonical hash at a height.
    fn canonical_hash(&self, height: u64) -> Result<Option<Hash>, HeaderSyncError>;
}
