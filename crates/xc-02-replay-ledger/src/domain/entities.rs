//! # Replay Marker

use serde::{Deserialize, Serialize};

/// Persisted proof that a cross-chain ID was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMarker {
    /// Local height of the transition that applied it.
    pub applied_at_height: u64,
}
