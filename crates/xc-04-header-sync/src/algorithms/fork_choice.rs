//! # Fork Choice
//!
//! Heaviest cumulative difficulty wins. Ties keep the current canonical chain.

use shared_types::Hash;

use super::ChainView;
use crate::domain::{HeaderSyncError, StoredHeader};

/// Canonical-index rewrite caused by a heavier header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalUpdate {
    /// Heights whose canonical marker is removed.
    pub clear: Vec<u64>,
    /// `(height, hash)` markers to write, from the new tip downwards.
    pub assign: Vec<(u64, Hash)>,
    /// Canonical height after the update.
    pub new_height: u64,
}

/// Plan the canonical rewrite for `new`, or `None` if it does not outweigh
/// the current tip.
pub fn plan_canonical_update(
    view: &dyn ChainView,
    new: &StoredHeader,
    tip: &StoredHeader,
) -> Result<Option<CanonicalUpdate>, HeaderSyncError> {
    if new.cumulative_weight <= tip.cumulative_weight {
        return Ok(None);
    }

    let clear = ((new.number() + 1)..=tip.number()).collect();
    let mut assign = vec![(new.number(), new.hash)];

    let mut height = new.number();
    let mut hash = new.parent_hash();
    while height > 0 {
        height -= 1;
        if view.canonical_hash(height)? == Some(hash) {
            break;
        }
        assign.push((height, hash));
        let ancestor = view
            .header(&hash)?
            .ok_or_else(|| HeaderSyncError::UnknownParent {
                number: height + 1,
                parent: hex::encode(hash),
            })?;
        hash = ancestor.parent_hash();
    }

    Ok(Some(CanonicalUpdate {
        clear,
        assign,
        new_height: new.number(),
    }))
}
