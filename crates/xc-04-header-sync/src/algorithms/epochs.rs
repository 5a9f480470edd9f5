//! # Validator Epoch Resolution
//!
//! Two generations of validator sets are live at any height: the set from the
//! most recent boundary below it (newer) and the one before that (older). The
//! older set keeps producing until half its members have had a turn after the
//! newer boundary.

use shared_types::{Address, Hash};
use xc_03_consensus_vote::ValidatorEpoch;

use super::ChainView;
use crate::config::HeaderSyncConfig;
use crate::domain::{HeaderSyncError, StoredHeader, DIFF_IN_TURN, DIFF_NO_TURN};

/// Genesis anchor of the ancestor walk.
#[derive(Debug, Clone)]
pub struct GenesisSnapshot {
    /// Genesis hash.
    pub hash: Hash,
    /// Set embedded in the genesis header.
    pub current: ValidatorEpoch,
    /// Set supplied by governance for the epoch before genesis.
    pub prior: ValidatorEpoch,
}

/// The two live validator generations for a height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochPair {
    /// Second most recent boundary.
    pub older: ValidatorEpoch,
    /// Most recent boundary.
    pub newer: ValidatorEpoch,
}

impl EpochPair {
    /// Set that must have produced the block at `number`.
    pub fn authoritative(&self, number: u64) -> &ValidatorEpoch {
        let since_newer = number.saturating_sub(self.newer.start_height);
        if since_newer <= (self.older.len() / 2) as u64 {
            &self.older
        } else {
            &self.newer
        }
    }
}

/// Walk back from `parent` collecting the two most recent boundary headers
/// strictly below the header being verified.
pub fn resolve_epochs(
    view: &dyn ChainView,
    parent: &StoredHeader,
    genesis: &GenesisSnapshot,
    config: &HeaderSyncConfig,
) -> Result<EpochPair, HeaderSyncError> {
    let target = parent.number() + 1;
    let mut found: Vec<ValidatorEpoch> = Vec::with_capacity(2);
    let mut cursor = parent.clone();

    loop {
        if cursor.hash == genesis.hash {
            found.push(genesis.current.clone());
            if found.len() < 2 {
                found.push(genesis.prior.clone());
            }
            break;
        }

        if config.is_epoch_boundary(cursor.number()) {
            let validators = cursor
                .header
                .validators()
                .filter(|v| !v.is_empty())
                .ok_or(HeaderSyncError::EpochNotFound(target))?;
            found.push(ValidatorEpoch::new(cursor.number(), validators));
            if found.len() == 2 {
                break;
            }
        }

        cursor = view
            .header(&cursor.parent_hash())?
            .ok_or(HeaderSyncError::EpochNotFound(target))?;
    }

    let older = found.pop().ok_or(HeaderSyncError::EpochNotFound(target))?;
    let newer = found.pop().ok_or(HeaderSyncError::EpochNotFound(target))?;
    Ok(EpochPair { older, newer })
}

/// Reject `signer` if it produced one of the `window` blocks below the header.
pub fn check_recent_signers(
    view: &dyn ChainView,
    parent: &StoredHeader,
    signer: &Address,
    window: u64,
) -> Result<(), HeaderSyncError> {
    let number = parent.number() + 1;
    let mut cursor = Some(parent.clone());

    while let Some(ancestor) = cursor {
        if number - ancestor.number() > window {
            break;
        }
        if ancestor.signer == *signer {
            return Err(HeaderSyncError::RecentlySigned {
                number,
                signer: hex::encode(signer),
                last_signed: ancestor.number(),
            });
        }
        cursor = view.header(&ancestor.parent_hash())?;
    }
    Ok(())
}

/// Require the difficulty to match whether `signer` holds the turn slot.
pub fn check_turn(
    epoch: &ValidatorEpoch,
    number: u64,
    signer: &Address,
    difficulty: u64,
) -> Result<(), HeaderSyncError> {
    let index = epoch
        .index_of(signer)
        .ok_or_else(|| HeaderSyncError::UnauthorizedSigner {
            number,
            signer: hex::encode(signer),
        })?;

    let index_in_turn = (number % epoch.len() as u64) as usize;
    let in_turn = index == index_in_turn;

    match (in_turn, difficulty) {
        (true, DIFF_IN_TURN) | (false, DIFF_NO_TURN) => Ok(()),
        _ => Err(HeaderSyncError::WrongDifficultyForTurn {
            number,
            difficulty,
            in_turn,
        }),
    }
}
