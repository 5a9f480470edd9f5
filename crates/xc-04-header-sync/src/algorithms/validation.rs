//! # Header Validation
//!
//! Stateless checks on a single header and on a header against its parent.

use shared_crypto::{recover_signer, EMPTY_UNCLE_HASH};
use shared_types::{Address, ChainId};

use crate::config::{HeaderSyncConfig, MAX_GAS_LIMIT, MIN_GAS_LIMIT};
use crate::domain::{
    HeaderSyncError, PoaHeader, DIFF_IN_TURN, DIFF_NO_TURN, EXTRA_SEAL, EXTRA_VANITY,
    VALIDATOR_BYTES,
};

/// Check the extra-data layout.
///
/// Boundary headers must list at least one validator; other headers must
/// carry nothing between vanity and seal.
pub fn verify_extra(header: &PoaHeader, is_boundary: bool) -> Result<(), HeaderSyncError> {
    let malformed = |reason: &str| HeaderSyncError::MalformedExtra {
        number: header.number,
        reason: reason.to_string(),
    };

    if header.extra.len() < EXTRA_VANITY {
        return Err(malformed("missing vanity"));
    }
    if header.extra.len() < EXTRA_VANITY + EXTRA_SEAL {
        return Err(malformed("missing seal"));
    }

    let validators = header.validator_bytes();
    if is_boundary {
        if validators.is_empty() {
            return Err(malformed("epoch boundary without validators"));
        }
        if validators.len() % VALIDATOR_BYTES != 0 {
            return Err(malformed("validator section is not a multiple of 20 bytes"));
        }
    } else if !validators.is_empty() {
        return Err(malformed("validators outside an epoch boundary"));
    }
    Ok(())
}

/// Step 1: checks that need no parent.
pub fn verify_header_fields(
    header: &PoaHeader,
    config: &HeaderSyncConfig,
    now: u64,
) -> Result<(), HeaderSyncError> {
    let limit = now.saturating_add(config.max_future_drift_secs);
    if header.time > limit {
        return Err(HeaderSyncError::FutureBlock {
            number: header.number,
            time: header.time,
            now,
            drift: config.max_future_drift_secs,
        });
    }

    verify_extra(header, config.is_epoch_boundary(header.number))?;

    if header.mix_digest != [0u8; 32] {
        return Err(HeaderSyncError::InvalidMixDigest(header.number));
    }
    if header.uncle_hash != EMPTY_UNCLE_HASH {
        return Err(HeaderSyncError::InvalidUncleHash(header.number));
    }
    if header.difficulty != DIFF_IN_TURN && header.difficulty != DIFF_NO_TURN {
        return Err(HeaderSyncError::InvalidDifficulty {
            number: header.number,
            difficulty: header.difficulty,
        });
    }
    Ok(())
}

/// Absolute gas limit range and usage. Applies to genesis as well.
pub fn verify_gas_bounds(header: &PoaHeader) -> Result<(), HeaderSyncError> {
    if header.gas_limit < MIN_GAS_LIMIT || header.gas_limit > MAX_GAS_LIMIT {
        return Err(HeaderSyncError::GasLimitOutOfBounds {
            number: header.number,
            gas_limit: header.gas_limit,
        });
    }
    if header.gas_used > header.gas_limit {
        return Err(HeaderSyncError::GasUsedExceedsLimit {
            number: header.number,
            gas_used: header.gas_used,
            gas_limit: header.gas_limit,
        });
    }
    Ok(())
}

/// Step 2: linkage, timing and gas against the stored parent.
pub fn verify_against_parent(
    header: &PoaHeader,
    parent: &PoaHeader,
    config: &HeaderSyncConfig,
) -> Result<(), HeaderSyncError> {
    if header.number != parent.number + 1 {
        return Err(HeaderSyncError::InvalidNumber {
            number: header.number,
            parent_number: parent.number,
        });
    }
    if header.time < parent.time.saturating_add(config.block_period_secs) {
        return Err(HeaderSyncError::InvalidTimestamp {
            number: header.number,
            time: header.time,
            parent_time: parent.time,
        });
    }

    verify_gas_bounds(header)?;

    let delta = header.gas_limit.abs_diff(parent.gas_limit);
    let bound = parent.gas_limit / config.gas_limit_bound_divisor;
    if delta >= bound {
        return Err(HeaderSyncError::GasLimitDelta {
            number: header.number,
            delta,
            bound,
        });
    }
    Ok(())
}

/// Step 3: recover the sealer and match it against the coinbase.
pub fn verify_seal(header: &PoaHeader, chain_id: ChainId) -> Result<Address, HeaderSyncError> {
    let seal = header.seal().ok_or_else(|| HeaderSyncError::MalformedExtra {
        number: header.number,
        reason: "missing seal".to_string(),
    })?;

    let signer = recover_signer(&header.seal_hash(chain_id), &seal).map_err(|e| {
        HeaderSyncError::InvalidSeal {
            number: header.number,
            reason: e.to_string(),
        }
    })?;

    if signer != header.coinbase {
        return Err(HeaderSyncError::SignerMismatch {
            number: header.number,
            declared: hex::encode(header.coinbase),
            recovered: hex::encode(signer),
        });
    }
    Ok(signer)
}
