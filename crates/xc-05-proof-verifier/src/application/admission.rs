//! Payload binding and replay admission shared by every verifier.

use shared_types::{ChainId, CrossChainInstruction, EventPayload, TransitionContext};
use tracing::info;
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_02_replay_ledger::ReplayLedger;

use crate::domain::ProofError;

/// Decode `payload` and bind it to its source chain, requiring it to be
/// addressed to the local chain.
pub(crate) fn bind_payload(
    payload: &[u8],
    source_chain_id: ChainId,
    local_chain_id: ChainId,
    max_len: usize,
) -> Result<CrossChainInstruction, ProofError> {
    if payload.len() > max_len {
        return Err(ProofError::PayloadTooLarge {
            len: payload.len(),
            max: max_len,
        });
    }
    let decoded = EventPayload::decode(payload)?;
    if decoded.to_chain_id != local_chain_id {
        return Err(ProofError::WrongDestination {
            expected: local_chain_id,
            actual: decoded.to_chain_id,
        });
    }
    Ok(decoded.into_instruction(source_chain_id)?)
}

/// Mark the instruction applied and hand it back.
pub(crate) fn admit<S: KeyValueStore>(
    state: &mut BridgeState<S>,
    ctx: &TransitionContext,
    instruction: CrossChainInstruction,
    verifier: &'static str,
) -> Result<CrossChainInstruction, ProofError> {
    ReplayLedger::new().mark_applied(
        state,
        ctx,
        instruction.source_chain_id,
        &instruction.cross_chain_id,
    )?;
    info!(
        verifier,
        chain_id = instruction.source_chain_id,
        cross_chain_id = %instruction.cross_chain_id_hex(),
        method = %instruction.method,
        "[xc-05] instruction admitted"
    );
    Ok(instruction)
}
