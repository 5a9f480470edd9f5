//! # Redeem Scripts
//!
//! Standard `OP_m <pk1..pkN> OP_N OP_CHECKMULTISIG` templates and the
//! locking scripts derived from them.

use std::collections::BTreeSet;

use bitcoin::hashes::{hash160, Hash};
use bitcoin::opcodes::all::{OP_CHECKMULTISIG, OP_PUSHNUM_1, OP_PUSHNUM_16};
use bitcoin::opcodes::Opcode;
use bitcoin::script::{Instruction, Script, ScriptBuf};
use bitcoin::PublicKey;

use crate::domain::{CustodyError, RedeemRecord, ScriptKind};

/// Hex of `hash160(redeem_script)`.
pub fn redeem_key(redeem_script: &[u8]) -> String {
    hex::encode(hash160::Hash::hash(redeem_script).to_byte_array())
}

fn small_int(op: Opcode) -> Option<usize> {
    let byte = op.to_u8();
    let first = OP_PUSHNUM_1.to_u8();
    (first..=OP_PUSHNUM_16.to_u8())
        .contains(&byte)
        .then(|| usize::from(byte - first) + 1)
}

/// Parse a multisig redeem script into its record.
pub fn parse_multisig(redeem_script: &[u8]) -> Result<RedeemRecord, CustodyError> {
    let invalid = |reason: &str| CustodyError::InvalidRedeemScript(reason.to_string());

    let instructions = Script::from_bytes(redeem_script)
        .instructions()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CustodyError::InvalidRedeemScript(e.to_string()))?;

    let [Instruction::Op(m_op), keys @ .., Instruction::Op(n_op), Instruction::Op(check)] =
        instructions.as_slice()
    else {
        return Err(invalid("not a multisig template"));
    };
    if *check != OP_CHECKMULTISIG {
        return Err(invalid("missing OP_CHECKMULTISIG"));
    }
    let required = small_int(*m_op).ok_or_else(|| invalid("m is not OP_1..OP_16"))?;
    let total = small_int(*n_op).ok_or_else(|| invalid("n is not OP_1..OP_16"))?;
    if keys.len() != total {
        return Err(invalid("key count differs from n"));
    }
    if required > total {
        return Err(invalid("m exceeds n"));
    }

    let mut public_keys = Vec::with_capacity(total);
    let mut custodians = Vec::with_capacity(total);
    let mut seen = BTreeSet::new();
    for instruction in keys {
        let Instruction::PushBytes(bytes) = instruction else {
            return Err(invalid("non-push between m and n"));
        };
        let key = PublicKey::from_slice(bytes.as_bytes())
            .map_err(|e| CustodyError::InvalidRedeemScript(e.to_string()))?;
        if !key.compressed {
            return Err(invalid("uncompressed public key"));
        }
        if !seen.insert(bytes.as_bytes().to_vec()) {
            return Err(invalid("public key repeated"));
        }
        public_keys.push(bytes.as_bytes().to_vec());
        custodians.push(key.pubkey_hash().to_byte_array());
    }

    Ok(RedeemRecord {
        redeem_key: redeem_key(redeem_script),
        redeem_script: redeem_script.to_vec(),
        required,
        public_keys,
        custodians,
    })
}

/// Locking script paying into the redeem script.
pub fn locking_script(redeem_script: &[u8], kind: ScriptKind) -> ScriptBuf {
    let script = Script::from_bytes(redeem_script);
    match kind {
        ScriptKind::P2sh => ScriptBuf::new_p2sh(&script.script_hash()),
        ScriptKind::P2wsh => ScriptBuf::new_p2wsh(&script.wscript_hash()),
    }
}

/// How `script_pubkey` locks to the redeem script, if it does.
pub fn output_kind(redeem_script: &[u8], script_pubkey: &[u8]) -> Option<ScriptKind> {
    [ScriptKind::P2sh, ScriptKind::P2wsh]
        .into_iter()
        .find(|kind| locking_script(redeem_script, *kind).as_bytes() == script_pubkey)
}
