//! # Sighash, Verification and Assembly
//!
//! Every input is signed with `SIGHASH_ALL`. P2SH inputs use the legacy
//! algorithm with the redeem script as script code; P2WSH inputs use BIP-143
//! with the spent value.

use bitcoin::ecdsa::Signature;
use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::OP_PUSHBYTES_0;
use bitcoin::script::{Builder, PushBytesBuf, Script};
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{Amount, PublicKey, Transaction, Witness};

use super::redeem::output_kind;
use crate::domain::{CustodyError, CustodyUtxo, ScriptKind};

fn encoding(e: impl std::fmt::Display) -> CustodyError {
    CustodyError::Encoding(e.to_string())
}

/// Digest a custodian signs for input `index`.
pub fn input_sighash(
    tx: &Transaction,
    index: usize,
    spent: &CustodyUtxo,
    redeem_script: &[u8],
) -> Result<[u8; 32], CustodyError> {
    let script_code = Script::from_bytes(redeem_script);
    let mut cache = SighashCache::new(tx);
    match output_kind(redeem_script, &spent.script_pubkey) {
        Some(ScriptKind::P2sh) => cache
            .legacy_signature_hash(index, script_code, EcdsaSighashType::All.to_u32())
            .map(|h| h.to_byte_array())
            .map_err(encoding),
        Some(ScriptKind::P2wsh) => cache
            .p2wsh_signature_hash(
                index,
                script_code,
                Amount::from_sat(spent.value),
                EcdsaSighashType::All,
            )
            .map(|h| h.to_byte_array())
            .map_err(encoding),
        None => Err(CustodyError::UnsupportedScript(index)),
    }
}

/// Check a DER + sighash-byte signature over `sighash`.
pub fn verify_signature(
    input: usize,
    sighash: [u8; 32],
    signature: &[u8],
    public_key: &[u8],
) -> Result<(), CustodyError> {
    let invalid = |reason: String| CustodyError::InvalidSignature { input, reason };

    let signature = Signature::from_slice(signature).map_err(|e| invalid(e.to_string()))?;
    if signature.sighash_type != EcdsaSighashType::All {
        return Err(invalid(format!(
            "sighash type {} is not SIGHASH_ALL",
            signature.sighash_type
        )));
    }
    let key = PublicKey::from_slice(public_key).map_err(|e| invalid(e.to_string()))?;
    Secp256k1::verification_only()
        .verify_ecdsa(&Message::from_digest(sighash), &signature.signature, &key.inner)
        .map_err(|e| invalid(e.to_string()))
}

fn push(bytes: &[u8]) -> Result<PushBytesBuf, CustodyError> {
    PushBytesBuf::try_from(bytes.to_vec()).map_err(encoding)
}

/// Fill every input's unlocking data.
///
/// `signer_sigs` holds one signature list per signer, in redeem-script key
/// order, each with one entry per input.
pub fn assemble(
    mut tx: Transaction,
    inputs: &[CustodyUtxo],
    redeem_script: &[u8],
    signer_sigs: &[&Vec<Vec<u8>>],
) -> Result<Transaction, CustodyError> {
    for (index, (txin, spent)) in tx.input.iter_mut().zip(inputs).enumerate() {
        let signatures = signer_sigs
            .iter()
            .map(|sigs| {
                sigs.get(index)
                    .map(Vec::as_slice)
                    .ok_or(CustodyError::SignatureCountMismatch {
                        expected: inputs.len(),
                        actual: sigs.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match output_kind(redeem_script, &spent.script_pubkey) {
            Some(ScriptKind::P2sh) => {
                // OP_0 absorbs the extra item CHECKMULTISIG pops.
                let mut builder = Builder::new().push_opcode(OP_PUSHBYTES_0);
                for signature in signatures {
                    builder = builder.push_slice(push(signature)?);
                }
                txin.script_sig = builder.push_slice(push(redeem_script)?).into_script();
            }
            Some(ScriptKind::P2wsh) => {
                let mut witness = Witness::new();
                witness.push(Vec::<u8>::new());
                for signature in signatures {
                    witness.push(signature);
                }
                witness.push(redeem_script);
                txin.witness = witness;
            }
            None => return Err(CustodyError::UnsupportedScript(index)),
        }
    }
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::redeem::locking_script;
    use crate::test_utils::{unsigned_spend, Custodians};

    fn utxo(script: &[u8], kind: ScriptKind, value: u64) -> CustodyUtxo {
        CustodyUtxo {
            txid: [0x42; 32],
            vout: 0,
            value,
            script_pubkey: locking_script(script, kind).to_bytes(),
        }
    }

    #[test]
    fn test_sign_and_verify_each_kind() {
        let custodians = Custodians::new(3);
        let script = custodians.redeem_script(2);

        for kind in [ScriptKind::P2sh, ScriptKind::P2wsh] {
            let spent = vec![utxo(&script, kind, 50_000)];
            let tx = unsigned_spend(&spent, 40_000);
            let sighash = input_sighash(&tx, 0, &spent[0], &script).unwrap();
            let sig = custodians.sign_digest(0, sighash);

            assert!(verify_signature(0, sighash, &sig, &custodians.public_key(0)).is_ok());
            assert!(verify_signature(0, sighash, &sig, &custodians.public_key(1)).is_err());
        }
    }

    #[test]
    fn test_segwit_sighash_commits_to_value() {
        let script = Custodians::new(2).redeem_script(1);
        let low = vec![utxo(&script, ScriptKind::P2wsh, 10_000)];
        let high = vec![utxo(&script, ScriptKind::P2wsh, 20_000)];
        let tx = unsigned_spend(&low, 5_000);
        assert_ne!(
            input_sighash(&tx, 0, &low[0], &script).unwrap(),
            input_sighash(&tx, 0, &high[0], &script).unwrap()
        );
    }

    #[test]
    fn test_rejects_garbage_and_wrong_sighash_type() {
        let custodians = Custodians::new(1);
        let digest = [7u8; 32];
        assert!(verify_signature(0, digest, &[0x30, 0x01], &custodians.public_key(0)).is_err());

        let mut sig = custodians.sign_digest(0, digest);
        // SIGHASH_NONE instead of SIGHASH_ALL.
        *sig.last_mut().unwrap() = 0x02;
        assert!(matches!(
            verify_signature(0, digest, &sig, &custodians.public_key(0)),
            Err(CustodyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn test_unknown_script_unsupported() {
        let script = Custodians::new(2).redeem_script(1);
        let foreign = CustodyUtxo {
            txid: [1; 32],
            vout: 0,
            value: 1_000,
            script_pubkey: vec![0x51],
        };
        let tx = unsigned_spend(std::slice::from_ref(&foreign), 500);
        assert_eq!(
            input_sighash(&tx, 0, &foreign, &script),
            Err(CustodyError::UnsupportedScript(0))
        );
    }

    #[test]
    fn test_assemble_p2wsh_witness_layout() {
        let custodians = Custodians::new(3);
        let script = custodians.redeem_script(2);
        let spent = vec![utxo(&script, ScriptKind::P2wsh, 50_000)];
        let tx = unsigned_spend(&spent, 40_000);
        let sighash = input_sighash(&tx, 0, &spent[0], &script).unwrap();
        let a = vec![custodians.sign_digest(0, sighash)];
        let b = vec![custodians.sign_digest(2, sighash)];

        let signed = assemble(tx, &spent, &script, &[&a, &b]).unwrap();
        let witness = &signed.input[0].witness;
        assert_eq!(witness.len(), 4);
        assert!(witness.nth(0).unwrap().is_empty());
        assert_eq!(witness.nth(1).unwrap(), a[0].as_slice());
        assert_eq!(witness.nth(2).unwrap(), b[0].as_slice());
        assert_eq!(witness.nth(3).unwrap(), script.as_slice());
        assert!(signed.input[0].script_sig.is_empty());
    }
}
