//! Custodian keys and spend fixtures.
//!
//! Compiled for unit tests and, behind the `test-utils` feature, for the
//! workspace integration tests.

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::deserialize;
use bitcoin::ecdsa::Signature;
use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::OP_CHECKMULTISIG;
use bitcoin::script::Builder;
use bitcoin::secp256k1::{Message, Secp256k1, SecretKey};
use bitcoin::sighash::EcdsaSighashType;
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, OutPoint, PublicKey, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};
use shared_types::Hash as Hash32;

use crate::algorithms::input_sighash;
use crate::domain::{CustodianAddress, CustodyUtxo, SpendDraft};

/// Deterministic custodian key set.
#[derive(Debug, Clone)]
pub struct Custodians {
    secrets: Vec<SecretKey>,
    keys: Vec<PublicKey>,
}

impl Custodians {
    /// `n` custodians with fixed secrets.
    pub fn new(n: u8) -> Self {
        let secp = Secp256k1::new();
        let secrets: Vec<SecretKey> = (1..=n)
            .map(|i| SecretKey::from_slice(&[0x70 + i; 32]).expect("secret key"))
            .collect();
        let keys = secrets
            .iter()
            .map(|sk| PublicKey::new(sk.public_key(&secp)))
            .collect();
        Self { secrets, keys }
    }

    /// `OP_m <keys> OP_n OP_CHECKMULTISIG` in key order.
    pub fn redeem_script(&self, m: u8) -> Vec<u8> {
        let mut builder = Builder::new().push_int(i64::from(m));
        for key in &self.keys {
            builder = builder.push_key(key);
        }
        builder
            .push_int(self.keys.len() as i64)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script()
            .into_bytes()
    }

    /// Compressed public key of custodian `i`.
    pub fn public_key(&self, i: usize) -> Vec<u8> {
        self.keys[i].to_bytes()
    }

    /// Address of custodian `i`.
    pub fn address(&self, i: usize) -> CustodianAddress {
        self.keys[i].pubkey_hash().to_byte_array()
    }

    /// Addresses in key order.
    pub fn addresses(&self) -> Vec<CustodianAddress> {
        (0..self.keys.len()).map(|i| self.address(i)).collect()
    }

    /// DER + `SIGHASH_ALL` signature by custodian `i`.
    pub fn sign_digest(&self, i: usize, digest: [u8; 32]) -> Vec<u8> {
        let secp = Secp256k1::signing_only();
        let signature = secp.sign_ecdsa(&Message::from_digest(digest), &self.secrets[i]);
        Signature {
            signature,
            sighash_type: EcdsaSighashType::All,
        }
        .to_vec()
    }

    /// Custodian `i`'s signature for every input of `draft`.
    pub fn sign_draft(&self, i: usize, draft: &SpendDraft, redeem_script: &[u8]) -> Vec<Vec<u8>> {
        let tx: Transaction = deserialize(&draft.unsigned_tx).expect("draft decodes");
        draft
            .inputs
            .iter()
            .enumerate()
            .map(|(index, spent)| {
                let digest = input_sighash(&tx, index, spent, redeem_script).expect("sighash");
                self.sign_digest(i, digest)
            })
            .collect()
    }
}

/// Output of funding transaction `[id; 32]` at `vout`.
pub fn deposit(id: u8, vout: u32, value: u64, script_pubkey: &[u8]) -> CustodyUtxo {
    CustodyUtxo {
        txid: [id; 32],
        vout,
        value,
        script_pubkey: script_pubkey.to_vec(),
    }
}

/// Unsigned transaction spending `inputs` to one OP_TRUE output.
pub fn unsigned_spend(inputs: &[CustodyUtxo], value: u64) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs
            .iter()
            .map(|u| TxIn {
                previous_output: OutPoint::new(Txid::from_byte_array(u.txid), u.vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect(),
        output: vec![TxOut {
            value: Amount::from_sat(value),
            script_pubkey: ScriptBuf::from_bytes(vec![0x51]),
        }],
    }
}

/// Txid of a consensus-encoded transaction, internal byte order.
pub fn txid_of(raw_tx: &[u8]) -> Hash32 {
    let tx: Transaction = deserialize(raw_tx).expect("transaction decodes");
    tx.compute_txid().to_byte_array()
}
