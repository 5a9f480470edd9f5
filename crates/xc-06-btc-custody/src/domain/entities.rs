//! # Custody Records
//!
//! Persisted with bincode, so Bitcoin types are held in their raw byte
//! forms and converted at the algorithm boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::Hash;

/// Custodian address: `hash160` of the compressed public key.
pub type CustodianAddress = [u8; 20];

/// How custody outputs are locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// Legacy pay-to-script-hash.
    P2sh,
    /// Segwit v0 pay-to-witness-script-hash.
    P2wsh,
}

/// Registered `m`-of-`n` redeem script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRecord {
    /// Hex of `hash160(redeem_script)`.
    pub redeem_key: String,
    /// Raw script bytes.
    pub redeem_script: Vec<u8>,
    /// Signatures required (`m`).
    pub required: usize,
    /// Compressed public keys, in script order.
    pub public_keys: Vec<Vec<u8>>,
    /// Addresses of `public_keys`, same order.
    pub custodians: Vec<CustodianAddress>,
}

impl RedeemRecord {
    /// Script position of a custodian.
    pub fn position(&self, signer: &CustodianAddress) -> Option<usize> {
        self.custodians.iter().position(|c| c == signer)
    }
}

/// A custody-controlled output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyUtxo {
    /// Funding txid, internal byte order.
    pub txid: Hash,
    /// Output index.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    /// Locking script of the output.
    pub script_pubkey: Vec<u8>,
}

impl CustodyUtxo {
    /// Whether both refer to the same outpoint.
    pub fn same_outpoint(&self, other: &CustodyUtxo) -> bool {
        self.txid == other.txid && self.vout == other.vout
    }
}

/// Output requested by a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Destination locking script.
    pub script_pubkey: Vec<u8>,
    /// Value in satoshis.
    pub value: u64,
}

/// Unsigned spend with the outputs it reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendDraft {
    /// Txid of the unsigned transaction; signers sign against this.
    pub txid: Hash,
    /// Custody key whose outputs are spent.
    pub redeem_key: String,
    /// Consensus-encoded unsigned transaction.
    pub unsigned_tx: Vec<u8>,
    /// Reserved outputs, in input order.
    pub inputs: Vec<CustodyUtxo>,
    /// Fee paid, in satoshis.
    pub fee: u64,
}

/// Lifecycle of a signature collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultisigStatus {
    /// Waiting for more custodians.
    Collecting,
    /// Fully signed; the raw transaction is ready to broadcast.
    Finalized {
        /// Consensus-encoded signed transaction.
        raw_tx: Vec<u8>,
        /// Txid of the signed transaction.
        txid: Hash,
    },
}

/// Signatures gathered for one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigRequest {
    /// Unsigned txid.
    pub txid: Hash,
    /// Custody key of the draft.
    pub redeem_key: String,
    /// Per-custodian signatures, one per input (DER + sighash byte).
    pub signatures: BTreeMap<CustodianAddress, Vec<Vec<u8>>>,
    /// Current state.
    pub status: MultisigStatus,
}

impl MultisigRequest {
    /// Empty collection for a draft.
    pub fn new(txid: Hash, redeem_key: String) -> Self {
        Self {
            txid,
            redeem_key,
            signatures: BTreeMap::new(),
            status: MultisigStatus::Collecting,
        }
    }

    /// Distinct custodians recorded.
    pub fn signer_count(&self) -> usize {
        self.signatures.len()
    }

    /// Whether the transaction has been assembled.
    pub fn is_finalized(&self) -> bool {
        matches!(self.status, MultisigStatus::Finalized { .. })
    }
}

/// Result of a successful `add_signature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// Recorded; more custodians needed.
    Collecting {
        /// Distinct custodians so far.
        signed: usize,
        /// Custodians required.
        required: usize,
    },
    /// Recorded and the transaction finalized.
    Finalized {
        /// Signed transaction for broadcast.
        raw_tx: Vec<u8>,
        /// Its txid.
        txid: Hash,
    },
}
