//! # Custody Errors

use shared_types::{ChainId, Classify, ErrorKind};
use thiserror::Error;
use xc_01_bridge_storage::StorageError;

/// Errors raised by the custody multisig.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// Script is not a standard `m`-of-`n` CHECKMULTISIG.
    #[error("Invalid redeem script: {0}")]
    InvalidRedeemScript(String),

    /// No redeem script registered under the key.
    #[error("Unknown redeem key {redeem_key} on chain {chain_id}")]
    UnknownRedeemKey {
        /// Source chain.
        chain_id: ChainId,
        /// Hex custody key.
        redeem_key: String,
    },

    /// Deposit output does not pay into the custody script.
    #[error("Output {txid}:{vout} is not locked to custody key {redeem_key}")]
    ForeignOutput {
        /// Funding txid (hex).
        txid: String,
        /// Output index.
        vout: u32,
        /// Hex custody key.
        redeem_key: String,
    },

    /// Deposit output already recorded or spent.
    #[error("Output {txid}:{vout} already known")]
    DuplicateOutput {
        /// Funding txid (hex).
        txid: String,
        /// Output index.
        vout: u32,
    },

    /// Withdrawal request is unusable.
    #[error("Invalid payout: {0}")]
    InvalidPayout(String),

    /// Spendable outputs cannot cover the payouts and fee.
    #[error("Insufficient custody funds: {available} sat available, {required} sat required")]
    InsufficientFunds {
        /// Spendable total.
        available: u64,
        /// Payouts plus fee.
        required: u64,
    },

    /// Covering the spend needs more inputs than one draft may carry.
    #[error("Draft needs {count} inputs (max {max})")]
    TooManyInputs {
        /// Inputs selected.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    /// No draft stored for the txid.
    #[error("No spend draft {0}")]
    DraftNotFound(String),

    /// Draft already fully signed.
    #[error("Draft {0} already finalized")]
    AlreadyFinalized(String),

    /// Custodian already contributed to this draft.
    #[error("Custodian {signer} already signed draft {txid}")]
    DuplicateSigner {
        /// Hex custodian address.
        signer: String,
        /// Hex draft txid.
        txid: String,
    },

    /// Signer is not one of the redeem script's keys.
    #[error("{0} is not a custodian of this redeem script")]
    NotCustodian(String),

    /// One signature per input is required.
    #[error("Expected {expected} signatures, got {actual}")]
    SignatureCountMismatch {
        /// Input count.
        expected: usize,
        /// Submitted count.
        actual: usize,
    },

    /// A signature failed to parse or verify.
    #[error("Signature for input {input} invalid: {reason}")]
    InvalidSignature {
        /// Input index.
        input: usize,
        /// What was wrong.
        reason: String,
    },

    /// Input is neither P2SH nor P2WSH.
    #[error("Input {0} spends an unsupported script type")]
    UnsupportedScript(usize),

    /// Transaction or script encoding failed.
    #[error("Transaction encoding failed: {0}")]
    Encoding(String),

    /// Store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Classify for CustodyError {
    fn kind(&self) -> ErrorKind {
        match self {
            CustodyError::InvalidSignature { .. } => ErrorKind::UntrustedClaim,
            CustodyError::NotCustodian(_) => ErrorKind::AuthorityError,
            CustodyError::DuplicateSigner { .. }
            | CustodyError::AlreadyFinalized(_)
            | CustodyError::DuplicateOutput { .. } => ErrorKind::ReplayRejected,
            CustodyError::Storage(_) => ErrorKind::Storage,
            _ => ErrorKind::MalformedInput,
        }
    }
}
