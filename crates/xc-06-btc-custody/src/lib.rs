//! # XC-06 BTC Custody Multisig
//!
//! Bitcoin custody under an `m`-of-`n` redeem script.
//!
//! **Subsystem ID:** XC-06
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Lifecycle
//!
//! 1. `register_redeem` parses the script and records its custodians
//! 2. `record_deposit` adds outputs paying P2SH or P2WSH to the script
//! 3. `create_draft` selects outputs (largest first), reserves them and
//!    stores an unsigned spend
//! 4. `add_signature` verifies one custodian's per-input signatures;
//!    the `m`-th distinct custodian finalizes the transaction
//!
//! ## Module Structure
//!
//! ```text
//! xc-06-btc-custody/
//! ├── domain/          # RedeemRecord, CustodyUtxo, SpendDraft, MultisigRequest
//! ├── algorithms/      # Redeem parsing, coin selection, sighash and assembly
//! ├── application/     # BtcCustodyMultisig
//! └── config.rs        # Dust limit, change script kind, input cap
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use algorithms::{locking_script, output_kind, parse_multisig, redeem_key};
pub use application::BtcCustodyMultisig;
pub use config::CustodyConfig;
pub use domain::{
    CustodianAddress, CustodyError, CustodyUtxo, MultisigRequest, MultisigStatus, Payout,
    RedeemRecord, ScriptKind, SignatureOutcome, SpendDraft,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
