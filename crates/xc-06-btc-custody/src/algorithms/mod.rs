//! # Algorithms
//!
//! Script parsing, coin selection and signing. Nothing here touches storage.

pub mod redeem;
pub mod selection;
pub mod signing;

pub use redeem::{locking_script, output_kind, parse_multisig, redeem_key};
pub use selection::{select_largest_first, Selection};
pub use signing::{assemble, input_sighash, verify_signature};
