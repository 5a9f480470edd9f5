//! Application layer: the custody service over bridge storage.

pub mod service;

pub use service::BtcCustodyMultisig;
