//! # Integration Tests
//!
//! Every scenario opens a fresh in-memory `BridgeState` and goes through
//! the same public surface the host chain uses.

pub mod btc_custody;
pub mod configuration;
pub mod deposit_flows;
pub mod poa_light_client;
pub mod properties;

#[cfg(test)]
pub(crate) mod fixtures;
