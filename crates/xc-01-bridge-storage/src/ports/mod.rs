//! # Ports
//!
//! Interfaces the host application implements for the bridge.

pub mod outbound;

pub use outbound::*;
