//! # Application Layer

pub mod state;

pub use state::{BridgeState, WriteBatch};
