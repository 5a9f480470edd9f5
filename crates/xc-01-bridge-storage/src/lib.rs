//! # XC-01 Bridge Storage
//!
//! Persistent record layer shared by every bridge subsystem.
//!
//! **Subsystem ID:** XC-01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The host chain's key-value store is the only shared mutable resource in the
//! bridge. This crate fixes how records are addressed and encoded:
//!
//! - Keys are `module_address ‖ kind ‖ chain_id (BE) ‖ sub_key`
//! - Values are bincode-encoded serde structs
//! - Multi-key updates go through a single `atomic_batch_write`
//!
//! ## Module Structure
//!
//! ```text
//! xc-01-bridge-storage/
//! ├── domain/          # StorageKey, RecordKind, StorageError
//! ├── ports/           # KeyValueStore (driven port), BatchOperation
//! ├── adapters/        # InMemoryKVStore
//! └── application/     # BridgeState typed facade, WriteBatch
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryKVStore;
pub use application::{BridgeState, WriteBatch};
pub use domain::{KVStoreError, RecordKind, StorageError, StorageKey};
pub use ports::{BatchOperation, KeyValueStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
