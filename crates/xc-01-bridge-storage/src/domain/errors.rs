//! # Domain Errors

use shared_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors raised by a `KeyValueStore` backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Backend message
        message: String,
    },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// Backend message
        message: String,
    },
}

/// Errors raised by the typed state facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backend failure.
    #[error("Database error: {0}")]
    Database(#[from] KVStoreError),

    /// Record could not be encoded.
    #[error("Failed to encode record at key {key}: {message}")]
    Encode {
        /// Hex of the target key
        key: String,
        /// Codec message
        message: String,
    },

    /// Stored bytes did not decode into the expected record.
    #[error("Failed to decode record at key {key}: {message}")]
    Decode {
        /// Hex of the offending key
        key: String,
        /// Codec message
        message: String,
    },
}

impl Classify for StorageError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}
