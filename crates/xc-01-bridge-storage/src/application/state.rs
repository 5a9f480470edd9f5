//! # Bridge State
//!
//! Typed facade over the host `KeyValueStore`. Every bridge operation takes
//! `&mut BridgeState<S>`; writes made through it are visible to the next read
//! in the same transition.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::domain::{RecordKind, StorageError, StorageKey};
use crate::ports::{BatchOperation, KeyValueStore};

fn encode<T: Serialize>(key: &StorageKey, value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|e| StorageError::Encode {
        key: key.to_hex(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Decode {
        key: hex::encode(key),
        message: e.to_string(),
    })
}

/// Module-scoped, bincode-typed view of the host store.
pub struct BridgeState<S: KeyValueStore> {
    store: S,
    module: Vec<u8>,
}

impl<S: KeyValueStore> BridgeState<S> {
    /// Wrap a store under the given module address.
    pub fn new(store: S, module_address: impl Into<Vec<u8>>) -> Self {
        Self {
            store,
            module: module_address.into(),
        }
    }

    /// Module address every key is prefixed with.
    pub fn module_address(&self) -> &[u8] {
        &self.module
    }

    /// Start a key of `kind` under this module.
    pub fn key(&self, kind: RecordKind) -> StorageKey {
        StorageKey::new(&self.module, kind)
    }

    /// Read and decode a record.
    pub fn get<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>, StorageError> {
        match self.store.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(decode(key.as_bytes(), &bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether a record exists.
    pub fn contains(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.store.exists(key.as_bytes())?)
    }

    /// Encode and write a single record.
    pub fn put<T: Serialize>(&mut self, key: &StorageKey, value: &T) -> Result<(), StorageError> {
        let bytes = encode(key, value)?;
        trace!(key = %key.to_hex(), len = bytes.len(), "[xc-01] put");
        self.store.put(key.as_bytes(), &bytes)?;
        Ok(())
    }

    /// Remove a record.
    pub fn delete(&mut self, key: &StorageKey) -> Result<(), StorageError> {
        self.store.delete(key.as_bytes())?;
        Ok(())
    }

    /// Apply a batch atomically.
    pub fn commit(&mut self, batch: WriteBatch) -> Result<(), StorageError> {
        if batch.is_empty() {
            return Ok(());
        }
        trace!(ops = batch.len(), "[xc-01] commit batch");
        self.store.atomic_batch_write(batch.ops)?;
        Ok(())
    }

    /// Decode every record under `prefix`, in ascending key order.
    pub fn scan<T: DeserializeOwned>(
        &self,
        prefix: &StorageKey,
    ) -> Result<Vec<(Vec<u8>, T)>, StorageError> {
        self.store
            .prefix_scan(prefix.as_bytes())?
            .into_iter()
            .map(|(k, v)| {
                let value = decode(&k, &v)?;
                Ok((k, value))
            })
            .collect()
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Ordered set of writes committed together.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOperation>,
}

impl WriteBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an encoded put.
    pub fn put<T: Serialize>(&mut self, key: &StorageKey, value: &T) -> Result<(), StorageError> {
        let bytes = encode(key, value)?;
        self.ops.push(BatchOperation::put(key.as_bytes(), bytes));
        Ok(())
    }

    /// Queue a delete.
    pub fn delete(&mut self, key: &StorageKey) {
        self.ops.push(BatchOperation::delete(key.as_bytes()));
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
