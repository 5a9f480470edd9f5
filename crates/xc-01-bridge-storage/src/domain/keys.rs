//! # Record Keys
//!
//! Every record lives under `module_address ‖ kind ‖ '/' ‖ segments...`.
//! Chain IDs and heights are 8-byte big-endian so that prefix scans over a
//! chain return heights in ascending order.

use shared_types::ChainId;

/// Kinds of record the bridge persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Trusted foreign header by hash.
    Header,
    /// Canonical header hash by height.
    Canonical,
    /// Canonical tip height.
    Height,
    /// Light-client genesis marker.
    Genesis,
    /// Validator epoch snapshot by start height.
    Epoch,
    /// Vote record by message hash.
    Vote,
    /// Replay marker by cross-chain ID.
    Applied,
    /// Trusted signing committee.
    Committee,
    /// Custody redeem script.
    Redeem,
    /// Spendable custody outputs.
    Utxo,
    /// Spent custody outputs.
    Stxo,
    /// Unsigned spend draft by txid.
    Draft,
    /// Signature collection for a draft.
    Multisig,
}

impl RecordKind {
    /// Byte tag used in keys.
    pub fn tag(&self) -> &'static [u8] {
        match self {
            RecordKind::Header => b"header",
            RecordKind::Canonical => b"canonical",
            RecordKind::Height => b"height",
            RecordKind::Genesis => b"genesis",
            RecordKind::Epoch => b"epoch",
            RecordKind::Vote => b"vote",
            RecordKind::Applied => b"applied",
            RecordKind::Committee => b"committee",
            RecordKind::Redeem => b"redeem",
            RecordKind::Utxo => b"utxo",
            RecordKind::Stxo => b"stxo",
            RecordKind::Draft => b"draft",
            RecordKind::Multisig => b"multisig",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        // Tags are ASCII
        std::str::from_utf8(self.tag()).unwrap_or("record")
    }
}

/// A fully-qualified record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(Vec<u8>);

impl StorageKey {
    /// Start a key for `kind` under a module address.
    pub fn new(module: &[u8], kind: RecordKind) -> Self {
        let tag = kind.tag();
        let mut bytes = Vec::with_capacity(module.len() + tag.len() + 41);
        bytes.extend_from_slice(module);
        bytes.extend_from_slice(tag);
        bytes.push(b'/');
        Self(bytes)
    }

    /// Append a chain ID segment.
    pub fn chain(mut self, chain_id: ChainId) -> Self {
        self.0.extend_from_slice(&chain_id.to_be_bytes());
        self
    }

    /// Append a height segment.
    pub fn height(mut self, height: u64) -> Self {
        self.0.extend_from_slice(&height.to_be_bytes());
        self
    }

    /// Append an opaque sub-key.
    pub fn sub(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Hex form for logs and errors.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
