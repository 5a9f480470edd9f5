//! Trie and committee fixture builders.
//!
//! Compiled for unit tests and, behind the `test-utils` feature, for the
//! workspace integration tests.

use std::collections::BTreeMap;

use primitive_types::U256;
use rlp::RlpStream;
use shared_crypto::{keccak256, Secp256k1KeyPair};
use shared_types::{Address, ChainId, Hash, TransitionContext};
use xc_01_bridge_storage::{BridgeState, KeyValueStore};
use xc_04_header_sync::{HeaderSyncLightClient, PoaHeader, DIFF_IN_TURN};

use crate::algorithms::alt_trie::{write_var_bytes, AltNode, BRANCH_CHILDREN};
use crate::algorithms::nibbles::{encode_hex_prefix, to_nibbles};
use crate::domain::{
    AccountProof, CommitteeMessage, EvmAccount, MessageBody, StorageProof, WitnessEntry,
};

type Entry = (Vec<u8>, Vec<u8>);

fn common_prefix(entries: &[Entry], offset: usize) -> usize {
    let first = &entries[0].0[offset..];
    entries[1..]
        .iter()
        .map(|(path, _)| {
            first
                .iter()
                .zip(&path[offset..])
                .take_while(|(a, b)| a == b)
                .count()
        })
        .min()
        .unwrap_or(first.len())
}

fn group(entries: &[Entry], offset: usize, nibble: u8) -> Vec<Entry> {
    entries
        .iter()
        .filter(|(path, _)| path.get(offset) == Some(&nibble))
        .cloned()
        .collect()
}

// =============================================================================
// KECCAK TRIE
// =============================================================================

/// Builds a keccak/RLP trie and serves proofs for its keys.
///
/// Keys within one trie must have equal length.
#[derive(Debug, Default, Clone)]
pub struct KeccakTrieBuilder {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl KeccakTrieBuilder {
    /// Empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `key` (raw bytes; hash first for a secure trie).
    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) -> &mut Self {
        self.entries.insert(to_nibbles(key), value);
        self
    }

    fn all(&self) -> Vec<Entry> {
        self.entries.clone().into_iter().collect()
    }

    /// Root hash.
    pub fn root(&self) -> Hash {
        keccak256(&Self::encode(&self.all(), 0))
    }

    /// Proof nodes for `key`, root first.
    pub fn prove(&self, key: &[u8]) -> Vec<Vec<u8>> {
        let path = to_nibbles(key);
        let mut entries = self.all();
        let mut offset = 0;
        let mut proof = Vec::new();

        while !entries.is_empty() {
            let node = Self::encode(&entries, offset);
            if proof.is_empty() || node.len() >= 32 {
                proof.push(node);
            }
            if entries.len() == 1 {
                break;
            }
            let common = common_prefix(&entries, offset);
            if common > 0 {
                offset += common;
                continue;
            }
            let Some(&nibble) = path.get(offset) else {
                break;
            };
            entries = group(&entries, offset, nibble);
            offset += 1;
        }
        proof
    }

    fn append_child(s: &mut RlpStream, node: &[u8]) {
        if node.len() < 32 {
            s.append_raw(node, 1);
        } else {
            s.append(&keccak256(node).as_slice());
        }
    }

    fn encode(entries: &[Entry], offset: usize) -> Vec<u8> {
        let mut s = RlpStream::new();
        match entries {
            [] => {
                s.append_empty_data();
            }
            [(path, value)] => {
                s.begin_list(2);
                s.append(&encode_hex_prefix(&path[offset..], true));
                s.append(&value.as_slice());
            }
            _ => {
                let common = common_prefix(entries, offset);
                if common > 0 {
                    let segment = &entries[0].0[offset..offset + common];
                    s.begin_list(2);
                    s.append(&encode_hex_prefix(segment, false));
                    Self::append_child(&mut s, &Self::encode(entries, offset + common));
                } else {
                    s.begin_list(17);
                    for nibble in 0..16u8 {
                        let children = group(entries, offset, nibble);
                        if children.is_empty() {
                            s.append_empty_data();
                        } else {
                            Self::append_child(&mut s, &Self::encode(&children, offset + 1));
                        }
                    }
                    s.append_empty_data();
                }
            }
        }
        s.out().to_vec()
    }
}

// =============================================================================
// ALT TRIE
// =============================================================================

/// Builds an alt-encoded trie and serves proofs for its keys.
///
/// Keys within one trie must not be prefixes of each other unless equal.
#[derive(Debug, Default, Clone)]
pub struct AltTrieBuilder {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl AltTrieBuilder {
    /// Empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at the raw `key`.
    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) -> &mut Self {
        self.entries.insert(to_nibbles(key), value);
        self
    }

    fn all(&self) -> Vec<Entry> {
        self.entries.clone().into_iter().collect()
    }

    /// Root hash.
    pub fn root(&self) -> Hash {
        AltNode::hash(&Self::encode(&self.all(), 0))
    }

    /// Proof nodes for `key`, root first.
    pub fn prove(&self, key: &[u8]) -> Vec<Vec<u8>> {
        let path = to_nibbles(key);
        let mut entries = self.all();
        let mut offset = 0;
        let mut proof = Vec::new();

        while !entries.is_empty() {
            proof.push(Self::encode(&entries, offset));
            if entries.len() == 1 {
                if offset < entries[0].0.len() {
                    proof.push(AltNode::Leaf(entries[0].1.clone()).encode());
                }
                break;
            }
            let common = common_prefix(&entries, offset);
            if common > 0 {
                offset += common;
                continue;
            }
            let Some(&nibble) = path.get(offset) else {
                break;
            };
            entries = group(&entries, offset, nibble);
            offset += 1;
        }
        proof
    }

    fn encode(entries: &[Entry], offset: usize) -> Vec<u8> {
        let child = |node: Vec<u8>| Some(AltNode::hash(&node));
        let node = match entries {
            [] => AltNode::Branch(vec![None; BRANCH_CHILDREN]),
            [(path, value)] => {
                let leaf = AltNode::Leaf(value.clone());
                if offset == path.len() {
                    leaf
                } else {
                    AltNode::Extension {
                        key: path[offset..].to_vec(),
                        child: child(leaf.encode()),
                    }
                }
            }
            _ => {
                let common = common_prefix(entries, offset);
                if common > 0 {
                    AltNode::Extension {
                        key: entries[0].0[offset..offset + common].to_vec(),
                        child: child(Self::encode(entries, offset + common)),
                    }
                } else {
                    let mut children = vec![None; BRANCH_CHILDREN];
                    for nibble in 0..16u8 {
                        let group = group(entries, offset, nibble);
                        if !group.is_empty() {
                            children[nibble as usize] = child(Self::encode(&group, offset + 1));
                        }
                    }
                    AltNode::Branch(children)
                }
            }
        };
        node.encode()
    }
}

// =============================================================================
// CLAIM FIXTURES
// =============================================================================

/// EVM world state holding `keccak(payload)` at `slot` of `contract`.
///
/// Returns the state root and a matching `eth_getProof`-shaped proof.
pub fn evm_payload_proof(contract: Address, slot: Hash, payload: &[u8]) -> (Hash, AccountProof) {
    let value = U256::from_big_endian(&keccak256(payload));

    let mut storage = KeccakTrieBuilder::new();
    storage.insert(&keccak256(&slot), rlp::encode(&value).to_vec());
    for i in 1..=4u8 {
        storage.insert(&keccak256(&[i; 32]), rlp::encode(&U256::from(i)).to_vec());
    }

    let account = EvmAccount {
        nonce: 1,
        balance: U256::from(1_000_000u64),
        storage_root: storage.root(),
        code_hash: keccak256(b"cross-chain-manager"),
    };
    let mut world = KeccakTrieBuilder::new();
    world.insert(&keccak256(&contract), rlp::encode(&account).to_vec());
    for i in 1..=6u8 {
        let other = EvmAccount {
            nonce: u64::from(i),
            balance: U256::from(i),
            storage_root: [0x56; 32],
            code_hash: [0xC5; 32],
        };
        world.insert(&keccak256(&[i; 20]), rlp::encode(&other).to_vec());
    }

    let proof = AccountProof {
        address: contract,
        nonce: account.nonce,
        balance: account.balance,
        storage_hash: account.storage_root,
        code_hash: account.code_hash,
        account_proof: world.prove(&keccak256(&contract)),
        storage_proofs: vec![StorageProof {
            key: slot,
            value,
            proof: storage.prove(&keccak256(&slot)),
        }],
    };
    (world.root(), proof)
}

/// Alt-trie proofs for `sha256(payload)` stored at `storage_key` of `contract`.
///
/// Returns `(state_root, account_proof, storage_proof)`.
pub fn alt_payload_proof(
    contract: &[u8],
    storage_key: &[u8],
    payload_digest: Hash,
) -> (Hash, Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let mut value = Vec::new();
    write_var_bytes(&mut value, &payload_digest);

    let mut storage = AltTrieBuilder::new();
    storage.insert(storage_key, value);
    storage.insert(b"\x01other", vec![0x01, 0x00]);

    let mut root_value = Vec::new();
    write_var_bytes(&mut root_value, &storage.root());
    let mut world = AltTrieBuilder::new();
    world.insert(contract, root_value);
    world.insert(&[0xEE; 20], [0x11; 32].to_vec());

    (
        world.root(),
        world.prove(contract),
        storage.prove(storage_key),
    )
}

/// Encode `body` signed by each `(key_index, keypair)`.
pub fn signed_message(body: MessageBody, signers: &[(u32, &Secp256k1KeyPair)]) -> Vec<u8> {
    let digest = body.digest().expect("body digest");
    let witness = signers
        .iter()
        .map(|(index, kp)| WitnessEntry {
            key_index: *index,
            signature: kp.sign_prehash(&digest).expect("sign").to_vec(),
        })
        .collect();
    CommitteeMessage { body, witness }
        .encode()
        .expect("message encode")
}

// =============================================================================
// POA CHAIN
// =============================================================================

/// Validators of a synthetic PoA chain that seal in-turn headers.
#[derive(Debug)]
pub struct PoaChain {
    /// Chain the headers are sealed for.
    pub chain_id: ChainId,
    /// Validators, ordered by address.
    pub keys: Vec<Secp256k1KeyPair>,
    /// Genesis header, at the first epoch boundary.
    pub genesis: PoaHeader,
    epoch_length: u64,
    tip: PoaHeader,
}

impl PoaChain {
    /// Chain of `validators` signers whose genesis sits at `epoch_length`.
    pub fn new(chain_id: ChainId, validators: u8, epoch_length: u64) -> Self {
        let mut keys: Vec<_> = (1..=validators)
            .map(|i| Secp256k1KeyPair::from_bytes([0x40 + i; 32]).expect("validator key"))
            .collect();
        keys.sort_by_key(|k| k.address());
        let addresses: Vec<Address> = keys.iter().map(|k| k.address()).collect();

        let mut chain = Self {
            chain_id,
            keys,
            genesis: PoaHeader::default(),
            epoch_length,
            tip: PoaHeader::default(),
        };
        let genesis = PoaHeader {
            number: epoch_length,
            time: 1_000 + epoch_length,
            gas_limit: 30_000_000,
            extra: PoaHeader::build_extra([0; 32], &addresses, [0; 65]),
            ..Default::default()
        };
        let genesis = chain.seal(genesis);
        chain.genesis = genesis.clone();
        chain.tip = genesis;
        chain
    }

    fn seal(&self, header: PoaHeader) -> PoaHeader {
        let slot = (header.number % self.keys.len() as u64) as usize;
        self.seal_by(header, slot)
    }

    fn seal_by(&self, mut header: PoaHeader, signer: usize) -> PoaHeader {
        let signer = &self.keys[signer];
        header.coinbase = signer.address();
        let seal = signer
            .sign_recoverable(&header.seal_hash(self.chain_id))
            .expect("seal");
        header.set_seal(seal);
        header
    }

    fn unsealed_child(&self, parent: &PoaHeader, difficulty: u64, root: Hash) -> PoaHeader {
        let number = parent.number + 1;
        let validators: Vec<Address> = if number % self.epoch_length == 0 {
            self.keys.iter().map(|k| k.address()).collect()
        } else {
            Vec::new()
        };
        PoaHeader {
            number,
            parent_hash: parent.hash(),
            time: parent.time + 3,
            difficulty,
            gas_limit: parent.gas_limit,
            root,
            extra: PoaHeader::build_extra([0; 32], &validators, [0; 65]),
            ..Default::default()
        }
    }

    /// Next in-turn header committing to `root`.
    pub fn next(&mut self, root: Hash) -> PoaHeader {
        let header = self.unsealed_child(&self.tip, DIFF_IN_TURN, root);
        let header = self.seal(header);
        self.tip = header.clone();
        header
    }

    /// Child of `parent` sealed by validator `signer` with `difficulty`.
    ///
    /// Does not move the tip `next` builds on.
    pub fn child_by(&self, parent: &PoaHeader, signer: usize, difficulty: u64) -> PoaHeader {
        let header = self.unsealed_child(parent, difficulty, [0; 32]);
        self.seal_by(header, signer)
    }

    /// `count` headers with empty state roots.
    pub fn extend(&mut self, count: usize) -> Vec<PoaHeader> {
        (0..count).map(|_| self.next([0; 32])).collect()
    }

    /// Store the genesis, then sync `headers` through `client`.
    pub fn sync_into<S: KeyValueStore>(
        &self,
        client: &HeaderSyncLightClient,
        state: &mut BridgeState<S>,
        headers: &[PoaHeader],
    ) {
        if client
            .genesis(state, self.chain_id)
            .expect("genesis lookup")
            .is_none()
        {
            client
                .sync_genesis(state, self.chain_id, self.genesis.clone(), vec![])
                .expect("genesis");
        }
        let ctx = TransitionContext::new(1, self.tip.time + 60);
        client
            .sync_block_headers(state, &ctx, self.chain_id, headers)
            .expect("header sync");
    }
}
