//! # Bridge Benchmarks
//!
//! | Subsystem | Path measured |
//! |-----------|---------------|
//! | xc-04 Header Sync | Verify and store a batch of sealed PoA headers |
//! | xc-05 Proof Verifier | EVM account plus storage proof walk |
//! | xc-05 Proof Verifier | Binary Merkle inclusion check |
//! | xc-06 BTC Custody | Per-input sighash over a custody draft |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::{keccak256, sha256};
use shared_types::{Hash, TransitionContext};
use xc_01_bridge_storage::{BridgeState, InMemoryKVStore};
use xc_04_header_sync::{HeaderSyncConfig, HeaderSyncLightClient};
use xc_05_proof_verifier::algorithms::keccak_trie::verify_proof;
use xc_05_proof_verifier::algorithms::{build_path, compute_root, verify_inclusion};
use xc_05_proof_verifier::test_utils::{evm_payload_proof, PoaChain};
use xc_06_btc_custody::test_utils::{deposit, unsigned_spend};
use xc_06_btc_custody::{locking_script, ScriptKind};

fn bench_header_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("xc-04-header-sync");

    for size in [8usize, 32, 64] {
        let mut chain = PoaChain::new(56, 4, 200);
        let headers = chain.extend(size);
        let client = HeaderSyncLightClient::new(HeaderSyncConfig::default());
        let ctx = TransitionContext::new(1, 1_000_000);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sync_batch", size), &headers, |b, headers| {
            b.iter(|| {
                let mut state = BridgeState::new(InMemoryKVStore::new(), b"xc".to_vec());
                client
                    .sync_genesis(&mut state, chain.chain_id, chain.genesis.clone(), vec![])
                    .unwrap();
                black_box(
                    client
                        .sync_block_headers(&mut state, &ctx, chain.chain_id, headers)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_evm_proof(c: &mut Criterion) {
    let mut group = c.benchmark_group("xc-05-evm-proof");
    let contract = [0xCC; 20];
    let (root, proof) = evm_payload_proof(contract, [0x0A; 32], b"payload");
    let slot = &proof.storage_proofs[0];

    group.bench_function("account_and_storage", |b| {
        b.iter(|| {
            let account = verify_proof(&root, &keccak256(&contract), &proof.account_proof, 64)
                .unwrap();
            let value = verify_proof(&proof.storage_hash, &keccak256(&slot.key), &slot.proof, 64)
                .unwrap();
            black_box((account, value))
        })
    });

    group.finish();
}

fn bench_merkle_inclusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("xc-05-merkle-inclusion");

    for size in [16usize, 256, 4096] {
        let leaves: Vec<Hash> = (0..size as u32).map(|i| sha256(&i.to_be_bytes())).collect();
        let root = compute_root(&leaves);
        let index = size / 3;
        let path = build_path(&leaves, index).unwrap();

        group.bench_with_input(BenchmarkId::new("verify", size), &path, |b, path| {
            b.iter(|| black_box(verify_inclusion(&leaves[index], path, &root)))
        });
    }

    group.finish();
}

fn bench_custody_sighash(c: &mut Criterion) {
    use xc_06_btc_custody::algorithms::input_sighash;
    use xc_06_btc_custody::test_utils::Custodians;

    let mut group = c.benchmark_group("xc-06-custody-sighash");
    let custodians = Custodians::new(3);
    let script = custodians.redeem_script(2);

    for kind in [ScriptKind::P2sh, ScriptKind::P2wsh] {
        let lock = locking_script(&script, kind).into_bytes();
        let inputs: Vec<_> = (1..=8u8).map(|i| deposit(i, 0, 10_000, &lock)).collect();
        let tx = unsigned_spend(&inputs, 70_000);

        group.throughput(Throughput::Elements(inputs.len() as u64));
        group.bench_function(format!("{kind:?}"), |b| {
            b.iter(|| {
                for (index, spent) in inputs.iter().enumerate() {
                    black_box(input_sighash(&tx, index, spent, &script).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_header_sync,
    bench_evm_proof,
    bench_merkle_inclusion,
    bench_custody_sighash,
);
criterion_main!(benches);
