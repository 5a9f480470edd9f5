//! # Deposit Flows
//!
//! One scenario per verifier family, driven through the dispatcher:
//!
//! 1. **EVM**: headers synced into the light client anchor an account and
//!    storage proof; admission waits for `blocks_to_wait` confirmations
//! 2. **Signature**: a committee-signed root plus an inclusion path, across
//!    a committee rotation
//! 3. **Alt MPT**: a committee-signed state root plus a two-level trie proof
//! 4. **Relay**: relayer votes until the Byzantine quorum is reached
//!
//! Each admitted `(source chain, cross_chain_id)` pair must be rejected on
//! any later submission, whichever verifier it arrives through.

#[cfg(test)]
mod tests {
    use shared_crypto::sha256;
    use shared_types::{Classify, ErrorKind, Hash, SideChain, TransitionContext};
    use xc_05_proof_verifier::algorithms::{build_path, compute_root};
    use xc_05_proof_verifier::test_utils::{
        alt_payload_proof, evm_payload_proof, signed_message, PoaChain,
    };
    use xc_05_proof_verifier::{
        AltProofClaim, EvmProofClaim, MessageBody, ProofError, SignatureClaim,
    };
    use xc_07_dispatcher::{DepositClaim, DispatchError, ROUTER_SIGNATURE};

    use crate::integration::fixtures::*;

    const STORAGE_KEY: &[u8] = b"\x02request";

    // =========================================================================
    // EVM
    // =========================================================================

    fn sync(bridge: &mut Bridge, chain: &PoaChain, headers: &[xc_04_header_sync::PoaHeader]) {
        let ctx = TransitionContext::new(90, 50_000);
        bridge
            .dispatcher
            .sync_block_headers(&mut bridge.state, &ctx, chain.chain_id, headers)
            .unwrap();
    }

    #[test]
    fn test_evm_deposit_waits_for_confirmations() {
        let mut bridge = Bridge::new();
        let mut chain = PoaChain::new(EVM_CHAIN, 4, 8);
        bridge
            .dispatcher
            .sync_genesis(&mut bridge.state, EVM_CHAIN, chain.genesis.clone(), vec![])
            .unwrap();

        let payload = payload(&[0xE1]);
        let (root, proof) = evm_payload_proof(CCM, [0x0A; 32], &payload);
        let anchor = chain.next(root);
        let claim = DepositClaim::Evm(EvmProofClaim {
            height: anchor.number,
            payload,
            proof,
        });

        // Header not yet synced.
        let err = bridge.propose(EVM_CHAIN, &claim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotYetFinal);

        // Synced but only one confirmation.
        let confirm = chain.next([0; 32]);
        sync(&mut bridge, &chain, &[anchor, confirm]);
        let err = bridge.propose(EVM_CHAIN, &claim).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Proof(ProofError::InsufficientConfirmations { .. })
        ));
        assert!(!bridge.is_applied(EVM_CHAIN, &[0xE1]));

        let more = chain.extend(1);
        sync(&mut bridge, &chain, &more);
        let ix = bridge.propose(EVM_CHAIN, &claim).unwrap().unwrap();
        assert_eq!(ix.source_chain_id, EVM_CHAIN);
        assert_eq!(ix.dest_chain_id, LOCAL);
        assert_eq!(ix.method, "unlock");
        assert!(bridge.is_applied(EVM_CHAIN, &[0xE1]));

        let err = bridge.propose(EVM_CHAIN, &claim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReplayRejected);
    }

    #[test]
    fn test_evm_proof_from_other_contract_rejected() {
        let mut bridge = Bridge::new();
        let mut chain = PoaChain::new(EVM_CHAIN, 4, 8);
        let payload = payload(&[0xE2]);
        let (root, proof) = evm_payload_proof([0xDD; 20], [0x0A; 32], &payload);
        let mut headers = vec![chain.next(root)];
        headers.extend(chain.extend(3));
        bridge
            .dispatcher
            .sync_genesis(&mut bridge.state, EVM_CHAIN, chain.genesis.clone(), vec![])
            .unwrap();
        sync(&mut bridge, &chain, &headers);

        let claim = DepositClaim::Evm(EvmProofClaim {
            height: headers[0].number,
            payload,
            proof,
        });
        let err = bridge.propose(EVM_CHAIN, &claim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);
        assert!(!bridge.is_applied(EVM_CHAIN, &[0xE2]));
    }

    // =========================================================================
    // SIGNATURE
    // =========================================================================

    fn block(ids: &[&[u8]]) -> (Vec<Vec<u8>>, Vec<Hash>) {
        let payloads: Vec<Vec<u8>> = ids.iter().map(|id| payload(id)).collect();
        let leaves = payloads.iter().map(|p| sha256(p)).collect();
        (payloads, leaves)
    }

    #[test]
    fn test_signature_deposits_across_rotation() {
        let mut bridge = Bridge::new();
        let genesis_keys = committee_keys(0x30, 3);
        bridge
            .dispatcher
            .sync_committee_genesis(&mut bridge.state, SIG_CHAIN, committee(0, 2, &genesis_keys))
            .unwrap();

        let (payloads, leaves) = block(&[b"s0", b"s1", b"s2"]);
        let root = compute_root(&leaves);
        let body = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 40,
            state_root: root,
            next_committee: None,
        };
        let message = signed_message(body, &[(0, &genesis_keys[0]), (1, &genesis_keys[1])]);
        let claim = |index: usize, message: &Vec<u8>| {
            DepositClaim::Signature(SignatureClaim {
                message: message.clone(),
                payload: payloads[index].clone(),
                path: build_path(&leaves, index).unwrap(),
            })
        };

        let ix = bridge.propose(SIG_CHAIN, &claim(1, &message)).unwrap().unwrap();
        assert_eq!(ix.cross_chain_id, b"s1".to_vec());

        // Hand over to a 1-of-2 committee.
        let successors = committee_keys(0x60, 2);
        let rotation = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 50,
            state_root: [0; 32],
            next_committee: Some(committee(50, 1, &successors)),
        };
        let rotation = signed_message(rotation, &[(1, &genesis_keys[1]), (2, &genesis_keys[2])]);
        let installed = bridge
            .dispatcher
            .rotate_committee(&mut bridge.state, SIG_CHAIN, &rotation)
            .unwrap();
        assert_eq!(installed.height, 50);

        // The retired committee's message no longer verifies.
        let err = bridge.propose(SIG_CHAIN, &claim(2, &message)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);

        let body = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 51,
            state_root: root,
            next_committee: None,
        };
        let fresh = signed_message(body, &[(0, &successors[0])]);
        let ix = bridge.propose(SIG_CHAIN, &claim(2, &fresh)).unwrap().unwrap();
        assert_eq!(ix.cross_chain_id, b"s2".to_vec());

        // Already admitted under the old committee.
        let err = bridge.propose(SIG_CHAIN, &claim(1, &fresh)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReplayRejected);
    }

    #[test]
    fn test_signature_rotation_needs_quorum() {
        let mut bridge = Bridge::new();
        let keys = committee_keys(0x30, 3);
        bridge
            .dispatcher
            .sync_committee_genesis(&mut bridge.state, SIG_CHAIN, committee(0, 2, &keys))
            .unwrap();

        let rotation = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 10,
            state_root: [0; 32],
            next_committee: Some(committee(10, 1, &committee_keys(0x60, 1))),
        };
        let under_signed = signed_message(rotation, &[(0, &keys[0])]);
        let err = bridge
            .dispatcher
            .rotate_committee(&mut bridge.state, SIG_CHAIN, &under_signed)
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Proof(ProofError::InsufficientSignatures { valid: 1, .. })
        ));
    }

    #[test]
    fn test_signed_block_stays_on_its_chain() {
        let mut bridge = Bridge::new();
        let twin = SIG_CHAIN + 100;
        bridge.side_chains.register(SideChain {
            chain_id: twin,
            name: "neo-twin".to_string(),
            router: ROUTER_SIGNATURE,
            ccm_contract: vec![],
            blocks_to_wait: 1,
        });
        let keys = committee_keys(0x30, 3);
        for chain in [SIG_CHAIN, twin] {
            bridge
                .dispatcher
                .sync_committee_genesis(&mut bridge.state, chain, committee(0, 2, &keys))
                .unwrap();
        }

        let (payloads, leaves) = block(&[b"t0", b"t1"]);
        let body = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 8,
            state_root: compute_root(&leaves),
            next_committee: None,
        };
        let claim = DepositClaim::Signature(SignatureClaim {
            message: signed_message(body, &[(0, &keys[0]), (1, &keys[1])]),
            payload: payloads[0].clone(),
            path: build_path(&leaves, 0).unwrap(),
        });

        assert!(bridge.propose(SIG_CHAIN, &claim).unwrap().is_some());
        let err = bridge.propose(twin, &claim).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Proof(ProofError::MessageChainMismatch { actual: SIG_CHAIN, .. })
        ));
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);
        assert!(!bridge.is_applied(twin, b"t0"));
    }

    // =========================================================================
    // ALT MPT
    // =========================================================================

    fn alt_claim(keys: &[shared_crypto::Secp256k1KeyPair], signers: usize) -> AltProofClaim {
        let payload = payload(&[0xA1, 0x01]);
        let (root, account_proof, storage_proof) =
            alt_payload_proof(&ALT_CONTRACT, STORAGE_KEY, sha256(&payload));
        let body = MessageBody {
            version: 1,
            chain_id: ALT_CHAIN,
            height: 120,
            state_root: root,
            next_committee: None,
        };
        let witness: Vec<_> = keys
            .iter()
            .take(signers)
            .enumerate()
            .map(|(i, k)| (i as u32, k))
            .collect();
        AltProofClaim {
            message: signed_message(body, &witness),
            payload,
            contract: ALT_CONTRACT.to_vec(),
            account_proof,
            storage_key: STORAGE_KEY.to_vec(),
            storage_proof,
        }
    }

    #[test]
    fn test_alt_mpt_deposit() {
        let mut bridge = Bridge::new();
        let keys = committee_keys(0x20, 4);
        bridge
            .dispatcher
            .sync_committee_genesis(&mut bridge.state, ALT_CHAIN, committee(100, 3, &keys))
            .unwrap();

        let err = bridge
            .propose(ALT_CHAIN, &DepositClaim::AltMpt(alt_claim(&keys, 2)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);

        let claim = DepositClaim::AltMpt(alt_claim(&keys, 3));
        let ix = bridge.propose(ALT_CHAIN, &claim).unwrap().unwrap();
        assert_eq!(ix.source_chain_id, ALT_CHAIN);
        assert!(bridge.is_applied(ALT_CHAIN, &[0xA1, 0x01]));

        // Same token from another source chain is a different pair.
        assert!(!bridge.is_applied(SIG_CHAIN, &[0xA1, 0x01]));
        let err = bridge.propose(ALT_CHAIN, &claim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReplayRejected);
    }

    #[test]
    fn test_alt_mpt_without_committee_rejected() {
        let mut bridge = Bridge::new();
        let keys = committee_keys(0x20, 4);
        let err = bridge
            .propose(ALT_CHAIN, &DepositClaim::AltMpt(alt_claim(&keys, 4)))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Proof(ProofError::CommitteeNotSet(ALT_CHAIN))
        );
        assert!(!bridge.is_applied(ALT_CHAIN, &[0xA1, 0x01]));
    }

    // =========================================================================
    // RELAY
    // =========================================================================

    fn relay(signer: usize, payload: &[u8]) -> DepositClaim {
        DepositClaim::Relay {
            signer: relayers()[signer],
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_relay_quorum_admits_once() {
        let mut bridge = Bridge::new();
        let payload = payload(&[0x42]);

        assert_eq!(bridge.propose(RELAY_CHAIN, &relay(0, &payload)).unwrap(), None);
        // Repeat votes do not count twice.
        assert_eq!(bridge.propose(RELAY_CHAIN, &relay(0, &payload)).unwrap(), None);
        assert_eq!(bridge.propose(RELAY_CHAIN, &relay(1, &payload)).unwrap(), None);
        assert!(!bridge.is_applied(RELAY_CHAIN, &[0x42]));

        let ix = bridge.propose(RELAY_CHAIN, &relay(2, &payload)).unwrap().unwrap();
        assert_eq!(ix.cross_chain_id, vec![0x42]);

        // A late fourth vote is recorded but never re-admits.
        assert_eq!(bridge.propose(RELAY_CHAIN, &relay(3, &payload)).unwrap(), None);
    }

    #[test]
    fn test_relay_rejects_outsider_and_misaddressed() {
        let mut bridge = Bridge::new();
        let outsider = DepositClaim::Relay {
            signer: [0xEE; 20],
            payload: payload(&[0x43]),
        };
        let err = bridge.propose(RELAY_CHAIN, &outsider).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthorityError);

        let misaddressed = payload_to(&[0x44], LOCAL + 1);
        let err = bridge
            .propose(RELAY_CHAIN, &relay(0, &misaddressed))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Proof(ProofError::WrongDestination { .. })
        ));
    }

    #[test]
    fn test_pairs_are_per_source_chain() {
        let mut bridge = Bridge::new();
        let keys = committee_keys(0x30, 3);
        bridge
            .dispatcher
            .sync_committee_genesis(&mut bridge.state, SIG_CHAIN, committee(0, 2, &keys))
            .unwrap();

        let shared_id: &[u8] = &[0x77];
        let payload = payload(shared_id);
        for signer in 0..3 {
            let _ = bridge.propose(RELAY_CHAIN, &relay(signer, &payload)).unwrap();
        }
        assert!(bridge.is_applied(RELAY_CHAIN, shared_id));

        let leaves = vec![sha256(&payload), sha256(b"other")];
        let body = MessageBody {
            version: 1,
            chain_id: SIG_CHAIN,
            height: 3,
            state_root: compute_root(&leaves),
            next_committee: None,
        };
        let claim = DepositClaim::Signature(SignatureClaim {
            message: signed_message(body, &[(0, &keys[0]), (2, &keys[2])]),
            payload,
            path: build_path(&leaves, 0).unwrap(),
        });
        assert!(bridge.propose(SIG_CHAIN, &claim).unwrap().is_some());
        assert!(bridge.is_applied(SIG_CHAIN, shared_id));
    }
}
