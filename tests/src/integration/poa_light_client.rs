//! # PoA Light Client
//!
//! Header sync through the dispatcher against a four-validator chain whose
//! trusted genesis sits on the epoch boundary at height 8. The in-turn
//! signer of height `n` is validator `n % 4`; with four validators the
//! recency window is two blocks.

#[cfg(test)]
mod tests {
    use bridge_telemetry::{CANONICAL_REORGS, HEADERS_ACCEPTED};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{Classify, ErrorKind, TransitionContext};
    use xc_04_header_sync::{
        HeaderSyncError, LightClientState, PoaHeader, SyncReport, DIFF_IN_TURN, DIFF_NO_TURN,
    };
    use xc_05_proof_verifier::test_utils::PoaChain;
    use xc_07_dispatcher::DispatchError;

    use crate::integration::fixtures::{Bridge, EVM_CHAIN};

    struct Scenario {
        bridge: Bridge,
        chain: PoaChain,
        headers: Vec<PoaHeader>,
    }

    /// Genesis at 8 plus six in-turn headers, 9 through 14.
    fn six_headers() -> Scenario {
        let mut bridge = Bridge::new();
        let mut chain = PoaChain::new(EVM_CHAIN, 4, 8);
        bridge
            .dispatcher
            .sync_genesis(&mut bridge.state, EVM_CHAIN, chain.genesis.clone(), vec![])
            .unwrap();
        let headers = chain.extend(6);
        let mut scenario = Scenario {
            bridge,
            chain,
            headers,
        };
        let headers = scenario.headers.clone();
        let report = scenario.sync(&headers).unwrap();
        assert_eq!(report.accepted, 6);
        assert_eq!(report.canonical_height, 14);
        scenario
    }

    impl Scenario {
        fn sync(&mut self, headers: &[PoaHeader]) -> Result<SyncReport, DispatchError> {
            self.bridge.dispatcher.sync_block_headers(
                &mut self.bridge.state,
                &TransitionContext::new(60, 50_000),
                EVM_CHAIN,
                headers,
            )
        }

        fn tip(&self) -> &PoaHeader {
            &self.headers[5]
        }

        fn is_stored(&self, header: &PoaHeader) -> bool {
            self.bridge
                .dispatcher
                .light_client()
                .header(&self.bridge.state, EVM_CHAIN, &header.hash())
                .unwrap()
                .is_some()
        }

        fn is_canonical(&self, header: &PoaHeader) -> bool {
            self.bridge
                .dispatcher
                .light_client()
                .is_canonical(&self.bridge.state, EVM_CHAIN, &header.hash())
                .unwrap()
        }

        fn height(&self) -> u64 {
            self.bridge
                .dispatcher
                .light_client()
                .current_height(&self.bridge.state, EVM_CHAIN)
                .unwrap()
                .unwrap()
        }
    }

    fn header_error(err: DispatchError) -> HeaderSyncError {
        match err {
            DispatchError::HeaderSync(e) => e,
            other => panic!("expected header sync error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_moves_from_genesis_to_synced() {
        let mut bridge = Bridge::new();
        let mut chain = PoaChain::new(EVM_CHAIN, 4, 8);
        let client = bridge.dispatcher.light_client().clone();
        assert_eq!(
            client.status(&bridge.state, EVM_CHAIN).unwrap(),
            LightClientState::Uninitialized
        );

        bridge
            .dispatcher
            .sync_genesis(&mut bridge.state, EVM_CHAIN, chain.genesis.clone(), vec![])
            .unwrap();
        assert_eq!(
            client.status(&bridge.state, EVM_CHAIN).unwrap(),
            LightClientState::GenesisSet
        );

        let headers = chain.extend(1);
        chain.sync_into(&client, &mut bridge.state, &headers);
        assert_eq!(
            client.status(&bridge.state, EVM_CHAIN).unwrap(),
            LightClientState::Synced
        );
    }

    #[test]
    fn test_recent_signer_rejected_at_fifteen() {
        let mut sc = six_headers();

        // Validator 1 sealed 13, inside the two-block window.
        let header = sc.chain.child_by(sc.tip(), 1, DIFF_NO_TURN);
        let err = header_error(sc.sync(&[header.clone()]).unwrap_err());
        assert!(matches!(
            err,
            HeaderSyncError::RecentlySigned {
                number: 15,
                last_signed: 13,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);
        assert!(!sc.is_stored(&header));
        assert_eq!(sc.height(), 14);

        // Validator 2 sealed 14.
        let header = sc.chain.child_by(sc.tip(), 2, DIFF_NO_TURN);
        assert!(matches!(
            header_error(sc.sync(&[header]).unwrap_err()),
            HeaderSyncError::RecentlySigned {
                last_signed: 14,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_turn_then_in_turn_reorg() {
        let mut sc = six_headers();

        // Validator 0 last sealed 12, outside the window.
        let out_of_turn = sc.chain.child_by(sc.tip(), 0, DIFF_NO_TURN);
        let report = sc.sync(&[out_of_turn.clone()]).unwrap();
        assert_eq!((report.accepted, report.reorgs), (1, 0));
        assert!(sc.is_canonical(&out_of_turn));

        let reorgs = CANONICAL_REORGS.get();
        let in_turn = sc.chain.child_by(sc.tip(), 3, DIFF_IN_TURN);
        let report = sc.sync(&[in_turn.clone()]).unwrap();
        assert_eq!((report.accepted, report.reorgs), (1, 1));
        assert_eq!(report.canonical_height, 15);
        assert!(sc.is_canonical(&in_turn));
        assert!(!sc.is_canonical(&out_of_turn));
        assert!(sc.is_stored(&out_of_turn));
        assert!(CANONICAL_REORGS.get() > reorgs);
    }

    #[test]
    fn test_difficulty_must_match_turn() {
        let mut sc = six_headers();

        let lazy_in_turn = sc.chain.child_by(sc.tip(), 3, DIFF_NO_TURN);
        assert!(matches!(
            header_error(sc.sync(&[lazy_in_turn]).unwrap_err()),
            HeaderSyncError::WrongDifficultyForTurn {
                number: 15,
                in_turn: true,
                ..
            }
        ));

        let greedy = sc.chain.child_by(sc.tip(), 0, DIFF_IN_TURN);
        assert!(matches!(
            header_error(sc.sync(&[greedy]).unwrap_err()),
            HeaderSyncError::WrongDifficultyForTurn {
                in_turn: false,
                ..
            }
        ));
        assert_eq!(sc.height(), 14);
    }

    #[test]
    fn test_outsider_seal_is_authority_error() {
        let mut sc = six_headers();
        let outsider = Secp256k1KeyPair::from_bytes([0x99; 32]).unwrap();

        let mut header = sc.chain.child_by(sc.tip(), 3, DIFF_IN_TURN);
        header.coinbase = outsider.address();
        let seal = outsider
            .sign_recoverable(&header.seal_hash(EVM_CHAIN))
            .unwrap();
        header.set_seal(seal);

        let err = header_error(sc.sync(&[header]).unwrap_err());
        assert!(matches!(
            err,
            HeaderSyncError::UnauthorizedSigner { number: 15, .. }
        ));
        assert_eq!(err.kind(), ErrorKind::AuthorityError);
    }

    #[test]
    fn test_seal_for_other_chain_rejected() {
        let mut sc = six_headers();
        // Same validator keys, but the seal commits to another chain ID.
        let other = PoaChain::new(EVM_CHAIN + 1, 4, 8);
        let header = other.child_by(sc.tip(), 3, DIFF_IN_TURN);
        let err = header_error(sc.sync(&[header]).unwrap_err());
        assert!(matches!(err, HeaderSyncError::SignerMismatch { number: 15, .. }));
        assert_eq!(err.kind(), ErrorKind::UntrustedClaim);
        assert_eq!(sc.height(), 14);
    }

    #[test]
    fn test_resync_is_idempotent() {
        let mut sc = six_headers();
        let accepted = HEADERS_ACCEPTED.get();

        let headers = sc.headers.clone();
        let report = sc.sync(&headers).unwrap();
        assert_eq!(report.accepted, 0);
        assert_eq!(report.skipped, 6);
        assert_eq!(report.reorgs, 0);
        assert_eq!(report.canonical_height, 14);
        assert!(HEADERS_ACCEPTED.get() >= accepted);
    }

    #[test]
    fn test_rejection_stops_batch_but_keeps_prefix() {
        let mut sc = six_headers();
        let fifteen = sc.chain.next([0; 32]);
        // Validator 3 just sealed 15; it may not seal 16 as well.
        let sixteen = sc.chain.child_by(&fifteen, 3, DIFF_NO_TURN);
        let seventeen = sc.chain.child_by(&sixteen, 1, DIFF_IN_TURN);

        let err = sc
            .sync(&[fifteen.clone(), sixteen.clone(), seventeen.clone()])
            .unwrap_err();
        assert!(matches!(
            header_error(err),
            HeaderSyncError::RecentlySigned { number: 16, .. }
        ));
        assert!(sc.is_canonical(&fifteen));
        assert!(!sc.is_stored(&sixteen));
        assert!(!sc.is_stored(&seventeen));
        assert_eq!(sc.height(), 15);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut sc = six_headers();
        let mut orphan = sc.chain.child_by(sc.tip(), 3, DIFF_IN_TURN);
        orphan.parent_hash = [0x42; 32];
        let seal = sc.chain.keys[3]
            .sign_recoverable(&orphan.seal_hash(EVM_CHAIN))
            .unwrap();
        orphan.set_seal(seal);

        assert!(matches!(
            header_error(sc.sync(&[orphan]).unwrap_err()),
            HeaderSyncError::UnknownParent { number: 15, .. }
        ));
    }
}
