//! # Cross-Subsystem Properties
//!
//! Exactly-once admission holds whatever order submissions arrive in and
//! whichever verifier family carries them.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use shared_crypto::sha256;
    use shared_types::{Classify, ErrorKind, Hash};
    use xc_05_proof_verifier::algorithms::{build_path, compute_root};
    use xc_05_proof_verifier::test_utils::signed_message;
    use xc_05_proof_verifier::{MessageBody, SignatureClaim};
    use xc_07_dispatcher::DepositClaim;

    use crate::integration::fixtures::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Relayer votes in any order admit the payload exactly once, on
        /// the third distinct relayer.
        #[test]
        fn prop_relay_admits_exactly_once(order in proptest::collection::vec(0usize..4, 1..16)) {
            let mut bridge = Bridge::new();
            let payload = payload(&[0x5E]);
            let relayers = relayers();

            let mut admitted = 0;
            let mut distinct = BTreeSet::new();
            for i in order {
                let claim = DepositClaim::Relay {
                    signer: relayers[i],
                    payload: payload.clone(),
                };
                let fresh = distinct.insert(i);
                if let Some(ix) = bridge.propose(RELAY_CHAIN, &claim).unwrap() {
                    admitted += 1;
                    prop_assert!(fresh);
                    prop_assert_eq!(distinct.len(), 3);
                    prop_assert_eq!(ix.cross_chain_id, vec![0x5E]);
                }
            }
            prop_assert_eq!(admitted, usize::from(distinct.len() >= 3));
            prop_assert_eq!(bridge.is_applied(RELAY_CHAIN, &[0x5E]), distinct.len() >= 3);
        }

        /// Every transaction of a signed block is admissible once, in any
        /// submission order, and only its own path proves it.
        #[test]
        fn prop_signed_block_admits_each_payload_once(
            size in 1usize..12,
            picks in proptest::collection::vec(0usize..12, 1..24),
        ) {
            let mut bridge = Bridge::new();
            let keys = committee_keys(0x30, 3);
            bridge
                .dispatcher
                .sync_committee_genesis(&mut bridge.state, SIG_CHAIN, committee(0, 2, &keys))
                .unwrap();

            let payloads: Vec<Vec<u8>> = (0..size).map(|i| payload(&[0xB0, i as u8])).collect();
            let leaves: Vec<Hash> = payloads.iter().map(|p| sha256(p)).collect();
            let body = MessageBody {
                version: 1,
                chain_id: SIG_CHAIN,
                height: 9,
                state_root: compute_root(&leaves),
                next_committee: None,
            };
            let message = signed_message(body, &[(0, &keys[0]), (1, &keys[1])]);

            let mut seen = BTreeSet::new();
            for pick in picks {
                let index = pick % size;
                let claim = DepositClaim::Signature(SignatureClaim {
                    message: message.clone(),
                    payload: payloads[index].clone(),
                    path: build_path(&leaves, index).unwrap(),
                });
                let result = bridge.propose(SIG_CHAIN, &claim);
                if seen.insert(index) {
                    prop_assert!(result.unwrap().is_some());
                } else {
                    prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::ReplayRejected);
                }

                // The neighbour's path never proves this payload.
                if size > 1 {
                    let other = (index + 1) % size;
                    let forged = DepositClaim::Signature(SignatureClaim {
                        message: message.clone(),
                        payload: payloads[index].clone(),
                        path: build_path(&leaves, other).unwrap(),
                    });
                    let err = bridge.propose(SIG_CHAIN, &forged).unwrap_err();
                    prop_assert_eq!(err.kind(), ErrorKind::UntrustedClaim);
                }
            }
        }
    }
}
