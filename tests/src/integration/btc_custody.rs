//! # BTC Custody
//!
//! 2-of-3 custody spends through the dispatcher, for both redeem-script
//! wrappings:
//!
//! - **P2WSH**: witness stack `[<>, sig…, redeem_script]`
//! - **P2SH**: scriptSig pushes `OP_0 sig… redeem_script`
//!
//! Change paid back into custody must be spendable by a later draft.

#[cfg(test)]
mod tests {
    use bitcoin::consensus::encode::deserialize;
    use bitcoin::script::Instruction;
    use bitcoin::Transaction;
    use shared_types::{Classify, ErrorKind};
    use xc_06_btc_custody::test_utils::{deposit, txid_of, Custodians};
    use xc_06_btc_custody::{
        locking_script, CustodyUtxo, Payout, ScriptKind, SignatureOutcome, SpendDraft,
    };
    use xc_07_dispatcher::{BridgeConfig, DispatchError};

    use crate::integration::fixtures::{Bridge, RELAY_CHAIN};

    const BTC: u64 = RELAY_CHAIN;

    struct Custody {
        bridge: Bridge,
        custodians: Custodians,
        script: Vec<u8>,
        key: String,
    }

    impl Custody {
        fn new(change_kind: ScriptKind) -> Self {
            let mut config = BridgeConfig::for_testing();
            config.custody.script_kind = change_kind;
            let mut bridge = Bridge::with_config(config);
            let custodians = Custodians::new(3);
            let script = custodians.redeem_script(2);
            let key = bridge
                .dispatcher
                .register_redeem(&mut bridge.state, BTC, &script)
                .unwrap();
            Self {
                bridge,
                custodians,
                script,
                key,
            }
        }

        fn fund(&mut self, id: u8, value: u64, kind: ScriptKind) -> CustodyUtxo {
            let lock = locking_script(&self.script, kind).into_bytes();
            let utxo = deposit(id, 0, value, &lock);
            self.bridge
                .dispatcher
                .record_deposit(&mut self.bridge.state, BTC, &self.key, utxo.clone())
                .unwrap();
            utxo
        }

        fn draft(&mut self, value: u64, fee: u64) -> SpendDraft {
            let payout = Payout {
                script_pubkey: vec![0x00, 0x14, 0x5A, 0x5A],
                value,
            };
            self.bridge
                .dispatcher
                .create_draft(&mut self.bridge.state, BTC, &self.key, &[payout], fee)
                .unwrap()
        }

        fn sign(
            &mut self,
            i: usize,
            draft: &SpendDraft,
        ) -> Result<SignatureOutcome, DispatchError> {
            let signatures = self.custodians.sign_draft(i, draft, &self.script);
            self.bridge.dispatcher.add_signature(
                &mut self.bridge.state,
                BTC,
                self.custodians.address(i),
                &draft.txid,
                signatures,
            )
        }

        /// Sign with custodians 0 and 2 and return the final transaction.
        fn finalize(&mut self, draft: &SpendDraft) -> (Transaction, [u8; 32]) {
            assert!(matches!(
                self.sign(0, draft).unwrap(),
                SignatureOutcome::Collecting {
                    signed: 1,
                    required: 2
                }
            ));
            let SignatureOutcome::Finalized { raw_tx, txid } = self.sign(2, draft).unwrap() else {
                panic!("second custodian should finalize");
            };
            assert_eq!(txid_of(&raw_tx), txid);
            (deserialize(&raw_tx).unwrap(), txid)
        }

        fn utxos(&self) -> Vec<CustodyUtxo> {
            self.bridge
                .dispatcher
                .custody()
                .utxos(&self.bridge.state, BTC, &self.key)
                .unwrap()
        }
    }

    fn pushes(tx: &Transaction, input: usize) -> Vec<Vec<u8>> {
        tx.input[input]
            .script_sig
            .instructions()
            .map(|i| match i.unwrap() {
                Instruction::PushBytes(b) => b.as_bytes().to_vec(),
                Instruction::Op(_) => vec![],
            })
            .collect()
    }

    #[test]
    fn test_p2wsh_two_of_three() {
        let mut custody = Custody::new(ScriptKind::P2wsh);
        custody.fund(1, 200_000, ScriptKind::P2wsh);
        let draft = custody.draft(120_000, 2_000);
        let first = custody.custodians.sign_draft(0, &draft, &custody.script);
        let third = custody.custodians.sign_draft(2, &draft, &custody.script);

        let (tx, txid) = custody.finalize(&draft);
        let witness: Vec<Vec<u8>> = tx.input[0].witness.iter().map(|w| w.to_vec()).collect();
        assert_eq!(witness.len(), 4);
        assert!(witness[0].is_empty());
        assert_eq!(witness[1], first[0]);
        assert_eq!(witness[2], third[0]);
        assert_eq!(witness[3], custody.script);
        assert!(tx.input[0].script_sig.is_empty());

        // Change returns to custody under the final txid.
        let utxos = custody.utxos();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].txid, txid);
        assert_eq!(utxos[0].value, 78_000);
        assert_eq!(
            utxos[0].script_pubkey,
            locking_script(&custody.script, ScriptKind::P2wsh).into_bytes()
        );
    }

    #[test]
    fn test_p2sh_two_of_three_and_change_respend() {
        let mut custody = Custody::new(ScriptKind::P2sh);
        custody.fund(1, 90_000, ScriptKind::P2sh);

        let draft = custody.draft(40_000, 1_000);
        let (tx, txid) = custody.finalize(&draft);
        let script_sig = pushes(&tx, 0);
        assert_eq!(script_sig.len(), 4);
        assert!(script_sig[0].is_empty());
        assert_eq!(script_sig[3], custody.script);
        assert!(tx.input[0].witness.is_empty());

        // The P2SH change output funds the next spend.
        let change = custody.utxos();
        assert_eq!(change.len(), 1);
        assert_eq!(change[0].txid, txid);

        let next = custody.draft(30_000, 1_000);
        assert_eq!(next.inputs.len(), 1);
        assert_eq!(next.inputs[0].txid, txid);
        let (tx, _) = custody.finalize(&next);
        assert_eq!(pushes(&tx, 0).len(), 4);
        assert_eq!(custody.utxos()[0].value, 90_000 - 40_000 - 1_000 - 30_000 - 1_000);
    }

    #[test]
    fn test_mixed_wrappings_in_one_spend() {
        let mut custody = Custody::new(ScriptKind::P2wsh);
        custody.fund(1, 30_000, ScriptKind::P2sh);
        custody.fund(2, 40_000, ScriptKind::P2wsh);

        let draft = custody.draft(60_000, 1_000);
        assert_eq!(draft.inputs.len(), 2);
        // Largest first.
        assert_eq!(draft.inputs[0].txid, [2; 32]);

        let (tx, _) = custody.finalize(&draft);
        assert_eq!(tx.input[0].witness.len(), 4);
        assert!(tx.input[0].script_sig.is_empty());
        assert!(tx.input[1].witness.is_empty());
        assert_eq!(pushes(&tx, 1).len(), 4);
    }

    #[test]
    fn test_spent_outputs_cannot_be_redeposited() {
        let mut custody = Custody::new(ScriptKind::P2wsh);
        let funded = custody.fund(1, 50_000, ScriptKind::P2wsh);
        let draft = custody.draft(20_000, 500);
        custody.finalize(&draft);

        let err = custody
            .bridge
            .dispatcher
            .record_deposit(&mut custody.bridge.state, BTC, &custody.key, funded)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReplayRejected);

        // A late third signature is a replay too.
        let err = custody.sign(1, &draft).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReplayRejected);
    }

    #[test]
    fn test_outsider_cannot_sign() {
        let mut custody = Custody::new(ScriptKind::P2wsh);
        custody.fund(1, 50_000, ScriptKind::P2wsh);
        let draft = custody.draft(20_000, 500);

        let outsiders = Custodians::new(4);
        let signatures = outsiders.sign_draft(3, &draft, &custody.script);
        let err = custody
            .bridge
            .dispatcher
            .add_signature(
                &mut custody.bridge.state,
                BTC,
                outsiders.address(3),
                &draft.txid,
                signatures,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthorityError);

        // One honest signature is not enough.
        assert!(matches!(
            custody.sign(1, &draft).unwrap(),
            SignatureOutcome::Collecting { signed: 1, .. }
        ));
        let request = custody
            .bridge
            .dispatcher
            .custody()
            .request(&custody.bridge.state, &draft.txid)
            .unwrap()
            .unwrap();
        assert!(!request.is_finalized());
    }
}
