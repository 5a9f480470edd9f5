//! # Custody Multisig Service
//!
//! Per draft: `Collecting → Finalized`. Spendable outputs move into a draft
//! when it is created, and into the STXO record when it is finalized.

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::{deserialize, serialize};
use bitcoin::hashes::Hash as _;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use shared_types::{ChainId, Hash};
use tracing::{debug, info, warn};
use xc_01_bridge_storage::{BridgeState, KeyValueStore, RecordKind, StorageKey, WriteBatch};

use crate::algorithms::{
    assemble, input_sighash, locking_script, output_kind, parse_multisig, select_largest_first,
    verify_signature,
};
use crate::config::CustodyConfig;
use crate::domain::{
    CustodianAddress, CustodyError, CustodyUtxo, MultisigRequest, MultisigStatus, Payout,
    RedeemRecord, SignatureOutcome, SpendDraft,
};

fn redeem_storage_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    redeem_key: &str,
) -> StorageKey {
    state
        .key(RecordKind::Redeem)
        .chain(chain_id)
        .sub(redeem_key.as_bytes())
}

fn utxo_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    redeem_key: &str,
) -> StorageKey {
    state.key(RecordKind::Utxo).chain(chain_id).sub(redeem_key.as_bytes())
}

fn stxo_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    redeem_key: &str,
) -> StorageKey {
    state.key(RecordKind::Stxo).chain(chain_id).sub(redeem_key.as_bytes())
}

fn draft_key<S: KeyValueStore>(
    state: &BridgeState<S>,
    chain_id: ChainId,
    txid: &Hash,
) -> StorageKey {
    state.key(RecordKind::Draft).chain(chain_id).sub(txid)
}

fn multisig_key<S: KeyValueStore>(state: &BridgeState<S>, txid: &Hash) -> StorageKey {
    state.key(RecordKind::Multisig).sub(txid)
}

fn encoding(e: impl std::fmt::Display) -> CustodyError {
    CustodyError::Encoding(e.to_string())
}

/// Custody-quorum multisig for Bitcoin.
#[derive(Debug, Clone, Default)]
pub struct BtcCustodyMultisig {
    config: CustodyConfig,
}

impl BtcCustodyMultisig {
    /// Create the custody service.
    pub fn new(config: CustodyConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CustodyConfig {
        &self.config
    }

    // =========================================================================
    // Registration and deposits
    // =========================================================================

    /// Register a redeem script and return its custody key.
    ///
    /// Registering the same script again is a no-op.
    pub fn register_redeem<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_script: &[u8],
    ) -> Result<String, CustodyError> {
        let record = parse_multisig(redeem_script)?;
        let key = redeem_storage_key(state, chain_id, &record.redeem_key);
        if !state.contains(&key)? {
            state.put(&key, &record)?;
            info!(
                chain_id,
                redeem_key = %record.redeem_key,
                required = record.required,
                custodians = record.custodians.len(),
                "[xc-06] redeem script registered"
            );
        }
        Ok(record.redeem_key)
    }

    /// Registered redeem script.
    pub fn redeem<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
    ) -> Result<Option<RedeemRecord>, CustodyError> {
        Ok(state.get(&redeem_storage_key(state, chain_id, redeem_key))?)
    }

    fn require_redeem<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
    ) -> Result<RedeemRecord, CustodyError> {
        self.redeem(state, chain_id, redeem_key)?
            .ok_or_else(|| CustodyError::UnknownRedeemKey {
                chain_id,
                redeem_key: redeem_key.to_string(),
            })
    }

    /// Locking script deposits to the custody key must use.
    pub fn deposit_script<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
    ) -> Result<Vec<u8>, CustodyError> {
        let record = self.require_redeem(state, chain_id, redeem_key)?;
        Ok(locking_script(&record.redeem_script, self.config.script_kind).into_bytes())
    }

    /// Spendable outputs of a custody key.
    pub fn utxos<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
    ) -> Result<Vec<CustodyUtxo>, CustodyError> {
        Ok(state
            .get(&utxo_key(state, chain_id, redeem_key))?
            .unwrap_or_default())
    }

    /// Spent outputs of a custody key.
    pub fn stxos<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
    ) -> Result<Vec<CustodyUtxo>, CustodyError> {
        Ok(state
            .get(&stxo_key(state, chain_id, redeem_key))?
            .unwrap_or_default())
    }

    /// Add a deposited output to the spendable set.
    pub fn record_deposit<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
        utxo: CustodyUtxo,
    ) -> Result<(), CustodyError> {
        let record = self.require_redeem(state, chain_id, redeem_key)?;
        if output_kind(&record.redeem_script, &utxo.script_pubkey).is_none() {
            return Err(CustodyError::ForeignOutput {
                txid: hex::encode(utxo.txid),
                vout: utxo.vout,
                redeem_key: redeem_key.to_string(),
            });
        }

        let mut utxos = self.utxos(state, chain_id, redeem_key)?;
        let spent = self.stxos(state, chain_id, redeem_key)?;
        let reserved: Vec<CustodyUtxo> = state
            .scan::<SpendDraft>(&state.key(RecordKind::Draft).chain(chain_id))?
            .into_iter()
            .flat_map(|(_, draft)| draft.inputs)
            .collect();
        let known = utxos
            .iter()
            .chain(&spent)
            .chain(&reserved)
            .any(|u| u.same_outpoint(&utxo));
        if known {
            return Err(CustodyError::DuplicateOutput {
                txid: hex::encode(utxo.txid),
                vout: utxo.vout,
            });
        }

        debug!(
            chain_id,
            redeem_key,
            txid = %hex::encode(utxo.txid),
            vout = utxo.vout,
            value = utxo.value,
            "[xc-06] deposit recorded"
        );
        utxos.push(utxo);
        let key = utxo_key(state, chain_id, redeem_key);
        state.put(&key, &utxos)?;
        Ok(())
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    /// Draft a spend of custody outputs covering `payouts` plus `fee`.
    ///
    /// The selected outputs leave the spendable set immediately.
    pub fn create_draft<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        redeem_key: &str,
        payouts: &[Payout],
        fee: u64,
    ) -> Result<SpendDraft, CustodyError> {
        let record = self.require_redeem(state, chain_id, redeem_key)?;
        if payouts.is_empty() {
            return Err(CustodyError::InvalidPayout("no payouts".to_string()));
        }
        let mut required = fee;
        for payout in payouts {
            if payout.script_pubkey.is_empty() {
                return Err(CustodyError::InvalidPayout("empty script".to_string()));
            }
            if payout.value <= self.config.dust_limit_sat {
                return Err(CustodyError::InvalidPayout(format!(
                    "{} sat is dust",
                    payout.value
                )));
            }
            required = required
                .checked_add(payout.value)
                .ok_or_else(|| CustodyError::InvalidPayout("total overflows".to_string()))?;
        }

        let utxos = self.utxos(state, chain_id, redeem_key)?;
        let available: u64 = utxos.iter().map(|u| u.value).sum();
        let selection = select_largest_first(&utxos, required)
            .ok_or(CustodyError::InsufficientFunds {
                available,
                required,
            })?;
        if selection.chosen.len() > self.config.max_inputs {
            return Err(CustodyError::TooManyInputs {
                count: selection.chosen.len(),
                max: self.config.max_inputs,
            });
        }

        let mut output: Vec<TxOut> = payouts
            .iter()
            .map(|p| TxOut {
                value: Amount::from_sat(p.value),
                script_pubkey: ScriptBuf::from_bytes(p.script_pubkey.clone()),
            })
            .collect();
        let change = selection.total - required;
        if change > self.config.dust_limit_sat {
            output.push(TxOut {
                value: Amount::from_sat(change),
                script_pubkey: locking_script(&record.redeem_script, self.config.script_kind),
            });
        }
        let tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: selection
                .chosen
                .iter()
                .map(|u| TxIn {
                    previous_output: OutPoint::new(Txid::from_byte_array(u.txid), u.vout),
                    script_sig: ScriptBuf::new(),
                    sequence: Sequence::MAX,
                    witness: Witness::new(),
                })
                .collect(),
            output,
        };

        let draft = SpendDraft {
            txid: tx.compute_txid().to_byte_array(),
            redeem_key: redeem_key.to_string(),
            unsigned_tx: serialize(&tx),
            inputs: selection.chosen,
            fee: if change > self.config.dust_limit_sat {
                fee
            } else {
                fee + change
            },
        };

        let mut batch = WriteBatch::new();
        batch.put(&draft_key(state, chain_id, &draft.txid), &draft)?;
        batch.put(&utxo_key(state, chain_id, redeem_key), &selection.remaining)?;
        state.commit(batch)?;

        info!(
            chain_id,
            redeem_key,
            txid = %hex::encode(draft.txid),
            inputs = draft.inputs.len(),
            fee = draft.fee,
            "[xc-06] spend drafted"
        );
        Ok(draft)
    }

    /// Stored draft by unsigned txid.
    pub fn draft<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        chain_id: ChainId,
        txid: &Hash,
    ) -> Result<Option<SpendDraft>, CustodyError> {
        Ok(state.get(&draft_key(state, chain_id, txid))?)
    }

    /// Signature collection for a draft.
    pub fn request<S: KeyValueStore>(
        &self,
        state: &BridgeState<S>,
        txid: &Hash,
    ) -> Result<Option<MultisigRequest>, CustodyError> {
        Ok(state.get(&multisig_key(state, txid))?)
    }

    // =========================================================================
    // Signature collection
    // =========================================================================

    /// Record `signer`'s signatures (one per input) for the draft `txid`.
    ///
    /// The contribution that brings the count to the script's `m`
    /// finalizes the transaction.
    pub fn add_signature<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        signer: CustodianAddress,
        txid: &Hash,
        signatures: Vec<Vec<u8>>,
    ) -> Result<SignatureOutcome, CustodyError> {
        let existing = self.request(state, txid)?;
        if let Some(request) = &existing {
            if request.is_finalized() {
                return Err(CustodyError::AlreadyFinalized(hex::encode(txid)));
            }
            if request.signatures.contains_key(&signer) {
                warn!(
                    signer = %hex::encode(signer),
                    txid = %hex::encode(txid),
                    "[xc-06] duplicate custodian signature"
                );
                return Err(CustodyError::DuplicateSigner {
                    signer: hex::encode(signer),
                    txid: hex::encode(txid),
                });
            }
        }

        let draft = self
            .draft(state, chain_id, txid)?
            .ok_or_else(|| CustodyError::DraftNotFound(hex::encode(txid)))?;
        let record = self.require_redeem(state, chain_id, &draft.redeem_key)?;
        let position = record
            .position(&signer)
            .ok_or_else(|| CustodyError::NotCustodian(hex::encode(signer)))?;

        if signatures.len() != draft.inputs.len() {
            return Err(CustodyError::SignatureCountMismatch {
                expected: draft.inputs.len(),
                actual: signatures.len(),
            });
        }
        let tx: Transaction = deserialize(&draft.unsigned_tx).map_err(encoding)?;
        for (index, (spent, signature)) in draft.inputs.iter().zip(&signatures).enumerate() {
            let sighash = input_sighash(&tx, index, spent, &record.redeem_script)?;
            verify_signature(index, sighash, signature, &record.public_keys[position])?;
        }

        let mut request = existing
            .unwrap_or_else(|| MultisigRequest::new(*txid, draft.redeem_key.clone()));
        request.signatures.insert(signer, signatures);

        if request.signer_count() < record.required {
            let key = multisig_key(state, txid);
            state.put(&key, &request)?;
            debug!(
                txid = %hex::encode(txid),
                signed = request.signer_count(),
                required = record.required,
                "[xc-06] custodian signature recorded"
            );
            return Ok(SignatureOutcome::Collecting {
                signed: request.signer_count(),
                required: record.required,
            });
        }

        self.finalize(state, chain_id, tx, draft, &record, request)
    }

    fn finalize<S: KeyValueStore>(
        &self,
        state: &mut BridgeState<S>,
        chain_id: ChainId,
        tx: Transaction,
        draft: SpendDraft,
        record: &RedeemRecord,
        mut request: MultisigRequest,
    ) -> Result<SignatureOutcome, CustodyError> {
        // CHECKMULTISIG consumes signatures in key order.
        let ordered: Vec<&Vec<Vec<u8>>> = record
            .custodians
            .iter()
            .filter_map(|c| request.signatures.get(c))
            .collect();
        let signed = assemble(tx, &draft.inputs, &record.redeem_script, &ordered)?;
        let raw_tx = serialize(&signed);
        let final_txid = signed.compute_txid().to_byte_array();

        let mut utxos = self.utxos(state, chain_id, &draft.redeem_key)?;
        utxos.retain(|u| !draft.inputs.iter().any(|spent| spent.same_outpoint(u)));
        let change: Vec<CustodyUtxo> = signed
            .output
            .iter()
            .enumerate()
            .filter(|(_, out)| {
                output_kind(&record.redeem_script, out.script_pubkey.as_bytes()).is_some()
            })
            .map(|(vout, out)| CustodyUtxo {
                txid: final_txid,
                vout: vout as u32,
                value: out.value.to_sat(),
                script_pubkey: out.script_pubkey.to_bytes(),
            })
            .collect();
        utxos.extend(change.iter().cloned());

        let mut stxos = self.stxos(state, chain_id, &draft.redeem_key)?;
        stxos.extend(draft.inputs.iter().cloned());

        request.status = MultisigStatus::Finalized {
            raw_tx: raw_tx.clone(),
            txid: final_txid,
        };

        let mut batch = WriteBatch::new();
        batch.put(&multisig_key(state, &draft.txid), &request)?;
        batch.put(&utxo_key(state, chain_id, &draft.redeem_key), &utxos)?;
        batch.put(&stxo_key(state, chain_id, &draft.redeem_key), &stxos)?;
        batch.delete(&draft_key(state, chain_id, &draft.txid));
        state.commit(batch)?;

        info!(
            chain_id,
            draft = %hex::encode(draft.txid),
            txid = %hex::encode(final_txid),
            signers = request.signer_count(),
            spent = draft.inputs.len(),
            change = change.len(),
            "[xc-06] custody spend finalized"
        );
        Ok(SignatureOutcome::Finalized {
            raw_tx,
            txid: final_txid,
        })
    }
}
