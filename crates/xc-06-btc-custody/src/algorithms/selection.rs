//! # Coin Selection
//!
//! Largest-first: spend the biggest outputs until the target is covered.
//! Ties break on outpoint so every node picks the same set.

use crate::domain::CustodyUtxo;

/// Outputs chosen for a spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen outputs, in input order.
    pub chosen: Vec<CustodyUtxo>,
    /// Outputs left spendable.
    pub remaining: Vec<CustodyUtxo>,
    /// Sum of `chosen` values.
    pub total: u64,
}

/// Select from `utxos` until `target` satoshis are covered.
///
/// Returns `None` when the whole set falls short.
pub fn select_largest_first(utxos: &[CustodyUtxo], target: u64) -> Option<Selection> {
    let mut ordered = utxos.to_vec();
    ordered.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.txid.cmp(&b.txid))
            .then_with(|| a.vout.cmp(&b.vout))
    });

    let mut total = 0u64;
    let mut taken = 0;
    for utxo in &ordered {
        if total >= target && taken > 0 {
            break;
        }
        total = total.checked_add(utxo.value)?;
        taken += 1;
    }
    if total < target || taken == 0 {
        return None;
    }

    let remaining = ordered.split_off(taken);
    Some(Selection {
        chosen: ordered,
        remaining,
        total,
    })
}
