//! # Off-chain hint computation
//!
//! The ledger only *verifies* insertion hints; computing them is the
//! client's job. This helper performs the linear head→tail scan over a
//! chain snapshot that the metered environment forbids on-chain.
//!
//! Tie-break rule (deterministic): the hint is the **last** node whose
//! power is `>= target_power`, so a new entry lands immediately after all
//! of its equals. Pair the scan with [`PriceLedger::state_root`] to detect
//! that the snapshot went stale before submission.

use crate::ledger::PriceLedger;
use crate::PRICE_SENTINEL;

/// Predecessor hint for inserting a node with `target_power` into the
/// current chain. 0 means "insert at the head".
pub fn compute_prev(ledger: &PriceLedger, target_power: u128) -> u128 {
    compute_prev_excluding(ledger, target_power, PRICE_SENTINEL)
}

/// Like [`compute_prev`], skipping `exclude_price`. Used when the node
/// being repositioned is still linked into the snapshot, since the ledger
/// detaches it before verifying the hint.
pub fn compute_prev_excluding(
    ledger: &PriceLedger,
    target_power: u128,
    exclude_price: u128,
) -> u128 {
    let mut prev = PRICE_SENTINEL;
    for node in ledger.chain() {
        if node.price == exclude_price {
            continue;
        }
        if node.power >= target_power {
            prev = node.price;
        } else {
            break;
        }
    }
    prev
}
