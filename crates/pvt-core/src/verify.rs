//! # PositionVerifier : O(1) validation of caller-supplied hints
//!
//! The deterministic, metered execution model forbids unbounded scans over
//! attacker-influenceable collections, so the ledger never searches for an
//! insertion point. Instead the caller names a predecessor and these pure
//! checks confirm, from the immediate neighborhood only, that descending
//! power order holds on both sides of the proposed slot.

use crate::ledger::PriceLedger;
use crate::{VotingError, PRICE_SENTINEL};

/// Verify that inserting a node with `new_power` immediately after
/// `hint_prev` preserves descending power order.
///
/// `hint_prev == 0` means "insert at the head": the new node must carry at
/// least the current head's power. Otherwise the hinted predecessor must
/// exist, its power must be `>= new_power`, and its successor's power (if
/// any) must be `<= new_power`.
///
/// When repositioning an existing node the caller must detach it first;
/// verification runs against the chain as it will look at link-in time.
pub fn verify_position(
    ledger: &PriceLedger,
    new_power: u128,
    hint_prev: u128,
) -> Result<(), VotingError> {
    if hint_prev == PRICE_SENTINEL {
        let head = ledger.head_price();
        if head != PRICE_SENTINEL && ledger.power_of(head) > new_power {
            return Err(VotingError::NodeIndexIsNotValid);
        }
        return Ok(());
    }

    let prev = ledger
        .node_at(hint_prev)
        .ok_or(VotingError::PrevIndexIsNotValid)?;
    if prev.power < new_power {
        return Err(VotingError::NodeIndexIsNotValid);
    }
    if prev.next != PRICE_SENTINEL && ledger.power_of(prev.next) > new_power {
        return Err(VotingError::NodeIndexIsNotValid);
    }
    Ok(())
}

/// Verify that a linked pair of moves nets to the conserved delta: the
/// source bucket loses exactly `amount` and the destination bucket gains
/// exactly `amount`.
///
/// Catches a caller submitting an internally consistent-looking pair of
/// descriptors whose powers do not match the balance actually moved.
pub fn verify_conserved(
    source_old: u128,
    source_new: u128,
    dest_old: u128,
    dest_new: u128,
    amount: u128,
) -> Result<(), VotingError> {
    let expected_source = source_old
        .checked_sub(amount)
        .ok_or(VotingError::PowerIsNotValid)?;
    let expected_dest = dest_old
        .checked_add(amount)
        .ok_or(VotingError::PowerIsNotValid)?;
    if source_new != expected_source || dest_new != expected_dest {
        return Err(VotingError::PowerIsNotValid);
    }
    Ok(())
}
