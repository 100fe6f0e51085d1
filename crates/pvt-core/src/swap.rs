//! # SwapCoordinator : single- and double-bucket update protocols
//!
//! Balance changes that touch voted price buckets go through one of two
//! protocols, both driven by caller-supplied *post-state* descriptors
//! `{price, power, prev}` rather than deltas: the descriptor is checked
//! against the real balance delta, then applied through the verified
//! ledger insertion.
//!
//! - **Single-swap**: one bucket affected (only one party of a transfer has
//!   an active vote, or a voted holder buys/sells).
//! - **Double-swap**: two buckets affected (sender and recipient back
//!   different prices, or a voter moves their whole weight to a new price).
//!
//! Double-swap is all-or-nothing: if the second descriptor cannot be
//! applied the first is rolled back to its exact pre-call slot.

use crate::ledger::{Node, PriceLedger};
use crate::registry::VoterRegistry;
use crate::{verify, VotingError, PRICE_SENTINEL};
use serde::{Deserialize, Serialize};

/// Caller-supplied post-state of one price bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapDescriptor {
    #[serde(with = "crate::u128_str")]
    pub price: u128,
    #[serde(with = "crate::u128_str")]
    pub power: u128,
    #[serde(with = "crate::u128_str")]
    pub prev: u128,
}

/// Direction of the balance change feeding a single-swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerDelta {
    Credit(u128),
    Debit(u128),
}

impl PowerDelta {
    pub fn amount(&self) -> u128 {
        match self {
            PowerDelta::Credit(a) | PowerDelta::Debit(a) => *a,
        }
    }
}

/// Apply a balance change to the single price bucket `voter` backs.
///
/// The descriptor's price must match the voter's registry entry and its
/// power must equal the bucket's current power adjusted by exactly the
/// real balance delta. A bucket debited to zero power is detached.
pub fn single_swap(
    ledger: &mut PriceLedger,
    registry: &VoterRegistry,
    voter: &str,
    round: u64,
    desc: &SwapDescriptor,
    delta: PowerDelta,
) -> Result<(), VotingError> {
    if delta.amount() == 0 {
        return Err(VotingError::AmountIsNotValid);
    }
    let current = registry.price_of(voter, round);
    if current == PRICE_SENTINEL {
        return Err(VotingError::CallingUnsuitableMethod);
    }
    if desc.price != current {
        return Err(VotingError::CallingMethodWithWrongTx);
    }

    let old_power = ledger.power_of(desc.price);
    let expected = match delta {
        PowerDelta::Credit(amount) => old_power.checked_add(amount),
        PowerDelta::Debit(amount) => old_power.checked_sub(amount),
    }
    .ok_or(VotingError::PowerIsNotValid)?;
    if desc.power != expected {
        return Err(VotingError::PowerIsNotValid);
    }

    if desc.power == 0 {
        ledger.zero_power(desc.price);
        ledger.remove_if_empty(desc.price);
        Ok(())
    } else {
        ledger.insert_or_bump(desc.price, desc.power, desc.prev)
    }
}

/// Move `amount` of power from the sender's bucket to the recipient's:
/// a transfer where both parties have active votes for different prices.
#[allow(clippy::too_many_arguments)]
pub fn double_swap(
    ledger: &mut PriceLedger,
    registry: &VoterRegistry,
    src_voter: &str,
    dst_voter: &str,
    round: u64,
    src_desc: &SwapDescriptor,
    dst_desc: &SwapDescriptor,
    amount: u128,
) -> Result<(), VotingError> {
    if amount == 0 {
        return Err(VotingError::AmountIsNotValid);
    }
    let src_price = registry.price_of(src_voter, round);
    let dst_price = registry.price_of(dst_voter, round);
    if src_price == PRICE_SENTINEL || dst_price == PRICE_SENTINEL {
        return Err(VotingError::CallingUnsuitableMethod);
    }
    if src_desc.price != src_price || dst_desc.price != dst_price {
        return Err(VotingError::CallingMethodWithWrongTx);
    }
    if src_price == dst_price {
        // Same bucket nets to zero, so no swap is needed at all.
        return Err(VotingError::CallingUnsuitableMethod);
    }

    verify::verify_conserved(
        ledger.power_of(src_price),
        src_desc.power,
        ledger.power_of(dst_price),
        dst_desc.power,
        amount,
    )?;

    apply_pair(ledger, src_desc, dst_desc)
}

/// A voter moves their entire weight from their current price bucket to a
/// new one (`vote_with_swap`). Registry is updated only after the ledger
/// pair committed.
pub fn move_vote(
    ledger: &mut PriceLedger,
    registry: &mut VoterRegistry,
    voter: &str,
    round: u64,
    new_desc: &SwapDescriptor,
    old_desc: &SwapDescriptor,
    weight: u128,
) -> Result<(), VotingError> {
    if weight == 0 {
        return Err(VotingError::AmountIsNotValid);
    }
    let current = registry.price_of(voter, round);
    if current == PRICE_SENTINEL {
        return Err(VotingError::CallingUnsuitableMethod);
    }
    if old_desc.price != current {
        return Err(VotingError::CallingMethodWithWrongTx);
    }
    if new_desc.price == PRICE_SENTINEL {
        return Err(VotingError::PushingNonValidPrice);
    }
    if new_desc.price == current {
        return Err(VotingError::VotingForTheSamePrice);
    }

    verify::verify_conserved(
        ledger.power_of(current),
        old_desc.power,
        ledger.power_of(new_desc.price),
        new_desc.power,
        weight,
    )?;

    apply_pair(ledger, old_desc, new_desc)?;
    registry.record_vote(voter, new_desc.price, round);
    Ok(())
}

/// Pre-application state of one bucket, enough to restore it exactly.
struct Rollback {
    price: u128,
    before: Option<Node>,
}

fn apply_one(ledger: &mut PriceLedger, desc: &SwapDescriptor) -> Result<Rollback, VotingError> {
    let before = ledger.node_at(desc.price);
    if desc.power == 0 {
        ledger.zero_power(desc.price);
        ledger.remove_if_empty(desc.price);
    } else {
        ledger.insert_or_bump(desc.price, desc.power, desc.prev)?;
    }
    Ok(Rollback {
        price: desc.price,
        before,
    })
}

fn roll_back(ledger: &mut PriceLedger, rollback: Rollback) {
    ledger.detach(rollback.price);
    if let Some(node) = rollback.before {
        // The node's old neighbors were only relinked, never moved, so
        // re-linking after the old predecessor restores the exact slot.
        ledger.insert_after(node.prev, node.price, node.power);
    }
}

/// Apply a debit/credit descriptor pair atomically.
///
/// The higher post-power descriptor goes first so that, at worst, the
/// second ends up as its immediate neighbor. Hints computed against a
/// single pre-transfer snapshot cannot predict that adjacency, so a
/// boundary failure on the second descriptor is retried once with its
/// `prev` redirected at the first node; no third, unhinted node is ever
/// touched. Any other failure rolls the first application back.
fn apply_pair(
    ledger: &mut PriceLedger,
    debit: &SwapDescriptor,
    credit: &SwapDescriptor,
) -> Result<(), VotingError> {
    let (first, second) = if debit.power >= credit.power {
        (debit, credit)
    } else {
        (credit, debit)
    };

    let first_applied = apply_one(ledger, first)?;
    match apply_one(ledger, second) {
        Ok(_) => Ok(()),
        Err(err) => {
            if second.power != 0 && first.power != 0 {
                let adjusted = SwapDescriptor {
                    prev: first.price,
                    ..*second
                };
                if ledger
                    .insert_or_bump(adjusted.price, adjusted.power, adjusted.prev)
                    .is_ok()
                {
                    return Ok(());
                }
            }
            roll_back(ledger, first_applied);
            Err(err)
        }
    }
}
