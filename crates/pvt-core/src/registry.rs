//! # VoterRegistry : which price each voter currently backs
//!
//! Entries are tagged with the round number they were cast in. An entry from
//! a previous round is simply ignored, which resets every voter in O(1) at a
//! round boundary with no global sweep, consistent with the metered execution
//! model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PRICE_SENTINEL;

/// One voter's registry entry: the price they back and the round it was
/// cast in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterEntry {
    #[serde(with = "crate::u128_str")]
    pub price: u128,
    pub round: u64,
}

/// Voter → current vote. Each voter points at at most one price per round.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct VoterRegistry {
    /// MAINNET-style determinism: BTreeMap for stable iteration/serialization.
    entries: BTreeMap<String, VoterEntry>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Price the voter backs in `round` (0 = has not voted this round).
    pub fn price_of(&self, voter: &str, round: u64) -> u128 {
        match self.entries.get(voter) {
            Some(entry) if entry.round == round => entry.price,
            _ => PRICE_SENTINEL,
        }
    }

    pub fn has_voted(&self, voter: &str, round: u64) -> bool {
        self.price_of(voter, round) != PRICE_SENTINEL
    }

    /// Point `voter` at `price` for `round`, replacing any stale entry.
    pub fn record_vote(&mut self, voter: &str, price: u128, round: u64) {
        self.entries
            .insert(voter.to_string(), VoterEntry { price, round });
    }

    /// Drop the voter's entry entirely (used when their bucket is emptied).
    pub fn clear_vote(&mut self, voter: &str) {
        self.entries.remove(voter);
    }
}
