//! # StakeRankTracker : pull-based top-stakeholder ranking
//!
//! Tracks the single highest-weighted token holder. Reward accrues to the
//! current top holder; when they are displaced the accrued amount is
//! credited to their refund balance instead of being paid out. Holders pull
//! their refund through an explicit claim.
//!
//! This is the DoS defense: `update` never makes an external call, so an
//! adversarial holder whose receive path always reverts can only block
//! their own claim, never the ranking itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StakeRankTracker {
    /// Current top holder's address (empty = none yet).
    top_holder: String,
    /// Current top holder's weight snapshot.
    #[serde(with = "crate::u128_str")]
    top_weight: u128,
    /// Reward accrued for the current top holder, moved into `refunds`
    /// on displacement.
    #[serde(with = "crate::u128_str")]
    pending_reward: u128,
    /// Claimable refund per holder. Values stay u128; serde_json carries
    /// 128-bit integers natively for map values.
    refunds: BTreeMap<String, u128>,
}

impl StakeRankTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current top holder and weight, if any holder has been seen.
    pub fn top(&self) -> Option<(&str, u128)> {
        if self.top_holder.is_empty() {
            None
        } else {
            Some((self.top_holder.as_str(), self.top_weight))
        }
    }

    /// Recompute the top slot after `holder`'s balance changed.
    ///
    /// O(1) with no external calls. Returns `true` when the top
    /// holder changed. A displaced top holder's accrued reward becomes a
    /// claimable refund; nothing is ever pushed to them.
    ///
    /// If the current top's own balance shrinks, they keep the slot until
    /// some other update overtakes them; the tracker only ever sees one
    /// balance per call and must not scan for a runner-up.
    pub fn update(&mut self, holder: &str, new_balance: u128) -> bool {
        if holder == self.top_holder {
            self.top_weight = new_balance;
            return false;
        }
        if new_balance <= self.top_weight {
            return false;
        }

        if !self.top_holder.is_empty() && self.pending_reward > 0 {
            let owed = self.refunds.entry(self.top_holder.clone()).or_insert(0);
            *owed = owed.saturating_add(self.pending_reward);
        }
        self.pending_reward = 0;
        self.top_holder = holder.to_string();
        self.top_weight = new_balance;
        true
    }

    /// Accrue reward weight to the current top holder. Ignored while no
    /// holder has claimed the top slot yet.
    pub fn accrue(&mut self, amount: u128) {
        if !self.top_holder.is_empty() {
            self.pending_reward = self.pending_reward.saturating_add(amount);
        }
    }

    /// Claimable refund for `holder` (excludes any still-pending accrual of
    /// a sitting top holder).
    pub fn refund_owed(&self, holder: &str) -> u128 {
        self.refunds.get(holder).copied().unwrap_or(0)
    }

    /// Zero and return the holder's refund. The caller performs the actual
    /// value transfer strictly after this bookkeeping, closing the
    /// reentrancy window.
    pub fn take_refund(&mut self, holder: &str) -> u128 {
        self.refunds.remove(holder).unwrap_or(0)
    }

    /// Reward accrued for the sitting top holder (not yet claimable).
    pub fn pending_reward(&self) -> u128 {
        self.pending_reward
    }
}
