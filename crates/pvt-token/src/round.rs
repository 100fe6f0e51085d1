//! Voting round lifecycle.
//!
//! A round is opened by any qualifying stakeholder, stays open for a
//! configured number of seconds, and must be closed explicitly. Closing
//! snapshots the head of the price ledger as the accepted price. Round
//! numbers increase monotonically so voter-registry entries from a past
//! round expire without a sweep.

use pvt_core::VotingError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundState {
    pub number: u64,
    pub started_at: u64,
    pub active: bool,
    /// Winning price of the last closed round. 0 until one closes.
    #[serde(with = "pvt_core::u128_str")]
    pub accepted_price: u128,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while votes may still be cast.
    pub fn voting_open(&self, now: u64, time_to_vote: u64) -> bool {
        self.active && now < self.started_at.saturating_add(time_to_vote)
    }

    /// Opens the next round at `now`.
    pub fn start(&mut self, now: u64) -> Result<(), VotingError> {
        if self.active {
            return Err(VotingError::VotingIsAlreadyStarted);
        }
        self.number += 1;
        self.started_at = now;
        self.active = true;
        Ok(())
    }

    /// Closes the round once the window has elapsed. The caller records
    /// the accepted price.
    pub fn finish(&mut self, now: u64, time_to_vote: u64) -> Result<(), VotingError> {
        if !self.active {
            return Err(VotingError::VotingIsNotStarted);
        }
        if now < self.started_at.saturating_add(time_to_vote) {
            return Err(VotingError::TimeToVoteIsNotEnded);
        }
        self.active = false;
        Ok(())
    }
}
