//! Standard events appended to the token's in-state log.
//! Indexers and test assertions read these; amounts are serialized as
//! strings so JSON clients keep full 128-bit precision.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TokenEvent {
    VotingStarted {
        round: u64,
        started_at: u64,
    },
    VotingEnded {
        round: u64,
        #[serde(with = "pvt_core::u128_str")]
        price: u128,
    },
    Bought {
        buyer: String,
        #[serde(with = "pvt_core::u128_str")]
        amount: u128,
        #[serde(with = "pvt_core::u128_str")]
        cost: u128,
        #[serde(with = "pvt_core::u128_str")]
        fee: u128,
    },
    Sold {
        seller: String,
        #[serde(with = "pvt_core::u128_str")]
        amount: u128,
        #[serde(with = "pvt_core::u128_str")]
        payout: u128,
        #[serde(with = "pvt_core::u128_str")]
        fee: u128,
    },
    Transfer {
        from: String,
        to: String,
        #[serde(with = "pvt_core::u128_str")]
        amount: u128,
    },
    Approval {
        owner: String,
        spender: String,
        #[serde(with = "pvt_core::u128_str")]
        amount: u128,
    },
    Voted {
        voter: String,
        #[serde(with = "pvt_core::u128_str")]
        price: u128,
        #[serde(with = "pvt_core::u128_str")]
        power: u128,
    },
    TopStakeholderChanged {
        holder: String,
        #[serde(with = "pvt_core::u128_str")]
        weight: u128,
    },
    RefundClaimed {
        holder: String,
        #[serde(with = "pvt_core::u128_str")]
        amount: u128,
    },
}
