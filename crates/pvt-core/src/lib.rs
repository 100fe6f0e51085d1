// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PRICE VOTE TOKEN (PVT) - CORE MODULE
//
// Rank-ordered voting ledger primitives: PriceLedger, position verification,
// single/double swap protocols, voter registry and top-stakeholder tracking.
// All voting weight arithmetic uses u128 atomic units (no floating-point).
// Every mutation is O(1): callers supply an off-chain-computed predecessor
// hint which is verified, never recomputed on-chain.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod hint;
pub mod ledger;
pub mod registry;
pub mod stake;
pub mod swap;
pub mod verify;

pub use ledger::{Node, PriceLedger};
pub use registry::{VoterEntry, VoterRegistry};
pub use stake::StakeRankTracker;
pub use swap::{PowerDelta, SwapDescriptor};

/// Reserved price value: 0 means "no price / sentinel".
/// As a `prev` hint it means "insert at the head of the list";
/// as a registry entry it means "has not voted this round".
pub const PRICE_SENTINEL: u128 = 0;

/// Basis points denominator used for all percentage math (fees, thresholds).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Serde adapter: u128 ↔ string (JSON has no native 128-bit integers and
/// JS clients would silently lose precision past 2^53).
pub mod u128_str {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(val: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map_err(serde::de::Error::custom)
    }
}

/// Error taxonomy for every voting-ledger operation.
///
/// All failures are fatal to the enclosing operation; there is no partial
/// application. Stale-hint failures (`PrevIndexIsNotValid`,
/// `NodeIndexIsNotValid`) are an expected mode: callers recompute the hint
/// against fresh state and resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingError {
    /// Price 0 is the sentinel and can never be voted for.
    PushingNonValidPrice,
    /// Zero amount supplied where a positive amount is required.
    AmountIsNotValid,
    /// The hinted predecessor price does not exist in the chain.
    PrevIndexIsNotValid,
    /// Inserting at the hinted position would break descending power order.
    NodeIndexIsNotValid,
    /// Descriptor power does not match the real balance delta.
    PowerIsNotValid,
    /// The plain entry point was called but a party has an active vote
    /// (or vice versa); the other method variant must be used.
    CallingUnsuitableMethod,
    /// A swap descriptor's price is inconsistent with the voter's actual
    /// registry entry (stale transaction).
    CallingMethodWithWrongTx,
    /// Balance (or reserve) below the required amount or threshold.
    BalanceIsNotEnough,
    /// Allowance below the requested transfer amount.
    AllowanceIsNotEnough,
    /// Re-voting for the price the voter already backs.
    VotingForTheSamePrice,
    /// Vote/swap operation outside an active voting round.
    VotingIsNotStarted,
    /// A round is already in progress.
    VotingIsAlreadyStarted,
    /// The voting window has not elapsed yet.
    TimeToVoteIsNotEnded,
    /// Native value sent does not cover the purchase cost plus fee.
    ValueIsNotEnough,
    /// The external value transfer was rejected by the receiver.
    TransferFailed,
}

impl std::fmt::Display for VotingError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VotingError::PushingNonValidPrice => write!(f, "Price 0 is reserved as the sentinel"),
            VotingError::AmountIsNotValid => write!(f, "Amount must be greater than zero"),
            VotingError::PrevIndexIsNotValid => {
                write!(f, "Hinted predecessor does not exist in the chain")
            }
            VotingError::NodeIndexIsNotValid => {
                write!(f, "Hinted position violates descending power order")
            }
            VotingError::PowerIsNotValid => {
                write!(f, "Descriptor power does not match the actual balance delta")
            }
            VotingError::CallingUnsuitableMethod => {
                write!(f, "Wrong method variant for the caller's voting status")
            }
            VotingError::CallingMethodWithWrongTx => {
                write!(f, "Descriptor is inconsistent with current voter state")
            }
            VotingError::BalanceIsNotEnough => write!(f, "Balance is not enough"),
            VotingError::AllowanceIsNotEnough => write!(f, "Allowance is not enough"),
            VotingError::VotingForTheSamePrice => {
                write!(f, "Already voting for this price")
            }
            VotingError::VotingIsNotStarted => write!(f, "Voting round is not active"),
            VotingError::VotingIsAlreadyStarted => write!(f, "Voting round already in progress"),
            VotingError::TimeToVoteIsNotEnded => write!(f, "Voting window has not elapsed"),
            VotingError::ValueIsNotEnough => write!(f, "Sent value does not cover cost plus fee"),
            VotingError::TransferFailed => write!(f, "External value transfer was rejected"),
        }
    }
}

impl std::error::Error for VotingError {}
