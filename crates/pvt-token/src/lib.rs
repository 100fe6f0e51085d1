// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pvt-token : price-governance token over the ranked ledger
//
// Holders buy tokens at a fixed native price, vote on the next price, and
// redeem against the reserve. Any balance change while a round is open must
// carry the swap descriptors that keep the voted buckets consistent; plain
// methods refuse to touch a voting participant's balance.
//
// External value transfers go through the ValueReceiver seam and always run
// strictly after state effects. A failing receiver rolls the whole call
// back via snapshot restore.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod config;
pub mod events;
pub mod round;

pub use config::TokenConfig;
pub use events::TokenEvent;
pub use round::RoundState;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use pvt_core::hint;
use pvt_core::ledger::PriceLedger;
use pvt_core::registry::VoterRegistry;
use pvt_core::stake::StakeRankTracker;
use pvt_core::swap::{self, PowerDelta, SwapDescriptor};
use pvt_core::{VotingError, BPS_DENOMINATOR, PRICE_SENTINEL};

/// Counterparty of an outgoing native-value transfer.
///
/// The token hands itself to the receiver mutably, so a receiver may
/// reenter any public method. All callers finish their own bookkeeping
/// before invoking this and restore a snapshot if it fails.
pub trait ValueReceiver {
    fn receive_value(
        &mut self,
        token: &mut GovernanceToken,
        amount: u128,
    ) -> Result<(), VotingError>;
}

/// Receiver that accepts any payout (externally-owned-account behavior).
#[derive(Debug, Default)]
pub struct AcceptingWallet {
    pub received: u128,
}

impl ValueReceiver for AcceptingWallet {
    fn receive_value(
        &mut self,
        _token: &mut GovernanceToken,
        amount: u128,
    ) -> Result<(), VotingError> {
        self.received = self.received.saturating_add(amount);
        Ok(())
    }
}

struct BuyPlan {
    cost: u128,
    fee: u128,
    new_balance: u128,
    new_supply: u128,
}

struct SellPlan {
    gross: u128,
    fee: u128,
    payout: u128,
    new_balance: u128,
    new_supply: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GovernanceToken {
    config: TokenConfig,
    balances: BTreeMap<String, u128>,
    /// owner → spender → remaining allowance.
    allowances: BTreeMap<String, BTreeMap<String, u128>>,
    #[serde(with = "pvt_core::u128_str")]
    total_supply: u128,
    /// Native units backing the supply (redeemable through sells).
    #[serde(with = "pvt_core::u128_str")]
    reserve: u128,
    /// Native units withheld as fees; funds top-stakeholder refunds.
    #[serde(with = "pvt_core::u128_str")]
    accumulated_fees: u128,
    ledger: PriceLedger,
    registry: VoterRegistry,
    stake: StakeRankTracker,
    round: RoundState,
    events: Vec<TokenEvent>,
}

impl GovernanceToken {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────
    // VIEWS
    // ─────────────────────────────────────────────────────────────────

    pub fn balance_of(&self, holder: &str) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn reserve(&self) -> u128 {
        self.reserve
    }

    pub fn accumulated_fees(&self) -> u128 {
        self.accumulated_fees
    }

    pub fn allowance(&self, owner: &str, spender: &str) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Read access to the price chain, e.g. for off-chain hint computation
    /// via [`pvt_core::hint`].
    pub fn ledger(&self) -> &PriceLedger {
        &self.ledger
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Winning price of the last closed round (0 before any round closed).
    pub fn accepted_price(&self) -> u128 {
        self.round.accepted_price
    }

    /// Price currently leading the open round (0 if the chain is empty).
    pub fn leading_price(&self) -> u128 {
        self.ledger.head_price()
    }

    /// Price `voter` backs in the current round (0 = not voted).
    pub fn voter_price(&self, voter: &str) -> u128 {
        self.registry.price_of(voter, self.round.number)
    }

    pub fn top_stakeholder(&self) -> Option<(&str, u128)> {
        self.stake.top()
    }

    pub fn refund_owed(&self, holder: &str) -> u128 {
        self.stake.refund_owed(holder)
    }

    // ─────────────────────────────────────────────────────────────────
    // VOTING ROUND LIFECYCLE
    // ─────────────────────────────────────────────────────────────────

    /// Open a new voting round. Only a holder above the participation
    /// threshold may start one. The price chain starts empty each round.
    pub fn start_voting(&mut self, caller: &str, now: u64) -> Result<(), VotingError> {
        if self.round.active {
            return Err(VotingError::VotingIsAlreadyStarted);
        }
        self.check_participation(self.balance_of(caller))?;
        self.round.start(now)?;
        self.ledger = PriceLedger::new();
        self.events.push(TokenEvent::VotingStarted {
            round: self.round.number,
            started_at: now,
        });
        Ok(())
    }

    /// Close the round once its window has elapsed and snapshot the head
    /// of the chain as the accepted price.
    pub fn end_voting(&mut self, now: u64) -> Result<(), VotingError> {
        self.round.finish(now, self.config.time_to_vote_secs)?;
        self.round.accepted_price = self.ledger.head_price();
        self.events.push(TokenEvent::VotingEnded {
            round: self.round.number,
            price: self.round.accepted_price,
        });
        Ok(())
    }

    /// First vote of the round for `voter`: stakes their whole balance on
    /// `desc.price`. The descriptor carries the expected post-state of the
    /// bucket, verified against the real balance.
    pub fn vote(&mut self, voter: &str, desc: &SwapDescriptor, now: u64) -> Result<(), VotingError> {
        if !self.round.voting_open(now, self.config.time_to_vote_secs) {
            return Err(VotingError::VotingIsNotStarted);
        }
        if desc.price == PRICE_SENTINEL {
            return Err(VotingError::PushingNonValidPrice);
        }
        let round = self.round.number;
        if self.registry.has_voted(voter, round) {
            // Changing a vote goes through vote_with_swap.
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let balance = self.balance_of(voter);
        self.check_participation(balance)?;

        let expected = self
            .ledger
            .power_of(desc.price)
            .checked_add(balance)
            .ok_or(VotingError::PowerIsNotValid)?;
        if desc.power != expected {
            return Err(VotingError::PowerIsNotValid);
        }

        self.ledger.insert_or_bump(desc.price, desc.power, desc.prev)?;
        self.registry.record_vote(voter, desc.price, round);
        self.events.push(TokenEvent::Voted {
            voter: voter.to_string(),
            price: desc.price,
            power: desc.power,
        });
        Ok(())
    }

    /// Move an existing vote to a different price. `new_desc` and
    /// `old_desc` describe the post-state of the destination and origin
    /// buckets after the voter's whole weight moved.
    pub fn vote_with_swap(
        &mut self,
        voter: &str,
        new_desc: &SwapDescriptor,
        old_desc: &SwapDescriptor,
        now: u64,
    ) -> Result<(), VotingError> {
        if !self.round.voting_open(now, self.config.time_to_vote_secs) {
            return Err(VotingError::VotingIsNotStarted);
        }
        let round = self.round.number;
        let balance = self.balance_of(voter);
        self.check_participation(balance)?;

        swap::move_vote(
            &mut self.ledger,
            &mut self.registry,
            voter,
            round,
            new_desc,
            old_desc,
            balance,
        )?;
        self.events.push(TokenEvent::Voted {
            voter: voter.to_string(),
            price: new_desc.price,
            power: new_desc.power,
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // BUY / SELL
    // ─────────────────────────────────────────────────────────────────

    /// Mint `amount` tokens for `buyer` against `value_sent` native units.
    /// Refused while the buyer has an active vote; use [`buy_with_swap`].
    ///
    /// [`buy_with_swap`]: GovernanceToken::buy_with_swap
    pub fn buy(&mut self, buyer: &str, amount: u128, value_sent: u128) -> Result<(), VotingError> {
        if self.swap_required(buyer) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let plan = self.check_buy(buyer, amount, value_sent)?;
        self.commit_buy(buyer, amount, value_sent, &plan);
        Ok(())
    }

    /// Buy while holding an active vote. `desc` is the voter's bucket
    /// post-state with the minted amount credited.
    pub fn buy_with_swap(
        &mut self,
        buyer: &str,
        amount: u128,
        value_sent: u128,
        desc: &SwapDescriptor,
    ) -> Result<(), VotingError> {
        if !self.swap_required(buyer) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let plan = self.check_buy(buyer, amount, value_sent)?;
        swap::single_swap(
            &mut self.ledger,
            &self.registry,
            buyer,
            self.round.number,
            desc,
            PowerDelta::Credit(amount),
        )?;
        self.commit_buy(buyer, amount, value_sent, &plan);
        Ok(())
    }

    /// Burn `amount` of the seller's tokens and pay out their reserve
    /// backing, minus the sell fee. The payout runs strictly after all
    /// state effects; a failing receiver restores the pre-call state.
    pub fn sell(
        &mut self,
        seller: &str,
        amount: u128,
        receiver: &mut dyn ValueReceiver,
    ) -> Result<(), VotingError> {
        if self.swap_required(seller) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let plan = self.check_sell(seller, amount)?;
        let snapshot = self.clone();
        self.commit_sell(seller, amount, &plan);
        if receiver.receive_value(self, plan.payout).is_err() {
            *self = snapshot;
            return Err(VotingError::TransferFailed);
        }
        Ok(())
    }

    /// Sell while holding an active vote. `desc` is the voter's bucket
    /// post-state with the burned amount debited (power 0 empties it).
    pub fn sell_with_swap(
        &mut self,
        seller: &str,
        amount: u128,
        desc: &SwapDescriptor,
        receiver: &mut dyn ValueReceiver,
    ) -> Result<(), VotingError> {
        if !self.swap_required(seller) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let plan = self.check_sell(seller, amount)?;
        let snapshot = self.clone();
        swap::single_swap(
            &mut self.ledger,
            &self.registry,
            seller,
            self.round.number,
            desc,
            PowerDelta::Debit(amount),
        )?;
        if desc.power == 0 {
            self.registry.clear_vote(seller);
        }
        self.commit_sell(seller, amount, &plan);
        if receiver.receive_value(self, plan.payout).is_err() {
            *self = snapshot;
            return Err(VotingError::TransferFailed);
        }
        Ok(())
    }

    /// Historical sell ordering that pays out before debiting the seller.
    /// Kept only so the regression suite can demonstrate the drain this
    /// ordering permits.
    #[cfg(feature = "reentrancy-reference")]
    pub fn sell_unguarded(
        &mut self,
        seller: &str,
        amount: u128,
        receiver: &mut dyn ValueReceiver,
    ) -> Result<(), VotingError> {
        let plan = self.check_sell(seller, amount)?;
        self.reserve = self.reserve.saturating_sub(plan.gross);
        self.accumulated_fees = self.accumulated_fees.saturating_add(plan.fee);
        receiver
            .receive_value(self, plan.payout)
            .map_err(|_| VotingError::TransferFailed)?;
        // Reentrant calls have already run against the stale balance.
        let new_balance = self.balance_of(seller).saturating_sub(amount);
        self.balances.insert(seller.to_string(), new_balance);
        self.total_supply = self.total_supply.saturating_sub(amount);
        self.stake.update(seller, new_balance);
        self.events.push(TokenEvent::Sold {
            seller: seller.to_string(),
            amount,
            payout: plan.payout,
            fee: plan.fee,
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // TRANSFERS
    // ─────────────────────────────────────────────────────────────────

    /// Plain balance transfer. Refused while either party has an active
    /// vote; those go through [`transfer_with_swap`].
    ///
    /// [`transfer_with_swap`]: GovernanceToken::transfer_with_swap
    pub fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), VotingError> {
        if self.swap_required(from) || self.swap_required(to) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let (from_new, to_new) = self.check_transfer(from, to, amount)?;
        self.commit_transfer(from, to, amount, from_new, to_new);
        Ok(())
    }

    /// Transfer touching at least one voted balance. `descs` carries one
    /// descriptor when exactly one party voted, two (sender first) when
    /// both voted for different prices, and none when both back the same
    /// price (the bucket's total is unchanged).
    pub fn transfer_with_swap(
        &mut self,
        from: &str,
        to: &str,
        amount: u128,
        descs: &[SwapDescriptor],
    ) -> Result<(), VotingError> {
        let (from_new, to_new) = self.check_transfer(from, to, amount)?;
        self.apply_transfer_swaps(from, to, amount, descs)?;
        self.commit_transfer(from, to, amount, from_new, to_new);
        Ok(())
    }

    pub fn approve(&mut self, owner: &str, spender: &str, amount: u128) {
        self.allowances
            .entry(owner.to_string())
            .or_default()
            .insert(spender.to_string(), amount);
        self.events.push(TokenEvent::Approval {
            owner: owner.to_string(),
            spender: spender.to_string(),
            amount,
        });
    }

    /// Allowance-funded transfer; same voting guard as [`transfer`].
    ///
    /// [`transfer`]: GovernanceToken::transfer
    pub fn transfer_from(
        &mut self,
        spender: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<(), VotingError> {
        if self.swap_required(from) || self.swap_required(to) {
            return Err(VotingError::CallingUnsuitableMethod);
        }
        let allowance_new = self.check_allowance(from, spender, amount)?;
        let (from_new, to_new) = self.check_transfer(from, to, amount)?;
        self.set_allowance(from, spender, allowance_new);
        self.commit_transfer(from, to, amount, from_new, to_new);
        Ok(())
    }

    /// Allowance-funded counterpart of [`transfer_with_swap`].
    ///
    /// [`transfer_with_swap`]: GovernanceToken::transfer_with_swap
    pub fn transfer_from_with_swap(
        &mut self,
        spender: &str,
        from: &str,
        to: &str,
        amount: u128,
        descs: &[SwapDescriptor],
    ) -> Result<(), VotingError> {
        let allowance_new = self.check_allowance(from, spender, amount)?;
        let (from_new, to_new) = self.check_transfer(from, to, amount)?;
        self.apply_transfer_swaps(from, to, amount, descs)?;
        self.set_allowance(from, spender, allowance_new);
        self.commit_transfer(from, to, amount, from_new, to_new);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // REFUNDS
    // ─────────────────────────────────────────────────────────────────

    /// Pull a displaced top stakeholder's accrued reward. The refund is
    /// zeroed before the external transfer; a failing receiver restores it.
    pub fn claim_refund(
        &mut self,
        holder: &str,
        receiver: &mut dyn ValueReceiver,
    ) -> Result<(), VotingError> {
        if self.stake.refund_owed(holder) == 0 {
            return Err(VotingError::AmountIsNotValid);
        }
        let snapshot = self.clone();
        let owed = self.stake.take_refund(holder);
        self.accumulated_fees = match self.accumulated_fees.checked_sub(owed) {
            Some(rest) => rest,
            None => {
                *self = snapshot;
                return Err(VotingError::ValueIsNotEnough);
            }
        };
        self.events.push(TokenEvent::RefundClaimed {
            holder: holder.to_string(),
            amount: owed,
        });
        if receiver.receive_value(self, owed).is_err() {
            *self = snapshot;
            return Err(VotingError::TransferFailed);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // INTERNALS
    // ─────────────────────────────────────────────────────────────────

    /// A balance change for `who` must go through a swap method while a
    /// round is active (even past the vote deadline, until it is closed)
    /// and `who` holds a live vote.
    fn swap_required(&self, who: &str) -> bool {
        self.round.active && self.registry.has_voted(who, self.round.number)
    }

    /// Strictly more than `min_participation_bps` of total supply.
    fn check_participation(&self, balance: u128) -> Result<(), VotingError> {
        let lhs = balance
            .checked_mul(BPS_DENOMINATOR)
            .ok_or(VotingError::AmountIsNotValid)?;
        let rhs = self
            .total_supply
            .checked_mul(self.config.min_participation_bps as u128)
            .ok_or(VotingError::AmountIsNotValid)?;
        if lhs <= rhs {
            return Err(VotingError::BalanceIsNotEnough);
        }
        Ok(())
    }

    fn fee_of(&self, gross: u128, fee_bps: u32) -> Result<u128, VotingError> {
        Ok(gross
            .checked_mul(fee_bps as u128)
            .ok_or(VotingError::AmountIsNotValid)?
            / BPS_DENOMINATOR)
    }

    fn check_buy(
        &self,
        buyer: &str,
        amount: u128,
        value_sent: u128,
    ) -> Result<BuyPlan, VotingError> {
        if amount == 0 {
            return Err(VotingError::AmountIsNotValid);
        }
        let cost = amount
            .checked_mul(self.config.token_price)
            .ok_or(VotingError::AmountIsNotValid)?;
        let fee = self.fee_of(cost, self.config.buy_fee_bps)?;
        let required = cost.checked_add(fee).ok_or(VotingError::AmountIsNotValid)?;
        if value_sent < required {
            return Err(VotingError::ValueIsNotEnough);
        }
        let new_balance = self
            .balance_of(buyer)
            .checked_add(amount)
            .ok_or(VotingError::AmountIsNotValid)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(VotingError::AmountIsNotValid)?;
        Ok(BuyPlan {
            cost,
            fee,
            new_balance,
            new_supply,
        })
    }

    fn commit_buy(&mut self, buyer: &str, amount: u128, value_sent: u128, plan: &BuyPlan) {
        self.balances.insert(buyer.to_string(), plan.new_balance);
        self.total_supply = plan.new_supply;
        // Overpayment beyond cost + fee stays in the redeemable reserve.
        self.reserve = self.reserve.saturating_add(value_sent - plan.fee);
        self.accumulated_fees = self.accumulated_fees.saturating_add(plan.fee);
        self.accrue_top_reward(plan.fee);
        self.note_rank(buyer, plan.new_balance);
        self.events.push(TokenEvent::Bought {
            buyer: buyer.to_string(),
            amount,
            cost: plan.cost,
            fee: plan.fee,
        });
    }

    fn check_sell(&self, seller: &str, amount: u128) -> Result<SellPlan, VotingError> {
        if amount == 0 {
            return Err(VotingError::AmountIsNotValid);
        }
        let balance = self.balance_of(seller);
        let new_balance = balance
            .checked_sub(amount)
            .ok_or(VotingError::BalanceIsNotEnough)?;
        let gross = amount
            .checked_mul(self.config.token_price)
            .ok_or(VotingError::AmountIsNotValid)?;
        if gross > self.reserve {
            return Err(VotingError::ValueIsNotEnough);
        }
        let fee = self.fee_of(gross, self.config.sell_fee_bps)?;
        let payout = gross - fee;
        let new_supply = self.total_supply.saturating_sub(amount);
        Ok(SellPlan {
            gross,
            fee,
            payout,
            new_balance,
            new_supply,
        })
    }

    fn commit_sell(&mut self, seller: &str, amount: u128, plan: &SellPlan) {
        self.balances.insert(seller.to_string(), plan.new_balance);
        self.total_supply = plan.new_supply;
        self.reserve -= plan.gross;
        self.accumulated_fees = self.accumulated_fees.saturating_add(plan.fee);
        self.accrue_top_reward(plan.fee);
        self.note_rank(seller, plan.new_balance);
        self.events.push(TokenEvent::Sold {
            seller: seller.to_string(),
            amount,
            payout: plan.payout,
            fee: plan.fee,
        });
    }

    fn check_transfer(
        &self,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<(u128, u128), VotingError> {
        if amount == 0 || from == to {
            return Err(VotingError::AmountIsNotValid);
        }
        let from_new = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(VotingError::BalanceIsNotEnough)?;
        let to_new = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(VotingError::AmountIsNotValid)?;
        Ok((from_new, to_new))
    }

    fn commit_transfer(&mut self, from: &str, to: &str, amount: u128, from_new: u128, to_new: u128) {
        self.balances.insert(from.to_string(), from_new);
        self.balances.insert(to.to_string(), to_new);
        self.note_rank(from, from_new);
        self.note_rank(to, to_new);
        self.events.push(TokenEvent::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        });
    }

    /// Route a transfer's ledger effects by which parties hold live votes.
    fn apply_transfer_swaps(
        &mut self,
        from: &str,
        to: &str,
        amount: u128,
        descs: &[SwapDescriptor],
    ) -> Result<(), VotingError> {
        let round = self.round.number;
        let from_voted = self.swap_required(from);
        let to_voted = self.swap_required(to);

        match (from_voted, to_voted) {
            (false, false) => Err(VotingError::CallingUnsuitableMethod),
            (true, false) => {
                let desc = single_desc(descs)?;
                swap::single_swap(
                    &mut self.ledger,
                    &self.registry,
                    from,
                    round,
                    desc,
                    PowerDelta::Debit(amount),
                )?;
                if desc.power == 0 {
                    self.registry.clear_vote(from);
                }
                Ok(())
            }
            (false, true) => {
                let desc = single_desc(descs)?;
                swap::single_swap(
                    &mut self.ledger,
                    &self.registry,
                    to,
                    round,
                    desc,
                    PowerDelta::Credit(amount),
                )
            }
            (true, true) => {
                if self.registry.price_of(from, round) == self.registry.price_of(to, round) {
                    // Same bucket: the debit and credit cancel out.
                    if !descs.is_empty() {
                        return Err(VotingError::CallingMethodWithWrongTx);
                    }
                    return Ok(());
                }
                let [src_desc, dst_desc] = descs else {
                    return Err(VotingError::CallingMethodWithWrongTx);
                };
                swap::double_swap(
                    &mut self.ledger,
                    &self.registry,
                    from,
                    to,
                    round,
                    src_desc,
                    dst_desc,
                    amount,
                )?;
                if src_desc.power == 0 {
                    self.registry.clear_vote(from);
                }
                Ok(())
            }
        }
    }

    fn check_allowance(
        &self,
        owner: &str,
        spender: &str,
        amount: u128,
    ) -> Result<u128, VotingError> {
        self.allowance(owner, spender)
            .checked_sub(amount)
            .ok_or(VotingError::AllowanceIsNotEnough)
    }

    fn set_allowance(&mut self, owner: &str, spender: &str, amount: u128) {
        self.allowances
            .entry(owner.to_string())
            .or_default()
            .insert(spender.to_string(), amount);
    }

    fn accrue_top_reward(&mut self, fee: u128) {
        let share = fee.saturating_mul(self.config.top_reward_share_bps as u128) / BPS_DENOMINATOR;
        self.stake.accrue(share);
    }

    fn note_rank(&mut self, holder: &str, new_balance: u128) {
        if self.stake.update(holder, new_balance) {
            self.events.push(TokenEvent::TopStakeholderChanged {
                holder: holder.to_string(),
                weight: new_balance,
            });
        }
    }
}

fn single_desc(descs: &[SwapDescriptor]) -> Result<&SwapDescriptor, VotingError> {
    match descs {
        [desc] => Ok(desc),
        _ => Err(VotingError::CallingMethodWithWrongTx),
    }
}

/// Bucket post-state helper for callers: descriptor for `voter` after a
/// balance delta, with the hint computed against the current chain.
pub fn descriptor_for(
    token: &GovernanceToken,
    voter: &str,
    delta: PowerDelta,
) -> Result<SwapDescriptor, VotingError> {
    let price = token.voter_price(voter);
    if price == PRICE_SENTINEL {
        return Err(VotingError::CallingUnsuitableMethod);
    }
    let old_power = token.ledger().power_of(price);
    let power = match delta {
        PowerDelta::Credit(amount) => old_power.checked_add(amount),
        PowerDelta::Debit(amount) => old_power.checked_sub(amount),
    }
    .ok_or(VotingError::PowerIsNotValid)?;
    let prev = hint::compute_prev_excluding(token.ledger(), power, price);
    Ok(SwapDescriptor { price, power, prev })
}
