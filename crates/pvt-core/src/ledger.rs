//! # PriceLedger : rank-ordered voting ledger
//!
//! Arena of price nodes kept sorted by aggregate voting power (descending
//! from the head), linked through price-valued `prev`/`next` fields. Nodes
//! are addressed by their unique price key in a `BTreeMap`; there are no
//! raw pointers and nothing owns a node except the map itself.
//!
//! The ledger never searches for an insertion point. Every mutation takes a
//! caller-supplied predecessor hint (computed off-chain, see [`crate::hint`])
//! and verifies it in O(1) against the current neighborhood. A stale hint is
//! rejected deterministically; the caller recomputes and resubmits.

use crate::{verify, VotingError, PRICE_SENTINEL};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;

/// One price's current state in the chain.
///
/// `prev == 0` means the node is the head (highest power); `next == 0` means
/// it is the tail (lowest power).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    #[serde(with = "crate::u128_str")]
    pub price: u128,
    #[serde(with = "crate::u128_str")]
    pub power: u128,
    #[serde(with = "crate::u128_str")]
    pub prev: u128,
    #[serde(with = "crate::u128_str")]
    pub next: u128,
}

/// Serde adapter: the node arena round-trips as a plain `Vec<Node>` because
/// JSON map keys must be strings and u128 keys would not survive.
mod nodes_map {
    use super::Node;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(map: &BTreeMap<u128, Node>, s: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = map.values().collect();
        nodes.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<u128, Node>, D::Error> {
        let nodes = Vec::<Node>::deserialize(d)?;
        Ok(nodes.into_iter().map(|n| (n.price, n)).collect())
    }
}

/// The ranked linked list of price nodes.
///
/// Invariants (hold after every public mutation):
/// - all nodes form a single chain from `head` to `tail`;
/// - walking from the head, `power` is non-increasing;
/// - `prev`/`next` backlinks are mutually consistent.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PriceLedger {
    #[serde(with = "nodes_map")]
    nodes: BTreeMap<u128, Node>,
    #[serde(with = "crate::u128_str")]
    head: u128,
    #[serde(with = "crate::u128_str")]
    tail: u128,
}

impl PriceLedger {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            head: PRICE_SENTINEL,
            tail: PRICE_SENTINEL,
        }
    }

    /// Price of the highest-powered node (0 when the list is empty).
    pub fn head_price(&self) -> u128 {
        self.head
    }

    /// Price of the lowest-powered node (0 when the list is empty).
    pub fn tail_price(&self) -> u128 {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// O(1) node lookup by price.
    pub fn node_at(&self, price: u128) -> Option<Node> {
        self.nodes.get(&price).copied()
    }

    /// O(1) power lookup; 0 for an absent price.
    pub fn power_of(&self, price: u128) -> u128 {
        self.nodes.get(&price).map(|n| n.power).unwrap_or(0)
    }

    /// Full head→tail walk, bounded by the node count.
    ///
    /// Client-side primitive: used by the off-chain hint helper and by
    /// audits/tests. Never called from a mutating path.
    pub fn chain(&self) -> Vec<Node> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while cursor != PRICE_SENTINEL && out.len() <= self.nodes.len() {
            match self.nodes.get(&cursor) {
                Some(node) => {
                    out.push(*node);
                    cursor = node.next;
                }
                None => break,
            }
        }
        out
    }

    /// Insert a new node after `hint_prev`, or reposition an existing one.
    ///
    /// The hint is verified against the current neighborhood (see
    /// [`verify::verify_position`]); on any failure the ledger is left
    /// exactly as it was: a repositioned node is restored to its original
    /// slot with its original power.
    pub fn insert_or_bump(
        &mut self,
        price: u128,
        new_power: u128,
        hint_prev: u128,
    ) -> Result<(), VotingError> {
        if price == PRICE_SENTINEL {
            return Err(VotingError::PushingNonValidPrice);
        }
        if new_power == 0 {
            return Err(VotingError::PowerIsNotValid);
        }
        if hint_prev == price {
            // A node cannot be its own predecessor; after the detach below
            // the hinted price would not exist in the chain at all.
            return Err(VotingError::PrevIndexIsNotValid);
        }

        if let Some(old) = self.detach(price) {
            match verify::verify_position(self, new_power, hint_prev) {
                Ok(()) => {
                    self.insert_after(hint_prev, price, new_power);
                    Ok(())
                }
                Err(e) => {
                    // Exact inverse of the detach: old.prev still exists.
                    self.insert_after(old.prev, price, old.power);
                    Err(e)
                }
            }
        } else {
            verify::verify_position(self, new_power, hint_prev)?;
            self.insert_after(hint_prev, price, new_power);
            Ok(())
        }
    }

    /// Detach a node whose power has reached 0, relinking its neighbors.
    /// No-op (returns false) if the node is absent or still has power.
    pub fn remove_if_empty(&mut self, price: u128) -> bool {
        match self.nodes.get(&price) {
            Some(node) if node.power == 0 => {
                self.detach(price);
                true
            }
            _ => false,
        }
    }

    /// Deterministic SHA3-256 root over (price, power) pairs in chain order.
    ///
    /// Clients snapshot the chain to compute hints; comparing roots before
    /// submission detects that the snapshot went stale in between.
    pub fn state_root(&self) -> String {
        let mut hasher = Sha3_256::new();
        for node in self.chain() {
            hasher.update(node.price.to_le_bytes());
            hasher.update(node.power.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Audit walk verifying chain integrity and descending power order.
    /// Test/debug tool, never part of a mutating path.
    pub fn check_order(&self) -> Result<(), String> {
        let mut cursor = self.head;
        let mut prev_price = PRICE_SENTINEL;
        let mut prev_power = u128::MAX;
        let mut visited = 0usize;

        while cursor != PRICE_SENTINEL {
            let node = self
                .nodes
                .get(&cursor)
                .ok_or_else(|| format!("dangling link to absent price {}", cursor))?;
            if node.prev != prev_price {
                return Err(format!(
                    "backlink mismatch at price {}: prev is {}, expected {}",
                    cursor, node.prev, prev_price
                ));
            }
            if node.power > prev_power {
                return Err(format!(
                    "order violation at price {}: power {} exceeds predecessor's {}",
                    cursor, node.power, prev_power
                ));
            }
            if node.power == 0 {
                return Err(format!("zero-power node left in chain at price {}", cursor));
            }
            visited += 1;
            if visited > self.nodes.len() {
                return Err("cycle detected in chain".to_string());
            }
            prev_price = cursor;
            prev_power = node.power;
            cursor = node.next;
        }

        if visited != self.nodes.len() {
            return Err(format!(
                "chain covers {} nodes but arena holds {}",
                visited,
                self.nodes.len()
            ));
        }
        if self.tail != prev_price {
            return Err(format!(
                "tail is {} but last chain node is {}",
                self.tail, prev_price
            ));
        }
        Ok(())
    }

    /// Unlink `price` from the chain and drop it from the arena.
    /// Returns the node exactly as it was linked.
    pub(crate) fn detach(&mut self, price: u128) -> Option<Node> {
        let node = self.nodes.remove(&price)?;
        if node.prev != PRICE_SENTINEL {
            if let Some(p) = self.nodes.get_mut(&node.prev) {
                p.next = node.next;
            }
        } else {
            self.head = node.next;
        }
        if node.next != PRICE_SENTINEL {
            if let Some(n) = self.nodes.get_mut(&node.next) {
                n.prev = node.prev;
            }
        } else {
            self.tail = node.prev;
        }
        Some(node)
    }

    /// Drive a node's power to 0 in place. Transient: the caller must
    /// immediately follow with [`Self::remove_if_empty`]; a zero-power node
    /// is never left linked into the chain.
    pub(crate) fn zero_power(&mut self, price: u128) {
        if let Some(node) = self.nodes.get_mut(&price) {
            node.power = 0;
        }
    }

    /// Unverified link-in after `prev` (0 = at head). Used by the verified
    /// insertion path and by swap rollback, both of which have already
    /// established that the position is correct.
    pub(crate) fn insert_after(&mut self, prev: u128, price: u128, power: u128) {
        let node = if prev == PRICE_SENTINEL {
            let old_head = self.head;
            if old_head != PRICE_SENTINEL {
                if let Some(h) = self.nodes.get_mut(&old_head) {
                    h.prev = price;
                }
            } else {
                self.tail = price;
            }
            self.head = price;
            Node {
                price,
                power,
                prev: PRICE_SENTINEL,
                next: old_head,
            }
        } else {
            let next = self.nodes.get(&prev).map(|p| p.next).unwrap_or(PRICE_SENTINEL);
            if let Some(p) = self.nodes.get_mut(&prev) {
                p.next = price;
            }
            if next != PRICE_SENTINEL {
                if let Some(n) = self.nodes.get_mut(&next) {
                    n.prev = price;
                }
            } else {
                self.tail = price;
            }
            Node {
                price,
                power,
                prev,
                next,
            }
        };
        self.nodes.insert(price, node);
    }
}
