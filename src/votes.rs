//! Votes
//!
//! Vote counts are tallied by the backing store. Locally a vote is applied
//! speculatively so the listing reacts immediately; [`OptimisticVotes`]
//! remembers each speculative increment until the store confirms or rejects
//! it, or until an authoritative fetch replaces the local copy.

use clap::ValueEnum;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::{
    deals::{Deal, DealId},
    numeric::Numeric,
};

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Up vote
    Up,

    /// Down vote
    Down,
}

impl VoteDirection {
    /// Wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Vote counters of a deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Up vote count
    #[serde(default)]
    pub upvotes: Numeric,

    /// Down vote count
    #[serde(default)]
    pub downvotes: Numeric,
}

impl VoteTally {
    /// Counters of a deal.
    #[must_use]
    pub fn of(deal: &Deal) -> Self {
        Self {
            upvotes: deal.upvotes,
            downvotes: deal.downvotes,
        }
    }

    /// Write these counters to a deal.
    pub fn write_to(self, deal: &mut Deal) {
        deal.upvotes = self.upvotes;
        deal.downvotes = self.downvotes;
    }
}

/// Increment one counter of every deal with the given id.
///
/// Missing counters count as zero. Returns whether any deal matched.
pub fn apply_vote(deals: &mut [Deal], id: &DealId, direction: VoteDirection) -> bool {
    let mut matched = false;

    for deal in deals.iter_mut().filter(|deal| deal.id == *id) {
        let counter = counter_mut(deal, direction);
        *counter = Numeric::new(counter.or_zero() + Decimal::ONE);
        matched = true;
    }

    matched
}

fn counter_mut(deal: &mut Deal, direction: VoteDirection) -> &mut Numeric {
    match direction {
        VoteDirection::Up => &mut deal.upvotes,
        VoteDirection::Down => &mut deal.downvotes,
    }
}

new_key_type! {
    /// Handle for an unconfirmed vote.
    pub struct VoteTicket;
}

#[derive(Debug, Clone)]
struct PendingVote {
    deal_id: DealId,
    direction: VoteDirection,
    /// Counter before the vote; cleared once the store reports newer counters.
    previous: Option<Numeric>,
}

/// Speculative votes awaiting confirmation from the store.
#[derive(Debug, Default)]
pub struct OptimisticVotes {
    pending: SlotMap<VoteTicket, PendingVote>,
    per_deal: FxHashMap<DealId, usize>,
}

impl OptimisticVotes {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a vote locally and remember it as unconfirmed.
    ///
    /// Returns `None`, leaving everything untouched, when no deal has the given id.
    pub fn apply(
        &mut self,
        deals: &mut [Deal],
        id: &DealId,
        direction: VoteDirection,
    ) -> Option<VoteTicket> {
        let previous = deals
            .iter()
            .find(|deal| deal.id == *id)
            .map(|deal| match direction {
                VoteDirection::Up => deal.upvotes,
                VoteDirection::Down => deal.downvotes,
            })?;

        apply_vote(deals, id, direction);

        *self.per_deal.entry(id.clone()).or_default() += 1;

        Some(self.pending.insert(PendingVote {
            deal_id: id.clone(),
            direction,
            previous: Some(previous),
        }))
    }

    /// The store accepted the vote. When it also returned the current counters they
    /// replace the local ones.
    ///
    /// Returns whether the ticket was still pending.
    pub fn confirm(
        &mut self,
        deals: &mut [Deal],
        ticket: VoteTicket,
        tally: Option<VoteTally>,
    ) -> bool {
        let Some(vote) = self.settle(ticket) else {
            return false;
        };

        if let Some(tally) = tally {
            for deal in deals.iter_mut().filter(|deal| deal.id == vote.deal_id) {
                tally.write_to(deal);
            }

            for pending in self
                .pending
                .values_mut()
                .filter(|pending| pending.deal_id == vote.deal_id)
            {
                pending.previous = None;
            }
        }

        true
    }

    /// The store rejected the vote; undo the speculative increment.
    ///
    /// The counter is restored to its value before the vote when no other vote on the
    /// same deal is pending and the store has not reported counters since. Otherwise
    /// it is decremented by one.
    ///
    /// Returns whether the ticket was still pending.
    pub fn rollback(&mut self, deals: &mut [Deal], ticket: VoteTicket) -> bool {
        let Some(vote) = self.settle(ticket) else {
            return false;
        };

        let others_pending = self.per_deal.contains_key(&vote.deal_id);

        for deal in deals.iter_mut().filter(|deal| deal.id == vote.deal_id) {
            let counter = counter_mut(deal, vote.direction);

            *counter = match vote.previous {
                Some(previous) if !others_pending => previous,
                _ => Numeric::new((counter.or_zero() - Decimal::ONE).max(Decimal::ZERO)),
            };
        }

        true
    }

    /// Replace the local deals with an authoritative fetch.
    ///
    /// Every pending ticket is discarded: fetched counters win. Returns the number of
    /// tickets discarded.
    pub fn reconcile(&mut self, deals: &mut Vec<Deal>, fetched: Vec<Deal>) -> usize {
        let discarded = self.pending.len();

        self.pending.clear();
        self.per_deal.clear();
        *deals = fetched;

        discarded
    }

    /// Whether a ticket is still awaiting confirmation.
    pub fn is_pending(&self, ticket: VoteTicket) -> bool {
        self.pending.contains_key(ticket)
    }

    /// Whether the deal carries a vote the store has not confirmed yet.
    pub fn is_unconfirmed(&self, id: &DealId) -> bool {
        self.per_deal.contains_key(id)
    }

    /// Number of pending votes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no vote is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn settle(&mut self, ticket: VoteTicket) -> Option<PendingVote> {
        let vote = self.pending.remove(ticket)?;

        if let Some(count) = self.per_deal.get_mut(&vote.deal_id) {
            *count -= 1;

            if *count == 0 {
                self.per_deal.remove(&vote.deal_id);
            }
        }

        Some(vote)
    }
}
