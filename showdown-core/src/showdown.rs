use crate::eval::HandRank;
use crate::{SeatIdx, NUM_SEATS};
use serde::{Deserialize, Serialize};

/// The result of comparing all seats' ranks: who won, and with what. Ties
/// keep every tied seat in the winner set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    ranks: [HandRank; NUM_SEATS],
    winners: Vec<SeatIdx>,
}

/// Determine the winner(s) among the three seats. Total: any three ranks
/// produce an outcome, with one, two, or three winners.
pub fn showdown(ranks: [HandRank; NUM_SEATS]) -> Outcome {
    let best = *ranks.iter().max().expect("NUM_SEATS is nonzero");
    let winners = ranks
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == best)
        .map(|(seat, _)| seat)
        .collect();
    Outcome { ranks, winners }
}

impl Outcome {
    pub fn ranks(&self) -> &[HandRank; NUM_SEATS] {
        &self.ranks
    }

    /// Seats holding the best rank, ascending seat order, never empty.
    pub fn winners(&self) -> &[SeatIdx] {
        &self.winners
    }

    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }

    pub fn best(&self) -> &HandRank {
        &self.ranks[self.winners[0]]
    }
}
