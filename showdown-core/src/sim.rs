use crate::cards::deck::{Deck, DeckError, DeckSeed};
use crate::cards::hand::Hand;
use crate::eval::{evaluate, HandCategory};
use crate::showdown::{showdown, Outcome};
use crate::{SeatIdx, HAND_LEN, NUM_SEATS};
use enum_map::EnumMap;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a tied round credits the per-seat win counters. Either way the tie
/// itself is counted; fractional split credit is a rendering concern and
/// lives with the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiePolicy {
    /// Every tied seat is credited a full win.
    CountAll,
    /// Ties credit nobody.
    NoCredit,
}

impl Default for TiePolicy {
    fn default() -> Self {
        Self::CountAll
    }
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountAll => write!(f, "count-all"),
            Self::NoCredit => write!(f, "no-credit"),
        }
    }
}

impl FromStr for TiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count-all" => Ok(Self::CountAll),
            "no-credit" => Ok(Self::NoCredit),
            _ => Err(format!("Unknown tie policy {:?}", s)),
        }
    }
}

/// One finished round: the seed that shuffled the deck, what each seat was
/// dealt, and how the showdown went.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    seed: DeckSeed,
    hands: [Hand; NUM_SEATS],
    outcome: Outcome,
}

impl RoundOutcome {
    /// Seed that produced this round's shuffle; enough to replay the deal.
    pub fn seed(&self) -> &DeckSeed {
        &self.seed
    }

    pub fn hands(&self) -> &[Hand; NUM_SEATS] {
        &self.hands
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// Counters accumulated across rounds: how often each category showed up
/// (over all 3n evaluated hands), wins per seat, and tie rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    rounds: u64,
    categories: EnumMap<HandCategory, u64>,
    wins: [u64; NUM_SEATS],
    ties: u64,
}

impl AggregateStats {
    pub(crate) fn record(&mut self, outcome: &Outcome, policy: TiePolicy) {
        self.rounds += 1;
        for rank in outcome.ranks() {
            self.categories[rank.category()] += 1;
        }
        if outcome.is_tie() {
            self.ties += 1;
        }
        if !outcome.is_tie() || policy == TiePolicy::CountAll {
            for seat in outcome.winners() {
                self.wins[*seat] += 1;
            }
        }
    }

    /// Fold another set of counters into this one, e.g. per-worker partials
    /// from a parallelized run. Only meaningful when both sides counted ties
    /// the same way.
    pub fn merge(&mut self, other: &AggregateStats) {
        self.rounds += other.rounds;
        for (cat, n) in other.categories.iter() {
            self.categories[cat] += *n;
        }
        for (seat, n) in other.wins.iter().enumerate() {
            self.wins[seat] += n;
        }
        self.ties += other.ties;
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn category_count(&self, cat: HandCategory) -> u64 {
        self.categories[cat]
    }

    pub fn hands_evaluated(&self) -> u64 {
        self.categories.values().sum()
    }

    pub fn win_count(&self, seat: SeatIdx) -> u64 {
        self.wins[seat]
    }

    pub fn ties(&self) -> u64 {
        self.ties
    }
}

/// Runs rounds and owns the counters. Each round is independent: a fresh
/// deck, a fresh shuffle, three hands, one showdown. The simulator's own
/// ChaCha stream hands out per-round deck seeds, so a seeded simulator
/// replays an entire run exactly.
pub struct Simulator {
    rng: ChaChaRng,
    tie_policy: TiePolicy,
    stats: AggregateStats,
}

impl Simulator {
    /// Independently random rounds.
    pub fn new(tie_policy: TiePolicy) -> Self {
        Self::seeded(DeckSeed::default(), tie_policy)
    }

    /// Fully reproducible rounds from a master seed.
    pub fn seeded(seed: DeckSeed, tie_policy: TiePolicy) -> Self {
        Simulator {
            rng: ChaChaRng::from_seed(seed.bytes()),
            tie_policy,
            stats: AggregateStats::default(),
        }
    }

    pub fn tie_policy(&self) -> TiePolicy {
        self.tie_policy
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Play one round and fold it into the stats. The deck starts with all
    /// 52 cards, so three five-card deals cannot actually run dry; the error
    /// arm is the deal contract, not an expected path.
    pub fn run_round(&mut self) -> Result<RoundOutcome, DeckError> {
        let seed = DeckSeed::from_rng(&mut self.rng);
        let mut deck = Deck::new();
        deck.seeded_shuffle(&seed);
        let hands = [
            deal_hand(&mut deck)?,
            deal_hand(&mut deck)?,
            deal_hand(&mut deck)?,
        ];
        let outcome = showdown([
            evaluate(&hands[0]),
            evaluate(&hands[1]),
            evaluate(&hands[2]),
        ]);
        self.stats.record(&outcome, self.tie_policy);
        Ok(RoundOutcome {
            seed,
            hands,
            outcome,
        })
    }

    /// Play `n` independent rounds. `n = 0` is fine and changes nothing.
    pub fn run_many(&mut self, n: u64) -> Result<&AggregateStats, DeckError> {
        for _ in 0..n {
            self.run_round()?;
        }
        Ok(&self.stats)
    }
}

fn deal_hand(deck: &mut Deck) -> Result<Hand, DeckError> {
    let cards = deck.deal(HAND_LEN)?;
    Ok(Hand::new(&cards).expect("A single deck never deals duplicate cards"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: DeckSeed = DeckSeed::new([3; 32]);

    #[test]
    fn run_many_zero() {
        let mut sim = Simulator::new(TiePolicy::default());
        let stats = sim.run_many(0).unwrap();
        assert_eq!(stats.rounds(), 0);
        assert_eq!(stats.hands_evaluated(), 0);
        assert_eq!(stats.ties(), 0);
        for seat in 0..NUM_SEATS {
            assert_eq!(stats.win_count(seat), 0);
        }
    }

    #[test]
    fn run_many_counts_add_up() {
        let mut sim = Simulator::new(TiePolicy::CountAll);
        let stats = sim.run_many(1000).unwrap();
        assert_eq!(stats.rounds(), 1000);
        assert_eq!(stats.hands_evaluated(), 3000);
        // Every round credits at least one winner; a tie can add at most two
        // extra credits
        let wins: u64 = (0..NUM_SEATS).map(|s| stats.win_count(s)).sum();
        assert!(wins >= 1000);
        assert!(wins <= 1000 + 2 * stats.ties());
    }

    #[test]
    fn no_credit_policy_skips_ties() {
        let mut sim = Simulator::seeded(SEED, TiePolicy::NoCredit);
        let stats = sim.run_many(500).unwrap();
        let wins: u64 = (0..NUM_SEATS).map(|s| stats.win_count(s)).sum();
        assert_eq!(wins, stats.rounds() - stats.ties());
    }

    #[test]
    fn seeded_runs_reproduce() {
        let mut sim1 = Simulator::seeded(SEED, TiePolicy::CountAll);
        let mut sim2 = Simulator::seeded(SEED, TiePolicy::CountAll);
        let r1 = sim1.run_round().unwrap();
        let r2 = sim2.run_round().unwrap();
        assert_eq!(r1, r2);
        sim1.run_many(49).unwrap();
        sim2.run_many(49).unwrap();
        assert_eq!(sim1.stats(), sim2.stats());
    }

    #[test]
    fn rounds_are_not_identical() {
        let mut sim = Simulator::seeded(SEED, TiePolicy::CountAll);
        let r1 = sim.run_round().unwrap();
        let r2 = sim.run_round().unwrap();
        assert_ne!(r1.seed(), r2.seed());
        assert_ne!(r1.hands(), r2.hands());
    }

    #[test]
    fn round_hands_are_disjoint() {
        let mut sim = Simulator::new(TiePolicy::CountAll);
        let round = sim.run_round().unwrap();
        let mut seen = std::collections::HashSet::new();
        for hand in round.hands() {
            for c in hand.cards() {
                assert!(seen.insert(c.to_string()));
            }
        }
        assert_eq!(seen.len(), NUM_SEATS * HAND_LEN);
    }

    #[test]
    fn merge_sums_counters() {
        let mut sim1 = Simulator::seeded(DeckSeed::new([4; 32]), TiePolicy::CountAll);
        let mut sim2 = Simulator::seeded(DeckSeed::new([5; 32]), TiePolicy::CountAll);
        sim1.run_many(10).unwrap();
        sim2.run_many(20).unwrap();
        let mut merged = sim1.stats().clone();
        merged.merge(sim2.stats());
        assert_eq!(merged.rounds(), 30);
        assert_eq!(merged.hands_evaluated(), 90);
        assert_eq!(merged.ties(), sim1.stats().ties() + sim2.stats().ties());
        for seat in 0..NUM_SEATS {
            assert_eq!(
                merged.win_count(seat),
                sim1.stats().win_count(seat) + sim2.stats().win_count(seat)
            );
        }
    }

    #[test]
    fn tie_policies_differ_only_on_ties() {
        // Three-way straight tie
        let tied = showdown([
            "AsKsQsJsTd".parse::<Hand>().unwrap().rank(),
            "AcKcQcJcTs".parse::<Hand>().unwrap().rank(),
            "AdKdQdJdTh".parse::<Hand>().unwrap().rank(),
        ]);
        let mut all = AggregateStats::default();
        let mut none = AggregateStats::default();
        all.record(&tied, TiePolicy::CountAll);
        none.record(&tied, TiePolicy::NoCredit);
        assert_eq!(all.ties(), 1);
        assert_eq!(none.ties(), 1);
        assert_eq!((0..NUM_SEATS).map(|s| all.win_count(s)).sum::<u64>(), 3);
        assert_eq!((0..NUM_SEATS).map(|s| none.win_count(s)).sum::<u64>(), 0);
    }

    #[test]
    fn stats_serialize() {
        let mut sim = Simulator::seeded(SEED, TiePolicy::CountAll);
        sim.run_many(5).unwrap();
        let json = serde_json::to_string(sim.stats()).unwrap();
        let back: AggregateStats = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, sim.stats());
    }

    #[test]
    fn tie_policy_from_str() {
        assert_eq!("count-all".parse::<TiePolicy>(), Ok(TiePolicy::CountAll));
        assert_eq!("no-credit".parse::<TiePolicy>(), Ok(TiePolicy::NoCredit));
        assert!("split".parse::<TiePolicy>().is_err());
    }
}
