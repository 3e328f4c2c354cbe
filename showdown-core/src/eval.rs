use crate::cards::card::{Card, Rank};
use crate::cards::hand::{Hand, HandError};
use crate::HAND_LEN;
use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;

/// The nine 5-card hand categories, weakest first so the derived order is the
/// poker order.
#[derive(
    Enum, Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

pub const ALL_HAND_CATEGORIES: [HandCategory; 9] = [
    HandCategory::StraightFlush,
    HandCategory::FourOfAKind,
    HandCategory::FullHouse,
    HandCategory::Flush,
    HandCategory::Straight,
    HandCategory::ThreeOfAKind,
    HandCategory::TwoPair,
    HandCategory::OnePair,
    HandCategory::HighCard,
];

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighCard => write!(f, "High Card"),
            Self::OnePair => write!(f, "One Pair"),
            Self::TwoPair => write!(f, "Two Pair"),
            Self::ThreeOfAKind => write!(f, "Three of a Kind"),
            Self::Straight => write!(f, "Straight"),
            Self::Flush => write!(f, "Flush"),
            Self::FullHouse => write!(f, "Full House"),
            Self::FourOfAKind => write!(f, "Four of a Kind"),
            Self::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// A fully evaluated hand: category plus that category's tie-break ranks.
/// Variant payloads are ordered most- to least-significant, so two ranks of
/// the same category compare by their payloads left to right.
///
/// The ace-low straight carries `Rank::Five`; the ace never ranks high and
/// low at once.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandRank {
    HighCard([Rank; 5]),
    OnePair(Rank, [Rank; 3]),
    TwoPair(Rank, Rank, Rank),
    ThreeOfAKind(Rank, [Rank; 2]),
    Straight(Rank),
    Flush([Rank; 5]),
    FullHouse(Rank, Rank),
    FourOfAKind(Rank, Rank),
    StraightFlush(Rank),
}

impl HandRank {
    pub fn category(&self) -> HandCategory {
        match self {
            Self::HighCard(..) => HandCategory::HighCard,
            Self::OnePair(..) => HandCategory::OnePair,
            Self::TwoPair(..) => HandCategory::TwoPair,
            Self::ThreeOfAKind(..) => HandCategory::ThreeOfAKind,
            Self::Straight(..) => HandCategory::Straight,
            Self::Flush(..) => HandCategory::Flush,
            Self::FullHouse(..) => HandCategory::FullHouse,
            Self::FourOfAKind(..) => HandCategory::FourOfAKind,
            Self::StraightFlush(..) => HandCategory::StraightFlush,
        }
    }

    /// The tie-break ranks, most significant first. Reporting code renders
    /// these; comparison goes through `Ord` instead.
    pub fn tiebreaks(&self) -> Vec<Rank> {
        match *self {
            Self::HighCard(ks) | Self::Flush(ks) => ks.to_vec(),
            Self::OnePair(p, ks) => vec![p, ks[0], ks[1], ks[2]],
            Self::TwoPair(hi, lo, k) => vec![hi, lo, k],
            Self::ThreeOfAKind(t, ks) => vec![t, ks[0], ks[1]],
            Self::Straight(h) | Self::StraightFlush(h) => vec![h],
            Self::FullHouse(t, p) => vec![t, p],
            Self::FourOfAKind(q, k) => vec![q, k],
        }
    }
}

/// Category first; equal categories fall through to the tie-break sequence,
/// element-wise. Equal all the way down is a genuine tie.
impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category()
            .cmp(&other.category())
            .then_with(|| self.tiebreaks().cmp(&other.tiebreaks()))
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

/// Classify a 5-card hand. Pure and total: every hand lands in exactly one
/// category, strongest applicable category wins.
pub fn evaluate(hand: &Hand) -> HandRank {
    let cards = hand.sorted_desc();
    let ranks = [
        cards[0].rank(),
        cards[1].rank(),
        cards[2].rank(),
        cards[3].rank(),
        cards[4].rank(),
    ];
    let flush = cards.iter().map(|c| c.suit()).all_equal();
    let straight = straight_high(&ranks);

    if flush {
        if let Some(high) = straight {
            return HandRank::StraightFlush(high);
        }
    }
    // A straight or flush needs 5 distinct ranks, so from here the rank
    // multiplicities and the straight/flush checks cannot both hit.
    match rank_groups(&ranks).as_slice() {
        [(4, quad), (1, kick)] => HandRank::FourOfAKind(*quad, *kick),
        [(3, trip), (2, pair)] => HandRank::FullHouse(*trip, *pair),
        [(3, trip), (1, k1), (1, k2)] => HandRank::ThreeOfAKind(*trip, [*k1, *k2]),
        [(2, hi), (2, lo), (1, kick)] => HandRank::TwoPair(*hi, *lo, *kick),
        [(2, pair), (1, k1), (1, k2), (1, k3)] => HandRank::OnePair(*pair, [*k1, *k2, *k3]),
        _ => {
            if flush {
                HandRank::Flush(ranks)
            } else if let Some(high) = straight {
                HandRank::Straight(high)
            } else {
                HandRank::HighCard(ranks)
            }
        }
    }
}

/// Checked entry point for callers holding a raw card slice rather than an
/// already-validated [`Hand`].
pub fn evaluate_cards(cards: &[Card]) -> Result<HandRank, HandError> {
    Ok(evaluate(&Hand::new(cards)?))
}

/// The high card of the straight these ranks form, if any. Requires the ranks
/// sorted descending. A2345 appears as A5432 and ranks as five-high.
fn straight_high(ranks: &[Rank; HAND_LEN]) -> Option<Rank> {
    use Rank::*;
    if *ranks == [Ace, Five, Four, Three, Two] {
        return Some(Five);
    }
    for n in 0..HAND_LEN - 1 {
        if ranks[n].value() != ranks[n + 1].value() + 1 {
            return None;
        }
    }
    Some(ranks[0])
}

/// Rank multiplicities as (count, rank) pairs, ordered count-then-rank
/// descending. The pattern of counts is what picks the category.
fn rank_groups(ranks: &[Rank; HAND_LEN]) -> Vec<(u8, Rank)> {
    let mut counts: EnumMap<Rank, u8> = EnumMap::default();
    for r in ranks {
        counts[*r] += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(r, n)| (n, r))
        .sorted_unstable_by_key(|&(n, r)| (Reverse(n), Reverse(r)))
        .collect()
}


#[cfg(test)]
mod test_order {
    use super::*;

    fn rank_of(s: &'static str) -> HandRank {
        s.parse::<Hand>().unwrap().rank()
    }

    fn win_lose(s1: &'static str, s2: &'static str, hc: HandCategory) {
        let r1 = rank_of(s1);
        let r2 = rank_of(s2);
        assert_eq!(r1.category(), hc);
        assert_eq!(r2.category(), hc);
        assert!(r1 > r2, "{} should beat {}", s1, s2);
        assert!(r2 < r1, "{} should lose to {}", s2, s1);
    }

    fn tie(s1: &'static str, s2: &'static str, hc: HandCategory) {
        let r1 = rank_of(s1);
        let r2 = rank_of(s2);
        assert_eq!(r1.category(), hc);
        assert_eq!(r2.category(), hc);
        assert_eq!(r1, r2, "{} should tie {}", s1, s2);
        assert_eq!(r1.cmp(&r2), Ordering::Equal);
    }

    // Weakest and strongest hand of each category, weakest category first.
    // Consecutive entries prove category precedence: the floor of each
    // category still beats the ceiling of the one below.
    const CATEGORY_SPAN: [(&str, &str, HandCategory); 9] = [
        ("7c5d4h3s2c", "AcKdQhJs9c", HandCategory::HighCard),
        ("2c2d5h4s3c", "AcAdKhQsJc", HandCategory::OnePair),
        ("3c3d2h2s4c", "AcAdKhKsQc", HandCategory::TwoPair),
        ("2c2d2h4s3c", "AcAdAhKsQc", HandCategory::ThreeOfAKind),
        ("Ac2d3h4s5c", "AcKdQhJsTc", HandCategory::Straight),
        ("7c5c4c3c2c", "AcKcQcJc9c", HandCategory::Flush),
        ("2c2d2h3s3c", "AcAdAhKsKc", HandCategory::FullHouse),
        ("2c2d2h2s3c", "AcAdAhAsKc", HandCategory::FourOfAKind),
        ("5c4c3c2cAc", "AcKcQcJcTc", HandCategory::StraightFlush),
    ];

    #[test]
    fn category_beats_any_lower_category() {
        for window in CATEGORY_SPAN.windows(2) {
            let (_, strongest_below, _) = window[0];
            let (weakest_above, _, _) = window[1];
            assert!(
                rank_of(weakest_above) > rank_of(strongest_below),
                "{} should beat {}",
                weakest_above,
                strongest_below
            );
        }
    }

    #[test]
    fn span_endpoints_classify() {
        for (weakest, strongest, hc) in CATEGORY_SPAN {
            assert_eq!(rank_of(weakest).category(), hc);
            assert_eq!(rank_of(strongest).category(), hc);
            assert!(rank_of(strongest) > rank_of(weakest));
        }
    }

    #[test]
    fn straight_flush_order() {
        tie("KcQcJcTc9c", "KdQdJdTd9d", HandCategory::StraightFlush);
        tie("5c4c3c2cAc", "5d4d3d2dAd", HandCategory::StraightFlush);
        win_lose("KcQcJcTc9c", "QdJdTd9d8d", HandCategory::StraightFlush);
        win_lose("6c5c4c3c2c", "5d4d3d2dAd", HandCategory::StraightFlush);
        win_lose("AcKcQcJcTc", "5d4d3d2dAd", HandCategory::StraightFlush);
    }

    #[test]
    fn quads_order() {
        // Identical quads can't come off one deck, but the comparison logic
        // doesn't know that
        tie("2c2d2h2s3c", "2c2d2h2s3d", HandCategory::FourOfAKind);
        win_lose("4c4d4h4s3c", "3c3d3h3s2d", HandCategory::FourOfAKind);
        win_lose("4c4d4h4s5c", "4c4d4h4s3c", HandCategory::FourOfAKind);
    }

    #[test]
    fn full_house_order() {
        tie("AcAdAhKcKd", "AdAhAsKhKs", HandCategory::FullHouse);
        win_lose("4c4d4h3s3c", "3c3d3h2s2d", HandCategory::FullHouse);
        win_lose("4c4d4h5s5c", "4c4d4h3s3c", HandCategory::FullHouse);
    }

    #[test]
    fn flush_order() {
        tie("AsKsQsJs2s", "AdKdQdJd2d", HandCategory::Flush);
        win_lose("AsKsQsJs3s", "AdKdQdJd2d", HandCategory::Flush);
        win_lose("As6s5s4s3s", "Kd7d6d5d4d", HandCategory::Flush);
    }

    #[test]
    fn straight_order() {
        tie("AsKsQsJsTd", "AcKcQcJcTs", HandCategory::Straight);
        tie("Ah2c3s4d5h", "Ad2s3h4c5d", HandCategory::Straight);
        win_lose("AsKsQsJsTd", "KcQcJcTc9s", HandCategory::Straight);
        win_lose("6s5s4s3s2d", "Ac2c3c4c5s", HandCategory::Straight);
    }

    #[test]
    fn set_order() {
        tie("AcAdAh4s3d", "AsAcAd4c3s", HandCategory::ThreeOfAKind);
        win_lose("AcAdAh4s3d", "AsAcAd3c2s", HandCategory::ThreeOfAKind);
        win_lose("9c9d9hTsJd", "9s9c9d2c3s", HandCategory::ThreeOfAKind);
        win_lose("9c9d9h6s3d", "9s9c9d3c2s", HandCategory::ThreeOfAKind);
    }

    #[test]
    fn two_pair_order() {
        tie("AsAdKsKdTd", "AcAdKcKdTs", HandCategory::TwoPair);
        win_lose("AsAdKsKdJd", "AcAdKcKdTs", HandCategory::TwoPair);
        win_lose("AsAdKsKdJd", "AcAdQcQdKs", HandCategory::TwoPair);
    }

    #[test]
    fn pair_order() {
        tie("AcAd5h4s3d", "AcAd5s4c3h", HandCategory::OnePair);
        win_lose("AcAdKh4s3d", "AcAd5h4s3d", HandCategory::OnePair);
        win_lose("AcAd5h4s3d", "AcAd5h4s2d", HandCategory::OnePair);
        win_lose("2c2d6h4s3d", "2c2d5h4s3d", HandCategory::OnePair);
    }

    #[test]
    fn high_card_order() {
        tie("KcQdJhTs5c", "KdQhJsTc5d", HandCategory::HighCard);
        win_lose("Ac7d6h5s4d", "Ac6d5h4s3d", HandCategory::HighCard);
        win_lose("AcKdQhJs7d", "AcKdQhJs3d", HandCategory::HighCard);
        win_lose("8c7d6h4s3d", "7c6d5h3s2d", HandCategory::HighCard);
    }

    #[test]
    fn tiebreaks_expose_the_key() {
        use Rank::*;
        assert_eq!(
            rank_of("AcAdAhKsKc").tiebreaks(),
            vec![Ace, King] // trips rank, then pair rank
        );
        assert_eq!(
            rank_of("2c2d6h4s3d").tiebreaks(),
            vec![Two, Six, Four, Three]
        );
        assert_eq!(
            rank_of("KcQdJhTs5c").tiebreaks(),
            vec![King, Queen, Jack, Ten, Five]
        );
    }

    #[test]
    fn serde_round_trip() {
        let r = rank_of("AcAdAhKsKc");
        let json = serde_json::to_string(&r).unwrap();
        let back: HandRank = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
