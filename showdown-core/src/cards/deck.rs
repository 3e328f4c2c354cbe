use super::card::{Card, ALL_RANKS, ALL_SUITS};
use base64ct::{Base64, Encoding};
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const DECK_LEN: usize = ALL_RANKS.len() * ALL_SUITS.len();
const SEED_LEN: usize = 32;
const ENCODED_SEED_LEN: usize = 4 * ((SEED_LEN + 3 - 1) / 3); // 4 * ceil(SEED_LEN / 3)

#[derive(PartialEq, Debug)]
pub enum DeckError {
    InsufficientCards { wanted: usize, remaining: usize },
    SeedDecodeError(base64ct::Error),
}

impl Error for DeckError {}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::InsufficientCards { wanted, remaining } => {
                write!(f, "Asked for {} cards but only {} remain", wanted, remaining)
            }
            DeckError::SeedDecodeError(e) => write!(f, "{}", e),
        }
    }
}

impl From<base64ct::Error> for DeckError {
    fn from(e: base64ct::Error) -> Self {
        Self::SeedDecodeError(e)
    }
}

/// A single 52-card deck. Created in canonical order; callers shuffle it
/// before dealing. Cards leave the deck via [`Deck::deal`] and never return.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// All 52 unique cards in a fixed canonical order (by suit, then rank).
    pub fn new() -> Self {
        use itertools::Itertools;
        let cards: Vec<Card> = ALL_SUITS
            .iter()
            .cartesian_product(ALL_RANKS.iter())
            .map(|x| Card::new(*x.1, *x.0))
            .collect();
        assert_eq!(cards.len(), DECK_LEN);
        Deck { cards }
    }

    /// Shuffle in-place with a fresh random seed.
    pub fn shuffle(&mut self) {
        self.seeded_shuffle(&DeckSeed::default());
    }

    /// Shuffle in-place. The same seed over the same deck contents always
    /// produces the same order.
    pub fn seeded_shuffle(&mut self, seed: &DeckSeed) {
        let mut rng = ChaChaRng::from_seed(seed.0);
        self.cards.shuffle(&mut rng);
    }

    /// Remove and return the first `n` cards in the current order.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::InsufficientCards {
                wanted: n,
                remaining: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Seed for a deck shuffle. Round-trips through base64 so a printed seed is
/// enough to replay a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSeed([u8; SEED_LEN]);

impl DeckSeed {
    pub const fn new(b: [u8; SEED_LEN]) -> Self {
        Self(b)
    }

    /// Draw a seed from an existing RNG stream, e.g. the simulator's own.
    pub fn from_rng(rng: &mut impl RngCore) -> Self {
        let mut b = [0u8; SEED_LEN];
        rng.fill_bytes(&mut b);
        Self(b)
    }

    pub(crate) fn bytes(&self) -> [u8; SEED_LEN] {
        self.0
    }
}

impl Default for DeckSeed {
    fn default() -> Self {
        Self(crate::cards::fill_random())
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b = [0u8; ENCODED_SEED_LEN];
        Base64::encode(&self.0, &mut b).unwrap();
        write!(f, "{}", String::from_utf8_lossy(&b))
    }
}

impl FromStr for DeckSeed {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut b: [u8; SEED_LEN] = [0; SEED_LEN];
        Base64::decode(s, &mut b)?;
        Ok(DeckSeed(b))
    }
}
