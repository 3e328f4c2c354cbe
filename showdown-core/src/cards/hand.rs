use super::card::Card;
use crate::HAND_LEN;
use itertools::Itertools;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(PartialEq, Debug)]
pub enum HandError {
    WrongCardCount(usize),
    DuplicateCard(Card),
}

impl Error for HandError {}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongCardCount(n) => {
                write!(f, "{} cards are required, but {} were given", HAND_LEN, n)
            }
            Self::DuplicateCard(c) => write!(f, "Card {} appears more than once", c),
        }
    }
}

/// Exactly five distinct cards, as dealt to one seat. Order within the hand
/// carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    cards: [Card; HAND_LEN],
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.cards[0], self.cards[1], self.cards[2], self.cards[3], self.cards[4],
        )
    }
}

impl Hand {
    pub fn new(cards: &[Card]) -> Result<Self, HandError> {
        if cards.len() != HAND_LEN {
            return Err(HandError::WrongCardCount(cards.len()));
        }
        for (i, c) in cards.iter().enumerate() {
            if cards[..i].contains(c) {
                return Err(HandError::DuplicateCard(*c));
            }
        }
        Ok(Self {
            cards: [cards[0], cards[1], cards[2], cards[3], cards[4]],
        })
    }

    pub fn cards(&self) -> &[Card; HAND_LEN] {
        &self.cards
    }

    /// The hand's cards sorted strongest first. The evaluator and reporting
    /// both want this view.
    pub fn sorted_desc(&self) -> [Card; HAND_LEN] {
        let mut cards = self.cards;
        cards.sort_unstable();
        cards.reverse();
        cards
    }

    pub fn rank(&self) -> crate::eval::HandRank {
        crate::eval::evaluate(self)
    }
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cards = vec![];
        for mut pair in &s.chars().chunks(2) {
            let r = pair.next().ok_or_else(|| String::from("Failed to parse hand"))?;
            let su = pair.next().ok_or_else(|| String::from("Failed to parse hand"))?;
            cards.push(format!("{}{}", r, su).parse::<Card>()?);
        }
        Hand::new(&cards).map_err(|e| e.to_string())
    }
}
