pub mod cards;
pub mod eval;
pub mod showdown;
pub mod sim;

pub use cards::{card, deck, hand};

/// Players seated at the table. One deal, one showdown, no more and no less.
pub const NUM_SEATS: usize = 3;
/// Cards per dealt hand.
pub const HAND_LEN: usize = 5;

pub type SeatIdx = usize;
