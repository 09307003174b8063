//! The 52-card model.
//!
//! - [`Rank`] and [`Suit`] are the two card components
//! - [`Card`] packs both into one byte, `rank * 4 + suit`
//! - [`Deck`] is the shuffled undealt pool for one match
mod card;
mod deck;
mod rank;
mod suit;

pub use card::*;
pub use deck::*;
pub use rank::*;
pub use suit::*;
