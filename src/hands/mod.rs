//! A player's board: three fixed-capacity lines plus an unplaced pool.
mod hand;
mod line;

pub use hand::*;
pub use line::*;
