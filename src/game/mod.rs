//! One match of pineapple open-face poker.
//!
//! [`Game`] is the turn, street and fantasy state machine. It is fully
//! synchronous; deadlines and concurrent access live in [`crate::gameroom`].
mod event;
mod game;
mod phase;
mod player;
mod snapshot;

pub use event::*;
pub use game::*;
pub use phase::*;
pub use player::*;
pub use snapshot::*;
