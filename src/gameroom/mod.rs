//! Live matches behind async boundaries.
//!
//! - [`Registry`]: independent tables keyed by match id
//! - [`Table`]: one [`crate::game::Game`] behind a mutex, with a turn deadline and an event feed
//! - [`Timer`]: the cancellable deadline for the current turn
//!
//! A deadline only ever names the turn it was armed for. Moves and
//! deadlines both go through the table's mutex, so whichever is recorded
//! first wins and the other finds its turn already over.
mod registry;
mod table;
mod timer;

pub use registry::*;
pub use table::*;
pub use timer::*;
