//! Pluggable placement policies for AI seats.
//!
//! Every policy answers the same question through [`Strategy`]: given one
//! player's view, which card goes where next. The self-play agent in
//! [`crate::mccfr`] implements it too.
mod montecarlo;
mod random;
mod rules;
mod strategy;

pub use montecarlo::*;
pub use random::*;
pub use rules::*;
pub use strategy::*;
