//! Line ranking, royalties and head-to-head scoring.
//!
//! - [`Category`]: the ten made-hand classes, scored 0 through 9
//! - [`Evaluator`]: ranks one line and prices its royalty
//! - [`Scorer`]: settles two boards against each other and checks fantasy entry
mod category;
mod evaluator;
mod scorer;

pub use category::*;
pub use evaluator::*;
pub use scorer::*;
