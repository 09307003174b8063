//! Regret-matching self-play for placement decisions.
//!
//! ## Decision interface
//!
//! - [`Placement`] / [`Action`]: one legal move
//! - [`ActionSpace`]: legal-move enumeration and the 52×13 one-hot action encoding
//! - [`GameStateInfo`]: frozen per-decision snapshot with its fixed-length encoding
//!
//! ## Learning
//!
//! - [`InfoKey`] / [`KeyScheme`]: canonical signature keying the regret tables
//! - [`Profile`]: cumulative regret and strategy weight per information set
//! - [`PolicyNetwork`]: MLP mapping a state encoding to a distribution over placements
//! - [`Agent`]: ties the two together for training and live play
//!
//! ## Persistence
//!
//! - [`Checkpoint`]: everything needed to resume an agent
//! - [`Persistence`]: the collaborator that stores checkpoints; [`FileStore`] and [`MemoryStore`]
mod action;
mod agent;
mod checkpoint;
mod info;
mod key;
mod network;
mod profile;
mod space;

pub use action::*;
pub use agent::*;
pub use checkpoint::*;
pub use info::*;
pub use key::*;
pub use network::*;
pub use profile::*;
pub use space::*;
