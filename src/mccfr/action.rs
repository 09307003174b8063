use crate::cards::Card;
use crate::hands::Line;

/// Put `card` from the pool into `line` at insertion `index`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub card: Card,
    pub line: Line,
    pub index: usize,
}

impl Placement {
    pub fn new(card: Card, line: Line, index: usize) -> Self {
        Self { card, line, index }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} -> {}[{}]", self.card, self.line, self.index)
    }
}

/// A move submitted by a seat.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Place a pool card on a line.
    Place(Placement),
    /// Take a placed card back into the pool.
    Remove { line: Line, index: usize },
}

impl From<Placement> for Action {
    fn from(placement: Placement) -> Self {
        Action::Place(placement)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Place(placement) => write!(f, "place {}", placement),
            Action::Remove { line, index } => write!(f, "remove {}[{}]", line, index),
        }
    }
}
