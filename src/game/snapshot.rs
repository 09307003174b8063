use super::*;
use crate::*;

/// Full serializable view of a match.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub street: Street,
    pub active: Option<ID<Player>>,
    pub turn: u64,
    pub fantasy: Vec<ID<Player>>,
    pub players: Vec<Player>,
}

impl Snapshot {
    pub fn player(&self, id: ID<Player>) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }
}
