use super::info::GameStateInfo;
use crate::cards::Card;
use crate::hands::Line;

/// Canonical signature of a decision point, keying the regret tables.
///
/// Zones are stored as 52-bit card sets, so the order cards were inserted
/// into a line does not split otherwise identical states.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct InfoKey {
    street: u8,
    fantasy: bool,
    pool: u64,
    top: u64,
    middle: u64,
    bottom: u64,
}

/// How a state is reduced to an [`InfoKey`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum KeyScheme {
    /// Exact card sets per zone.
    #[default]
    Cards,
    /// Street plus zone sizes only. Distinct boards with equal sizes share
    /// one table entry; kept for comparison runs against that behaviour.
    Counts,
}

impl KeyScheme {
    pub fn key(&self, state: &GameStateInfo) -> InfoKey {
        match self {
            KeyScheme::Cards => InfoKey {
                street: state.street() as u8,
                fantasy: state.is_fantasy(),
                pool: Self::set(state.pool()),
                top: Self::set(state.line(Line::Top)),
                middle: Self::set(state.line(Line::Middle)),
                bottom: Self::set(state.line(Line::Bottom)),
            },
            KeyScheme::Counts => InfoKey {
                street: state.street() as u8,
                fantasy: false,
                pool: state.pool().len() as u64,
                top: state.line(Line::Top).len() as u64,
                middle: state.line(Line::Middle).len() as u64,
                bottom: state.line(Line::Bottom).len() as u64,
            },
        }
    }
    fn set(cards: &[Card]) -> u64 {
        cards.iter().map(|c| u64::from(*c)).fold(0, |a, b| a | b)
    }
}
