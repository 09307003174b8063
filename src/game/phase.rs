/// Lifecycle of a match.
///
/// `Waiting -> Dealing -> Playing -> Scoring -> Finished`, with a detour
/// through `Fantasy` (and a second `Scoring`) when any board qualifies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Waiting,
    Dealing,
    Playing,
    Fantasy,
    Scoring,
    Finished,
}

impl Phase {
    /// Whether players may place cards.
    pub fn is_live(&self) -> bool {
        matches!(self, Phase::Playing | Phase::Fantasy)
    }
    /// Whether seats may change.
    pub fn is_open(&self) -> bool {
        matches!(self, Phase::Waiting | Phase::Finished)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Phase::Waiting => write!(f, "waiting"),
            Phase::Dealing => write!(f, "dealing"),
            Phase::Playing => write!(f, "playing"),
            Phase::Fantasy => write!(f, "fantasy"),
            Phase::Scoring => write!(f, "scoring"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}
