use crate::mccfr::*;

/// Trait for anything that can choose a placement for an AI seat.
///
/// Implementations only read the [`GameStateInfo`]; simulated moves are made
/// on copies. Returning `None` means there is nothing legal to do.
pub trait Strategy: Send + Sync {
    fn get_action(&self, state: &GameStateInfo) -> Option<Placement>;
    /// Short label for logs and the command line.
    fn name(&self) -> &'static str;
}

/// Selects a strategy by its command-line name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "server", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    Random,
    Rules,
    #[cfg_attr(feature = "server", value(name = "montecarlo"))]
    MonteCarlo,
}

impl Opponent {
    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self {
            Opponent::Random => Box::new(super::Random),
            Opponent::Rules => Box::new(super::RuleBased),
            Opponent::MonteCarlo => Box::new(super::MonteCarlo::default()),
        }
    }
}

impl TryFrom<&str> for Opponent {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Opponent::Random),
            "rules" | "rule" | "rulebased" => Ok(Opponent::Rules),
            "montecarlo" | "mc" | "mcts" => Ok(Opponent::MonteCarlo),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}
