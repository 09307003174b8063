use super::key::InfoKey;
use crate::*;
use std::collections::HashMap;

/// Running totals for one action at one information set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Memory {
    /// Cumulative counterfactual regret.
    pub regret: Utility,
    /// Cumulative strategy probability, for averaging.
    pub weight: Probability,
}

/// Regret and strategy tables keyed by information set.
///
/// Each entry is a vector aligned with the canonically sorted legal actions
/// at that information set, so position `i` always names the same move for
/// a given key.
///
/// - `policy`: current strategy by regret matching
/// - `advice`: long-run average strategy
/// - `accumulate`: fold one visit's regrets and strategy into the totals
#[derive(Debug, Default, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<(InfoKey, Vec<Memory>)>", into = "Vec<(InfoKey, Vec<Memory>)>")]
pub struct Profile {
    encounters: HashMap<InfoKey, Vec<Memory>>,
}

impl Profile {
    pub fn cum_regret(&self, info: &InfoKey, i: usize) -> Utility {
        self.encounters
            .get(info)
            .and_then(|memory| memory.get(i))
            .map(|m| m.regret)
            .unwrap_or_default()
    }
    pub fn cum_weight(&self, info: &InfoKey, i: usize) -> Probability {
        self.encounters
            .get(info)
            .and_then(|memory| memory.get(i))
            .map(|m| m.weight)
            .unwrap_or_default()
    }
    /// Positive regrets normalized to a distribution over `n` actions,
    /// uniform when no action has positive regret.
    pub fn policy(&self, info: &InfoKey, n: usize) -> Vec<Probability> {
        let regrets = (0..n)
            .map(|i| self.cum_regret(info, i).max(0.0))
            .collect::<Vec<_>>();
        Self::normalize(regrets)
    }
    /// Average strategy over all visits, if the information set was ever visited.
    pub fn advice(&self, info: &InfoKey, n: usize) -> Option<Vec<Probability>> {
        self.encounters.get(info).map(|_| {
            let weights = (0..n)
                .map(|i| self.cum_weight(info, i).max(0.0))
                .collect::<Vec<_>>();
            Self::normalize(weights)
        })
    }
    /// Adds `regrets[i]` and `strategy[i]` into the totals for action `i`.
    pub fn accumulate(&mut self, info: InfoKey, regrets: &[Utility], strategy: &[Probability]) {
        let n = regrets.len().max(strategy.len());
        let memory = self.encounters.entry(info).or_default();
        if memory.len() < n {
            memory.resize(n, Memory::default());
        }
        for (i, m) in memory.iter_mut().enumerate() {
            m.regret += regrets.get(i).copied().unwrap_or_default();
            m.weight += strategy.get(i).copied().unwrap_or_default();
        }
    }
    pub fn len(&self) -> usize {
        self.encounters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
    fn normalize(values: Vec<Probability>) -> Vec<Probability> {
        let n = values.len();
        let sum = values.iter().sum::<Probability>();
        match sum > 0.0 {
            true => values.into_iter().map(|v| v / sum).collect(),
            false => vec![1.0 / n as Probability; n],
        }
    }
}

impl From<Vec<(InfoKey, Vec<Memory>)>> for Profile {
    fn from(rows: Vec<(InfoKey, Vec<Memory>)>) -> Self {
        Self {
            encounters: rows.into_iter().collect(),
        }
    }
}
impl From<Profile> for Vec<(InfoKey, Vec<Memory>)> {
    fn from(profile: Profile) -> Self {
        let mut rows = profile.encounters.into_iter().collect::<Vec<_>>();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}
