use super::Strategy;
use crate::evaluation::*;
use crate::hands::*;
use crate::mccfr::*;
use crate::*;
use rand::seq::IndexedRandom;
use rayon::prelude::*;

/// Flat Monte Carlo search.
///
/// Every legal placement is tried on a copy of the state, then finished
/// with uniformly random placements `simulations` times. Finished boards
/// are scored by line strength, weighting lower lines more heavily, and
/// the placement with the best average is played. Candidates are simulated
/// in parallel.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarlo {
    simulations: usize,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self::new(SIMULATION_COUNT)
    }
}

impl MonteCarlo {
    pub fn new(simulations: usize) -> Self {
        Self {
            simulations: simulations.max(1),
        }
    }
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Mean playout value of `placement` from `state`.
    pub fn simulate(&self, state: &GameStateInfo, placement: &Placement) -> Utility {
        let Some(next) = state.apply(placement) else {
            return Utility::MIN;
        };
        let ref mut rng = rand::rng();
        let total = (0..self.simulations)
            .map(|_| {
                let mut hand = next.hand().clone();
                while !hand.is_complete() {
                    match ActionSpace::enumerate(&hand).choose(rng).copied() {
                        Some(p) => hand.place_card(p.card, p.line, p.index),
                        None => break,
                    };
                }
                Self::value(&hand)
            })
            .sum::<Utility>();
        total / self.simulations as Utility
    }

    /// Line strengths weighted 1.0 / 1.5 / 2.0 from top to bottom.
    pub fn value(hand: &Hand) -> Utility {
        let [top, middle, bottom] = Evaluator::line_scores(hand);
        top as Utility * 1.0 + middle as Utility * 1.5 + bottom as Utility * 2.0
    }
}

impl Strategy for MonteCarlo {
    fn get_action(&self, state: &GameStateInfo) -> Option<Placement> {
        ActionSpace::get_valid_actions(state)
            .into_par_iter()
            .map(|a| (self.simulate(state, &a), a))
            .collect::<Vec<_>>()
            .into_iter()
            .fold(None, |best: Option<(Utility, Placement)>, (v, a)| match best {
                Some((b, _)) if b >= v => best,
                _ => Some((v, a)),
            })
            .map(|(_, a)| a)
    }
    fn name(&self) -> &'static str {
        "montecarlo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    #[test]
    fn weighted_line_value() {
        let hand = Hand::from_lines(
            Card::parse("2c 3d 4h").unwrap(),
            Card::parse("7c 7d Kh Ks 2d").unwrap(),
            Card::parse("9c 9d 9h 2s 2h").unwrap(),
        );
        assert_eq!(MonteCarlo::value(&hand), 0.0 + 2.0 * 1.5 + 6.0 * 2.0);
    }

    #[test]
    fn completes_the_obvious_full_house() {
        let mut hand = Hand::from_lines(
            Card::parse("2c 3d 4h").unwrap(),
            Card::parse("7c 7d Kh Ks 5d").unwrap(),
            Card::parse("9c 9d 9h 2s").unwrap(),
        );
        hand.add_cards(Card::parse("2h").unwrap());
        let state = GameStateInfo::new(hand, Vec::new(), Vec::new(), 5, false);
        let action = MonteCarlo::new(4).get_action(&state).unwrap();
        assert_eq!(action.line, Line::Bottom);
        assert_eq!(action.card, Card::try_from("2h").unwrap());
    }

    #[test]
    fn legal_from_an_open_board() {
        let state = GameStateInfo::deal(Card::parse("As Kd Qh").unwrap(), 2, false);
        let action = MonteCarlo::new(3).get_action(&state).unwrap();
        assert!(state.apply(&action).is_some());
        assert_eq!(MonteCarlo::default().simulations(), SIMULATION_COUNT);
    }
}
