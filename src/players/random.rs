use super::Strategy;
use crate::mccfr::*;
use rand::seq::IndexedRandom;

/// Chooses uniformly among legal placements.
#[derive(Debug, Default, Clone, Copy)]
pub struct Random;

impl Strategy for Random {
    fn get_action(&self, state: &GameStateInfo) -> Option<Placement> {
        let ref mut rng = rand::rng();
        ActionSpace::get_valid_actions(state).choose(rng).copied()
    }
    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    #[test]
    fn random_moves_are_legal() {
        let state = GameStateInfo::deal(Card::parse("As Kd Qh Jc Ts").unwrap(), 1, false);
        for _ in 0..50 {
            let action = Random.get_action(&state).unwrap();
            assert!(state.apply(&action).is_some());
        }
    }

    #[test]
    fn nothing_to_place() {
        let state = GameStateInfo::deal(Vec::new(), 1, false);
        assert_eq!(Random.get_action(&state), None);
    }
}
