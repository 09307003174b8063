use super::action::Placement;
use super::info::GameStateInfo;
use crate::cards::Card;
use crate::hands::*;
use crate::*;

/// Legal-move enumeration and the fixed 52×13 action encoding.
///
/// Each card owns 13 consecutive slots: 3 top insertion indices, then 5
/// middle, then 5 bottom. A placement maps to `card * 13 + line offset + index`.
pub struct ActionSpace;

impl ActionSpace {
    /// Every pool card × every line with room × every insertion index `0..=len`.
    pub fn get_valid_actions(state: &GameStateInfo) -> Vec<Placement> {
        Self::enumerate(state.hand())
    }
    pub fn enumerate(hand: &Hand) -> Vec<Placement> {
        let mut actions = Vec::new();
        for card in hand.pool() {
            for line in Line::all() {
                let len = hand.line(line).len();
                if len < line.capacity() {
                    actions.extend((0..=len).map(|i| Placement::new(*card, line, i)));
                }
            }
        }
        actions
    }
    /// Position in the action vector, or None if the index cannot fit the line.
    pub fn index(placement: &Placement) -> Option<usize> {
        match placement.index < placement.line.capacity() {
            true => Some(placement.card.index() * SLOTS + placement.line.offset() + placement.index),
            false => None,
        }
    }
    pub fn from_index(i: usize) -> Option<Placement> {
        if i >= ACTION_SPACE {
            return None;
        }
        let card = Card::from((i / SLOTS) as u8);
        Line::from_slot(i % SLOTS).map(|(line, index)| Placement::new(card, line, index))
    }
    /// One-hot vector of width [`ACTION_SPACE`]; all zeros if unrepresentable.
    pub fn action_to_vector(placement: &Placement) -> Vec<f32> {
        let mut vector = vec![0.0; ACTION_SPACE];
        if let Some(i) = Self::index(placement) {
            vector[i] = 1.0;
        }
        vector
    }
    /// Decodes the argmax position (first on ties).
    pub fn vector_to_action(vector: &[f32]) -> Option<Placement> {
        vector
            .iter()
            .take(ACTION_SPACE)
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, &x)| match best {
                Some((_, y)) if y >= x => best,
                _ => Some((i, x)),
            })
            .and_then(|(i, _)| Self::from_index(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(hand: &Hand) -> usize {
        hand.pool().len()
            * Line::all()
                .iter()
                .filter(|line| hand.line(**line).len() < line.capacity())
                .map(|line| hand.line(*line).len() + 1)
                .sum::<usize>()
    }

    #[test]
    fn counts_match_formula() {
        let mut hand = Hand::default();
        hand.add_cards(Card::parse("As Kd Qh Jc Ts").unwrap());
        assert_eq!(ActionSpace::enumerate(&hand).len(), 5 * 3);
        hand.place_card(hand.pool()[0], Line::Top, 0);
        hand.place_card(hand.pool()[0], Line::Top, 0);
        hand.place_card(hand.pool()[0], Line::Bottom, 0);
        assert_eq!(ActionSpace::enumerate(&hand).len(), expected_count(&hand));
        assert_eq!(ActionSpace::enumerate(&hand).len(), 2 * (3 + 1 + 2));
        hand.place_card(hand.pool()[0], Line::Top, 0);
        assert_eq!(ActionSpace::enumerate(&hand).len(), expected_count(&hand));
        assert_eq!(ActionSpace::enumerate(&hand).len(), 1 * (1 + 2));
    }

    #[test]
    fn empty_pool_has_no_actions() {
        let hand = Hand::default();
        assert!(ActionSpace::enumerate(&hand).is_empty());
    }

    #[test]
    fn vector_round_trip() {
        for i in 0..ACTION_SPACE {
            let placement = ActionSpace::from_index(i).unwrap();
            let vector = ActionSpace::action_to_vector(&placement);
            assert_eq!(vector.iter().sum::<f32>(), 1.0);
            assert_eq!(ActionSpace::vector_to_action(&vector), Some(placement));
        }
    }

    #[test]
    fn slot_layout() {
        let card = Card::from(2u8);
        let top = Placement::new(card, Line::Top, 2);
        let middle = Placement::new(card, Line::Middle, 0);
        let bottom = Placement::new(card, Line::Bottom, 4);
        assert_eq!(ActionSpace::index(&top), Some(2 * 13 + 2));
        assert_eq!(ActionSpace::index(&middle), Some(2 * 13 + 3));
        assert_eq!(ActionSpace::index(&bottom), Some(2 * 13 + 12));
        assert_eq!(ActionSpace::index(&Placement::new(card, Line::Top, 3)), None);
    }
}
