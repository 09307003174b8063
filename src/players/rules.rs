use super::Strategy;
use crate::cards::*;
use crate::hands::*;
use crate::mccfr::*;

/// Hand-written placement heuristic.
///
/// Each legal placement is scored by what the card does for its target line:
///
/// - top: pairs and trips, weighted by multiplicity, otherwise card rank
/// - middle: straight and flush draws
/// - bottom: card rank plus straight, flush and full-house draws
///
/// The highest score wins; the first one enumerated wins ties.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBased;

impl RuleBased {
    /// Heuristic value of `placement` against the current lines of `state`.
    pub fn evaluate(state: &GameStateInfo, placement: &Placement) -> f32 {
        let card = placement.card;
        let cards = state
            .line(placement.line)
            .iter()
            .copied()
            .chain(std::iter::once(card))
            .collect::<Vec<_>>();
        let high = card.rank().value() as f32 / 14.0;
        match placement.line {
            Line::Top => match Self::multiplicity(&cards) {
                n if n > 1 => 10.0 * n as f32,
                _ => high,
            },
            Line::Middle => {
                let mut score = 0.0;
                if Self::straight_draw(&cards) {
                    score += 5.0;
                }
                if Self::flush_draw(&cards) {
                    score += 5.0;
                }
                score
            }
            Line::Bottom => {
                let mut score = high;
                if Self::straight_draw(&cards) {
                    score += 3.0;
                }
                if Self::flush_draw(&cards) {
                    score += 3.0;
                }
                if Self::full_house_draw(&cards) {
                    score += 5.0;
                }
                score
            }
        }
    }

    fn counts(cards: &[Card]) -> [u8; 13] {
        let mut counts = [0u8; 13];
        for card in cards {
            counts[card.rank() as usize] += 1;
        }
        counts
    }
    fn multiplicity(cards: &[Card]) -> u8 {
        Self::counts(cards).into_iter().max().unwrap_or_default()
    }
    /// At least three cards inside a five-rank window.
    fn straight_draw(cards: &[Card]) -> bool {
        let values = cards.iter().map(|c| c.rank().value());
        match (values.clone().min(), values.max()) {
            (Some(lo), Some(hi)) => cards.len() >= 3 && hi - lo <= 4,
            _ => false,
        }
    }
    /// At least three cards of one suit.
    fn flush_draw(cards: &[Card]) -> bool {
        Suit::all()
            .iter()
            .any(|s| cards.iter().filter(|c| c.suit() == *s).count() >= 3)
    }
    /// Trips already, or two pairs.
    fn full_house_draw(cards: &[Card]) -> bool {
        let counts = Self::counts(cards);
        counts.contains(&3) || counts.iter().filter(|n| **n == 2).count() >= 2
    }
}

impl Strategy for RuleBased {
    fn get_action(&self, state: &GameStateInfo) -> Option<Placement> {
        ActionSpace::get_valid_actions(state)
            .into_iter()
            .map(|a| (Self::evaluate(state, &a), a))
            .fold(None, |best: Option<(f32, Placement)>, (s, a)| match best {
                Some((b, _)) if b >= s => best,
                _ => Some((s, a)),
            })
            .map(|(_, a)| a)
    }
    fn name(&self) -> &'static str {
        "rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(top: &str, middle: &str, bottom: &str, pool: &str) -> GameStateInfo {
        let mut hand = Hand::from_lines(
            Card::parse(top).unwrap(),
            Card::parse(middle).unwrap(),
            Card::parse(bottom).unwrap(),
        );
        hand.add_cards(Card::parse(pool).unwrap());
        GameStateInfo::new(hand, Vec::new(), Vec::new(), 2, false)
    }
    fn place(card: &str, line: Line, index: usize) -> Placement {
        Placement::new(Card::try_from(card).unwrap(), line, index)
    }

    #[test]
    fn top_pairs_outscore_rank() {
        let s = state("Qs", "", "", "Qd 2c");
        assert_eq!(RuleBased::evaluate(&s, &place("Qd", Line::Top, 1)), 20.0);
        assert_eq!(RuleBased::evaluate(&s, &place("2c", Line::Top, 1)), 2.0 / 14.0);
    }

    #[test]
    fn middle_rewards_draws() {
        let s = state("", "9h Th", "", "Jh 2c");
        assert_eq!(RuleBased::evaluate(&s, &place("Jh", Line::Middle, 2)), 10.0);
        assert_eq!(RuleBased::evaluate(&s, &place("2c", Line::Middle, 2)), 0.0);
    }

    #[test]
    fn bottom_rewards_full_house_draws() {
        let s = state("", "", "7c 7d 8s", "8h");
        let score = RuleBased::evaluate(&s, &place("8h", Line::Bottom, 0));
        assert_eq!(score, 8.0 / 14.0 + 3.0 + 5.0);
    }

    #[test]
    fn picks_the_pair_on_top() {
        let s = state("Ks", "", "", "Kd");
        let action = RuleBased.get_action(&s).unwrap();
        assert_eq!(action.line, Line::Top);
    }

    #[test]
    fn first_of_equal_scores_wins() {
        let s = state("", "", "", "2c");
        assert_eq!(RuleBased.get_action(&s), Some(place("2c", Line::Top, 0)));
        assert_eq!(RuleBased.get_action(&GameStateInfo::deal(Vec::new(), 1, false)), None);
    }
}
