use super::card::Card;
use crate::DECK_SIZE;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// The undealt cards of one match, in draw order.
///
/// Drawing past the end is not an error: the deck regenerates all 52 cards,
/// reshuffles, and continues. That reintroduces cards already on players'
/// boards, so every refill is logged as a warning.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    rng: SmallRng,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Creates a shuffled 52-card deck seeded from the OS.
    pub fn new() -> Self {
        Self::from(SmallRng::from_os_rng())
    }
    /// Creates a shuffled deck with a reproducible order.
    pub fn seeded(seed: u64) -> Self {
        Self::from(SmallRng::seed_from_u64(seed))
    }
    /// Regenerates the full 52-card set and shuffles it.
    pub fn reset(&mut self) {
        self.cards = (0..DECK_SIZE as u8).map(Card::from).collect();
        self.cards.shuffle(&mut self.rng);
    }
    /// Removes and returns the first `n` cards, refilling first on underflow.
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        if self.cards.len() < n {
            log::warn!(
                "[deck] underflow: {} requested, {} left; reshuffling full deck",
                n,
                self.cards.len()
            );
            self.reset();
        }
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }
    /// Extracts the named cards, returning only those still in the deck.
    pub fn draw_specific(&mut self, cards: &[Card]) -> Vec<Card> {
        cards
            .iter()
            .filter_map(|card| {
                self.cards
                    .iter()
                    .position(|c| c == card)
                    .map(|i| self.cards.remove(i))
            })
            .collect()
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl From<SmallRng> for Deck {
    fn from(rng: SmallRng) -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(DECK_SIZE),
            rng,
        };
        deck.reset();
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_deck_is_complete() {
        let deck = Deck::new();
        assert_eq!(deck.remaining(), 52);
        let unique = deck.cards.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn draw_removes_from_front() {
        let mut deck = Deck::seeded(7);
        let head = deck.cards[..5].to_vec();
        let drawn = deck.draw(5);
        assert_eq!(drawn, head);
        assert_eq!(deck.remaining(), 47);
        assert!(drawn.iter().all(|c| !deck.contains(c)));
    }

    #[test]
    fn seeded_decks_agree() {
        assert_eq!(Deck::seeded(42).draw(13), Deck::seeded(42).draw(13));
    }

    #[test]
    fn underflow_refills() {
        let mut deck = Deck::seeded(1);
        deck.draw(50);
        let drawn = deck.draw(3);
        assert_eq!(drawn.len(), 3);
        assert_eq!(deck.remaining(), 49);
    }

    #[test]
    fn draw_specific_skips_missing() {
        let mut deck = Deck::seeded(3);
        let wanted = Card::parse("AsKs").unwrap();
        let first = deck.draw_specific(&wanted);
        assert_eq!(first, wanted);
        assert_eq!(deck.remaining(), 50);
        let second = deck.draw_specific(&wanted);
        assert!(second.is_empty());
    }
}
