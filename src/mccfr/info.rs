use super::action::Placement;
use crate::cards::Card;
use crate::hands::*;
use crate::*;

/// What one player can see at a decision point.
///
/// Strategies receive a shared reference and never mutate it; simulated
/// moves go through [`GameStateInfo::apply`], which returns a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GameStateInfo {
    hand: Hand,
    available: Vec<Card>,
    opponents: Vec<Card>,
    street: Street,
    fantasy: bool,
}

impl GameStateInfo {
    pub fn new(
        hand: Hand,
        available: Vec<Card>,
        opponents: Vec<Card>,
        street: Street,
        fantasy: bool,
    ) -> Self {
        Self {
            hand,
            available,
            opponents,
            street,
            fantasy,
        }
    }
    /// A fresh board holding `cards` unplaced, with no opponent information.
    pub fn deal(cards: Vec<Card>, street: Street, fantasy: bool) -> Self {
        let available = (0..DECK_SIZE as u8)
            .map(Card::from)
            .filter(|c| !cards.contains(c))
            .collect();
        let mut hand = Hand::default();
        hand.add_cards(cards);
        Self::new(hand, available, Vec::new(), street, fantasy)
    }
    /// Copy of this state with `placement` applied, or None if it is illegal.
    pub fn apply(&self, placement: &Placement) -> Option<Self> {
        let mut next = self.clone();
        match next
            .hand
            .place_card(placement.card, placement.line, placement.index)
        {
            true => Some(next),
            false => None,
        }
    }
    /// Board complete and nothing left to place.
    pub fn is_terminal(&self) -> bool {
        self.hand.pool().is_empty() && self.hand.is_complete()
    }
    pub fn hand(&self) -> &Hand {
        &self.hand
    }
    pub fn pool(&self) -> &[Card] {
        self.hand.pool()
    }
    pub fn line(&self, line: Line) -> &[Card] {
        self.hand.line(line)
    }
    /// Cards this player has not seen anywhere.
    pub fn available(&self) -> &[Card] {
        &self.available
    }
    /// Every card on every opponent's lines.
    pub fn opponents(&self) -> &[Card] {
        &self.opponents
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn is_fantasy(&self) -> bool {
        self.fantasy
    }

    /// Fixed-length input to the policy network.
    ///
    /// | range     | contents                     |
    /// |-----------|------------------------------|
    /// | 0..52     | unplaced pool, one-hot       |
    /// | 52..104   | top line                     |
    /// | 104..156  | middle line                  |
    /// | 156..208  | bottom line                  |
    /// | 208       | street / 5                   |
    /// | 209       | fantasy flag                 |
    /// | 210..262  | opponent-visible cards       |
    pub fn encode(&self) -> Vec<f32> {
        let mut vector = vec![0.0; ENCODING_SIZE];
        let mut mark = |cards: &[Card], offset: usize| {
            for card in cards {
                vector[offset + card.index()] = 1.0;
            }
        };
        mark(self.hand.pool(), 0);
        mark(self.hand.top(), DECK_SIZE);
        mark(self.hand.middle(), 2 * DECK_SIZE);
        mark(self.hand.bottom(), 3 * DECK_SIZE);
        mark(&self.opponents, 4 * DECK_SIZE + 2);
        vector[4 * DECK_SIZE] = self.street as f32 / FINAL_STREET as f32;
        vector[4 * DECK_SIZE + 1] = if self.fantasy { 1.0 } else { 0.0 };
        vector
    }
}
