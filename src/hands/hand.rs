use super::line::Line;
use crate::cards::Card;

/// A player's board.
///
/// Every card the player holds is in exactly one of: the unplaced pool,
/// one of the three lines, or the discards. Lines never exceed their
/// capacity and keep the insertion order the player chose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Hand {
    top: Vec<Card>,
    middle: Vec<Card>,
    bottom: Vec<Card>,
    pool: Vec<Card>,
    discards: Vec<Card>,
}

impl Hand {
    /// Builds a board directly from line contents, with an empty pool.
    pub fn from_lines(top: Vec<Card>, middle: Vec<Card>, bottom: Vec<Card>) -> Self {
        Self {
            top,
            middle,
            bottom,
            ..Self::default()
        }
    }
    /// Adds freshly dealt cards to the unplaced pool.
    pub fn add_cards<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.pool.extend(cards);
    }
    /// Moves `card` from the pool into `line` at `index`.
    ///
    /// Fails without mutating anything if the card is not in the pool, the
    /// line is full, or `index` lies outside `0..=len`.
    pub fn place_card(&mut self, card: Card, line: Line, index: usize) -> bool {
        let Some(position) = self.pool.iter().position(|c| *c == card) else {
            return false;
        };
        let target = self.line_mut(line);
        if target.len() >= line.capacity() || index > target.len() {
            return false;
        }
        target.insert(index, card);
        self.pool.remove(position);
        true
    }
    /// Pops the card at `index` of `line` back into the pool.
    pub fn remove_card(&mut self, line: Line, index: usize) -> Option<Card> {
        let target = self.line_mut(line);
        if index >= target.len() {
            return None;
        }
        let card = target.remove(index);
        self.pool.push(card);
        Some(card)
    }
    /// Moves whatever is left in the pool to the discards.
    pub fn discard(&mut self) -> Vec<Card> {
        let leftover = std::mem::take(&mut self.pool);
        self.discards.extend(leftover.iter().copied());
        leftover
    }
    /// True when all three lines are at capacity.
    pub fn is_complete(&self) -> bool {
        Line::all()
            .iter()
            .all(|line| self.line(*line).len() == line.capacity())
    }
    pub fn line(&self, line: Line) -> &[Card] {
        match line {
            Line::Top => &self.top,
            Line::Middle => &self.middle,
            Line::Bottom => &self.bottom,
        }
    }
    fn line_mut(&mut self, line: Line) -> &mut Vec<Card> {
        match line {
            Line::Top => &mut self.top,
            Line::Middle => &mut self.middle,
            Line::Bottom => &mut self.bottom,
        }
    }
    pub fn top(&self) -> &[Card] {
        &self.top
    }
    pub fn middle(&self) -> &[Card] {
        &self.middle
    }
    pub fn bottom(&self) -> &[Card] {
        &self.bottom
    }
    pub fn pool(&self) -> &[Card] {
        &self.pool
    }
    pub fn discards(&self) -> &[Card] {
        &self.discards
    }
    /// Cards on the three lines, top to bottom. These are what opponents see.
    pub fn placed(&self) -> impl Iterator<Item = &Card> {
        self.top.iter().chain(self.middle.iter()).chain(self.bottom.iter())
    }
    /// Open slots remaining across all lines.
    pub fn vacancies(&self) -> usize {
        Line::all()
            .iter()
            .map(|line| line.capacity() - self.line(*line).len())
            .sum()
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let show = |cards: &[Card]| {
            cards
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "[{}] [{}] [{}] pool [{}]",
            show(&self.top),
            show(&self.middle),
            show(&self.bottom),
            show(&self.pool)
        )
    }
}
