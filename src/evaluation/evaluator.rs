use super::category::Category;
use crate::Points;
use crate::cards::*;
use crate::hands::*;

/// Ranks a single line of up to five cards.
///
/// Straights and flushes need exactly five cards. Straights are five
/// contiguous ranks with the ace high only, so A-2-3-4-5 is not one.
/// Evaluation depends only on the multiset of cards, never their order.
pub struct Evaluator {
    counts: [u8; 13],
    suits: [u8; 4],
    n: usize,
}

impl From<&[Card]> for Evaluator {
    fn from(cards: &[Card]) -> Self {
        let mut counts = [0u8; 13];
        let mut suits = [0u8; 4];
        for card in cards {
            counts[u8::from(card.rank()) as usize] += 1;
            suits[u8::from(card.suit()) as usize] += 1;
        }
        Self {
            counts,
            suits,
            n: cards.len(),
        }
    }
}

impl Evaluator {
    /// Strength score and category of a line. An empty line is high card.
    pub fn evaluate_line(cards: &[Card]) -> (u8, Category) {
        let category = Self::from(cards).find_category();
        (category.score(), category)
    }
    /// Bonus points for `cards` sitting on `line`.
    pub fn calculate_royalties(line: Line, cards: &[Card]) -> Points {
        let (_, category) = Self::evaluate_line(cards);
        match line {
            Line::Top => Self::from(cards).top_bonus(),
            Line::Middle => match category {
                Category::Trips => 2,
                Category::Straight => 4,
                Category::Flush => 8,
                Category::FullHouse => 12,
                Category::Quads => 20,
                Category::StraightFlush => 30,
                Category::RoyalFlush => 50,
                _ => 0,
            },
            Line::Bottom => match category {
                Category::Straight => 2,
                Category::Flush => 4,
                Category::FullHouse => 6,
                Category::Quads => 10,
                Category::StraightFlush => 15,
                Category::RoyalFlush => 25,
                _ => 0,
            },
        }
    }
    /// Sum of royalties over all three lines.
    pub fn royalties(hand: &Hand) -> Points {
        Line::all()
            .iter()
            .map(|line| Self::calculate_royalties(*line, hand.line(*line)))
            .sum()
    }
    /// Strength scores of top, middle and bottom.
    pub fn line_scores(hand: &Hand) -> [u8; 3] {
        Line::all().map(|line| Self::evaluate_line(hand.line(line)).0)
    }
    /// A complete board whose lines never weaken going down: top <= middle <= bottom.
    pub fn is_valid_hand(hand: &Hand) -> bool {
        let [top, middle, bottom] = Self::line_scores(hand);
        hand.is_complete() && top <= middle && middle <= bottom
    }

    fn find_category(&self) -> Category {
        None.or_else(|| self.find_straight_flush())
            .or_else(|| self.find_n_oak(4).map(|_| Category::Quads))
            .or_else(|| self.find_full_house())
            .or_else(|| self.find_flush())
            .or_else(|| self.find_straight().map(|_| Category::Straight))
            .or_else(|| self.find_n_oak(3).map(|_| Category::Trips))
            .or_else(|| self.find_two_pair())
            .or_else(|| self.find_n_oak(2).map(|_| Category::Pair))
            .unwrap_or(Category::HighCard)
    }
    fn find_straight_flush(&self) -> Option<Category> {
        self.find_flush()
            .and_then(|_| self.find_straight())
            .map(|high| match high {
                Rank::Ace => Category::RoyalFlush,
                _ => Category::StraightFlush,
            })
    }
    fn find_full_house(&self) -> Option<Category> {
        self.find_n_oak(3)
            .and_then(|_| self.find_n_oak(2))
            .map(|_| Category::FullHouse)
    }
    fn find_two_pair(&self) -> Option<Category> {
        match self.counts.iter().filter(|&&c| c == 2).count() {
            2 => Some(Category::TwoPair),
            _ => None,
        }
    }
    fn find_flush(&self) -> Option<Category> {
        match self.n == 5 && self.suits.iter().any(|&s| s == 5) {
            true => Some(Category::Flush),
            false => None,
        }
    }
    /// Highest rank of five consecutive ranks, with no wheel.
    fn find_straight(&self) -> Option<Rank> {
        if self.n != 5 {
            return None;
        }
        let ranks = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .fold(0u16, |bits, (i, _)| bits | 1 << i);
        let mut bits = ranks;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        match bits {
            0 => None,
            b => Some(Rank::from((15 - b.leading_zeros()) as u8)),
        }
    }
    /// Highest rank appearing exactly `n` times.
    fn find_n_oak(&self, n: u8) -> Option<Rank> {
        self.counts
            .iter()
            .rposition(|&c| c == n)
            .map(|i| Rank::from(i as u8))
    }
    /// Top line: trips pay face value + 8; a pair pays 1/2/3 for queens/kings/aces.
    fn top_bonus(&self) -> Points {
        if self.n != 3 {
            return 0;
        }
        None.or_else(|| self.find_n_oak(3).map(|r| r.value() as Points + 8))
            .or_else(|| {
                self.find_n_oak(2).map(|r| match r {
                    Rank::Queen => 1,
                    Rank::King => 2,
                    Rank::Ace => 3,
                    _ => 0,
                })
            })
            .unwrap_or(0)
    }
}
