/// Made-hand class of a line, weakest first.
///
/// The discriminant is the line's strength score. Lines are compared by
/// category alone: two pairs of different rank tie.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Category {
    #[default]
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    Trips = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    Quads = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const fn score(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Category::HighCard => write!(f, "High Card"),
            Category::Pair => write!(f, "Pair"),
            Category::TwoPair => write!(f, "Two Pair"),
            Category::Trips => write!(f, "Three of a Kind"),
            Category::Straight => write!(f, "Straight"),
            Category::Flush => write!(f, "Flush"),
            Category::FullHouse => write!(f, "Full House"),
            Category::Quads => write!(f, "Four of a Kind"),
            Category::StraightFlush => write!(f, "Straight Flush"),
            Category::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}
