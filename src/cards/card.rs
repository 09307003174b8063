use super::rank::Rank;
use super::suit::Suit;

/// A playing card encoded as a single byte.
///
/// The 52 cards are bijectively mapped to `0..52` where the encoding is
/// `rank * 4 + suit`. This index is shared by the state encoding and the
/// placement vector, so it must stay stable.
///
/// Cards parse from and serialize to two-character strings like `"As"`
/// (ace of spades) or `"Tc"` (ten of clubs).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card(u8);

impl Card {
    /// Extracts the rank component (2 through Ace).
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    /// Extracts the suit component (clubs, diamonds, hearts, spades).
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
    /// Position in a sorted deck, used as a one-hot offset.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
    /// Parses a string of concatenated card notations into a vector of cards.
    ///
    /// Whitespace is ignored. Each card is a rank (`2`..`9`, `T` or `10`,
    /// `J`, `Q`, `K`, `A`) followed by one suit character.
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        let mut chars = s.chars().filter(|c| !c.is_whitespace()).peekable();
        let mut cards = Vec::new();
        while let Some(first) = chars.next() {
            let mut token = String::from(first);
            if first == '1' && chars.peek() == Some(&'0') {
                token.extend(chars.next());
            }
            let suit = chars
                .next()
                .ok_or_else(|| format!("missing suit after {}", token))?;
            token.push(suit);
            cards.push(Self::try_from(token.as_str())?);
        }
        Ok(cards)
    }
}

/// (Rank, Suit) isomorphism
impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

/// u8 isomorphism
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self(n % 52)
    }
}

/// u64 representation
/// each card is just one bit turned on. this is a one-way morphism
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

/// str isomorphism
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        match s.chars().count() {
            2 | 3 => {
                let split = s
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .ok_or_else(|| String::from("empty card"))?;
                let rank = Rank::try_from(&s[..split])?;
                let suit = Suit::try_from(&s[split..])?;
                Ok(Card::from((rank, suit)))
            }
            _ => Err(format!("invalid card str: {}", s)),
        }
    }
}
impl TryFrom<String> for Card {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}
impl From<Card> for String {
    fn from(c: Card) -> String {
        c.to_string()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_rank_suit() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(card, Card::from((card.rank(), card.suit())));
        }
    }

    #[test]
    fn bijective_str() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(Ok(card), Card::try_from(card.to_string().as_str()));
        }
    }

    #[test]
    fn parses_long_ten_and_symbols() {
        let ten = Card::from((Rank::Ten, Suit::H));
        assert_eq!(Card::try_from("10h"), Ok(ten));
        assert_eq!(Card::try_from("10♥"), Ok(ten));
        assert!(Card::try_from("Zz").is_err());
    }

    #[test]
    fn parses_sequences() {
        let cards = Card::parse("As Kd 2c").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Card::from((Rank::Ace, Suit::S)));
        assert_eq!(cards[2], Card::from((Rank::Two, Suit::C)));
    }

    #[test]
    fn parses_sequences_with_long_tens() {
        let ten = Card::from((Rank::Ten, Suit::H));
        let jack = Card::from((Rank::Jack, Suit::S));
        assert_eq!(Card::parse("10h Js"), Ok(vec![ten, jack]));
        assert_eq!(Card::parse("10hJs"), Ok(vec![ten, jack]));
        assert_eq!(Card::parse("Js 10♥ Th"), Ok(vec![jack, ten, ten]));
        assert!(Card::parse("10").is_err());
        assert!(Card::parse("As K").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let card = Card::from((Rank::Queen, Suit::D));
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Qd\"");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
    }
}
