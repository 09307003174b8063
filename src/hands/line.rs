use crate::*;

/// One of the three ordered zones on a board.
///
/// Every per-line lookup (capacity, slot offset, royalty table) dispatches
/// on this enum rather than on a zone name.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Line {
    Top,
    Middle,
    Bottom,
}

impl Line {
    /// All three lines, top first.
    pub const fn all() -> [Line; 3] {
        [Line::Top, Line::Middle, Line::Bottom]
    }
    /// Maximum cards the line holds.
    pub const fn capacity(&self) -> usize {
        match self {
            Line::Top => TOP_CAPACITY,
            Line::Middle => MIDDLE_CAPACITY,
            Line::Bottom => BOTTOM_CAPACITY,
        }
    }
    /// First of this line's slots among the 13 per-card slots of the placement vector.
    pub const fn offset(&self) -> usize {
        match self {
            Line::Top => 0,
            Line::Middle => TOP_CAPACITY,
            Line::Bottom => TOP_CAPACITY + MIDDLE_CAPACITY,
        }
    }
    /// Inverse of [`Line::offset`]: which line and insertion index a slot denotes.
    pub const fn from_slot(slot: usize) -> Option<(Line, usize)> {
        match slot {
            s if s < TOP_CAPACITY => Some((Line::Top, s)),
            s if s < TOP_CAPACITY + MIDDLE_CAPACITY => Some((Line::Middle, s - TOP_CAPACITY)),
            s if s < SLOTS => Some((Line::Bottom, s - TOP_CAPACITY - MIDDLE_CAPACITY)),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Line {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Line::Top),
            "middle" => Ok(Line::Middle),
            "bottom" => Ok(Line::Bottom),
            _ => Err(format!("invalid line: {}", s)),
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Line::Top => write!(f, "top"),
            Line::Middle => write!(f, "middle"),
            Line::Bottom => write!(f, "bottom"),
        }
    }
}
