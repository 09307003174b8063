use super::Player;
use crate::hands::Line;
use crate::mccfr::Placement;
use crate::*;

/// Something that happened at a table, in the order it happened.
///
/// Events are for observers only. Replaying them is not how state is
/// recovered; [`super::Snapshot`] is.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Joined { player: ID<Player>, name: String },
    Left { player: ID<Player> },
    Started { players: Vec<ID<Player>> },
    Street { street: Street },
    Turn { player: ID<Player>, turn: u64 },
    Placed { player: ID<Player>, placement: Placement },
    Removed { player: ID<Player>, line: Line, index: usize },
    Expired { player: ID<Player> },
    Fantasy { players: Vec<ID<Player>> },
    Scored { deltas: Vec<(ID<Player>, Points)> },
    Finished,
}

impl Event {
    /// The player this event is about, if any.
    pub fn player(&self) -> Option<ID<Player>> {
        match self {
            Event::Joined { player, .. }
            | Event::Left { player }
            | Event::Turn { player, .. }
            | Event::Placed { player, .. }
            | Event::Removed { player, .. }
            | Event::Expired { player } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::Joined { player, name } => write!(f, "{} joined as {}", name, player),
            Event::Left { player } => write!(f, "{} left", player),
            Event::Started { players } => write!(f, "started with {} players", players.len()),
            Event::Street { street } => write!(f, "street {}", street),
            Event::Turn { player, turn } => write!(f, "turn {} to {}", turn, player),
            Event::Placed { player, placement } => write!(f, "{} {}", player, placement),
            Event::Removed { player, line, index } => {
                write!(f, "{} took back {}[{}]", player, line, index)
            }
            Event::Expired { player } => write!(f, "{} ran out of time", player),
            Event::Fantasy { players } => write!(f, "{} in fantasy", players.len()),
            Event::Scored { deltas } => write!(
                f,
                "scored {}",
                deltas
                    .iter()
                    .map(|(_, d)| format!("{:+}", d))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Event::Finished => write!(f, "finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged() {
        let json = serde_json::to_value(Event::Street { street: 2 }).unwrap();
        assert_eq!(json["type"], "street");
        assert_eq!(json["street"], 2);
        assert_eq!(serde_json::to_value(Event::Finished).unwrap()["type"], "finished");
    }
}
