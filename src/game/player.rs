use crate::hands::*;
use crate::*;
use std::time::Duration;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Player {
    id: ID<Player>,
    name: String,
    hand: Hand,
    ai: bool,
    score: Points,
    fantasy_count: usize,
    /// Allowance per turn.
    time_bank: Duration,
    ready: bool,
}

impl Player {
    pub fn new(name: &str, ai: bool) -> Self {
        Self {
            id: ID::default(),
            name: name.to_string(),
            hand: Hand::default(),
            ai,
            score: 0,
            fantasy_count: 0,
            time_bank: Duration::from_secs(TURN_TIME_BANK),
            ready: false,
        }
    }
    pub fn with_time_bank(mut self, allowance: Duration) -> Self {
        self.time_bank = allowance;
        self
    }
    pub fn id(&self) -> ID<Player> {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn hand(&self) -> &Hand {
        &self.hand
    }
    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
    pub fn is_ai(&self) -> bool {
        self.ai
    }
    pub fn score(&self) -> Points {
        self.score
    }
    pub fn fantasy_count(&self) -> usize {
        self.fantasy_count
    }
    pub fn time_bank(&self) -> Duration {
        self.time_bank
    }
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Fresh board for a new game. Cumulative score is kept.
    pub fn reset(&mut self) {
        self.hand = Hand::default();
        self.fantasy_count = 0;
        self.ready = false;
    }
    pub(super) fn settle(&mut self, points: Points) {
        self.score += points;
    }
    pub(super) fn enter_fantasy(&mut self) {
        self.fantasy_count += 1;
    }
    pub(super) fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
    pub(super) fn clear(&mut self) {
        self.hand = Hand::default();
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({:+})", self.name, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_score() {
        let mut player = Player::new("alice", false);
        player.settle(7);
        player.enter_fantasy();
        player.set_ready(true);
        player.reset();
        assert_eq!(player.score(), 7);
        assert_eq!(player.fantasy_count(), 0);
        assert!(!player.is_ready());
        assert_eq!(player.time_bank(), Duration::from_secs(TURN_TIME_BANK));
    }

    #[test]
    fn serializes_by_field() {
        let player = Player::new("bob", true);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["name"], "bob");
        assert_eq!(json["ai"], true);
        assert_eq!(json["id"], player.id().to_string());
    }

    #[test]
    fn sub_second_allowance_survives() {
        let player = Player::new("carol", false).with_time_bank(Duration::from_millis(250));
        assert_eq!(player.time_bank(), Duration::from_millis(250));
        let json = serde_json::to_string(&player).unwrap();
        let back = serde_json::from_str::<Player>(&json).unwrap();
        assert_eq!(back.time_bank(), Duration::from_millis(250));
    }
}
