//! Pineapple open-face Chinese poker.
//!
//! The crate is layered leaf-to-root:
//!
//! - [`cards`]: 52-card model, shuffling and dealing
//! - [`hands`]: a player's three-line board plus unplaced pool
//! - [`evaluation`]: line ranking, royalties and head-to-head scoring
//! - [`mccfr`]: action enumeration, state encoding and the self-play agent
//! - [`players`]: pluggable decision policies behind [`players::Strategy`]
//! - [`game`]: the turn/street/fantasy state machine for one match
//! - [`gameroom`]: independent matches behind a registry with cancellable turn deadlines

pub mod cards;
pub mod evaluation;
pub mod game;
pub mod gameroom;
pub mod hands;
pub mod mccfr;
pub mod players;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Expected values, regrets, and training payoffs.
pub type Utility = f32;
/// Strategy weights and sampling distributions.
pub type Probability = f32;
/// Head-to-head points and royalties.
pub type Points = i32;
/// Dealing round, 1 through 5.
pub type Street = usize;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Typed identifier over uuid::Uuid. The marker keeps player ids and
/// table ids from being mixed up at compile time.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> TryFrom<&str> for ID<T> {
    type Error = uuid::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        uuid::Uuid::parse_str(s).map(Self::from)
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// BOARD GEOMETRY
// ============================================================================
/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;
/// Capacity of the top line.
pub const TOP_CAPACITY: usize = 3;
/// Capacity of the middle line.
pub const MIDDLE_CAPACITY: usize = 5;
/// Capacity of the bottom line.
pub const BOTTOM_CAPACITY: usize = 5;
/// Total slots on a complete board.
pub const HAND_SIZE: usize = TOP_CAPACITY + MIDDLE_CAPACITY + BOTTOM_CAPACITY;

// ============================================================================
// DEALING
// 5 + 3 + 3 + 3 + 3 cards over five streets, one discard per later street.
// ============================================================================
/// Cards dealt on the first street.
pub const FIRST_STREET_CARDS: usize = 5;
/// Cards dealt on every later street.
pub const LATER_STREET_CARDS: usize = 3;
/// Cards dealt at once to a fantasy player.
pub const FANTASY_CARDS: usize = 14;
/// Last street of a round.
pub const FINAL_STREET: Street = 5;

// ============================================================================
// SCORING
// ============================================================================
/// Extra points for winning all three lines against one opponent.
pub const SCOOP_BONUS: Points = 3;
/// Training utility assigned to a board with top > middle or middle > bottom.
pub const FOUL_PENALTY: Utility = -1.0;

// ============================================================================
// ENCODINGS
// ============================================================================
/// Insertion slots per card across all lines (3 top + 5 middle + 5 bottom).
pub const SLOTS: usize = HAND_SIZE;
/// Width of the one-hot placement vector.
pub const ACTION_SPACE: usize = DECK_SIZE * SLOTS;
/// Width of the state vector: pool, top, middle, bottom, street, fantasy, opponents.
pub const ENCODING_SIZE: usize = 4 * DECK_SIZE + 2 + DECK_SIZE;

// ============================================================================
// SELF-PLAY AGENT
// ============================================================================
/// Adam learning rate for the policy network.
pub const LEARNING_RATE: f64 = 0.001;
/// Weight of exploration noise during warmup and of random moves in live play.
pub const EXPLORATION_FACTOR: Probability = 0.4;
/// Training iterations during which regret-matched strategies are blended with noise.
pub const EXPLORATION_WARMUP: usize = 1000;
/// Training iterations between checkpoints.
pub const CHECKPOINT_INTERVAL: usize = 1000;
/// Width of each hidden layer in the policy network.
pub const HIDDEN_SIZE: usize = 256;
/// Maximum placements on any root-to-leaf training path.
pub const MAX_TRAINING_DEPTH: usize = HAND_SIZE;
/// Interior nodes expanded per training call before children are valued by rollout.
pub const MAX_TRAINING_NODES: usize = 1 << 16;
/// Interval between progress log messages during self-play.
pub const TRAINING_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

// ============================================================================
// STRATEGIES AND TIMING
// ============================================================================
/// Playouts per candidate action in flat Monte Carlo search.
pub const SIMULATION_COUNT: usize = 100;
/// Seconds each player has to finish their part of a street.
pub const TURN_TIME_BANK: u64 = 60;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Optional training deadline from TRAIN_DURATION env var.
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
/// Arm the training deadline if TRAIN_DURATION (e.g. "30m", "2h") is set.
pub fn deadline() {
    if let Ok(duration) = std::env::var("TRAIN_DURATION") {
        if let Some(limit) = parse_duration(&duration) {
            let _ = DEADLINE.set(std::time::Instant::now() + limit);
            log::info!("training will stop after {}", duration);
        }
    }
}
/// Whether the TRAIN_DURATION deadline has passed.
pub fn interrupted() -> bool {
    DEADLINE
        .get()
        .map_or(false, |d| std::time::Instant::now() >= *d)
}
/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_holds_every_block() {
        assert_eq!(ENCODING_SIZE, 262);
        assert_eq!(ACTION_SPACE, 676);
    }

    #[test]
    fn durations_parse() {
        assert_eq!(parse_duration("30s"), Some(std::time::Duration::from_secs(30)));
        assert_eq!(parse_duration("2h"), Some(std::time::Duration::from_secs(7200)));
        assert_eq!(parse_duration("2x"), None);
    }

    #[test]
    fn ids_parse_back() {
        let id = ID::<()>::default();
        let parsed = ID::<()>::try_from(id.to_string().as_str()).unwrap();
        assert_eq!(id, parsed);
    }
}
