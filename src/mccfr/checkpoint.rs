use super::network::Weights;
use super::profile::Profile;
use crate::*;
use std::path::PathBuf;
use std::sync::Mutex;

/// Everything needed to resume an agent where it left off.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Checkpoint {
    pub player: String,
    /// Milliseconds since the Unix epoch when the checkpoint was taken.
    pub timestamp: u64,
    pub iterations: usize,
    pub exploration: Probability,
    pub profile: Profile,
    pub weights: Weights,
}

/// Storage collaborator for agent checkpoints.
///
/// Neither operation is atomic and either may fail; callers keep training
/// on in-memory state when they do.
pub trait Persistence {
    /// Store a checkpoint. Returns false on any failure.
    fn save_progress(&self, checkpoint: &Checkpoint) -> bool;
    /// Most recent checkpoint for `player` by timestamp, if any.
    fn load_progress(&self, player: &str) -> Option<Checkpoint>;
}

/// Checkpoints as JSON files named `<player>_<millis>.json` under one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }
    /// Directory from `PINEAPPLE_CHECKPOINTS`, else `checkpoints/`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("PINEAPPLE_CHECKPOINTS").unwrap_or_else(|_| "checkpoints".into()))
    }
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
    fn path(&self, player: &str, timestamp: u64) -> PathBuf {
        self.root.join(format!("{}_{}.json", player, timestamp))
    }
    fn write(&self, checkpoint: &Checkpoint) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path(&checkpoint.player, checkpoint.timestamp);
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), checkpoint)?;
        Ok(path)
    }
    fn read(&self, player: &str) -> anyhow::Result<Option<Checkpoint>> {
        if !self.root.exists() {
            return Ok(None);
        }
        let prefix = format!("{}_", player);
        let mut latest = None::<(u64, PathBuf)>;
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            let Some(stamp) = stem.strip_prefix(&prefix) else {
                continue;
            };
            let Ok(stamp) = stamp.parse::<u64>() else {
                continue;
            };
            if latest.as_ref().map_or(true, |(best, _)| stamp > *best) {
                latest = Some((stamp, path));
            }
        }
        match latest {
            None => Ok(None),
            Some((_, path)) => {
                let file = std::fs::File::open(&path)?;
                let checkpoint = serde_json::from_reader(std::io::BufReader::new(file))?;
                Ok(Some(checkpoint))
            }
        }
    }
}

impl Persistence for FileStore {
    fn save_progress(&self, checkpoint: &Checkpoint) -> bool {
        match self.write(checkpoint) {
            Ok(path) => {
                log::debug!("[store] saved {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("[store] failed to save {}: {}", checkpoint.player, e);
                false
            }
        }
    }
    fn load_progress(&self, player: &str) -> Option<Checkpoint> {
        match self.read(player) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("[store] failed to load {}: {}", player, e);
                None
            }
        }
    }
}

/// In-process store, mostly for tests and short simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<Checkpoint>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.saved.lock().map(|s| s.len()).unwrap_or_default()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Persistence for MemoryStore {
    fn save_progress(&self, checkpoint: &Checkpoint) -> bool {
        match self.saved.lock() {
            Ok(mut saved) => {
                saved.push(checkpoint.clone());
                true
            }
            Err(_) => false,
        }
    }
    fn load_progress(&self, player: &str) -> Option<Checkpoint> {
        self.saved.lock().ok().and_then(|saved| {
            saved
                .iter()
                .filter(|c| c.player == player)
                .max_by_key(|c| c.timestamp)
                .cloned()
        })
    }
}

impl<P> Persistence for std::sync::Arc<P>
where
    P: Persistence + ?Sized,
{
    fn save_progress(&self, checkpoint: &Checkpoint) -> bool {
        self.as_ref().save_progress(checkpoint)
    }
    fn load_progress(&self, player: &str) -> Option<Checkpoint> {
        self.as_ref().load_progress(player)
    }
}

/// Wall clock in milliseconds, the ordering key for checkpoints.
pub fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(player: &str, timestamp: u64, iterations: usize) -> Checkpoint {
        Checkpoint {
            player: player.into(),
            timestamp,
            iterations,
            exploration: EXPLORATION_FACTOR,
            profile: Profile::default(),
            weights: Weights::new(),
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pineapple-{}-{}", name, now()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_store_loads_latest() {
        let store = FileStore::new(scratch("latest"));
        assert!(store.load_progress("ai_player").is_none());
        assert!(store.save_progress(&checkpoint("ai_player", 200, 2)));
        assert!(store.save_progress(&checkpoint("ai_player", 1000, 10)));
        assert!(store.save_progress(&checkpoint("ai_player", 300, 3)));
        assert!(store.save_progress(&checkpoint("ai", 5000, 50)));
        let loaded = store.load_progress("ai_player").unwrap();
        assert_eq!(loaded.iterations, 10);
        assert_eq!(store.load_progress("ai").unwrap().iterations, 50);
        let _ = std::fs::remove_dir_all(store.root());
    }

    #[test]
    fn file_store_failure_is_not_fatal() {
        let blocker = scratch("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = FileStore::new(blocker.join("nested"));
        assert!(!store.save_progress(&checkpoint("p", 1, 1)));
        assert!(store.load_progress("p").is_none());
        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn memory_store_loads_latest_for_player() {
        let store = MemoryStore::default();
        assert!(store.save_progress(&checkpoint("a", 2, 2)));
        assert!(store.save_progress(&checkpoint("a", 9, 9)));
        assert!(store.save_progress(&checkpoint("b", 20, 20)));
        assert_eq!(store.load_progress("a").unwrap().iterations, 9);
        assert!(store.load_progress("c").is_none());
        assert_eq!(store.len(), 3);
    }
}
