use super::*;
use crate::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Independent tables keyed by match id.
///
/// Each table has its own lock, so a slow match never blocks another.
/// The registry lock is only held to look a table up.
#[derive(Default)]
pub struct Registry {
    config: TimerConfig,
    tables: RwLock<HashMap<ID<Table>, Arc<Table>>>,
}

impl Registry {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }
    /// Opens an empty table and returns its id.
    pub async fn open(&self) -> ID<Table> {
        let table = Table::new(self.config);
        let id = table.id();
        self.tables.write().await.insert(id, table);
        log::info!("[table] opened {}", id);
        id
    }
    pub async fn get(&self, id: ID<Table>) -> Option<Arc<Table>> {
        self.tables.read().await.get(&id).cloned()
    }
    /// Closes a table and stops its deadline.
    pub async fn close(&self, id: ID<Table>) -> anyhow::Result<()> {
        self.tables
            .write()
            .await
            .remove(&id)
            .map(|table| table.close())
            .map(|_| log::info!("[table] closed {}", id))
            .ok_or_else(|| anyhow::anyhow!("table {} not found", id))
    }
    pub async fn ids(&self) -> Vec<ID<Table>> {
        let mut ids = self.tables.read().await.keys().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }
    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;
    use crate::players::Random;

    #[tokio::test(start_paused = true)]
    async fn open_and_close() {
        let registry = Registry::default();
        let a = registry.open().await;
        let b = registry.open().await;
        assert_ne!(a, b);
        let ids = registry.ids().await;
        assert!(ids.contains(&a) && ids.contains(&b));
        registry.close(a).await.unwrap();
        assert!(registry.close(a).await.is_err());
        assert!(registry.get(a).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tables_are_independent() {
        let registry = Registry::default();
        let busy = registry.get(registry.open().await).await.unwrap();
        let idle = registry.get(registry.open().await).await.unwrap();
        busy.join_ai("r1", Box::new(Random)).await.unwrap();
        busy.join_ai("r2", Box::new(Random)).await.unwrap();
        idle.join("alice").await.unwrap();
        busy.start().await.unwrap();
        assert_eq!(busy.snapshot().await.phase, Phase::Finished);
        assert_eq!(idle.snapshot().await.phase, Phase::Waiting);
        assert_eq!(idle.snapshot().await.players.len(), 1);
    }
}
