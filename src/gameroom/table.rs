use super::*;
use crate::game::*;
use crate::mccfr::Action;
use crate::players::Strategy;
use crate::*;
use std::sync::Arc;
use std::sync::Weak;
use tokio::sync::Mutex;
use tokio::sync::OwnedMutexGuard;
use tokio::sync::broadcast;

/// Capacity of each table's event feed before slow subscribers lag.
const EVENT_BUFFER: usize = 256;

/// One live match.
///
/// Every entry point takes the game lock, applies its change, then syncs:
/// AI seats that are up play immediately, recorded events go out on the
/// broadcast feed, and the deadline is re-armed if the turn moved.
/// Strategy search and forced moves run on the blocking pool with the lock
/// still held, so one busy table never stalls another table's clock.
/// The deadline task holds only a weak reference, so dropping the last
/// handle to a table also retires its timer.
pub struct Table {
    id: ID<Table>,
    config: TimerConfig,
    game: Arc<Mutex<Game>>,
    timer: std::sync::Mutex<Timer>,
    events: broadcast::Sender<Event>,
}

impl Table {
    pub fn new(config: TimerConfig) -> Arc<Self> {
        Self::with_game(config, Game::default())
    }
    pub fn with_game(config: TimerConfig, game: Game) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Arc::new(Self {
            id: ID::default(),
            config,
            game: Arc::new(Mutex::new(game)),
            timer: std::sync::Mutex::new(Timer::default()),
            events,
        })
    }
    pub fn id(&self) -> ID<Table> {
        self.id
    }
    /// Feed of everything that happens from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn join(self: &Arc<Self>, name: &str) -> Option<ID<Player>> {
        self.seat(name, None).await
    }
    pub async fn join_ai(self: &Arc<Self>, name: &str, strategy: Box<dyn Strategy>) -> Option<ID<Player>> {
        self.seat(name, Some(strategy)).await
    }
    pub async fn leave(self: &Arc<Self>, id: ID<Player>) -> bool {
        let mut game = self.lock().await;
        let left = game.leave(id);
        self.sync(game).await;
        left
    }
    /// Starts a game. Fails without two seated players or while one is running.
    pub async fn start(self: &Arc<Self>) -> anyhow::Result<()> {
        let mut game = self.lock().await;
        game.start_game()?;
        log::info!("[table] {} started", self.id);
        self.sync(game).await;
        Ok(())
    }
    /// Applies a move from `player`. False means nothing changed.
    pub async fn act(self: &Arc<Self>, player: ID<Player>, action: &Action) -> bool {
        let mut game = self.lock().await;
        let accepted = game.handle_player_action(player, action);
        if accepted {
            self.sync(game).await;
        } else {
            log::debug!("[table] rejected {} from {}", action, player);
        }
        accepted
    }
    /// Clears boards for the next game.
    pub async fn reset(self: &Arc<Self>) {
        let mut game = self.lock().await;
        game.reset();
        self.sync(game).await;
    }
    pub async fn snapshot(&self) -> Snapshot {
        self.game.lock().await.get_game_state()
    }
    /// Time left on the current turn, if a deadline is pending.
    pub fn remaining(&self) -> Option<std::time::Duration> {
        self.clock().remaining()
    }
    /// Stops the pending deadline.
    pub fn close(&self) {
        self.clock().cancel();
        log::debug!("[table] {} closed", self.id);
    }
}

impl Table {
    async fn seat(self: &Arc<Self>, name: &str, strategy: Option<Box<dyn Strategy>>) -> Option<ID<Player>> {
        let player = Player::new(name, strategy.is_some()).with_time_bank(self.config.decision);
        let mut game = self.lock().await;
        let id = game.seat(player, strategy);
        self.sync(game).await;
        id
    }
    async fn expire(self: &Arc<Self>, turn: u64) {
        let game = self.lock().await;
        let id = self.id;
        let work = move |game: &mut Game| {
            if game.expire(turn) {
                log::info!("[table] {} turn {} expired", id, turn);
            }
        };
        if let Some(mut game) = self.offload(game, work).await {
            self.publish(&mut game);
        }
    }
    async fn lock(&self) -> OwnedMutexGuard<Game> {
        self.game.clone().lock_owned().await
    }
    async fn sync(self: &Arc<Self>, game: OwnedMutexGuard<Game>) {
        let game = match game.is_ai_turn() {
            false => Some(game),
            true => {
                let work = |game: &mut Game| {
                    game.resolve_ai();
                };
                self.offload(game, work).await
            }
        };
        if let Some(mut game) = game {
            self.publish(&mut game);
        }
    }
    /// Runs `work` on the blocking pool, handing the lock back when done.
    /// None if the work panicked; the lock is released either way.
    async fn offload<F>(&self, game: OwnedMutexGuard<Game>, work: F) -> Option<OwnedMutexGuard<Game>>
    where
        F: FnOnce(&mut Game) + Send + 'static,
    {
        let mut game = game;
        let task = tokio::task::spawn_blocking(move || {
            work(&mut game);
            game
        });
        match task.await {
            Ok(game) => Some(game),
            Err(e) => {
                log::error!("[table] {} background turn failed: {}", self.id, e);
                None
            }
        }
    }
    fn publish(self: &Arc<Self>, game: &mut Game) {
        for event in game.drain() {
            log::debug!("[table] {} {}", self.id, event);
            let _ = self.events.send(event);
        }
        self.arm(game);
    }
    /// Points the deadline at the current turn, if it is not already.
    fn arm(self: &Arc<Self>, game: &Game) {
        let mut timer = self.clock();
        let turn = game.turn();
        if timer.turn() == Some(turn) {
            return;
        }
        match game.time_bank() {
            None => timer.cancel(),
            Some(limit) => {
                let table: Weak<Self> = Arc::downgrade(self);
                let task = tokio::spawn(async move {
                    tokio::time::sleep(limit).await;
                    if let Some(table) = table.upgrade() {
                        table.expire(turn).await;
                    }
                });
                timer.start(turn, limit, task.abort_handle());
            }
        }
    }
    fn clock(&self) -> std::sync::MutexGuard<'_, Timer> {
        self.timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
