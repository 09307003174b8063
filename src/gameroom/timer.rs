use crate::*;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Configuration for turn deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Allowance given to every seat for each turn.
    pub decision: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            decision: Duration::from_secs(TURN_TIME_BANK),
        }
    }
}

/// The deadline for one turn plus the task that enforces it.
///
/// At most one deadline is pending. Starting a new one aborts the old
/// task first.
#[derive(Debug, Default)]
pub struct Timer {
    turn: Option<u64>,
    deadline: Option<Instant>,
    task: Option<AbortHandle>,
}

impl Timer {
    pub fn start(&mut self, turn: u64, limit: Duration, task: AbortHandle) {
        self.cancel();
        self.turn = Some(turn);
        self.deadline = Some(Instant::now() + limit);
        self.task = Some(task);
    }
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.turn = None;
        self.deadline = None;
    }
    /// Turn token the pending deadline was armed for.
    pub fn turn(&self) -> Option<u64> {
        self.turn
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
