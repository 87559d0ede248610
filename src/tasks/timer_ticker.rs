//! One-second tick scheduler for the active cooking timer

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::AppState;

/// Owns the single scheduled tick task of the active timer.
///
/// Every call to [`TickScheduler::schedule`] or [`TickScheduler::cancel`]
/// bumps the generation before returning, so a tick task that was already
/// past its await point is ignored by [`AppState::tick_timer`].
#[derive(Debug, Default)]
pub struct TickScheduler {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending tick task and start a fresh one
    pub fn schedule(&mut self, state: Arc<AppState>) -> u64 {
        self.cancel();
        let generation = self.generation;
        let period = state.tick_period;
        self.pending = Some(tokio::spawn(timer_tick_task(state, generation, period)));
        debug!("Scheduled timer ticks (generation {})", generation);
        generation
    }

    /// Stop the pending tick task, if any
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("Cancelled timer ticks");
        }
    }

    /// Forget a tick task that is finishing on its own
    pub fn release(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.generation += 1;
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `generation` belongs to the task that is allowed to tick
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some() && self.generation == generation
    }
}

/// Background task that ticks the active timer once per `period`
pub async fn timer_tick_task(state: Arc<AppState>, generation: u64, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match state.tick_timer(generation) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Timer tick task (generation {}) finished", generation);
                break;
            }
            Err(e) => {
                error!("Failed to tick timer: {}", e);
                break;
            }
        }
    }
}
