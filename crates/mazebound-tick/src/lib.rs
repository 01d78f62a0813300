//! Auto-movement scheduler for Mazebound.
//!
//! After a manual directional move, the orchestrator arms this scheduler
//! with the same move packaged as an [`AutoMoveTarget`]. The scheduler
//! then re-issues that move on a fixed cadence — one tick immediately,
//! then every interval — until it is superseded by a newer arm, disarmed,
//! or the target reports it is no longer in progress.
//!
//! # Invariants
//!
//! - At most one periodic task is ever live. Arming retires the previous
//!   handle before the new task is spawned.
//! - Retirement is ordered before the new handle's first tick: every tick
//!   checks its generation under the scheduler's generation lock, so once
//!   [`AutoMove::arm`] returns, no stale tick can issue a step.
//! - Skipped ticks are dropped, never replayed — there is no catch-up.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

/// What the scheduler drives: one repeatable move against the live game.
///
/// The orchestrator implements this as a small command object holding only
/// what the move needs (the session, the player, the direction).
pub trait AutoMoveTarget: Send + Sync + 'static {
    /// Whether the driven game still accepts moves. When this turns
    /// false the periodic task retires itself.
    fn in_progress(&self) -> bool;

    /// Issue the repeated move once.
    fn step(&self);
}

/// Configuration for the auto-movement cadence.
#[derive(Debug, Clone)]
pub struct AutoMoveConfig {
    /// Time between repeated moves.
    pub interval: Duration,
}

impl AutoMoveConfig {
    /// The stock cadence: one move every 200 ms.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

    /// Fix any unusable values so the config is safe to use.
    ///
    /// Called automatically by [`AutoMove::new`]. A zero interval would
    /// make `tokio::time::interval` panic, so it falls back to the
    /// default cadence.
    pub fn validated(mut self) -> Self {
        if self.interval.is_zero() {
            tracing::warn!(
                default_ms = Self::DEFAULT_INTERVAL.as_millis() as u64,
                "auto-move interval of zero — falling back to default"
            );
            self.interval = Self::DEFAULT_INTERVAL;
        }
        self
    }
}

impl Default for AutoMoveConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// The currently armed periodic task.
struct Handle {
    task: JoinHandle<()>,
}

/// Owns the single auto-movement task.
///
/// One `AutoMove` per orchestrator. All operations are synchronous and
/// non-blocking; the periodic task runs on the Tokio runtime, so
/// [`AutoMove::arm`] must be called from within one.
pub struct AutoMove {
    config: AutoMoveConfig,
    /// Generation of the one live handle. Each spawned task captures the
    /// generation it was armed with and exits as soon as the two differ.
    live_gen: Arc<Mutex<u64>>,
    handle: Option<Handle>,
}

impl AutoMove {
    /// Creates an idle scheduler.
    pub fn new(config: AutoMoveConfig) -> Self {
        Self {
            config: config.validated(),
            live_gen: Arc::new(Mutex::new(0)),
            handle: None,
        }
    }

    /// The cadence this scheduler repeats moves at.
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Whether a periodic task is currently live.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.task.is_finished())
    }

    /// Arms the scheduler with a new target, retiring any live handle
    /// first.
    ///
    /// The new task issues one step immediately (tick 0) and then one per
    /// interval. Ticks the runtime could not deliver on time are skipped,
    /// not replayed.
    pub fn arm(&mut self, target: impl AutoMoveTarget) {
        let generation = self.retire();
        let live_gen = Arc::clone(&self.live_gen);
        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Supersession check and step share the generation lock:
                // a tick that loses the race to a newer arm can never
                // issue a stale step.
                let live = live_gen.lock().expect("generation lock poisoned");
                if *live != generation {
                    trace!(generation, "auto-move superseded");
                    return;
                }
                if !target.in_progress() {
                    debug!(generation, "game no longer in progress — auto-move retiring");
                    return;
                }
                target.step();
                drop(live);
            }
        });

        self.handle = Some(Handle { task });
        debug!(generation, interval_ms = interval.as_millis() as u64, "auto-move armed");
    }

    /// Retires the live handle, if any. Idempotent; used on game reset so
    /// no task keeps referencing a replaced session.
    pub fn disarm(&mut self) {
        self.retire();
        debug!("auto-move disarmed");
    }

    /// Bumps the generation (logically cancelling any live task) and
    /// aborts it. Returns the generation for the next handle.
    fn retire(&mut self) -> u64 {
        let generation = {
            let mut live = self.live_gen.lock().expect("generation lock poisoned");
            *live += 1;
            *live
        };
        if let Some(handle) = self.handle.take() {
            handle.task.abort();
            trace!("previous auto-move handle retired");
        }
        generation
    }
}

impl Drop for AutoMove {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.task.abort();
        }
    }
}
