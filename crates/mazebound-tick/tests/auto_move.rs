//! Integration tests for the auto-movement scheduler.
//!
//! Uses `tokio::time::pause()` (via `start_paused`) so the 200 ms cadence
//! runs deterministically: sleeps auto-advance the clock once every task
//! is idle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use mazebound_tick::{AutoMove, AutoMoveConfig, AutoMoveTarget};

// =========================================================================
// Probe target: counts steps, toggleable progress flag.
// =========================================================================

#[derive(Default)]
struct Probe {
    steps: AtomicU32,
    stopped: AtomicBool,
}

impl Probe {
    fn new() -> Arc<Self> {
        Arc::default()
    }

    fn steps(&self) -> u32 {
        self.steps.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

struct ProbeTarget(Arc<Probe>);

impl AutoMoveTarget for ProbeTarget {
    fn in_progress(&self) -> bool {
        !self.0.stopped.load(Ordering::SeqCst)
    }

    fn step(&self) {
        self.0.steps.fetch_add(1, Ordering::SeqCst);
    }
}

fn scheduler() -> AutoMove {
    AutoMove::new(AutoMoveConfig::default())
}

/// Let the armed task run up to (but not past) the next cadence boundary.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// =========================================================================
// Config
// =========================================================================

#[test]
fn test_default_interval_is_200ms() {
    assert_eq!(
        AutoMoveConfig::default().interval,
        Duration::from_millis(200)
    );
}

#[test]
fn test_zero_interval_falls_back_to_default() {
    let config = AutoMoveConfig {
        interval: Duration::ZERO,
    }
    .validated();
    assert_eq!(config.interval, AutoMoveConfig::DEFAULT_INTERVAL);
}

// =========================================================================
// Arming and cadence
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_arm_issues_immediate_tick() {
    let probe = Probe::new();
    let mut auto = scheduler();

    auto.arm(ProbeTarget(Arc::clone(&probe)));
    settle().await;

    assert_eq!(probe.steps(), 1);
    assert!(auto.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_steps_repeat_at_fixed_cadence() {
    let probe = Probe::new();
    let mut auto = scheduler();

    auto.arm(ProbeTarget(Arc::clone(&probe)));
    settle().await;
    assert_eq!(probe.steps(), 1);

    for expected in 2..=5 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(probe.steps(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_idle_scheduler_is_not_armed() {
    let auto = scheduler();
    assert!(!auto.is_armed());
}

// =========================================================================
// Re-arming
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rearm_supersedes_previous_target() {
    let first = Probe::new();
    let second = Probe::new();
    let mut auto = scheduler();

    auto.arm(ProbeTarget(Arc::clone(&first)));
    settle().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let first_steps = first.steps();
    assert_eq!(first_steps, 3);

    auto.arm(ProbeTarget(Arc::clone(&second)));
    settle().await;
    // The new handle ticks immediately; the old one never steps again.
    assert_eq!(second.steps(), 1);
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(first.steps(), first_steps);
    assert_eq!(second.steps(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_rearming_leaves_one_live_handle() {
    let probes: Vec<Arc<Probe>> = (0..8).map(|_| Probe::new()).collect();
    let mut auto = scheduler();

    // No await between arms: every handle but the last is retired before
    // its task ever gets to run.
    for probe in &probes {
        auto.arm(ProbeTarget(Arc::clone(probe)));
    }
    settle().await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    for superseded in &probes[..probes.len() - 1] {
        assert_eq!(superseded.steps(), 0);
    }
    assert_eq!(probes.last().unwrap().steps(), 3);
    assert!(auto.is_armed());
}

// =========================================================================
// Self-cancellation and disarm
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_self_cancels_when_target_terminates() {
    let probe = Probe::new();
    let mut auto = scheduler();

    auto.arm(ProbeTarget(Arc::clone(&probe)));
    settle().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(probe.steps(), 2);

    probe.stop();
    // The next tick observes the terminated target and retires; no step
    // is issued for it or for any later interval.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(probe.steps(), 2);
    assert!(!auto.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_disarm_stops_ticks() {
    let probe = Probe::new();
    let mut auto = scheduler();

    auto.arm(ProbeTarget(Arc::clone(&probe)));
    settle().await;
    assert_eq!(probe.steps(), 1);

    auto.disarm();
    assert!(!auto.is_armed());
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(probe.steps(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disarm_without_handle_is_a_noop() {
    let mut auto = scheduler();
    auto.disarm();
    assert!(!auto.is_armed());
}
