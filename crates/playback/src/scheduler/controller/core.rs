use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use algoviz_core::PlaybackConfig;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

use crate::scheduler::cancel::CancellationFlag;
use crate::scheduler::metrics::PlaybackMetrics;
use crate::scheduler::token::SuspensionToken;
use crate::scheduler::types::{PlaybackState, TransportState};

use super::DelayScope;

/// Mutable state behind the controller's lock.
#[derive(Debug)]
pub(super) struct ControllerInner {
    pub(super) state: PlaybackState,
    /// Flag of the current (or most recent) run.
    pub(super) flag: CancellationFlag,
    /// The single outstanding wait, if any.
    pub(super) token: Option<SuspensionToken>,
    pub(super) next_token_id: u64,
    /// Set while paused, to account paused time.
    pub(super) paused_at: Option<Instant>,
    pub(super) metrics: PlaybackMetrics,
}

/// Owns one visualizer's transport state, speed, and outstanding suspension.
///
/// Cheap to clone; clones control the same instance. Separate controllers
/// share nothing.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    pub(super) config: Arc<PlaybackConfig>,
    pub(super) inner: Arc<Mutex<ControllerInner>>,
    /// Wakes the waiter after any transport change.
    pub(super) wake: Arc<Notify>,
}

impl PlaybackController {
    /// Create an idle controller at the configured default speed.
    pub fn new(config: PlaybackConfig) -> Self {
        let speed = config.clamp_speed(config.default_speed_ms);
        debug!(speed_ms = speed, resolution_ms = config.resolution_ms, "controller created");
        Self {
            config: Arc::new(config),
            inner: Arc::new(Mutex::new(ControllerInner {
                state: PlaybackState::new(speed),
                flag: CancellationFlag::new(),
                token: None,
                next_token_id: 1,
                paused_at: None,
                metrics: PlaybackMetrics::default(),
            })),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Every critical section leaves the state consistent, so a poisoned
    /// lock is still safe to use.
    pub(super) fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the transport state.
    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn transport(&self) -> TransportState {
        self.lock().state.transport()
    }

    pub fn speed_ms(&self) -> u64 {
        self.lock().state.speed_ms
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Snapshot of the playback counters.
    pub fn metrics(&self) -> PlaybackMetrics {
        self.lock().metrics.clone()
    }

    /// Whether a wait is currently outstanding.
    pub fn has_outstanding_wait(&self) -> bool {
        self.lock().token.is_some()
    }

    /// A delay scope bound to the current run's cancellation flag.
    ///
    /// Take the scope after `play()` has armed the run; a scope taken from a
    /// reset run stays cancelled even after the controller is re-armed.
    pub fn scope(&self) -> DelayScope {
        let flag = self.lock().flag.clone();
        DelayScope::new(self.clone(), flag)
    }
}
