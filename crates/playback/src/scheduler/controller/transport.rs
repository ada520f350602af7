use tokio::time::Instant;
use tracing::{debug, info};

use crate::scheduler::cancel::CancellationFlag;

use super::core::ControllerInner;
use super::PlaybackController;

impl PlaybackController {
    /// Resume a paused run, or arm a fresh run when idle.
    ///
    /// Resuming restarts the frozen wait with its remaining time intact.
    /// Arming allocates a new cancellation flag; it does not start a stepper.
    pub fn play(&self) {
        let now = Instant::now();
        let mut inner = self.lock();
        if inner.state.paused {
            inner.state.paused = false;
            Self::account_pause(&mut inner, now);
            let resumed = inner.token.as_mut().is_some_and(|t| t.resume(now));
            debug!(resumed, "play: resumed");
            drop(inner);
            self.wake.notify_one();
        } else if !inner.state.running {
            inner.flag = CancellationFlag::new();
            inner.state.running = true;
            inner.state.paused = false;
            debug!("play: armed new run");
        }
    }

    /// Freeze the in-flight wait. No effect when idle or already paused.
    pub fn pause(&self) {
        let now = Instant::now();
        let mut inner = self.lock();
        if !inner.state.running || inner.state.paused {
            return;
        }
        inner.state.paused = true;
        inner.paused_at = Some(now);
        if let Some(token) = inner.token.as_mut() {
            if token.freeze(now) {
                debug!(
                    token = token.id,
                    remaining_ms = token.remaining(now).as_millis() as u64,
                    "pause: froze wait"
                );
            }
        }
        drop(inner);
        self.wake.notify_one();
    }

    /// Abandon the current run: latch its flag, clear transport state, and
    /// release the outstanding wait. A no-op on an idle controller with
    /// nothing outstanding.
    pub fn reset(&self) {
        let now = Instant::now();
        let mut inner = self.lock();
        if !inner.state.running && inner.token.is_none() {
            debug!("reset: idle, nothing to cancel");
            return;
        }
        inner.flag.cancel();
        inner.state.running = false;
        inner.state.paused = false;
        Self::account_pause(&mut inner, now);
        let released = inner.token.take().map(|t| t.id);
        info!(released_token = ?released, "reset: run cancelled");
        drop(inner);
        self.wake.notify_one();
    }

    /// Clear running/paused without cancelling. Used when a run completes.
    ///
    /// A wait that was frozen by a pause keeps going from its remainder.
    pub fn stop(&self) {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.state.running = false;
        if inner.state.paused {
            inner.state.paused = false;
            Self::account_pause(&mut inner, now);
            if let Some(token) = inner.token.as_mut() {
                token.resume(now);
            }
        }
        drop(inner);
        self.wake.notify_one();
    }

    /// Change the delay per step. Applies from the next suspension on.
    pub fn set_speed(&self, ms: u64) {
        let speed = self.config.clamp_speed(ms);
        let mut inner = self.lock();
        if inner.state.speed_ms != speed {
            debug!(from = inner.state.speed_ms, to = speed, "speed changed");
        }
        inner.state.speed_ms = speed;
    }

    /// Whether `flag` belongs to the run the controller currently tracks.
    pub(crate) fn is_current_run(&self, flag: &CancellationFlag) -> bool {
        self.lock().flag.same_run(flag)
    }

    pub(crate) fn record_run_started(&self) {
        self.lock().metrics.record_run_started();
    }

    pub(crate) fn record_run_cancelled(&self) {
        self.lock().metrics.record_run_cancelled();
    }

    /// Complete a run normally. Only stops the controller if it still
    /// tracks this run; a newer run armed after a reset is left alone.
    pub(crate) fn finish_run(&self, flag: &CancellationFlag) {
        {
            let mut inner = self.lock();
            inner.metrics.record_run_completed();
        }
        if self.is_current_run(flag) {
            self.stop();
        }
    }

    fn account_pause(inner: &mut ControllerInner, now: Instant) {
        if let Some(paused_at) = inner.paused_at.take() {
            inner.metrics.record_paused(now.saturating_duration_since(paused_at));
        }
    }
}
