use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::scheduler::cancel::CancellationFlag;
use crate::scheduler::error::PlaybackError;
use crate::scheduler::token::{SuspensionToken, TokenPhase};
use crate::scheduler::types::{clamp_delay_ms, Hold, Wake};

use super::PlaybackController;

/// The suspension primitive handed to a step sequence.
///
/// Bound to one run's cancellation flag. Every wait resolves either after
/// the requested amount of unpaused time or, once the flag is latched,
/// within one resolution tick.
#[derive(Debug, Clone)]
pub struct DelayScope {
    controller: PlaybackController,
    flag: CancellationFlag,
}

/// What the waiter should do next.
enum Poll {
    Resolved(Wake),
    /// Sleep at most this long, then poll again.
    Tick(Duration),
    /// Frozen by a pause; wait for a transport change.
    Parked,
}

/// Releases the token if the wait future is dropped before resolving.
struct TokenGuard<'a> {
    controller: &'a PlaybackController,
    id: u64,
}

impl Drop for TokenGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.controller.lock();
        if inner.token.as_ref().is_some_and(|t| t.id == self.id) {
            inner.token = None;
        }
    }
}

impl DelayScope {
    pub(super) fn new(controller: PlaybackController, flag: CancellationFlag) -> Self {
        Self { controller, flag }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn flag(&self) -> &CancellationFlag {
        &self.flag
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }

    /// Wait one step at the controller's current speed, scaled by `hold`.
    ///
    /// The speed is read here, so a speed change never alters a wait that is
    /// already in flight.
    pub async fn step_delay(&self, hold: Hold) -> Result<Wake, PlaybackError> {
        let ms = hold.scale(self.controller.speed_ms());
        self.sleep(Duration::from_millis(ms)).await
    }

    /// [`sleep`](Self::sleep) for raw millisecond input; negative or
    /// non-finite values clamp to zero.
    pub async fn sleep_ms(&self, ms: f64) -> Result<Wake, PlaybackError> {
        self.sleep(clamp_delay_ms(ms)).await
    }

    /// Wait for `duration` of unpaused time.
    ///
    /// Returns `Wake::Cancelled` without allocating anything if the flag is
    /// already latched. Fails with [`PlaybackError::ConcurrentSleep`] if the
    /// controller already has an outstanding wait.
    pub async fn sleep(&self, duration: Duration) -> Result<Wake, PlaybackError> {
        if self.flag.is_cancelled() {
            return Ok(Wake::Cancelled);
        }

        let id = self.register(duration)?;
        let _guard = TokenGuard {
            controller: &self.controller,
            id,
        };

        loop {
            match self.poll(id) {
                Poll::Resolved(wake) => return Ok(wake),
                Poll::Tick(tick) => {
                    tokio::select! {
                        _ = tokio::time::sleep(tick) => {}
                        _ = self.controller.wake.notified() => {}
                    }
                }
                Poll::Parked => self.controller.wake.notified().await,
            }
        }
    }

    fn register(&self, duration: Duration) -> Result<u64, PlaybackError> {
        let now = Instant::now();
        let mut inner = self.controller.lock();
        if let Some(outstanding) = inner.token.as_ref() {
            warn!(
                outstanding = outstanding.id,
                "sleep called with a wait already outstanding"
            );
            let err = PlaybackError::ConcurrentSleep {
                outstanding: outstanding.id,
            };
            return Err(err.raise());
        }
        let id = inner.next_token_id;
        inner.next_token_id += 1;
        let paused = inner.state.paused;
        inner.token = Some(SuspensionToken::new(id, duration, now, paused));
        debug!(
            token = id,
            requested_ms = duration.as_millis() as u64,
            paused,
            "suspension started"
        );
        Ok(id)
    }

    fn poll(&self, id: u64) -> Poll {
        let now = Instant::now();
        let resolution = self.controller.config.resolution();
        let mut inner = self.controller.lock();

        let ours = inner.token.as_ref().filter(|t| t.id == id);
        if self.flag.is_cancelled() {
            if ours.is_some() {
                inner.token = None;
            }
            inner.metrics.record_suspension_cancelled();
            debug!(token = id, "suspension cancelled");
            return Poll::Resolved(Wake::Cancelled);
        }

        let Some(token) = ours else {
            // Released without a latched flag; only a reset does that.
            inner.metrics.record_suspension_cancelled();
            return Poll::Resolved(Wake::Cancelled);
        };

        match token.phase {
            TokenPhase::Paused => Poll::Parked,
            TokenPhase::Waiting { .. } => {
                let remaining = token.remaining(now);
                if remaining.is_zero() {
                    let requested = token.requested;
                    inner.token = None;
                    inner.metrics.record_suspension(requested);
                    debug!(token = id, "suspension elapsed");
                    Poll::Resolved(Wake::Elapsed)
                } else {
                    Poll::Tick(remaining.min(resolution))
                }
            }
        }
    }
}
