use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

/// Transport state owned by a [`PlaybackController`](super::PlaybackController).
///
/// Only the controller's transport operations mutate it; steppers only read
/// `speed_ms` through their delay scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    /// Delay per step in milliseconds, always > 0.
    pub speed_ms: u64,
    pub running: bool,
    pub paused: bool,
}

impl PlaybackState {
    pub fn new(speed_ms: u64) -> Self {
        Self {
            speed_ms: speed_ms.max(1),
            running: false,
            paused: false,
        }
    }

    pub fn transport(&self) -> TransportState {
        match (self.running, self.paused) {
            (false, _) => TransportState::Idle,
            (true, false) => TransportState::Running,
            (true, true) => TransportState::Paused,
        }
    }
}

/// Coarse view of [`PlaybackState`] for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransportState {
    Idle,
    Running,
    Paused,
}

/// How a suspension resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The requested unpaused time has elapsed.
    Elapsed,
    /// The run's cancellation flag was latched before or during the wait.
    Cancelled,
}

/// How long a step holds before the next one, in units of the current speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    Normal,
    /// Multiply the step delay, e.g. to linger on a success state.
    Extended(u32),
}

impl Hold {
    pub fn scale(self, speed_ms: u64) -> u64 {
        match self {
            Hold::Normal => speed_ms,
            Hold::Extended(factor) => speed_ms.saturating_mul(u64::from(factor.max(1))),
        }
    }
}

/// Terminal outcome of one run. Cancellation is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<O> {
    Done(O),
    Cancelled,
}

impl<O> RunOutcome<O> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }

    pub fn done(self) -> Option<O> {
        match self {
            RunOutcome::Done(output) => Some(output),
            RunOutcome::Cancelled => None,
        }
    }
}

/// Result of driving a stepper to a terminal state.
#[derive(Debug, Clone)]
pub struct RunReport<O> {
    pub run_id: Uuid,
    pub stepper: &'static str,
    pub outcome: RunOutcome<O>,
    /// Frames handed to the observer, including the terminal frame.
    pub frames_published: usize,
    /// Suspensions entered (resolved or cancelled).
    pub suspensions: usize,
}

/// Convert a millisecond delay from UI input or arithmetic into a duration.
///
/// Negative, NaN and infinite values clamp to zero; finite values too large
/// for a `Duration` saturate to `Duration::MAX`.
pub fn clamp_delay_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
