use std::time::Duration;

use tokio::time::Instant;

/// Where an outstanding wait currently is. Resolution discards the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPhase {
    /// Accumulating unpaused time since `since`.
    Waiting { since: Instant },
    /// Frozen by a pause; resumes from the stored elapsed time.
    Paused,
}

/// The single in-flight wait of a controller.
#[derive(Debug, Clone)]
pub struct SuspensionToken {
    pub id: u64,
    pub requested: Duration,
    pub started_at: Instant,
    /// Unpaused time consumed before the current waiting segment.
    pub elapsed_at_pause: Duration,
    pub phase: TokenPhase,
}

impl SuspensionToken {
    pub fn new(id: u64, requested: Duration, now: Instant, paused: bool) -> Self {
        let phase = if paused {
            TokenPhase::Paused
        } else {
            TokenPhase::Waiting { since: now }
        };
        Self {
            id,
            requested,
            started_at: now,
            elapsed_at_pause: Duration::ZERO,
            phase,
        }
    }

    /// Unpaused time consumed so far.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.phase {
            TokenPhase::Waiting { since } => {
                self.elapsed_at_pause + now.saturating_duration_since(since)
            }
            TokenPhase::Paused => self.elapsed_at_pause,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.requested.saturating_sub(self.elapsed(now))
    }

    /// Freeze the wait. Returns false if it was already paused.
    pub fn freeze(&mut self, now: Instant) -> bool {
        match self.phase {
            TokenPhase::Waiting { .. } => {
                self.elapsed_at_pause = self.elapsed(now);
                self.phase = TokenPhase::Paused;
                true
            }
            TokenPhase::Paused => false,
        }
    }

    /// The resume action: restart accumulation for the remainder.
    /// Returns false (and does nothing) unless the token is paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        match self.phase {
            TokenPhase::Paused => {
                self.phase = TokenPhase::Waiting { since: now };
                true
            }
            TokenPhase::Waiting { .. } => false,
        }
    }
}
