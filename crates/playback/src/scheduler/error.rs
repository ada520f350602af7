use thiserror::Error;

/// Contract violations raised by the scheduler.
///
/// Cancellation is not represented here; it is a normal
/// [`RunOutcome::Cancelled`](super::RunOutcome::Cancelled).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error(
        "contract violation: sleep called while suspension #{outstanding} is still outstanding"
    )]
    ConcurrentSleep { outstanding: u64 },

    #[error("contract violation: run started on a controller that is not running")]
    NotRunning,
}

impl PlaybackError {
    /// Hand the violation back to the caller, or panic on the spot when built
    /// with the `strict-contracts` feature.
    pub(crate) fn raise(self) -> Self {
        if cfg!(feature = "strict-contracts") {
            panic!("{}", self);
        }
        self
    }
}
