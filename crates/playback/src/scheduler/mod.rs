//! Interruptible timed step scheduler.
//!
//! A [`PlaybackController`] owns transport state (running / paused / idle),
//! the step speed, and at most one outstanding [`SuspensionToken`]. Step
//! sequences yield through [`DelayScope::sleep`], which waits for unpaused
//! time in ticks no longer than the configured resolution ceiling, so pause
//! and cancellation are observed within one tick regardless of the requested
//! delay.

pub mod cancel;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod run;
pub mod stepper;
pub mod token;
pub mod types;

pub use cancel::CancellationFlag;
pub use controller::{DelayScope, PlaybackController};
pub use error::PlaybackError;
pub use metrics::PlaybackMetrics;
pub use run::drive;
pub use stepper::{StepMachine, Transition};
pub use token::{SuspensionToken, TokenPhase};
pub use types::{
    clamp_delay_ms, Hold, PlaybackState, RunOutcome, RunReport, TransportState, Wake,
};
