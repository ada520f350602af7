//! The publish boundary between a running stepper and whatever renders it.
//!
//! A [`Frame`] is a read-only snapshot plus a short operation label.
//! Publishing is synchronous so that a frame is either fully visible to the
//! observer or not at all; the only await points of a run are its
//! suspensions.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// One published visualization step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame<S> {
    /// 0-based publish index within a run.
    pub seq: usize,
    /// Human-readable operation label, e.g. `compare arr[0] and arr[1]`.
    pub label: String,
    /// Algorithm-specific snapshot.
    pub state: S,
}

/// Receives frames as a run publishes them.
pub trait Observer<S> {
    fn publish(&mut self, frame: Frame<S>);
}

impl<S, F> Observer<S> for F
where
    F: FnMut(Frame<S>),
{
    fn publish(&mut self, frame: Frame<S>) {
        self(frame)
    }
}

impl<S> Observer<S> for Vec<Frame<S>> {
    fn publish(&mut self, frame: Frame<S>) {
        self.push(frame);
    }
}

impl<S> Observer<S> for UnboundedSender<Frame<S>> {
    fn publish(&mut self, frame: Frame<S>) {
        let seq = frame.seq;
        if self.send(frame).is_err() {
            debug!(seq, "frame receiver dropped; discarding frame");
        }
    }
}
