use super::types::Hold;

/// One transition of a stepper.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<S, O> {
    /// Publish `state`, then suspend for `hold` before the next transition.
    Step { label: String, state: S, hold: Hold },
    /// Publish the terminal `state`; the run ends with `output`.
    Done { label: String, state: S, output: O },
}

/// A deterministic, timer-free algorithm state machine.
///
/// Each call to `advance` performs exactly one step's worth of work and
/// returns a fresh snapshot; timing is left entirely to the driver. Once a
/// machine returns `Done` it keeps returning `Done`.
pub trait StepMachine {
    /// Snapshot published after every step.
    type State: Clone;
    /// Payload of a completed run.
    type Output;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    fn advance(&mut self) -> Transition<Self::State, Self::Output>;
}
