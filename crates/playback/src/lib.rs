pub mod algorithms;
pub mod scheduler;

pub use algorithms::{BubbleSort, NextGreater, TwoSum, TwoSumResult};
pub use scheduler::{
    drive, CancellationFlag, DelayScope, Hold, PlaybackController, PlaybackError,
    PlaybackMetrics, PlaybackState, RunOutcome, RunReport, StepMachine, Transition,
    TransportState, Wake,
};
