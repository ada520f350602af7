use indexmap::IndexMap;
use serde::Serialize;

use crate::scheduler::{Hold, StepMachine, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TwoSumAction {
    Check,
    Found,
    NotFound,
    Insert,
    Done,
}

/// Outcome of the complement lookup shown in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lookup {
    Pending,
    Hit,
    Miss,
}

/// Snapshot of a hash-map two-sum run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwoSumState {
    pub array: Vec<i64>,
    pub target: i64,
    /// value -> index, in insertion order.
    pub seen: IndexMap<i64, usize>,
    pub current: Option<usize>,
    /// `target - arr[current]`; `None` when it does not fit in an `i64`.
    pub need: Option<i64>,
    pub lookup: Lookup,
    pub pair: Option<(usize, usize)>,
    pub action: TwoSumAction,
    pub done: bool,
}

/// Terminal result of a completed two-sum run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TwoSumResult {
    /// Indices `(earlier, later)` of the first pair found.
    Found { pair: (usize, usize) },
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Check { i: usize },
    Found { i: usize, j: usize },
    NotFound { i: usize },
    Insert { i: usize },
    Finished(TwoSumResult),
}

/// Single-pass two-sum with a complement map. Halts on the first pair.
#[derive(Debug, Clone)]
pub struct TwoSum {
    array: Vec<i64>,
    target: i64,
    seen: IndexMap<i64, usize>,
    success_hold: u32,
    phase: Phase,
}

impl TwoSum {
    pub fn new(input: &[i64], target: i64) -> Self {
        let phase = if input.is_empty() {
            Phase::Finished(TwoSumResult::NoMatch)
        } else {
            Phase::Check { i: 0 }
        };
        Self {
            array: input.to_vec(),
            target,
            seen: IndexMap::new(),
            success_hold: 2,
            phase,
        }
    }

    /// Multiplier applied to the step delay after a pair is found.
    pub fn with_success_hold(mut self, factor: u32) -> Self {
        self.success_hold = factor.max(1);
        self
    }

    fn need(&self, i: usize) -> Option<i64> {
        self.target.checked_sub(self.array[i])
    }

    fn snapshot(
        &self,
        action: TwoSumAction,
        current: Option<usize>,
        lookup: Lookup,
        pair: Option<(usize, usize)>,
    ) -> TwoSumState {
        TwoSumState {
            array: self.array.clone(),
            target: self.target,
            seen: self.seen.clone(),
            current,
            need: current.and_then(|i| self.need(i)),
            lookup,
            pair,
            action,
            done: action == TwoSumAction::Done,
        }
    }
}

impl StepMachine for TwoSum {
    type State = TwoSumState;
    type Output = TwoSumResult;

    fn name(&self) -> &'static str {
        "two_sum"
    }

    fn advance(&mut self) -> Transition<TwoSumState, TwoSumResult> {
        match self.phase {
            Phase::Check { i } => {
                let need = self.need(i);
                let label = match need {
                    Some(n) => format!("current={} (arr={}), need {}", i, self.array[i], n),
                    None => format!("current={} (arr={}), need is out of range", i, self.array[i]),
                };
                let state = self.snapshot(TwoSumAction::Check, Some(i), Lookup::Pending, None);
                self.phase = match need.and_then(|n| self.seen.get(&n)) {
                    Some(&j) => Phase::Found { i, j },
                    None => Phase::NotFound { i },
                };
                Transition::Step { label, state, hold: Hold::Normal }
            }
            Phase::Found { i, j } => {
                let state = self.snapshot(TwoSumAction::Found, Some(i), Lookup::Hit, Some((j, i)));
                self.phase = Phase::Finished(TwoSumResult::Found { pair: (j, i) });
                Transition::Step {
                    label: format!("found pair ({}, {})", j, i),
                    state,
                    hold: Hold::Extended(self.success_hold),
                }
            }
            Phase::NotFound { i } => {
                let state = self.snapshot(TwoSumAction::NotFound, Some(i), Lookup::Miss, None);
                self.phase = Phase::Insert { i };
                Transition::Step {
                    label: "not found".to_string(),
                    state,
                    hold: Hold::Normal,
                }
            }
            Phase::Insert { i } => {
                self.seen.insert(self.array[i], i);
                let state = self.snapshot(TwoSumAction::Insert, Some(i), Lookup::Miss, None);
                self.phase = if i + 1 < self.array.len() {
                    Phase::Check { i: i + 1 }
                } else {
                    Phase::Finished(TwoSumResult::NoMatch)
                };
                Transition::Step {
                    label: format!("insert {} -> {}", self.array[i], i),
                    state,
                    hold: Hold::Normal,
                }
            }
            Phase::Finished(result) => {
                let (label, pair) = match result {
                    TwoSumResult::Found { pair } => (
                        format!("done: pair ({}, {})", pair.0, pair.1),
                        Some(pair),
                    ),
                    TwoSumResult::NoMatch => ("done: no pair found".to_string(), None),
                };
                Transition::Done {
                    label,
                    state: self.snapshot(TwoSumAction::Done, None, Lookup::Pending, pair),
                    output: result,
                }
            }
        }
    }
}
