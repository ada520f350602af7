use serde::Serialize;

use crate::scheduler::{Hold, StepMachine, Transition};

/// Result value for positions with no greater element to their right.
pub const NO_GREATER: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NgeAction {
    Check,
    Pop,
    Popped,
    Push,
    Done,
}

/// Snapshot of a monotonic-stack next-greater-element run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextGreaterState {
    pub array: Vec<i64>,
    pub result: Vec<i64>,
    /// Indices, bottom to top.
    pub stack: Vec<usize>,
    pub current: Option<usize>,
    /// Index being popped (announced or just removed).
    pub popped: Option<usize>,
    pub action: NgeAction,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Check { i: usize },
    Pop { i: usize },
    Popped { i: usize },
    Push { i: usize },
    Finished,
}

/// Next greater element via an explicit index stack.
#[derive(Debug, Clone)]
pub struct NextGreater {
    array: Vec<i64>,
    result: Vec<i64>,
    stack: Vec<usize>,
    phase: Phase,
}

impl NextGreater {
    pub fn new(input: &[i64]) -> Self {
        let phase = if input.is_empty() {
            Phase::Finished
        } else {
            Phase::Check { i: 0 }
        };
        Self {
            array: input.to_vec(),
            result: vec![NO_GREATER; input.len()],
            stack: Vec::with_capacity(input.len()),
            phase,
        }
    }

    fn snapshot(
        &self,
        action: NgeAction,
        current: Option<usize>,
        popped: Option<usize>,
    ) -> NextGreaterState {
        NextGreaterState {
            array: self.array.clone(),
            result: self.result.clone(),
            stack: self.stack.clone(),
            current,
            popped,
            action,
            done: action == NgeAction::Done,
        }
    }

    /// Pop while the top is smaller than `arr[i]`, otherwise push `i`.
    fn decide(&self, i: usize) -> Phase {
        match self.stack.last() {
            Some(&top) if self.array[top] < self.array[i] => Phase::Pop { i },
            _ => Phase::Push { i },
        }
    }

    fn step(label: String, state: NextGreaterState) -> Transition<NextGreaterState, Vec<i64>> {
        Transition::Step {
            label,
            state,
            hold: Hold::Normal,
        }
    }
}

impl StepMachine for NextGreater {
    type State = NextGreaterState;
    type Output = Vec<i64>;

    fn name(&self) -> &'static str {
        "next_greater"
    }

    fn advance(&mut self) -> Transition<NextGreaterState, Vec<i64>> {
        match self.phase {
            Phase::Check { i } => {
                let label = match self.stack.last() {
                    Some(&top) => format!(
                        "check arr[{}]={} against stack top arr[{}]={}",
                        i, self.array[i], top, self.array[top]
                    ),
                    None => format!("check arr[{}]={} against empty stack", i, self.array[i]),
                };
                let state = self.snapshot(NgeAction::Check, Some(i), None);
                self.phase = self.decide(i);
                Self::step(label, state)
            }
            Phase::Pop { i } => {
                let top = self.stack.last().copied();
                let label = match top {
                    Some(t) => format!(
                        "pop {}: next greater of arr[{}] is {}",
                        t, t, self.array[i]
                    ),
                    None => "pop".to_string(),
                };
                let state = self.snapshot(NgeAction::Pop, Some(i), top);
                self.phase = Phase::Popped { i };
                Self::step(label, state)
            }
            Phase::Popped { i } => {
                let popped = self.stack.pop();
                if let Some(t) = popped {
                    self.result[t] = self.array[i];
                }
                let state = self.snapshot(NgeAction::Popped, Some(i), popped);
                self.phase = self.decide(i);
                Self::step(format!("result updated: {:?}", self.result), state)
            }
            Phase::Push { i } => {
                self.stack.push(i);
                let state = self.snapshot(NgeAction::Push, Some(i), None);
                self.phase = if i + 1 < self.array.len() {
                    Phase::Check { i: i + 1 }
                } else {
                    Phase::Finished
                };
                Self::step(format!("push {}", i), state)
            }
            Phase::Finished => {
                self.stack.clear();
                Transition::Done {
                    label: "done".to_string(),
                    state: self.snapshot(NgeAction::Done, None, None),
                    output: self.result.clone(),
                }
            }
        }
    }
}
