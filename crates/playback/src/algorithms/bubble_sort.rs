use std::collections::BTreeSet;

use serde::Serialize;

use crate::scheduler::{Hold, StepMachine, Transition};

/// What a bubble sort frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BubbleAction {
    Compare,
    Swap,
    Swapped,
    Done,
}

/// Snapshot of a bubble sort run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BubbleSortState {
    pub array: Vec<i64>,
    pub comparing: Option<(usize, usize)>,
    pub swapping: Option<(usize, usize)>,
    /// Suffix positions that already hold their final value.
    pub settled: BTreeSet<usize>,
    pub action: BubbleAction,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Compare { pass: usize, j: usize },
    Swap { pass: usize, j: usize },
    Swapped { pass: usize, j: usize },
    Finished,
}

/// Bubble sort without early exit: pass `i` compares pairs `(j, j+1)` for
/// `j` in `0..=n-2-i`, and settles index `n-1-i` when it ends.
#[derive(Debug, Clone)]
pub struct BubbleSort {
    array: Vec<i64>,
    settled: BTreeSet<usize>,
    phase: Phase,
}

impl BubbleSort {
    pub fn new(input: &[i64]) -> Self {
        let phase = if input.len() < 2 {
            Phase::Finished
        } else {
            Phase::Compare { pass: 0, j: 0 }
        };
        Self {
            array: input.to_vec(),
            settled: BTreeSet::new(),
            phase,
        }
    }

    /// Current working array.
    pub fn array(&self) -> &[i64] {
        &self.array
    }

    fn snapshot(
        &self,
        action: BubbleAction,
        comparing: Option<(usize, usize)>,
        swapping: Option<(usize, usize)>,
    ) -> BubbleSortState {
        BubbleSortState {
            array: self.array.clone(),
            comparing,
            swapping,
            settled: self.settled.clone(),
            action,
            done: action == BubbleAction::Done,
        }
    }

    /// Move past pair `(j, j+1)` of `pass`, settling the pass's last index
    /// when the inner loop is exhausted.
    fn after_pair(&mut self, pass: usize, j: usize) -> Phase {
        let n = self.array.len();
        let last_j = n - 2 - pass;
        if j < last_j {
            return Phase::Compare { pass, j: j + 1 };
        }
        self.settled.insert(n - 1 - pass);
        if pass < n - 2 {
            Phase::Compare { pass: pass + 1, j: 0 }
        } else {
            Phase::Finished
        }
    }

    fn step(label: String, state: BubbleSortState) -> Transition<BubbleSortState, Vec<i64>> {
        Transition::Step {
            label,
            state,
            hold: Hold::Normal,
        }
    }
}

impl StepMachine for BubbleSort {
    type State = BubbleSortState;
    type Output = Vec<i64>;

    fn name(&self) -> &'static str {
        "bubble_sort"
    }

    fn advance(&mut self) -> Transition<BubbleSortState, Vec<i64>> {
        match self.phase {
            Phase::Compare { pass, j } => {
                let pair = (j, j + 1);
                let (a, b) = (self.array[j], self.array[j + 1]);
                let state = self.snapshot(BubbleAction::Compare, Some(pair), None);
                self.phase = if a > b {
                    Phase::Swap { pass, j }
                } else {
                    self.after_pair(pass, j)
                };
                Self::step(format!("compare arr[{}]={} and arr[{}]={}", j, a, j + 1, b), state)
            }
            Phase::Swap { pass, j } => {
                let pair = (j, j + 1);
                let state = self.snapshot(BubbleAction::Swap, Some(pair), Some(pair));
                self.phase = Phase::Swapped { pass, j };
                Self::step(
                    format!("swap {} and {}", self.array[j], self.array[j + 1]),
                    state,
                )
            }
            Phase::Swapped { pass, j } => {
                self.array.swap(j, j + 1);
                let state = self.snapshot(BubbleAction::Swapped, None, Some((j, j + 1)));
                self.phase = self.after_pair(pass, j);
                Self::step(format!("swapped positions {} and {}", j, j + 1), state)
            }
            Phase::Finished => {
                self.settled.extend(0..self.array.len());
                Transition::Done {
                    label: "sorted".to_string(),
                    state: self.snapshot(BubbleAction::Done, None, None),
                    output: self.array.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Advance to completion, returning every published state and the output.
    fn run_to_end(input: &[i64]) -> (Vec<BubbleSortState>, Vec<i64>) {
        let mut machine = BubbleSort::new(input);
        let mut states = Vec::new();
        loop {
            match machine.advance() {
                Transition::Step { state, .. } => states.push(state),
                Transition::Done { state, output, .. } => {
                    states.push(state);
                    return (states, output);
                }
            }
        }
    }

    #[test]
    fn sorts_example_with_four_swaps() {
        let (states, output) = run_to_end(&[5, 3, 8, 1]);
        assert_eq!(output, vec![1, 3, 5, 8]);
        let swaps = states.iter().filter(|s| s.action == BubbleAction::Swap).count();
        assert_eq!(swaps, 4);
        let last = states.last().unwrap();
        assert!(last.done);
        assert_eq!(last.settled, (0..4).collect());
    }

    #[test]
    fn settled_suffix_holds_final_values() {
        let input = [9, -4, 7, 7, 0, 12, 3, -1];
        let mut sorted = input.to_vec();
        sorted.sort();

        let (states, output) = run_to_end(&input);
        assert_eq!(output, sorted);

        let mut previous_settled = 0;
        for state in &states {
            for &k in &state.settled {
                assert_eq!(state.array[k], sorted[k], "settled index {} not final", k);
            }
            // settled set only ever grows, one index per pass
            assert!(state.settled.len() >= previous_settled);
            previous_settled = state.settled.len();
            if let Some((a, b)) = state.comparing {
                assert!(!state.settled.contains(&a) && !state.settled.contains(&b));
            }
        }
    }

    #[test]
    fn compare_count_is_quadratic_without_early_exit() {
        let (states, _) = run_to_end(&[1, 2, 3, 4, 5]);
        let compares = states.iter().filter(|s| s.action == BubbleAction::Compare).count();
        assert_eq!(compares, 4 + 3 + 2 + 1);
        assert!(states.iter().all(|s| s.action != BubbleAction::Swap));
    }

    #[test]
    fn swap_sequence_is_announce_then_apply() {
        let (states, _) = run_to_end(&[2, 1]);
        let actions: Vec<BubbleAction> = states.iter().map(|s| s.action).collect();
        assert_eq!(
            actions,
            vec![
                BubbleAction::Compare,
                BubbleAction::Swap,
                BubbleAction::Swapped,
                BubbleAction::Done,
            ]
        );
        assert_eq!(states[1].array, vec![2, 1]);
        assert_eq!(states[2].array, vec![1, 2]);
    }

    #[test]
    fn trivial_inputs_finish_immediately() {
        let (states, output) = run_to_end(&[]);
        assert_eq!(states.len(), 1);
        assert!(output.is_empty());

        let (states, output) = run_to_end(&[42]);
        assert_eq!(states.len(), 1);
        assert_eq!(output, vec![42]);
        assert_eq!(states[0].settled, [0].into_iter().collect());
    }

    #[test]
    fn done_is_sticky() {
        let mut machine = BubbleSort::new(&[1]);
        assert!(matches!(machine.advance(), Transition::Done { .. }));
        assert!(matches!(machine.advance(), Transition::Done { .. }));
    }
}
