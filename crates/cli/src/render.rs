//! Plain-text rendering of frames and run outcomes.

use algoviz_playback::algorithms::{BubbleSortState, NextGreaterState, TwoSumResult, TwoSumState};

/// One-line text view of a snapshot.
pub trait RenderText {
    fn render(&self) -> String;
}

/// One-line summary of a completed run's output.
pub trait Summary {
    fn summary(&self) -> String;
}

/// Render `values`, bracketing marked positions: `[3] 5 <8> (9)`.
fn cells(values: &[i64], mark: impl Fn(usize) -> Option<(char, char)>) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| match mark(i) {
            Some((open, close)) => format!("{}{}{}", open, v, close),
            None => v.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn in_pair(pair: Option<(usize, usize)>, i: usize) -> bool {
    pair.is_some_and(|(a, b)| a == i || b == i)
}

impl RenderText for BubbleSortState {
    fn render(&self) -> String {
        cells(&self.array, |i| {
            if in_pair(self.swapping, i) {
                Some(('<', '>'))
            } else if in_pair(self.comparing, i) {
                Some(('[', ']'))
            } else if self.settled.contains(&i) {
                Some(('(', ')'))
            } else {
                None
            }
        })
    }
}

impl RenderText for NextGreaterState {
    fn render(&self) -> String {
        let array = cells(&self.array, |i| {
            if self.popped == Some(i) {
                Some(('<', '>'))
            } else if self.current == Some(i) {
                Some(('[', ']'))
            } else {
                None
            }
        });
        let stack: Vec<String> = self
            .stack
            .iter()
            .map(|&k| format!("{}:{}", k, self.array[k]))
            .collect();
        format!(
            "{} | stack [{}] | result {:?}",
            array,
            stack.join(", "),
            self.result
        )
    }
}

impl RenderText for TwoSumState {
    fn render(&self) -> String {
        let array = cells(&self.array, |i| {
            if in_pair(self.pair, i) {
                Some(('<', '>'))
            } else if self.current == Some(i) {
                Some(('[', ']'))
            } else {
                None
            }
        });
        let seen: Vec<String> = self
            .seen
            .iter()
            .map(|(value, index)| format!("{}->{}", value, index))
            .collect();
        let need = match self.need {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} | target {} need {} | map {{{}}}",
            array,
            self.target,
            need,
            seen.join(", ")
        )
    }
}

impl Summary for Vec<i64> {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

impl Summary for TwoSumResult {
    fn summary(&self) -> String {
        match self {
            TwoSumResult::Found { pair } => format!("pair ({}, {})", pair.0, pair.1),
            TwoSumResult::NoMatch => "no match".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_playback::algorithms::{BubbleSort, NextGreater, TwoSum};
    use algoviz_playback::{StepMachine, Transition};

    fn first_state<M: StepMachine>(machine: &mut M) -> M::State {
        match machine.advance() {
            Transition::Step { state, .. } | Transition::Done { state, .. } => state,
        }
    }

    #[test]
    fn bubble_marks_compared_pair() {
        let state = first_state(&mut BubbleSort::new(&[5, 3, 8]));
        assert_eq!(state.render(), "[5] [3] 8");
    }

    #[test]
    fn nge_shows_stack_and_result() {
        let state = first_state(&mut NextGreater::new(&[2, 1]));
        assert_eq!(state.render(), "[2] 1 | stack [] | result [-1, -1]");
    }

    #[test]
    fn two_sum_shows_need() {
        let state = first_state(&mut TwoSum::new(&[2, 7], 9));
        assert_eq!(state.render(), "[2] 7 | target 9 need 7 | map {}");
    }

    #[test]
    fn summaries() {
        assert_eq!(vec![1, 2].summary(), "[1, 2]");
        assert_eq!(TwoSumResult::Found { pair: (0, 1) }.summary(), "pair (0, 1)");
        assert_eq!(TwoSumResult::NoMatch.summary(), "no match");
    }
}
