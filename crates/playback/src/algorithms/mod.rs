//! Instrumented algorithm steppers.
//!
//! Each stepper is a pure [`StepMachine`](crate::scheduler::StepMachine):
//! one `advance` call performs one visual step and returns a fresh snapshot.

pub mod bubble_sort;
pub mod next_greater;
pub mod two_sum;

pub use bubble_sort::{BubbleAction, BubbleSort, BubbleSortState};
pub use next_greater::{NextGreater, NextGreaterState, NgeAction, NO_GREATER};
pub use two_sum::{Lookup, TwoSum, TwoSumAction, TwoSumResult, TwoSumState};
