//! # Repetition Module / 重复模块
//!
//! How many times, and under what condition, a run repeats.
//!
//! 一次运行重复多少次，以及在什么条件下重复。

use crate::core::errors::EntryPointError;
use crate::core::options::Options;

/// Decides whether another iteration starts after one ends.
/// 决定一次迭代结束后是否开始下一次迭代。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ContinuationCondition {
    /// Repeat until the iteration count is exhausted.
    /// 重复直到迭代次数用尽。
    #[default]
    Always,
    /// Stop after the first iteration that recorded an issue (`--repeat-until fail`).
    /// 在第一次记录了问题的迭代之后停止（`--repeat-until fail`）。
    UntilIssueRecorded,
    /// Stop after the first iteration without issues (`--repeat-until pass`).
    /// 在第一次没有问题的迭代之后停止（`--repeat-until pass`）。
    WhileIssueRecorded,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RepetitionPolicy {
    pub maximum_iteration_count: usize,
    pub continuation_condition: ContinuationCondition,
}

impl Default for RepetitionPolicy {
    fn default() -> Self {
        Self::once()
    }
}

impl RepetitionPolicy {
    /// Marks an iteration count with no upper bound; the condition ends the run.
    pub const UNBOUNDED: usize = usize::MAX;

    pub fn once() -> Self {
        Self {
            maximum_iteration_count: 1,
            continuation_condition: ContinuationCondition::Always,
        }
    }

    /// Builds the policy from `repetitions` and `repeat_until`.
    ///
    /// Non-positive repetition counts are ignored. A continuation condition
    /// given without an explicit count makes the count unbounded.
    pub fn from_options(options: &Options) -> Result<Self, EntryPointError> {
        let mut policy = Self::once();

        let explicit_count = options.repetitions.filter(|count| *count > 0);
        if let Some(count) = explicit_count {
            policy.maximum_iteration_count = usize::try_from(count).unwrap_or(Self::UNBOUNDED);
        }

        if let Some(keyword) = &options.repeat_until {
            policy.continuation_condition = if keyword.eq_ignore_ascii_case("pass") {
                ContinuationCondition::WhileIssueRecorded
            } else if keyword.eq_ignore_ascii_case("fail") {
                ContinuationCondition::UntilIssueRecorded
            } else {
                return Err(EntryPointError::invalid_argument(
                    "--repeat-until",
                    format!("'{keyword}' is not one of 'pass' or 'fail'"),
                ));
            };

            if explicit_count.is_none() {
                policy.maximum_iteration_count = Self::UNBOUNDED;
            }
        }

        Ok(policy)
    }

    pub fn is_unbounded(&self) -> bool {
        self.maximum_iteration_count == Self::UNBOUNDED
    }

    /// Whether another iteration should start after iteration number
    /// `completed` (1-based) finished, given whether it recorded an issue.
    pub fn should_continue(&self, completed: usize, issue_recorded: bool) -> bool {
        if completed >= self.maximum_iteration_count {
            return false;
        }
        match self.continuation_condition {
            ContinuationCondition::Always => true,
            ContinuationCondition::UntilIssueRecorded => !issue_recorded,
            ContinuationCondition::WhileIssueRecorded => issue_recorded,
        }
    }
}
