//! Batch result summaries for job logs.

use crate::types::{TaskOutcome, TaskStatus, TaskSummary};

impl TaskSummary {
    /// Maximum number of per-task detail messages.
    pub const DETAIL_LIMIT: usize = 20;

    /// Summarize a batch.
    ///
    /// The first message is the headline (`Result: <name> <status>`, success
    /// and total counts). When the batch is larger than [`DETAIL_LIMIT`](Self::DETAIL_LIMIT)
    /// and contains failures, only failure details are listed.
    pub fn from_outcomes(name: &str, outcomes: &[TaskOutcome]) -> Self {
        let truncated = outcomes.len() > Self::DETAIL_LIMIT;
        let has_error = outcomes.iter().any(|o| !o.is_success());

        let mut success = 0;
        let mut details = Vec::new();
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Fail { params, error } => {
                    if details.len() < Self::DETAIL_LIMIT {
                        details.push(format!(
                            "TaskStatus: fail\nParams: {params}\nError: {error}"
                        ));
                    }
                }
                TaskOutcome::Success { params, result } => {
                    if details.len() < Self::DETAIL_LIMIT && !(truncated && has_error) {
                        details.push(format!(
                            "TaskStatus: success\nParams: {params}\nResult: {result}"
                        ));
                    }
                    success += 1;
                }
            }
        }

        let total = outcomes.len();
        let status = if success == total {
            TaskStatus::Success
        } else {
            TaskStatus::Fail
        };

        let mut messages = Vec::with_capacity(details.len() + 1);
        messages.push(format!(
            "Result: {name} {status}\nsuccess: {success}\ntotal: {total}"
        ));
        messages.extend(details);

        Self {
            name: name.to_string(),
            status,
            success,
            total,
            messages,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }
}
