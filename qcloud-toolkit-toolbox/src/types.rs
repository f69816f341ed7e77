//! Public types returned by toolbox operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bucket, region and key extracted from a COS object URL.
///
/// `bucket` and `region` are empty when the host is not a recognised COS
/// endpoint; `key` is always filled from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosObjectLocation {
    /// Bucket name including the appid suffix (`examplebucket-1250000000`).
    pub bucket: String,
    /// Region (`ap-guangzhou`).
    pub region: String,
    /// Percent-decoded object key, without the leading `/`.
    pub key: String,
    /// Whether the host is an internal (`cos-internal`) endpoint.
    pub internal: bool,
}

impl CosObjectLocation {
    /// Whether the URL pointed at a recognised COS endpoint.
    pub fn is_cos(&self) -> bool {
        !self.bucket.is_empty() && !self.region.is_empty()
    }
}

/// Overall status of a batch of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Fail,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Outcome of one task in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Success {
        params: serde_json::Value,
        result: serde_json::Value,
    },
    Fail {
        params: serde_json::Value,
        error: String,
    },
}

impl TaskOutcome {
    /// Successful task. Values that fail to serialize are recorded as `null`.
    pub fn success<P: Serialize + ?Sized, R: Serialize + ?Sized>(params: &P, result: &R) -> Self {
        Self::Success {
            params: serde_json::to_value(params).unwrap_or_default(),
            result: serde_json::to_value(result).unwrap_or_default(),
        }
    }

    /// Failed task.
    pub fn fail<P: Serialize + ?Sized>(params: &P, error: impl fmt::Display) -> Self {
        Self::Fail {
            params: serde_json::to_value(params).unwrap_or_default(),
            error: error.to_string(),
        }
    }

    /// Build from a `Result`.
    pub fn from_result<P, R, E>(params: &P, result: &Result<R, E>) -> Self
    where
        P: Serialize + ?Sized,
        R: Serialize,
        E: fmt::Display,
    {
        match result {
            Ok(r) => Self::success(params, r),
            Err(e) => Self::fail(params, e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Condensed report over a batch of [`TaskOutcome`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub name: String,
    pub status: TaskStatus,
    pub success: usize,
    pub total: usize,
    /// Headline followed by up to [`TaskSummary::DETAIL_LIMIT`] per-task details.
    pub messages: Vec<String>,
}
