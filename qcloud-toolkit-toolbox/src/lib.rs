//! Toolbox utilities for qcloud serverless jobs
//!
//! 提供对象键模板替换、COS URL 解析、限流并发映射、批量任务结果汇总。
//! 所有功能无状态，独立于签名请求流水线。

mod error;
mod services;
mod types;

pub use error::{ToolboxError, ToolboxResult};
pub use services::ToolboxService;
pub use types::{CosObjectLocation, TaskOutcome, TaskStatus, TaskSummary};
