//! Stateless service façade exposing all toolbox operations.
//!
//! Every method on [`ToolboxService`] is an associated function — no instance needed.

mod concurrency;
mod cos_url;
mod summary;
mod template;

use std::collections::BTreeMap;
use std::future::Future;

use crate::error::ToolboxResult;
use crate::types::{CosObjectLocation, TaskOutcome, TaskSummary};

/// Entry point for all toolbox operations.
///
/// ```rust
/// use qcloud_toolkit_toolbox::ToolboxService;
///
/// let vars = ToolboxService::object_key_vars("logs/app.log");
/// let key = ToolboxService::replace_template("backup/${Key}", &vars).unwrap();
/// assert_eq!(key, "backup/logs/app.log");
/// ```
pub struct ToolboxService;

impl ToolboxService {
    /// Replace every map key occurring in `template` with its value.
    ///
    /// Unmatched `${...}` placeholders render as the empty string.
    pub fn replace_template(
        template: &str,
        map: &BTreeMap<String, String>,
    ) -> ToolboxResult<String> {
        template::replace_template(template, map)
    }

    /// `${Key}`, `${Dir}`, `${Name}`, `${BaseName}` and `${Ext}` for an object key.
    pub fn object_key_vars(key: &str) -> BTreeMap<String, String> {
        template::object_key_vars(key)
    }

    /// Render a target object key from a template and a source key.
    pub fn render_object_key(template: &str, source_key: &str) -> ToolboxResult<String> {
        template::replace_template(template, &template::object_key_vars(source_key))
    }

    /// Extract bucket, region and key from a COS object URL.
    pub fn parse_cos_url(url: &str) -> ToolboxResult<CosObjectLocation> {
        cos_url::parse_cos_url(url)
    }

    /// Whether the URL already carries a `q-signature` query parameter.
    pub fn is_presigned_url(url: &str) -> ToolboxResult<bool> {
        cos_url::is_presigned_url(url)
    }

    /// Public `myqcloud.com` URL for an object.
    pub fn cos_object_url(bucket: &str, region: &str, key: &str) -> String {
        cos_url::cos_object_url(bucket, region, key)
    }

    /// Map `items` through `f` with at most `limit` futures in flight, keeping input order.
    pub async fn map_limit<I, T, F, Fut>(items: I, limit: usize, f: F) -> ToolboxResult<Vec<T>>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        concurrency::map_limit(items, limit, f).await
    }

    /// [`map_limit`](Self::map_limit) that stops at the first `Err`.
    pub async fn try_map_limit<I, T, E, F, Fut>(
        items: I,
        limit: usize,
        f: F,
    ) -> ToolboxResult<Result<Vec<T>, E>>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        concurrency::try_map_limit(items, limit, f).await
    }

    /// Summarize a batch of task outcomes for logging.
    pub fn summarize(name: &str, outcomes: &[TaskOutcome]) -> TaskSummary {
        TaskSummary::from_outcomes(name, outcomes)
    }
}
