//! Bounded-concurrency mapping over async tasks.

use std::future::Future;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::{ToolboxError, ToolboxResult};

fn check_limit(limit: usize) -> ToolboxResult<()> {
    if limit == 0 {
        return Err(ToolboxError::ValidationError(
            "Concurrency limit must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Run `f` over every item with at most `limit` futures in flight.
///
/// Results keep the input order regardless of completion order.
pub async fn map_limit<I, T, F, Fut>(items: I, limit: usize, f: F) -> ToolboxResult<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    check_limit(limit)?;
    Ok(stream::iter(items).map(f).buffered(limit).collect().await)
}

/// Like [`map_limit`], but stops at the first error.
///
/// Items not yet started when the error surfaces are never run.
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
    check_limit(limit)?;
    Ok(stream::iter(items).map(f).buffered(limit).try_collect().await)
}
