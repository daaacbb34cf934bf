use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use crate::application::ports::FileLoaderError;

/// Runs CPU-bound parsing on the blocking pool under a deadline.
///
/// Panics inside parser crates are turned into `ExtractionFailed`.
pub(super) async fn run_blocking<T, F>(
    timeout: Duration,
    task: &'static str,
    work: F,
) -> Result<T, FileLoaderError>
where
    F: FnOnce() -> Result<T, FileLoaderError> + Send + 'static,
    T: Send + 'static,
{
    tokio::time::timeout(
        timeout,
        tokio::task::spawn_blocking(move || {
            catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
                Err(FileLoaderError::ExtractionFailed(format!(
                    "panic during {task}"
                )))
            })
        }),
    )
    .await
    .map_err(|_| FileLoaderError::ExtractionFailed(format!("{task} timed out")))?
    .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))?
}
