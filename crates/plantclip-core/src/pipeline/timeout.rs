//! Blocking work bounded by a stage timeout.

use std::time::Duration;

use tokio::time::timeout;

use crate::error::{ClassifyError, ClassifyResult};

/// Run `work` on a blocking thread, giving up after `timeout_ms`.
///
/// A timed-out task keeps running to completion in the background; only its
/// result is discarded.
pub(crate) async fn run_blocking<T, F>(stage: &str, timeout_ms: u64, work: F) -> ClassifyResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ClassifyResult<T> + Send + 'static,
{
    let timeout_duration = Duration::from_millis(timeout_ms);
    match timeout(timeout_duration, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ClassifyError::inference(format!(
            "{stage} task join error: {e}"
        ))),
        Err(_) => Err(ClassifyError::Timeout {
            stage: stage.to_string(),
            timeout_ms,
        }),
    }
}
