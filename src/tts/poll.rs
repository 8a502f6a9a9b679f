//! Fixed-interval status polling for asynchronous vendor jobs.

use super::types::TaskStatus;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 180,
        }
    }
}

/// Query until the job is terminal and return its file id.
///
/// `query` receives the 1-based attempt number. Errors from `query` abort the
/// loop unchanged. The wait between attempts yields to the runtime and ends
/// early when `cancel` fires.
pub(crate) async fn poll_until_terminal<F, Fut>(
    policy: PollPolicy,
    cancel: &CancellationToken,
    mut query: F,
) -> Result<String>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<TaskStatus>>,
{
    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match query(attempt).await? {
            TaskStatus::Success { file_id } => return Ok(file_id),
            TaskStatus::Failed => return Err(Error::vendor_task_failure("TTS task failed")),
            TaskStatus::Pending(status) => {
                debug!(attempt, status = %status, "task still pending");
            }
        }
        if attempt < policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(policy.interval) => {}
            }
        }
    }
    Err(Error::PollTimeout {
        attempts: policy.max_attempts,
    })
}
