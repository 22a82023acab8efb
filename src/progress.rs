//! Progress polling for in-flight stack operations.
//!
//! CloudFormation reports a status string per stack; the poller watches it
//! until IN_PROGRESS clears, tracking whether a rollback was ever seen.

use crate::api::{StackApi, StackEventRecord};
use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, Write};
use std::time::Duration;

/// Sleep abstraction so tests can drive the poll loop without real time.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Polling,
    Converged,
    Failed,
}

/// What the poll loop observed by the time it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub final_status: String,
    pub rolled_back: bool,
}

/// Watch a stack until its status no longer contains IN_PROGRESS.
///
/// Emits `-` per poll tick and `>STATUS` on every status transition. A
/// status containing ROLLBACK marks the report as rolled back, checked on
/// every iteration independently of loop termination. `max_polls` bounds
/// the loop for harness use; `None` polls until the remote state
/// converges, which is the behavior the CLI relies on.
pub async fn watch_stack(
    api: &dyn StackApi,
    delay: &dyn Delay,
    stack_id: &str,
    interval: Duration,
    max_polls: Option<usize>,
) -> Result<PollReport> {
    let mut state = PollState::Polling;
    let mut status = String::new();
    let mut rolled_back = false;
    let mut polls = 0usize;

    while state == PollState::Polling {
        if let Some(limit) = max_polls {
            if polls >= limit {
                anyhow::bail!("stack {} still in progress after {} polls", stack_id, limit);
            }
        }

        print!("-");
        io::stdout().flush().ok();
        delay.sleep(interval).await;
        polls += 1;

        if let Some(current) = api.stack_status(stack_id).await? {
            if current != status {
                status = current;
                print!(">{}", status);
                io::stdout().flush().ok();
            }

            if status.contains("ROLLBACK") {
                rolled_back = true;
            }

            if !status.contains("IN_PROGRESS") {
                state = if rolled_back {
                    PollState::Failed
                } else {
                    PollState::Converged
                };
            }
        }
    }

    Ok(PollReport {
        final_status: status,
        rolled_back: state == PollState::Failed,
    })
}

/// Events that explain a rollback: every event whose status contains FAILED.
pub async fn failed_events(
    api: &dyn StackApi,
    stack_id: &str,
) -> Result<Vec<StackEventRecord>> {
    let events = api.stack_events(stack_id).await?;
    Ok(events.into_iter().filter(is_failure).collect())
}

fn is_failure(event: &StackEventRecord) -> bool {
    event.resource_status.contains("FAILED")
}
