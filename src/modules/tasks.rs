//! Task lifecycle API wrappers for Runway.
//!
//! Tasks move through `PENDING -> RUNNING -> {SUCCEEDED, FAILED, CANCELLED}`
//! (with a transient `THROTTLED` before `RUNNING`); terminal statuses never
//! transition again.

use serde_json::Value;
use tokio::time::{Duration, sleep};

use crate::client::{RunwayClient, RunwayError};

/// Interval between task status polls while awaiting completion.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

const TERMINAL_STATUSES: [&str; 3] = ["SUCCEEDED", "FAILED", "CANCELLED"];

/// Whether a task status admits no further transitions.
#[must_use]
pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

// === API Calls ===

/// Fetch the current state of a task by id.
pub async fn retrieve(client: &RunwayClient, task_id: &str) -> Result<Value, RunwayError> {
    match client.get_json(&format!("/v1/tasks/{task_id}")).await {
        Err(RunwayError::Api { status: 404, .. }) => Err(RunwayError::NotFound {
            task_id: task_id.to_string(),
        }),
        other => other,
    }
}

/// Cancel a task by id.
///
/// The vendor answers 404 for an unknown id and 400/409 for a task already
/// in a terminal state; both are mapped to their dedicated error variants.
pub async fn cancel(client: &RunwayClient, task_id: &str) -> Result<Value, RunwayError> {
    match client.delete_json(&format!("/v1/tasks/{task_id}")).await {
        Err(RunwayError::Api { status: 404, .. }) => Err(RunwayError::NotFound {
            task_id: task_id.to_string(),
        }),
        Err(RunwayError::Api {
            status: 400 | 409, ..
        }) => Err(RunwayError::NotCancelable {
            task_id: task_id.to_string(),
        }),
        other => other,
    }
}

/// Poll a task until it reaches a terminal status.
///
/// Returns the final task object on `SUCCEEDED`; any other terminal status
/// (including a concurrent cancellation observed mid-poll) is surfaced as
/// [`RunwayError::TaskFailed`] carrying the full task payload. A task
/// object without a `status` field ends the poll with
/// [`RunwayError::Unexpected`] rather than looping on it.
pub async fn wait_for_task(client: &RunwayClient, task_id: &str) -> Result<Value, RunwayError> {
    loop {
        let task = retrieve(client, task_id).await?;

        let Some(status) = extract_status(&task) else {
            return Err(RunwayError::Unexpected(format!(
                "task {task_id} payload carries no status: {task}"
            )));
        };
        if status == "SUCCEEDED" {
            return Ok(task);
        }
        if is_terminal(&status) {
            return Err(RunwayError::TaskFailed {
                task_id: task_id.to_string(),
                status,
                details: task,
            });
        }

        sleep(POLL_INTERVAL).await;
    }
}

/// Submit a generation request and wait for the resulting task to finish.
pub async fn submit_and_wait(
    client: &RunwayClient,
    path: &str,
    body: &Value,
) -> Result<Value, RunwayError> {
    let response = client.post_json(path, body).await?;
    let Some(task_id) = extract_task_id(&response) else {
        return Err(RunwayError::Unexpected(format!(
            "submission to {path} returned no task id: {response}"
        )));
    };
    wait_for_task(client, &task_id).await
}

// === Task Accessors ===

/// Extract the task id from a submission or task payload.
#[must_use]
pub fn extract_task_id(response: &Value) -> Option<String> {
    response
        .get("id")
        .and_then(|v| v.as_str())
        .map(std::string::ToString::to_string)
}

/// Extract the status string from a task payload.
#[must_use]
pub fn extract_status(task: &Value) -> Option<String> {
    task.get("status")
        .and_then(|v| v.as_str())
        .map(std::string::ToString::to_string)
}

/// The primary output locator: first element of the task's output collection.
#[must_use]
pub fn first_output(task: &Value) -> Option<String> {
    task.get("output")
        .and_then(|v| v.as_array())
        .and_then(|outputs| outputs.first())
        .and_then(|v| v.as_str())
        .map(std::string::ToString::to_string)
}

// === Unit Tests ===
