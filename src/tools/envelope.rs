//! Result envelope construction and vendor-error classification.
//!
//! Every tool returns a flat JSON envelope with a `success` flag: exactly
//! one of the success/failure shapes is populated, and no failure escapes a
//! tool as an error. Vendor errors are classified in a fixed precedence:
//! failed-task, then not-found, then not-cancelable, then generic.

use serde_json::{Map, Value, json};

use crate::client::RunwayError;
use crate::modules::tasks;
use crate::tools::spec::{ToolError, ToolResult};
use crate::utils::pretty_json;

// === Envelope Builders ===

/// Build a failure envelope with a short `error` classification.
#[must_use]
pub fn failure(error: impl Into<String>) -> Value {
    json!({
        "success": false,
        "error": error.into(),
    })
}

/// Build the failure envelope for a locally rejected invocation.
#[must_use]
pub fn rejection(err: &ToolError) -> Value {
    failure(err.to_string())
}

/// Build the success envelope for a completed generation task.
///
/// `output_key` names the primary output locator (`imageUrl`/`videoUrl`),
/// set to the first element of the task's output collection or null when
/// the task succeeded without producible output. Non-null `echoed` fields
/// are copied into the envelope so the caller can correlate the result
/// with its request.
#[must_use]
pub fn generation_success(task: &Value, output_key: &str, echoed: Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), json!(true));
    if let Some(task_id) = tasks::extract_task_id(task) {
        envelope.insert("taskId".to_string(), json!(task_id));
    }
    if let Some(status) = tasks::extract_status(task) {
        envelope.insert("status".to_string(), json!(status));
    }
    if let Some(created_at) = task.get("createdAt").and_then(|v| v.as_str()) {
        envelope.insert("createdAt".to_string(), json!(created_at));
    }
    envelope.insert(output_key.to_string(), json!(tasks::first_output(task)));

    if let Value::Object(fields) = echoed {
        for (key, value) in fields {
            if !value.is_null() {
                envelope.insert(key, value);
            }
        }
    }

    Value::Object(envelope)
}

/// Build the success envelope for a task-status lookup.
#[must_use]
pub fn task_status_success(task: &Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), json!(true));
    if let Some(task_id) = tasks::extract_task_id(task) {
        envelope.insert("taskId".to_string(), json!(task_id));
    }
    if let Some(status) = tasks::extract_status(task) {
        envelope.insert("status".to_string(), json!(status));
    }
    for key in ["createdAt", "progress", "output", "failure", "failureCode"] {
        if let Some(value) = task.get(key)
            && !value.is_null()
        {
            envelope.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(envelope)
}

/// Build the success envelope for a completed cancellation.
#[must_use]
pub fn cancel_success(task_id: &str) -> Value {
    json!({
        "success": true,
        "taskId": task_id,
        "status": "CANCELLED",
    })
}

// === Vendor Error Classification ===

/// Map a vendor error to a failure envelope.
///
/// `operation` is a verb phrase ("generate image"); `requested_task_id` is
/// the id the caller supplied, echoed back on resource errors. The first
/// matching classification wins: failed-task, not-found, not-cancelable,
/// then generic.
#[must_use]
pub fn classify(operation: &str, requested_task_id: Option<&str>, err: RunwayError) -> Value {
    match err {
        RunwayError::TaskFailed {
            task_id, details, ..
        } => {
            let mut envelope = failure(format!("{operation} task failed"));
            envelope["taskId"] = json!(task_id);
            envelope["details"] = details;
            envelope
        }
        RunwayError::NotFound { task_id } => {
            let mut envelope = failure("Task not found");
            envelope["taskId"] = json!(requested_task_id.unwrap_or(&task_id));
            envelope
        }
        RunwayError::NotCancelable { task_id } => {
            let mut envelope = failure("Task cannot be canceled");
            envelope["taskId"] = json!(requested_task_id.unwrap_or(&task_id));
            envelope
        }
        other => {
            let mut envelope = failure(format!("Failed to {operation}"));
            envelope["message"] = json!(other.to_string());
            envelope
        }
    }
}

// === Conversion ===

/// Convert an envelope into a `ToolResult` whose flag mirrors the envelope.
///
/// The envelope is carried twice: pretty-printed in `content` for the host
/// transcript, structured in `metadata` for programmatic consumers.
#[must_use]
pub fn to_result(envelope: Value) -> ToolResult {
    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let content = pretty_json(&envelope);
    let result = if success {
        ToolResult::success(content)
    } else {
        ToolResult::error(content)
    };
    result.with_metadata(envelope)
}

// === Unit Tests ===
