//! Tool specification traits for the runway-tools adapter system.
//!
//! This module defines the core abstractions for tools:
//! - `ToolSpec`: The main trait that all tools must implement
//! - `ToolContext`: Execution context (config + shared vendor client)
//! - `ToolResult`: Unified result type for tool execution
//! - `ToolCapability`: Capabilities of tools

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::client::RunwayClient;
use crate::config::Config;

/// Capabilities that a tool may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCapability {
    /// Tool only reads remote state, never creates vendor tasks
    ReadOnly,
    /// Tool makes network requests
    Network,
}

/// Errors that can occur during tool validation and dispatch.
///
/// Display strings double as the `error` field of failure envelopes, so
/// they are phrased for the calling host, not for logs.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{variable} environment variable is not set.")]
    MissingCredential { variable: &'static str },

    #[error("Failed to execute tool: {message}")]
    ExecutionFailed { message: String },

    #[error("Failed to locate tool: {message}")]
    NotAvailable { message: String },
}

impl ToolError {
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn missing_credential(variable: &'static str) -> Self {
        Self::MissingCredential { variable }
    }

    #[must_use]
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
        }
    }

    #[must_use]
    pub fn not_available(msg: impl Into<String>) -> Self {
        Self::NotAvailable {
            message: msg.into(),
        }
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The output content (the JSON result envelope, pretty-printed)
    pub content: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Optional structured metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolResult {
    /// Create a successful result with content.
    #[must_use]
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
            metadata: None,
        }
    }

    /// Create an error result with message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            success: false,
            metadata: None,
        }
    }

    /// Add metadata to the result.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Context passed to tools during execution.
///
/// Holds the process-wide configuration and a lazily-initialized Runway
/// client shared by all invocations. Nothing here is mutated after the
/// first client initialization, so concurrent invocations need no locking.
#[derive(Clone)]
pub struct ToolContext {
    config: Config,
    client: Arc<OnceCell<RunwayClient>>,
}

impl ToolContext {
    /// Create a new `ToolContext` from an explicit config.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Arc::new(OnceCell::new()),
        }
    }

    /// Create a `ToolContext` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scoped accessor for the shared Runway client.
    ///
    /// The credential check happens here, before any client is built, so a
    /// missing `RUNWAYML_API_SECRET` is a validation-time failure and no
    /// network state is ever touched.
    pub fn client(&self) -> Result<&RunwayClient, ToolError> {
        if !self.config.has_credential() {
            return Err(ToolError::missing_credential("RUNWAYML_API_SECRET"));
        }
        self.client.get_or_try_init(|| {
            RunwayClient::new(&self.config).map_err(|e| {
                ToolError::execution_failed(format!("Failed to create Runway client: {e}"))
            })
        })
    }
}

/// The core trait that all tools must implement.
#[async_trait]
pub trait ToolSpec: Send + Sync {
    /// Returns the unique name of this tool (used in API calls).
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> Value;

    /// Returns the capabilities this tool has.
    fn capabilities(&self) -> Vec<ToolCapability>;

    /// Returns whether this tool is read-only.
    fn is_read_only(&self) -> bool {
        self.capabilities().contains(&ToolCapability::ReadOnly)
    }

    /// Execute the tool with the given input and context.
    ///
    /// All validation and vendor failures are reported through the returned
    /// `ToolResult` envelope; `Err` is reserved for dispatch-level faults.
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolResult, ToolError>;
}

// === Helper functions for extracting values from JSON input ===

/// Helper to extract a required, non-empty string field from JSON input.
pub fn required_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::missing_field(field))
}

/// Helper to extract an optional string field from JSON input.
///
/// Absent and null values read as `None`; a present value of the wrong
/// type is rejected rather than silently dropped, so the caller learns
/// their parameter was not applied.
pub fn optional_str<'a>(input: &'a Value, field: &str) -> Result<Option<&'a str>, ToolError> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(ToolError::invalid_input(format!("{field} must be a string"))),
    }
}

/// Helper to extract an optional u64 field from JSON input.
///
/// Same contract as [`optional_str`]: mistyped values (negative numbers,
/// fractions, strings) are rejected, not ignored.
pub fn optional_u64(input: &Value, field: &str) -> Result<Option<u64>, ToolError> {
    match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ToolError::invalid_input(format!("{field} must be a non-negative integer"))
        }),
    }
}

// === Unit Tests ===
