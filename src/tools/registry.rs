//! Tool registry for managing and executing tools.
//!
//! The registry provides:
//! - Tool registration and lookup by name
//! - Deterministic discovery order (registration order)
//! - The invocation boundary: validation failures surface as failure
//!   envelopes, never as transport-level errors
//! - Conversion to the descriptor format advertised to calling hosts

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::envelope;
use super::spec::{ToolCapability, ToolContext, ToolError, ToolResult, ToolSpec};

// === Types ===

/// Descriptor advertised to a calling host for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Registry that holds all available tools.
///
/// Backed by an insertion-ordered map so repeated discovery calls list the
/// same tools in the same order.
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn ToolSpec>>,
    context: ToolContext,
}

impl ToolRegistry {
    /// Create a new empty registry with the given context.
    #[must_use]
    pub fn new(context: ToolContext) -> Self {
        Self {
            tools: IndexMap::new(),
            context,
        }
    }

    /// Register a tool in the registry.
    pub fn register(&mut self, tool: Arc<dyn ToolSpec>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!("Overwriting existing tool: {}", name);
        }
    }

    /// Register multiple tools at once.
    pub fn register_all(&mut self, tools: Vec<Arc<dyn ToolSpec>>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolSpec>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all registered tool names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(std::string::String::as_str).collect()
    }

    /// Get the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tools.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn ToolSpec>> {
        self.tools.values().cloned().collect()
    }

    /// Execute a tool by name with the given input.
    ///
    /// This is the invocation boundary: any `ToolError` raised inside the
    /// tool (missing fields, malformed input, absent credential) is folded
    /// into a failure envelope so the caller always receives a result. Only
    /// an unknown tool name is an `Err`.
    pub async fn execute(&self, name: &str, input: Value) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::not_available(format!("tool '{name}' is not registered")))?;

        match tool.execute(input, &self.context).await {
            Ok(result) => Ok(result),
            Err(err) => Ok(envelope::to_result(envelope::rejection(&err))),
        }
    }

    /// Convert all tools to descriptor format for discovery responses.
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Filter tools by capability.
    #[must_use]
    pub fn filter_by_capability(&self, capability: ToolCapability) -> Vec<Arc<dyn ToolSpec>> {
        self.tools
            .values()
            .filter(|t| t.capabilities().contains(&capability))
            .cloned()
            .collect()
    }

    /// Get read-only tools.
    #[must_use]
    pub fn read_only_tools(&self) -> Vec<Arc<dyn ToolSpec>> {
        self.tools
            .values()
            .filter(|t| t.is_read_only())
            .cloned()
            .collect()
    }

    /// Get a reference to the current context.
    #[must_use]
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Remove a tool by name.
    #[must_use]
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn ToolSpec>> {
        self.tools.shift_remove(name)
    }
}

/// Builder for constructing a `ToolRegistry` with common tools.
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn ToolSpec>>,
}

impl ToolRegistryBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a custom tool.
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn ToolSpec>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add multiple tools.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Arc<dyn ToolSpec>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Include the full Runway tool set (`GenerateImage`,
    /// `GenerateImageWithReferences`, `GenerateVideoFromText`,
    /// `GenerateVideoFromImage`, `GenerateVideoFromVideo`, `UpscaleVideo`,
    /// `GetTaskStatus`, `ListTasks`, `CancelTask`), in that order.
    #[must_use]
    pub fn with_runway_tools(self) -> Self {
        use super::runway::{
            CancelTaskTool, GenerateImageTool, GenerateImageWithReferencesTool,
            GenerateVideoFromImageTool, GenerateVideoFromTextTool, GenerateVideoFromVideoTool,
            GetTaskStatusTool, ListTasksTool, UpscaleVideoTool,
        };
        self.with_tool(Arc::new(GenerateImageTool))
            .with_tool(Arc::new(GenerateImageWithReferencesTool))
            .with_tool(Arc::new(GenerateVideoFromTextTool))
            .with_tool(Arc::new(GenerateVideoFromImageTool))
            .with_tool(Arc::new(GenerateVideoFromVideoTool))
            .with_tool(Arc::new(UpscaleVideoTool))
            .with_tool(Arc::new(GetTaskStatusTool))
            .with_tool(Arc::new(ListTasksTool))
            .with_tool(Arc::new(CancelTaskTool))
    }

    /// Build the registry with the given context.
    #[must_use]
    pub fn build(self, context: ToolContext) -> ToolRegistry {
        let mut registry = ToolRegistry::new(context);
        registry.register_all(self.tools);
        registry
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// === Unit Tests ===
