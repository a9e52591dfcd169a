//! Tool adapter system for the Runway API.
//!
//! Tools implement the `ToolSpec` trait and are managed by `ToolRegistry`.
//! Every invocation produces a JSON result envelope with a `success` flag;
//! validation and vendor failures are reported through the envelope rather
//! than as errors.

pub mod envelope;
pub mod registry;
pub mod runway;
pub mod spec;

pub use registry::{ToolDescriptor, ToolRegistry, ToolRegistryBuilder};
pub use spec::{ToolCapability, ToolContext, ToolError, ToolResult, ToolSpec};
