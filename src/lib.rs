//! Runway generative-media tools for LLM agent hosts.
//!
//! This crate exposes the Runway API (image/video generation, upscaling,
//! task lifecycle) as a set of tool adapters behind a uniform tool-calling
//! contract. A host resolves an operation by name through the
//! [`tools::ToolRegistry`], the adapter validates its inputs, performs one
//! vendor call (awaiting task completion for generation operations), and
//! returns a flat JSON result envelope. Failures never escape a tool as
//! errors; they are reported as `{"success": false, ...}` envelopes.

pub mod client;
pub mod config;
pub mod logging;
pub mod modules;
pub mod tools;
pub mod utils;

pub use client::{RunwayClient, RunwayError};
pub use config::Config;
pub use tools::{ToolContext, ToolRegistry, ToolRegistryBuilder};
