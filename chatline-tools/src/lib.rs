//! Function definitions and dispatch for chatline
//!
//! This crate provides the [`Tools`] collaborator a request consults for its
//! `functions` payload and for dispatching returned function calls, plus a
//! registry of synchronous [`Tool`] implementations.

pub mod base;
pub mod registry;

pub use base::{FunctionCall, Tool, ToolError, Tools};
pub use registry::ToolRegistry;
