//! The execution sandbox: isolated workspaces, toolchain invocation, and
//! output parsing.

pub mod executor;
pub mod fence;
pub mod parser;
pub mod workspace;

pub use executor::{ExecutionResult, Sandbox, SandboxOptions};
