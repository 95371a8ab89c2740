//! Error kinds the search engine recognizes.
//!
//! Internal helpers use `anyhow::Context` for rich diagnostics; call sites
//! that cross the public API boundary classify into one of these variants so
//! callers can tell an input mistake from a flaky LLM from a broken sandbox.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    /// Unsupported profile, empty seed tests when required, malformed options.
    #[error("input error: {0}")]
    Input(String),

    /// The LLM returned an empty completion, or the transport failed.
    #[error("generation error: {0}")]
    Generation(String),

    /// Workspace setup, filesystem write, process-spawn, or normalization
    /// pipeline failure. Not a compile or test failure — those are scored,
    /// not raised.
    #[error("sandbox error: {0}")]
    Sandbox(String),
}

pub type Result<T> = std::result::Result<T, ConverterError>;

impl From<anyhow::Error> for ConverterError {
    /// Internal helpers raise plain `anyhow::Error`; uncategorized failures
    /// that reach the boundary are treated as sandbox infrastructure errors,
    /// since that is where nearly all of them originate (fs, process spawn,
    /// normalization pipeline).
    fn from(err: anyhow::Error) -> Self {
        ConverterError::Sandbox(format!("{err:#}"))
    }
}
