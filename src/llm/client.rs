//! The LLM client contract: a stateless, typed chat exchange.

use crate::core::cancel::CancellationToken;
use crate::error::Result;
use crate::llm::message::Message;

/// A single operation: an ordered conversation in, assistant text out.
///
/// Implementations are stateless — callers supply the full conversation on
/// every call. Temperature, sampling, and retry policy are implementation
/// details; deterministic replay is not required.
pub trait LlmClient: Send + Sync {
    /// Send `messages` and return the assistant's reply text.
    ///
    /// Returns `ConverterError::Generation` for an empty completion,
    /// transport failure, or authentication failure.
    fn chat(&self, messages: &[Message], cancel: &CancellationToken) -> Result<String>;
}
