//! Prompt-assembly state machine over the LLM client.

pub mod generator;
pub mod prompts;

pub use generator::{Generator, is_affirmative};
