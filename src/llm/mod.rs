//! The LLM client contract and a blocking HTTP implementation.

pub mod client;
pub mod http;
pub mod message;

pub use client::LlmClient;
pub use http::HttpLlmClient;
pub use message::{Message, Role};
