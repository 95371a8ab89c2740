//! A blocking HTTP-backed [`LlmClient`], adapted from the Anthropic Messages
//! wire shape but collapsed to a single non-streaming request to match this
//! core's synchronous execution model.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::cancel::CancellationToken;
use crate::error::{ConverterError, Result};
use crate::llm::client::LlmClient;
use crate::llm::message::Message;

const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Talks to a chat-completions style endpoint over blocking HTTP.
///
/// `deployment` is an opaque model/deployment identifier passed straight
/// through to the wire request — this client never hardcodes a model name.
pub struct HttpLlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
}

impl HttpLlmClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            deployment: deployment.into(),
        }
    }
}

impl LlmClient for HttpLlmClient {
    #[instrument(skip_all, fields(deployment = %self.deployment, messages = messages.len()))]
    fn chat(&self, messages: &[Message], cancel: &CancellationToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(ConverterError::Generation("cancelled before request".to_string()));
        }

        let mut system = None;
        let mut turns = Vec::with_capacity(messages.len());
        for message in messages {
            match message.role {
                crate::llm::message::Role::System => system = Some(message.content.clone()),
                _ => turns.push(WireMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content.clone(),
                }),
            }
        }

        let body = WireRequest {
            model: self.deployment.clone(),
            messages: turns,
            max_tokens: DEFAULT_MAX_TOKENS,
            system,
        };

        debug!("sending chat request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| ConverterError::Generation(format!("transport error: {e}")))?;

        if cancel.is_cancelled() {
            return Err(ConverterError::Generation("cancelled during request".to_string()));
        }

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(ConverterError::Generation("authentication failed".to_string()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConverterError::Generation(format!("{status}: {body}")));
        }

        let parsed: WireResponse = response
            .json()
            .map_err(|e| ConverterError::Generation(format!("malformed response body: {e}")))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
            })
            .collect();

        if text.is_empty() {
            return Err(ConverterError::Generation("empty completion".to_string()));
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct WireResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}
