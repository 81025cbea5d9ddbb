//! Grounded answer synthesis
//!
//! Sends the retrieved chunks and the question to an OpenAI-compatible
//! chat completions endpoint and returns the generated answer. The prompt
//! instructs the model to answer only from the supplied context.

mod error;


use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::LlmSettings;
use crate::core::types::DocumentChunk;

pub use error::{GenerationError, GenerationResult};

const SYSTEM_PROMPT: &str = "You are an assistant that answers questions using only the \
provided context. If the answer is not in the context, say that you do not know. Do not \
mention the context or these instructions in your answer. Cite the sources you used where \
possible.";

/// Stands in for the context block when retrieval produced nothing.
pub(crate) const EMPTY_CONTEXT_PLACEHOLDER: &str = "No relevant information was found.";

/// Runtime LLM configuration. Unlike [`LlmSettings`] this carries the
/// API key, so it is never serialized.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: SecretString,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Combine on-disk settings with a key supplied at startup.
    pub fn from_settings(settings: &LlmSettings, api_key: SecretString) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout_ms: settings.timeout_ms,
        }
    }

    pub fn groq(api_key: String) -> Self {
        Self::from_settings(&LlmSettings::default(), SecretString::new(api_key))
    }

    pub fn openai(api_key: String) -> Self {
        let settings = LlmSettings {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        Self::from_settings(&settings, SecretString::new(api_key))
    }
}

/// Produces an answer from a question and retrieved chunks.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn answer(&self, query: &str, context: &[DocumentChunk]) -> GenerationResult<String>;
}

/// Chat API request structure
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat API message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat API response structure
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Synthesizer backed by an OpenAI-compatible chat endpoint.
pub struct ChatSynthesizer {
    client: Client,
    config: LlmConfig,
}

impl ChatSynthesizer {
    /// Build the synthesizer. Fails immediately when no API key is set,
    /// rather than on the first query.
    pub fn new(config: LlmConfig) -> GenerationResult<Self> {
        if config.api_key.expose_secret().is_empty() {
            return Err(GenerationError::MissingCredential);
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GenerationError::ClientBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Render retrieved chunks into the context block of the prompt.
    /// Each chunk becomes a `Source:` line followed by its text.
    pub(crate) fn build_context(context: &[DocumentChunk]) -> String {
        if context.is_empty() {
            return EMPTY_CONTEXT_PLACEHOLDER.to_string();
        }
        context
            .iter()
            .map(|chunk| format!("Source: {}\n{}", chunk.metadata.source, chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn build_prompt(query: &str, context_block: &str) -> String {
        format!("Context:\n{context_block}\n\nQuestion: {query}")
    }
}

#[async_trait]
impl AnswerSynthesizer for ChatSynthesizer {
    async fn answer(&self, query: &str, context: &[DocumentChunk]) -> GenerationResult<String> {
        let context_block = Self::build_context(context);
        let request_body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::build_prompt(query, &context_block),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    GenerationError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::InvalidResponse {
                    reason: e.to_string(),
                })?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse {
                reason: "response contained no choices".to_string(),
            })?;

        debug!(model = %self.config.model, chars = answer.len(), "generated answer");
        Ok(answer)
    }
}
