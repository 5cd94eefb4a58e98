//! Live adapter for the `LlmClient` port using an OpenAI-compatible
//! chat-completions API.

use std::path::PathBuf;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::filesystem::LiveFileSystem;
use crate::config::resolve_endpoint;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, Message};

/// Live LLM client calling `{base}/chat/completions`.
///
/// Endpoint settings are resolved from the configuration directory on each
/// call, so commands that never generate text need no credentials. The
/// settings read goes through a filesystem of its own and is never recorded.
pub struct LiveLlmClient {
    client: Client,
    fs: Box<dyn FileSystem>,
    config_dir: PathBuf,
}

impl LiveLlmClient {
    /// Creates a client reading `llm_config.json` from `config_dir` on disk.
    #[must_use]
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(Box::new(LiveFileSystem), config_dir)
    }

    /// Creates a client reading `llm_config.json` from `config_dir` through `fs`.
    #[must_use]
    pub fn with_filesystem(fs: Box<dyn FileSystem>, config_dir: impl Into<PathBuf>) -> Self {
        Self { client: Client::new(), fs, config_dir: config_dir.into() }
    }
}

/// Request body sent to the chat-completions endpoint.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

/// Top-level chat-completions response.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

/// One completion choice.
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// The assistant message inside a choice.
#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token usage reported by the API.
#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Error response body.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Detail inside an error response.
#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let endpoint = resolve_endpoint(self.fs.as_ref(), &self.config_dir)?;
            let url = format!("{}/chat/completions", endpoint.base_url.trim_end_matches('/'));

            let body = ChatRequest {
                model: &request.model,
                messages: &request.messages,
                max_tokens: request.max_tokens.unwrap_or(endpoint.max_tokens),
                temperature: endpoint.temperature,
            };

            let response = self
                .client
                .post(&url)
                .bearer_auth(&endpoint.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("chat completion request failed: {e}").into()
                })?;

            let status = response.status();
            let response_text =
                response.text().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to read chat completion response: {e}").into()
                })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("chat completion error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: ChatResponse = serde_json::from_str(&response_text).map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to parse chat completion response: {e}").into()
                },
            )?;

            let text = api_response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or("chat completion response has no content")?;

            Ok(CompletionResponse {
                text,
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
            })
        })
    }
}
