// Claude API client
//
// Implements communication with Anthropic's Messages API for:
// - Single-shot chat completions (no streaming)
// - Seed config synthesis through the CompletionProvider trait
// - Mapping transport and status errors onto ProviderFailure

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::completion::{parse_completion, Completion};
use super::system_prompt::SYSTEM_PROMPT;
use super::CompletionProvider;
use crate::error::ProviderFailure;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-sonnet-4-5-20250929";
const CLAUDE_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// One turn sent to the Messages API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Messages API request body
#[derive(Debug, Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

/// The part of the Messages API reply we read
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

pub struct ClaudeClient {
    api_key: String,
    model: String,
    timeout: Duration,
    client: Client,
}

impl ClaudeClient {
    /// Create a new Claude client; `model` falls back to the built-in default
    pub fn new(api_key: String, model: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| CLAUDE_MODEL.to_string()),
            timeout,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one Messages API call and join its text blocks
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        system_prompt: Option<&str>,
    ) -> Result<String, ProviderFailure> {
        let request = ClaudeRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages,
            system: system_prompt,
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", CLAUDE_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_failure(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_failure(status, &error_text));
        }

        let claude_response: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::Error(format!("Failed to parse response: {}", e)))?;

        // Tool-use and thinking blocks carry no config text
        let text = claude_response
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}

#[async_trait]
impl CompletionProvider for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn complete(&self, prompt: &str, context: &str) -> Result<Completion, ProviderFailure> {
        let messages = vec![Message {
            role: "user".to_string(),
            content: user_message(prompt, context),
        }];
        let text = self.chat(messages, Some(SYSTEM_PROMPT)).await?;
        Ok(parse_completion(&text))
    }
}

/// User turn shared by every provider: vocabulary first, then the wish
pub(crate) fn user_message(prompt: &str, context: &str) -> String {
    format!(
        "Known vocabulary:\n\n{}\n\nSeed request: {}\n\nRespond with only the JSON config object.",
        context, prompt
    )
}

pub(crate) fn transport_failure(e: reqwest::Error, timeout: Duration) -> ProviderFailure {
    if e.is_timeout() {
        ProviderFailure::Timeout(timeout)
    } else if e.is_connect() {
        ProviderFailure::Unavailable(format!("Connection failed: {}", e))
    } else {
        ProviderFailure::Error(format!("API request failed: {}", e))
    }
}

pub(crate) fn status_failure(status: StatusCode, body: &str) -> ProviderFailure {
    let detail = format!("API error {}: {}", status, truncate(body, 200));
    match status.as_u16() {
        429 | 502 | 503 | 504 | 529 => ProviderFailure::Unavailable(detail),
        _ => ProviderFailure::Error(detail),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
