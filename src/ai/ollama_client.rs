// Ollama client
//
// Local model support through Ollama's /api/generate endpoint. The request
// asks for JSON output (`format: "json"`) and a single non-streamed answer.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::claude_client::{status_failure, transport_failure, user_message};
use super::completion::{parse_completion, Completion};
use super::system_prompt::SYSTEM_PROMPT;
use super::CompletionProvider;
use crate::error::ProviderFailure;

const DEFAULT_HOST: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

pub struct OllamaClient {
    host: String,
    model: String,
    timeout: Duration,
    client: Client,
}

impl OllamaClient {
    /// Create a client; host and model fall back to Ollama's usual defaults
    pub fn new(host: Option<String>, model: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let host = host
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.host)
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str, context: &str) -> Result<Completion, ProviderFailure> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: user_message(prompt, context),
            system: SYSTEM_PROMPT,
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
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

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::Error(format!("Failed to parse response: {}", e)))?;

        body.response
            .map(|text| parse_completion(&text))
            .ok_or_else(|| ProviderFailure::Error("No response in Ollama output".to_string()))
    }
}
