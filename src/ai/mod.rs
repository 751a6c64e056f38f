// AI module: remote completion providers for config synthesis
//
// This module provides:
// - The CompletionProvider capability shared by every provider
// - Claude (Anthropic Messages API) and Ollama (local) clients
// - Completion parsing into the raw config shape
// - Vocabulary context building for the model
// - Secure credential storage via OS keychain
// - The system prompt describing the output contract

pub mod claude_client;
pub mod completion;
pub mod context_builder;
pub mod credentials;
pub mod ollama_client;
pub mod system_prompt;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ProviderArgs, ProviderKind};
use crate::error::ProviderFailure;

// Re-export commonly used types
pub use claude_client::ClaudeClient;
pub use completion::{parse_completion, Completion, RawSearchConfig};
pub use context_builder::VocabularyContextBuilder;
pub use credentials::CredentialManager;
pub use ollama_client::OllamaClient;
pub use system_prompt::SYSTEM_PROMPT;

/// A remote model that turns a prompt plus vocabulary context into a completion
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider label used in logs and the health endpoint
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str, context: &str) -> Result<Completion, ProviderFailure>;
}

/// Build the configured provider, or None when none is usable
pub fn build_provider(args: &ProviderArgs) -> Option<Arc<dyn CompletionProvider>> {
    match args.provider {
        ProviderKind::None => None,
        ProviderKind::Claude => {
            let Some(api_key) = claude_api_key(args) else {
                warn!("Claude selected but no API key configured; using local generator only");
                return None;
            };
            match ClaudeClient::new(api_key, args.model.clone(), args.timeout()) {
                Ok(client) => {
                    info!(model = client.model(), "Claude provider ready");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    warn!(error = %e, "Claude provider could not be created");
                    None
                }
            }
        }
        ProviderKind::Ollama => {
            match OllamaClient::new(args.ollama_host.clone(), args.model.clone(), args.timeout()) {
                Ok(client) => {
                    info!(host = client.host(), model = client.model(), "Ollama provider ready");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    warn!(error = %e, "Ollama provider could not be created");
                    None
                }
            }
        }
    }
}

/// Explicit key first, then the keychain when allowed
fn claude_api_key(args: &ProviderArgs) -> Option<String> {
    if let Some(key) = args
        .anthropic_api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
    {
        return Some(key.to_string());
    }
    if !args.use_keychain {
        return None;
    }
    match CredentialManager::retrieve_api_key() {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "Could not read API key from keychain");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_provider_by_default() {
        assert!(build_provider(&ProviderArgs::default()).is_none());
    }

    #[test]
    fn test_claude_without_key_is_not_configured() {
        let args = ProviderArgs {
            provider: ProviderKind::Claude,
            anthropic_api_key: Some("   ".to_string()),
            ..ProviderArgs::default()
        };
        assert!(build_provider(&args).is_none());
    }

    #[test]
    fn test_claude_with_key() {
        let args = ProviderArgs {
            provider: ProviderKind::Claude,
            anthropic_api_key: Some("sk-ant-test-key-0000000000".to_string()),
            ..ProviderArgs::default()
        };
        let provider = build_provider(&args).unwrap();
        assert_eq!(provider.name(), "claude");
    }

    #[test]
    fn test_ollama_provider() {
        let args = ProviderArgs {
            provider: ProviderKind::Ollama,
            ..ProviderArgs::default()
        };
        let provider = build_provider(&args).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
