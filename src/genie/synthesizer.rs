// Synthesizer: AI first, local generator as the safety net
//
// Per request:
//   start     -> provider configured and mode auto ? await provider : local
//   await     -> structured completion ? validate : local
//   validate  -> nothing survives and the prompt had content ? local : done
//   local     -> done
//
// Every path ends in a SearchConfig; provider trouble is logged and never
// reaches the caller.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::{
    clean_name, derive_name, is_non_trivial, ConfigBuilder, Criterion, GenieResult, Priority,
    SearchConfig,
};
use super::local::LocalGenerator;
use crate::ai::completion::{RawCriterion, RawSearchConfig};
use crate::ai::{Completion, CompletionProvider, VocabularyContextBuilder};
use crate::error::ProviderFailure;
use crate::vocab::{Kind, Vocabulary};

/// Request-level choice of synthesis path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    #[default]
    Auto,
    Local,
}

/// Why the local generator produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalReason {
    NotConfigured,
    Requested,
    ProviderFailed,
    Unstructured,
    EmptyAfterValidation,
}

/// Which path produced a config; for logs only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisPath {
    Ai { provider: String },
    Local(LocalReason),
}

impl fmt::Display for SynthesisPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisPath::Ai { provider } => write!(f, "ai:{}", provider),
            SynthesisPath::Local(reason) => {
                let reason = match reason {
                    LocalReason::NotConfigured => "not_configured",
                    LocalReason::Requested => "requested",
                    LocalReason::ProviderFailed => "provider_failed",
                    LocalReason::Unstructured => "unstructured",
                    LocalReason::EmptyAfterValidation => "empty_after_validation",
                };
                write!(f, "local:{}", reason)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Synthesis {
    pub config: SearchConfig,
    pub path: SynthesisPath,
}

pub struct Synthesizer {
    vocab: &'static Vocabulary,
    local: LocalGenerator,
    provider: Option<Arc<dyn CompletionProvider>>,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(
        vocab: &'static Vocabulary,
        provider: Option<Arc<dyn CompletionProvider>>,
        timeout: Duration,
    ) -> Self {
        Self {
            vocab,
            local: LocalGenerator::new(vocab),
            provider,
            timeout,
        }
    }

    /// Synthesizer that never calls out
    pub fn local_only(vocab: &'static Vocabulary) -> Self {
        Self::new(vocab, None, Duration::ZERO)
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|provider| provider.name())
    }

    /// Synthesize a config and report the result envelope
    pub async fn generate(&self, prompt: &str, mode: SynthesisMode) -> GenieResult {
        let synthesis = self.synthesize(prompt, mode).await;
        info!(
            path = %synthesis.path,
            prompt_chars = prompt.chars().count(),
            must = synthesis.config.must().len(),
            should = synthesis.config.should().len(),
            deck = synthesis.config.deck(),
            "config synthesized"
        );
        GenieResult::ok(synthesis.config)
    }

    pub async fn synthesize(&self, prompt: &str, mode: SynthesisMode) -> Synthesis {
        let provider = match (&self.provider, mode) {
            (_, SynthesisMode::Local) => return self.fallback(prompt, LocalReason::Requested),
            (None, SynthesisMode::Auto) => {
                return self.fallback(prompt, LocalReason::NotConfigured)
            }
            (Some(provider), SynthesisMode::Auto) => provider,
        };

        let completion = match self.call_provider(provider.as_ref(), prompt).await {
            Ok(completion) => completion,
            Err(failure) => {
                warn!(provider = provider.name(), error = %failure, "provider failed; using local generator");
                return self.fallback(prompt, LocalReason::ProviderFailed);
            }
        };

        let raw = match completion {
            Completion::Structured(raw) => raw,
            Completion::Text(text) => {
                warn!(
                    provider = provider.name(),
                    chars = text.len(),
                    "provider answered without a config; using local generator"
                );
                return self.fallback(prompt, LocalReason::Unstructured);
            }
        };

        match self.validate(raw, prompt) {
            Some(config) => Synthesis {
                config,
                path: SynthesisPath::Ai {
                    provider: provider.name().to_string(),
                },
            },
            None => {
                debug!(provider = provider.name(), "nothing in the provider config resolved");
                self.fallback(prompt, LocalReason::EmptyAfterValidation)
            }
        }
    }

    async fn call_provider(
        &self,
        provider: &dyn CompletionProvider,
        prompt: &str,
    ) -> Result<Completion, ProviderFailure> {
        let mentions = self.local.mentions(prompt);
        let context = VocabularyContextBuilder::build_smart_context(self.vocab, &mentions)
            .map_err(|e| ProviderFailure::Error(format!("Failed to serialize context: {}", e)))?;

        match tokio::time::timeout(self.timeout, provider.complete(prompt, &context)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderFailure::Timeout(self.timeout)),
        }
    }

    fn fallback(&self, prompt: &str, reason: LocalReason) -> Synthesis {
        Synthesis {
            config: self.local.generate(prompt),
            path: SynthesisPath::Local(reason),
        }
    }

    /// Re-resolve a provider config against the vocabulary. None means the
    /// prompt had content but nothing in the answer survived.
    pub fn validate(&self, raw: RawSearchConfig, prompt: &str) -> Option<SearchConfig> {
        let name = raw
            .name
            .as_deref()
            .and_then(clean_name)
            .unwrap_or_else(|| derive_name(prompt));
        let mut builder = ConfigBuilder::new(self.vocab, name);

        if let Some(deck) = raw
            .deck
            .as_deref()
            .and_then(|deck| self.vocab.resolve(Kind::Deck, deck))
        {
            builder.deck(deck);
        }

        // must first, so a mention in both lists ends up in must
        let lists = [(Priority::Must, &raw.must), (Priority::Should, &raw.should)];
        for (priority, criteria) in lists {
            for criterion in criteria {
                if let Some(criterion) = self.resolve_criterion(criterion) {
                    builder.push(priority, criterion);
                }
            }
        }

        if builder.is_empty() && is_non_trivial(prompt) {
            return None;
        }
        Some(builder.build())
    }

    fn resolve_criterion(&self, raw: &RawCriterion) -> Option<Criterion> {
        let detail = match raw {
            RawCriterion::Bare(text) => {
                let (kind, id) = self.vocab.resolve_any(text)?;
                return Some(Criterion::new(kind, id));
            }
            RawCriterion::Detailed(detail) => detail,
        };

        let value = detail.value.as_deref()?;
        let (kind, id) = match detail.kind.as_deref().and_then(Kind::parse) {
            Some(Kind::Other) | None => self
                .vocab
                .resolve(Kind::Other, value)
                .map(|id| (Kind::Other, id))
                .or_else(|| self.vocab.resolve_any(value))?,
            Some(kind) => (kind, self.vocab.resolve(kind, value)?),
        };

        let modifiers = detail
            .modifiers
            .iter()
            .chain(detail.edition.iter())
            .filter_map(|modifier| self.vocab.resolve_modifier(modifier));

        Some(
            Criterion::new(kind, id)
                .with_modifiers(modifiers)
                .with_ante(detail.ante_preference.and_then(|ante| ante.range())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parse_completion;
    use crate::vocab::{vocabulary, AnteRange};
    use async_trait::async_trait;

    /// Provider double returning a canned outcome
    enum Fake {
        Fails,
        Sleeps(Duration),
        Answers(&'static str),
    }

    #[async_trait]
    impl CompletionProvider for Fake {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, _prompt: &str, _context: &str) -> Result<Completion, ProviderFailure> {
            match self {
                Fake::Fails => Err(ProviderFailure::Unavailable("connection refused".to_string())),
                Fake::Sleeps(delay) => {
                    tokio::time::sleep(*delay).await;
                    Ok(parse_completion(r#"{"must": ["Perkeo"]}"#))
                }
                Fake::Answers(text) => Ok(parse_completion(text)),
            }
        }
    }

    fn synthesizer(fake: Fake) -> Synthesizer {
        Synthesizer::new(vocabulary(), Some(Arc::new(fake)), Duration::from_millis(100))
    }

    fn local_json(prompt: &str) -> String {
        let local = LocalGenerator::new(vocabulary());
        serde_json::to_string(&GenieResult::ok(local.generate(prompt))).unwrap()
    }

    const PROMPTS: [&str; 4] = [
        "I want a Perkeo seed with Observatory",
        "Blueprint and negative jokers",
        "Lots of money early",
        "",
    ];

    #[tokio::test]
    async fn test_not_configured_uses_local() {
        let synth = Synthesizer::local_only(vocabulary());
        let synthesis = synth.synthesize("Perkeo", SynthesisMode::Auto).await;
        assert_eq!(synthesis.path, SynthesisPath::Local(LocalReason::NotConfigured));
        assert!(synth.provider_name().is_none());
    }

    #[tokio::test]
    async fn test_failure_equals_local_output() {
        let synth = synthesizer(Fake::Fails);
        for prompt in PROMPTS {
            let result = synth.generate(prompt, SynthesisMode::Auto).await;
            assert_eq!(serde_json::to_string(&result).unwrap(), local_json(prompt));
        }
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let synth = synthesizer(Fake::Sleeps(Duration::from_secs(5)));
        let synthesis = synth.synthesize("Blueprint", SynthesisMode::Auto).await;
        assert_eq!(synthesis.path, SynthesisPath::Local(LocalReason::ProviderFailed));
        assert_eq!(synthesis.config.must()[0].value(), "Blueprint");
    }

    #[tokio::test]
    async fn test_text_completion_falls_back() {
        let synth = synthesizer(Fake::Answers("Sure! Try looking for Perkeo."));
        let prompt = "Perkeo seed with Observatory";
        let synthesis = synth.synthesize(prompt, SynthesisMode::Auto).await;
        assert_eq!(synthesis.path, SynthesisPath::Local(LocalReason::Unstructured));
        assert_eq!(
            serde_json::to_string(&GenieResult::ok(synthesis.config)).unwrap(),
            local_json(prompt)
        );
    }

    #[tokio::test]
    async fn test_local_mode_skips_provider() {
        let synth = synthesizer(Fake::Answers(r#"{"must": ["Brainstorm"]}"#));
        let synthesis = synth.synthesize("Perkeo", SynthesisMode::Local).await;
        assert_eq!(synthesis.path, SynthesisPath::Local(LocalReason::Requested));
        assert_eq!(synthesis.config.must()[0].value(), "Perkeo");
    }

    #[tokio::test]
    async fn test_valid_completion_is_used() {
        let synth = synthesizer(Fake::Answers(
            r#"```json
{"name": "Negative Perkeo!", "deck": "plasma",
 "must": [{"kind": "joker", "value": "perkeo", "edition": "neg", "ante": [1, 3]}],
 "should": [{"type": "voucher", "name": "Observatory"}, "Perkeo"]}
```"#,
        ));
        let synthesis = synth.synthesize("neg perkeo please", SynthesisMode::Auto).await;
        assert_eq!(
            synthesis.path,
            SynthesisPath::Ai {
                provider: "fake".to_string()
            }
        );

        let config = synthesis.config;
        assert_eq!(config.name(), "Negative Perkeo");
        assert_eq!(config.deck(), "Plasma Deck");
        assert_eq!(config.must().len(), 1);
        assert_eq!(config.must()[0].value(), "Perkeo");
        assert!(config.must()[0].modifiers().contains("negative"));
        assert_eq!(config.must()[0].ante_preference(), AnteRange::new(1, 3));
        assert_eq!(config.should().len(), 1);
        assert_eq!(config.should()[0].value(), "Observatory");
    }

    #[tokio::test]
    async fn test_unknown_values_are_dropped() {
        let synth = synthesizer(Fake::Answers(
            r#"{"must": [{"kind": "joker", "value": "Perkeo"},
                         {"kind": "joker", "value": "Super Mega Joker"},
                         {"kind": "voucher", "value": "Perkeo"}]}"#,
        ));
        let synthesis = synth.synthesize("Perkeo", SynthesisMode::Auto).await;
        let values: Vec<_> = synthesis.config.criteria().map(|c| c.value()).collect();
        assert_eq!(values, vec!["Perkeo"]);
    }

    #[tokio::test]
    async fn test_empty_after_validation_falls_back() {
        let synth = synthesizer(Fake::Answers(r#"{"must": ["Nonsense"], "should": []}"#));
        let prompt = "Blueprint and Brainstorm";
        let synthesis = synth.synthesize(prompt, SynthesisMode::Auto).await;
        assert_eq!(
            synthesis.path,
            SynthesisPath::Local(LocalReason::EmptyAfterValidation)
        );
        assert_eq!(synthesis.config.must().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_answer_for_empty_prompt_is_accepted() {
        let synth = synthesizer(Fake::Answers(r#"{"must": [], "should": []}"#));
        let synthesis = synth.synthesize("   ", SynthesisMode::Auto).await;
        assert!(matches!(synthesis.path, SynthesisPath::Ai { .. }));
        assert!(!synthesis.config.has_criteria());
        assert_eq!(synthesis.config.deck(), "Red Deck");
        assert_eq!(synthesis.config.name(), "Genie Search");
    }

    #[test]
    fn test_other_kind_falls_back_to_any() {
        let synth = Synthesizer::local_only(vocabulary());
        let raw = match parse_completion(
            r#"{"must": [{"kind": "other", "value": "money"}, {"kind": "other", "value": "Blueprint"}]}"#,
        ) {
            Completion::Structured(raw) => raw,
            Completion::Text(text) => panic!("unexpected text {:?}", text),
        };
        let config = synth.validate(raw, "money and blueprint").unwrap();
        let values: Vec<_> = config.must().iter().map(|c| (c.kind(), c.value())).collect();
        assert_eq!(
            values,
            vec![(Kind::Other, "economy"), (Kind::Joker, "Blueprint")]
        );
    }

    #[test]
    fn test_path_display() {
        assert_eq!(
            SynthesisPath::Ai {
                provider: "claude".to_string()
            }
            .to_string(),
            "ai:claude"
        );
        assert_eq!(
            SynthesisPath::Local(LocalReason::ProviderFailed).to_string(),
            "local:provider_failed"
        );
    }
}
