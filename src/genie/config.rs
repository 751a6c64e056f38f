// Search configuration model
//
// SearchConfig is what Genie hands to the seed-search engine. Both the AI
// path and the local generator assemble it through ConfigBuilder, which is
// the only place criteria enter a config, so the vocabulary and duplicate
// rules hold no matter where a mention came from.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::vocab::{AnteRange, Kind, Vocabulary};

/// Name used when the prompt has nothing printable to derive one from
pub const DEFAULT_NAME: &str = "Genie Search";

const MAX_NAME_CHARS: usize = 48;
const ELLIPSIS: &str = "...";

/// Whether a criterion is a hard filter or a scoring hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Must,
    Should,
}

/// One filter or preference on a seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    kind: Kind,
    value: &'static str,
    modifiers: BTreeSet<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ante_preference: Option<AnteRange>,
}

impl Criterion {
    pub fn new(kind: Kind, value: &'static str) -> Self {
        Self {
            kind,
            value,
            modifiers: BTreeSet::new(),
            ante_preference: None,
        }
    }

    pub fn with_modifiers<I>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn with_ante(mut self, ante: Option<AnteRange>) -> Self {
        self.ante_preference = ante;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn value(&self) -> &'static str {
        self.value
    }

    pub fn modifiers(&self) -> &BTreeSet<&'static str> {
        &self.modifiers
    }

    pub fn ante_preference(&self) -> Option<AnteRange> {
        self.ante_preference
    }

    fn same_target(&self, other: &Criterion) -> bool {
        self.kind == other.kind && self.value == other.value
    }

    /// Merge a repeated mention: modifiers accumulate, the first ante wins
    fn absorb(&mut self, other: Criterion) {
        self.modifiers.extend(other.modifiers);
        if self.ante_preference.is_none() {
            self.ante_preference = other.ante_preference;
        }
    }
}

/// Structured search specification produced for one prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    name: String,
    deck: &'static str,
    must: Vec<Criterion>,
    should: Vec<Criterion>,
}

impl SearchConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deck(&self) -> &'static str {
        self.deck
    }

    pub fn must(&self) -> &[Criterion] {
        &self.must
    }

    pub fn should(&self) -> &[Criterion] {
        &self.should
    }

    /// Iterate over every criterion, must list first
    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.must.iter().chain(self.should.iter())
    }

    pub fn has_criteria(&self) -> bool {
        !self.must.is_empty() || !self.should.is_empty()
    }
}

/// Accumulates criteria while enforcing vocabulary membership,
/// deduplication and must-over-should precedence
pub struct ConfigBuilder<'v> {
    vocab: &'v Vocabulary,
    name: String,
    deck: Option<&'static str>,
    must: Vec<Criterion>,
    should: Vec<Criterion>,
}

impl<'v> ConfigBuilder<'v> {
    pub fn new(vocab: &'v Vocabulary, name: String) -> Self {
        Self {
            vocab,
            name,
            deck: None,
            must: Vec::new(),
            should: Vec::new(),
        }
    }

    /// Select the deck; the first valid deck offered sticks
    pub fn deck(&mut self, id: &str) -> bool {
        if self.deck.is_some() {
            return false;
        }
        match self
            .vocab
            .identifiers(Kind::Deck)
            .iter()
            .find(|deck| **deck == id)
        {
            Some(deck) => {
                self.deck = Some(*deck);
                true
            }
            None => false,
        }
    }

    /// Add a criterion. Returns false when it was rejected outright.
    ///
    /// Deck criteria select the deck instead of joining a list. Modifiers
    /// are kept on jokers only and must be known qualifiers.
    pub fn push(&mut self, priority: Priority, mut criterion: Criterion) -> bool {
        if !self.vocab.contains(criterion.kind, criterion.value) {
            return false;
        }
        if criterion.kind == Kind::Deck {
            self.deck(criterion.value);
            return true;
        }
        if criterion.kind == Kind::Joker {
            let vocab = self.vocab;
            criterion.modifiers.retain(|m| vocab.is_modifier(m));
        } else {
            criterion.modifiers.clear();
        }

        if let Some(existing) = self.must.iter_mut().find(|c| c.same_target(&criterion)) {
            existing.absorb(criterion);
            return true;
        }

        let in_should = self.should.iter().position(|c| c.same_target(&criterion));
        match (priority, in_should) {
            (Priority::Must, Some(index)) => {
                let mut promoted = self.should.remove(index);
                promoted.absorb(criterion);
                self.must.push(promoted);
            }
            (Priority::Must, None) => self.must.push(criterion),
            (Priority::Should, Some(index)) => self.should[index].absorb(criterion),
            (Priority::Should, None) => self.should.push(criterion),
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    pub fn build(self) -> SearchConfig {
        SearchConfig {
            name: self.name,
            deck: self.deck.unwrap_or_else(|| self.vocab.default_deck()),
            must: self.must,
            should: self.should,
        }
    }
}

/// Response envelope: exactly one of `config` / `error` is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenieResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<SearchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl GenieResult {
    pub fn ok(config: SearchConfig) -> Self {
        Self {
            success: true,
            config: Some(config),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            config: None,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn config(&self) -> Option<&SearchConfig> {
        self.config.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// True when the prompt carries any letter or digit
pub fn is_non_trivial(prompt: &str) -> bool {
    prompt.chars().any(char::is_alphanumeric)
}

/// Short label for a config, derived from the prompt
pub fn derive_name(prompt: &str) -> String {
    clean_name(prompt).unwrap_or_else(|| DEFAULT_NAME.to_string())
}

/// Normalize a candidate name; None when nothing printable remains
pub fn clean_name(raw: &str) -> Option<String> {
    let collapsed = raw
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = trim_punctuation(&collapsed);
    if !is_non_trivial(trimmed) {
        return None;
    }
    if trimmed.chars().count() <= MAX_NAME_CHARS {
        return Some(trimmed.to_string());
    }

    let budget = MAX_NAME_CHARS - ELLIPSIS.len();
    let head: String = trimmed.chars().take(budget).collect();
    let cut = match head.rfind(' ') {
        Some(space) if space > 0 => &head[..space],
        _ => head.as_str(),
    };
    Some(format!("{}{}", trim_punctuation(cut), ELLIPSIS))
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_start()
        .trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}
