// Domain vocabulary: the closed set of game entities Genie can emit
//
// This module provides:
// - Kind, the criterion kinds in their fixed resolution priority
// - Vocabulary, an immutable registry built once per process
// - Case-insensitive resolution with aliases, suffix variants, plurals
//   and unique-prefix matching
// - A phrase index used by the local generator's lexer

pub mod data;
pub mod text;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use data::Entry;
pub use text::{fold, tokenize, Token};

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(Vocabulary::build);

/// Shared process-wide vocabulary
pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

/// Criterion kinds, declared in resolution priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Joker,
    Edition,
    Seal,
    Tag,
    Voucher,
    Deck,
    Other,
}

impl Kind {
    /// Fixed order used whenever a phrase could belong to several kinds
    pub const PRIORITY: [Kind; 7] = [
        Kind::Joker,
        Kind::Edition,
        Kind::Seal,
        Kind::Tag,
        Kind::Voucher,
        Kind::Deck,
        Kind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Joker => "joker",
            Kind::Edition => "edition",
            Kind::Seal => "seal",
            Kind::Tag => "tag",
            Kind::Voucher => "voucher",
            Kind::Deck => "deck",
            Kind::Other => "other",
        }
    }

    /// Parse a kind name as a model might write it ("Jokers", "VOUCHER")
    pub fn parse(raw: &str) -> Option<Kind> {
        let folded = fold(raw);
        let singular = folded.strip_suffix('s').unwrap_or(folded.as_str());
        Kind::PRIORITY
            .into_iter()
            .find(|kind| kind.as_str() == singular)
    }

    fn entries(&self) -> &'static [Entry] {
        match self {
            Kind::Joker => data::JOKERS,
            Kind::Edition => data::EDITIONS,
            Kind::Seal => data::SEALS,
            Kind::Tag => data::TAGS,
            Kind::Voucher => data::VOUCHERS,
            Kind::Deck => data::DECKS,
            Kind::Other => data::OTHER,
        }
    }

    /// Trailing word a writer may add or drop ("Plasma" vs "Plasma Deck")
    fn suffix_word(&self) -> Option<&'static str> {
        match self {
            Kind::Joker => Some("joker"),
            Kind::Edition => Some("edition"),
            Kind::Seal => Some("seal"),
            Kind::Tag => Some("tag"),
            Kind::Voucher => Some("voucher"),
            Kind::Deck => Some("deck"),
            Kind::Other => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive ante window attached to a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnteRange {
    pub min: u8,
    pub max: u8,
}

impl AnteRange {
    /// Build a range inside 1..=MAX_ANTE; bounds given backwards are swapped
    pub fn new(min: u8, max: u8) -> Option<Self> {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if min == 0 || max > data::MAX_ANTE {
            return None;
        }
        Some(Self { min, max })
    }
}

/// Lexical cue classes the local generator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hedge,
    Mandatory,
    Negation,
    Conjunction,
    Clause,
    Ante,
    AnteBound,
    Timing(AnteRange),
}

/// What a prompt phrase resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Entity(Kind, &'static str),
    Modifier(&'static str),
    Cue(Cue),
}

/// Serializable listing of every identifier, grouped by kind
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyListing<'a> {
    pub default_deck: &'static str,
    pub decks: &'a [&'static str],
    pub jokers: &'a [&'static str],
    pub editions: &'a [&'static str],
    pub seals: &'a [&'static str],
    pub tags: &'a [&'static str],
    pub vouchers: &'a [&'static str],
    pub other: &'a [&'static str],
    pub modifiers: &'a [&'static str],
}

/// Immutable entity registry; safe to share across threads without locking
#[derive(Debug)]
pub struct Vocabulary {
    listing: BTreeMap<Kind, Vec<&'static str>>,
    modifiers: Vec<&'static str>,
    /// (kind, folded id or alias) -> id; accepts quiet entries too
    ids: HashMap<(Kind, String), &'static str>,
    modifier_ids: HashMap<String, &'static str>,
    /// folded phrase -> candidate terms in priority order
    phrases: HashMap<String, Vec<Term>>,
    /// single-word prompt phrases per kind, for prefix matching
    single_words: BTreeMap<Kind, Vec<(String, &'static str)>>,
    generic: HashSet<&'static str>,
    /// folded names that only match when capitalized in a prompt
    proper_names: HashSet<String>,
    numbers: HashMap<&'static str, u8>,
    max_phrase_tokens: usize,
}

impl Vocabulary {
    /// Build the registry from the static tables in `data`
    pub fn build() -> Self {
        let mut vocab = Vocabulary {
            listing: BTreeMap::new(),
            modifiers: Vec::new(),
            ids: HashMap::new(),
            modifier_ids: HashMap::new(),
            phrases: HashMap::new(),
            single_words: BTreeMap::new(),
            generic: data::GENERIC_WORDS.iter().copied().collect(),
            proper_names: HashSet::new(),
            numbers: data::NUMBER_WORDS.iter().copied().collect(),
            max_phrase_tokens: 1,
        };

        for kind in Kind::PRIORITY {
            for entry in kind.entries() {
                vocab.listing.entry(kind).or_default().push(entry.id);
                vocab.ids.insert((kind, fold(entry.id)), entry.id);
                for alias in entry.aliases {
                    vocab.ids.insert((kind, fold(alias)), entry.id);
                }

                let term = Term::Entity(kind, entry.id);
                if entry.proper {
                    vocab.proper_names.insert(fold(entry.id));
                }
                if entry.match_name {
                    vocab.add_phrase(entry.id, term);
                    let folded = fold(entry.id);
                    if !folded.contains(' ') {
                        vocab
                            .single_words
                            .entry(kind)
                            .or_default()
                            .push((folded, entry.id));
                    }
                }
                for alias in entry.aliases {
                    vocab.add_phrase(alias, term);
                }
            }
        }

        for entry in data::EDITIONS.iter().chain(data::STICKERS) {
            vocab.modifiers.push(entry.id);
            vocab.modifier_ids.insert(fold(entry.id), entry.id);
            for alias in entry.aliases {
                vocab.modifier_ids.insert(fold(alias), entry.id);
            }
        }
        for entry in data::STICKERS {
            vocab.add_phrase(entry.id, Term::Modifier(entry.id));
            for alias in entry.aliases {
                vocab.add_phrase(alias, Term::Modifier(entry.id));
            }
        }

        for cue in data::HEDGE_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Hedge));
        }
        for cue in data::MANDATORY_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Mandatory));
        }
        for cue in data::NEGATION_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Negation));
        }
        for cue in data::CONJUNCTION_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Conjunction));
        }
        for cue in data::CLAUSE_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Clause));
        }
        for cue in data::ANTE_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::Ante));
        }
        for cue in data::ANTE_BOUND_CUES {
            vocab.add_phrase(cue, Term::Cue(Cue::AnteBound));
        }
        for (cue, min, max) in data::TIMING_CUES {
            if let Some(range) = AnteRange::new(*min, *max) {
                vocab.add_phrase(cue, Term::Cue(Cue::Timing(range)));
            }
        }

        vocab
    }

    fn add_phrase(&mut self, raw: &str, term: Term) {
        let folded = fold(raw);
        if folded.is_empty() {
            return;
        }
        let tokens = folded.split(' ').count();
        self.max_phrase_tokens = self.max_phrase_tokens.max(tokens);
        let terms = self.phrases.entry(folded).or_default();
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    /// Resolve raw text to an identifier of the given kind
    pub fn resolve(&self, kind: Kind, raw: &str) -> Option<&'static str> {
        let folded = fold(raw);
        if folded.is_empty() {
            return None;
        }

        let mut candidates = vec![folded.clone()];
        if let Some(suffix) = kind.suffix_word() {
            candidates.push(format!("{} {}", folded, suffix));
            if let Some(stripped) = folded.strip_suffix(&format!(" {}", suffix)) {
                candidates.push(stripped.to_string());
            }
        }
        if let Some(singular) = singular(&folded) {
            candidates.push(singular.to_string());
        }

        candidates
            .into_iter()
            .find_map(|candidate| self.ids.get(&(kind, candidate)).copied())
            .or_else(|| self.prefix_match(kind, &folded))
    }

    /// Resolve raw text against every kind in priority order
    pub fn resolve_any(&self, raw: &str) -> Option<(Kind, &'static str)> {
        Kind::PRIORITY
            .into_iter()
            .find_map(|kind| self.resolve(kind, raw).map(|id| (kind, id)))
    }

    /// Resolve a joker qualifier (edition or sticker)
    pub fn resolve_modifier(&self, raw: &str) -> Option<&'static str> {
        let folded = fold(raw);
        self.modifier_ids.get(&folded).copied().or_else(|| {
            folded
                .strip_suffix(" edition")
                .and_then(|stripped| self.modifier_ids.get(stripped).copied())
        })
    }

    /// Exact membership test on canonical identifiers
    pub fn contains(&self, kind: Kind, id: &str) -> bool {
        self.identifiers(kind).iter().any(|known| *known == id)
    }

    pub fn is_modifier(&self, id: &str) -> bool {
        self.modifiers.iter().any(|known| *known == id)
    }

    /// All identifiers of a kind, in table order
    pub fn identifiers(&self, kind: Kind) -> &[&'static str] {
        self.listing.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn modifiers(&self) -> &[&'static str] {
        &self.modifiers
    }

    pub fn default_deck(&self) -> &'static str {
        data::DEFAULT_DECK
    }

    pub fn listing(&self) -> VocabularyListing<'_> {
        VocabularyListing {
            default_deck: self.default_deck(),
            decks: self.identifiers(Kind::Deck),
            jokers: self.identifiers(Kind::Joker),
            editions: self.identifiers(Kind::Edition),
            seals: self.identifiers(Kind::Seal),
            tags: self.identifiers(Kind::Tag),
            vouchers: self.identifiers(Kind::Voucher),
            other: self.identifiers(Kind::Other),
            modifiers: self.modifiers(),
        }
    }

    /// Longest phrase (in tokens) any term is registered under
    pub fn max_phrase_tokens(&self) -> usize {
        self.max_phrase_tokens
    }

    /// Highest-priority term registered for an already folded phrase
    pub fn lookup_phrase(&self, folded: &str) -> Option<Term> {
        self.phrases
            .get(folded)
            .and_then(|terms| terms.first().copied())
    }

    /// Whether a folded phrase needs its capitals to count as a name
    pub fn is_proper_name(&self, folded: &str) -> bool {
        self.proper_names.contains(folded)
    }

    /// Lenient single-token lookup: plural form, then unique prefix. The
    /// prefix stage only runs for capitalized words, so "brains" stays a word.
    pub fn lookup_token_fallback(&self, token: &str, capitalized: bool) -> Option<Term> {
        if self.generic.contains(token) {
            return None;
        }
        if let Some(term) = singular(token).and_then(|s| self.lookup_phrase(s)) {
            if matches!(term, Term::Entity(..) | Term::Modifier(_)) {
                return Some(term);
            }
        }
        if !capitalized {
            return None;
        }
        Kind::PRIORITY.into_iter().find_map(|kind| {
            self.prefix_match(kind, token)
                .map(|id| Term::Entity(kind, id))
        })
    }

    /// Words joining two ante bounds ("to", "through")
    pub fn is_range_word(&self, token: &str) -> bool {
        data::ANTE_RANGE_WORDS.iter().any(|word| *word == token)
    }

    /// Digits or number words ("3", "three")
    pub fn number(&self, token: &str) -> Option<u8> {
        token
            .parse::<u8>()
            .ok()
            .or_else(|| self.numbers.get(token).copied())
    }

    fn prefix_match(&self, kind: Kind, folded: &str) -> Option<&'static str> {
        let len = folded.chars().count();
        if len < 6 || folded.contains(' ') || self.generic.contains(folded) {
            return None;
        }
        let words = self.single_words.get(&kind)?;
        let mut hits = words.iter().filter(|(name, _)| {
            name.starts_with(folded) && len * 10 >= name.chars().count() * 6
        });
        match (hits.next(), hits.next()) {
            (Some((_, id)), None) => Some(*id),
            _ => None,
        }
    }
}

fn singular(folded: &str) -> Option<&str> {
    if folded.len() > 3 && folded.ends_with('s') && !folded.ends_with("ss") {
        Some(&folded[..folded.len() - 1])
    } else {
        None
    }
}
