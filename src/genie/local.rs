// Local fallback generator
//
// Deterministic keyword synthesizer used when no AI provider is configured
// or its answer cannot be used. It never fails and never touches the network.
//
// Pipeline:
// 1. lex: longest-match the prompt against the vocabulary phrase index
// 2. split the lexemes into segments at punctuation and keyword breakers
// 3. carry cues from mention-less segments onto their neighbours
// 4. drop negated segments ("no Blueprint", "without Brainstorm")
// 5. attach editions and stickers to the joker they qualify
// 6. push everything through ConfigBuilder

use std::collections::BTreeSet;

use super::config::{derive_name, ConfigBuilder, Criterion, Priority, SearchConfig};
use crate::vocab::{tokenize, AnteRange, Cue, Kind, Term, Token, Vocabulary};

/// How a segment relates to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// Enumeration continues ("Perkeo, Blueprint and Brainstorm")
    Inherit,
    /// New clause ("... with Observatory", sentence ends)
    Reset,
}

impl Link {
    fn join(self, other: Link) -> Link {
        if self == Link::Reset || other == Link::Reset {
            Link::Reset
        } else {
            Link::Inherit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    Mention(Kind, &'static str),
    Modifier(&'static str),
    Hedge,
    Mandatory,
    Negation,
    Ante(AnteRange),
    Break(Link),
}

pub struct LocalGenerator {
    vocab: &'static Vocabulary,
}

impl LocalGenerator {
    pub fn new(vocab: &'static Vocabulary) -> Self {
        Self { vocab }
    }

    /// Build a config from the prompt alone
    pub fn generate(&self, prompt: &str) -> SearchConfig {
        let mut segments = split_segments(&self.lex(prompt));
        classify(&mut segments);

        let mut items = flatten(&segments);
        attach_qualifiers(&mut items, &segments);

        let mut builder = ConfigBuilder::new(self.vocab, derive_name(prompt));
        for item in items {
            let segment = &segments[item.segment];
            let criterion = match item.slot {
                Slot::Entity(Kind::Deck, id) => {
                    builder.deck(id);
                    continue;
                }
                Slot::Entity(kind, id) => Criterion::new(kind, id).with_modifiers(item.modifiers),
                Slot::Qualifier { id, standalone } if standalone && !item.attached => {
                    Criterion::new(Kind::Edition, id)
                }
                Slot::Qualifier { .. } => continue,
            };
            builder.push(segment.priority, criterion.with_ante(segment.flags.ante));
        }
        builder.build()
    }

    /// Entities the lexer recognizes in a prompt, first-seen order, no repeats
    pub fn mentions(&self, prompt: &str) -> Vec<(Kind, &'static str)> {
        let mut seen = Vec::new();
        for lexeme in self.lex(prompt) {
            let mention = match lexeme {
                Lexeme::Mention(kind, id) => (kind, id),
                Lexeme::Modifier(id) => (Kind::Edition, id),
                _ => continue,
            };
            if !seen.contains(&mention) {
                seen.push(mention);
            }
        }
        seen
    }

    pub(crate) fn lex(&self, prompt: &str) -> Vec<Lexeme> {
        let tokens = tokenize(prompt);
        let mut out = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if i > 0 && tokens[i].starts_segment() {
                let link = if tokens[i].list_break {
                    Link::Inherit
                } else {
                    Link::Reset
                };
                push_break(&mut out, link);
            }

            let hit = self.longest_phrase(&tokens, i).or_else(|| {
                self.vocab
                    .lookup_token_fallback(&tokens[i].text, tokens[i].capitalized)
                    .map(|term| (term, 1))
            });
            let Some((term, len)) = hit else {
                i += 1;
                continue;
            };

            let mut next = i + len;
            match term {
                Term::Entity(kind, id) => out.push(Lexeme::Mention(kind, id)),
                Term::Modifier(id) => out.push(Lexeme::Modifier(id)),
                Term::Cue(Cue::Hedge) => out.push(Lexeme::Hedge),
                Term::Cue(Cue::Mandatory) => out.push(Lexeme::Mandatory),
                Term::Cue(Cue::Negation) => {
                    push_break(&mut out, Link::Reset);
                    out.push(Lexeme::Negation);
                }
                Term::Cue(Cue::Conjunction) => push_break(&mut out, Link::Inherit),
                Term::Cue(Cue::Clause) => push_break(&mut out, Link::Reset),
                Term::Cue(Cue::Timing(range)) => out.push(Lexeme::Ante(range)),
                Term::Cue(Cue::Ante) => {
                    let bounded = i > 0
                        && !tokens[i].starts_segment()
                        && self.vocab.lookup_phrase(&tokens[i - 1].text)
                            == Some(Term::Cue(Cue::AnteBound));
                    if let Some((range, end)) = self.ante_range(&tokens, next, bounded) {
                        out.push(Lexeme::Ante(range));
                        next = end;
                    }
                }
                // consumed by the lookback above
                Term::Cue(Cue::AnteBound) => {}
            }
            i = next;
        }
        out
    }

    /// Longest phrase starting at `start` that never crosses a hard break.
    /// Names that read as plain English need a capital on their last word.
    fn longest_phrase(&self, tokens: &[Token], start: usize) -> Option<(Term, usize)> {
        let limit = (start + self.vocab.max_phrase_tokens()).min(tokens.len());
        let mut end = start + 1;
        while end < limit && !tokens[end].hard_break {
            end += 1;
        }

        (start + 1..=end).rev().find_map(|stop| {
            let phrase = tokens[start..stop]
                .iter()
                .map(|token| token.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if self.vocab.is_proper_name(&phrase) && !tokens[stop - 1].capitalized {
                return None;
            }
            self.vocab
                .lookup_phrase(&phrase)
                .map(|term| (term, stop - start))
        })
    }

    /// Parse the numbers after an ante cue: "3", "2-4", "2 to 4".
    /// Returns the range and the index of the first unconsumed token.
    fn ante_range(&self, tokens: &[Token], at: usize, bounded: bool) -> Option<(AnteRange, usize)> {
        let first = self.number_at(tokens, at)?;
        if bounded {
            return AnteRange::new(1, first).map(|range| (range, at + 1));
        }

        let mut last = first;
        let mut end = at + 1;
        if let Some(second) = self.number_at(tokens, end) {
            last = second;
            end += 1;
        } else if tokens
            .get(end)
            .is_some_and(|token| !token.starts_segment() && self.vocab.is_range_word(&token.text))
        {
            if let Some(second) = self.number_at(tokens, end + 1) {
                last = second;
                end += 2;
            }
        }
        AnteRange::new(first, last).map(|range| (range, end))
    }

    fn number_at(&self, tokens: &[Token], at: usize) -> Option<u8> {
        tokens
            .get(at)
            .filter(|token| !token.starts_segment())
            .and_then(|token| self.vocab.number(&token.text))
    }
}

fn push_break(out: &mut Vec<Lexeme>, link: Link) {
    match out.last_mut() {
        None => {}
        Some(Lexeme::Break(previous)) => *previous = previous.join(link),
        Some(_) => out.push(Lexeme::Break(link)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    hedge: bool,
    mandatory: bool,
    /// Never carried between segments, only inherited along an enumeration
    negated: bool,
    ante: Option<AnteRange>,
}

impl Flags {
    /// Own values win; only missing ones are filled in
    fn merge(&mut self, other: &Flags) {
        self.hedge |= other.hedge;
        self.mandatory |= other.mandatory;
        if self.ante.is_none() {
            self.ante = other.ante;
        }
    }

    fn priority(&self) -> Option<Priority> {
        if self.mandatory {
            Some(Priority::Must)
        } else if self.hedge {
            Some(Priority::Should)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Entity(Kind, &'static str),
    /// Edition or sticker waiting for a joker; editions may stand alone
    Qualifier { id: &'static str, standalone: bool },
}

#[derive(Debug)]
struct Segment {
    link: Link,
    flags: Flags,
    slots: Vec<Slot>,
    priority: Priority,
}

impl Segment {
    fn new(link: Link) -> Self {
        Self {
            link,
            flags: Flags::default(),
            slots: Vec::new(),
            priority: Priority::Must,
        }
    }
}

fn split_segments(lexemes: &[Lexeme]) -> Vec<Segment> {
    let mut segments = vec![Segment::new(Link::Reset)];
    for lexeme in lexemes {
        let Some(current) = segments.last_mut() else {
            break;
        };
        match *lexeme {
            Lexeme::Break(link) => segments.push(Segment::new(link)),
            Lexeme::Hedge => current.flags.hedge = true,
            Lexeme::Mandatory => current.flags.mandatory = true,
            Lexeme::Negation => current.flags.negated = true,
            Lexeme::Ante(range) => {
                if current.flags.ante.is_none() {
                    current.flags.ante = Some(range);
                }
            }
            Lexeme::Mention(Kind::Edition, id) => current.slots.push(Slot::Qualifier {
                id,
                standalone: true,
            }),
            Lexeme::Mention(kind, id) => current.slots.push(Slot::Entity(kind, id)),
            Lexeme::Modifier(id) => current.slots.push(Slot::Qualifier {
                id,
                standalone: false,
            }),
        }
    }
    segments
}

/// Resolve each segment's priority.
///
/// Cues in a segment without mentions move forward to the next segment that
/// has some; cues trailing after the last mention apply to the last segment
/// with mentions. A segment without its own cue inherits the previous
/// priority and negation when it continues an enumeration, and is a must
/// otherwise.
fn classify(segments: &mut [Segment]) {
    let mut pending = Flags::default();
    let mut pending_link = Link::Inherit;
    let mut last = None;
    for (index, segment) in segments.iter_mut().enumerate() {
        if segment.slots.is_empty() {
            pending.merge(&segment.flags);
            pending_link = pending_link.join(segment.link);
            continue;
        }
        segment.flags.merge(&pending);
        segment.link = segment.link.join(pending_link);
        pending = Flags::default();
        pending_link = Link::Inherit;
        last = Some(index);
    }
    if let Some(index) = last {
        segments[index].flags.merge(&pending);
    }

    let mut previous = None;
    let mut previous_negated = false;
    for segment in segments.iter_mut().filter(|s| !s.slots.is_empty()) {
        let (inherited, inherited_negation) = match segment.link {
            Link::Inherit => (previous, previous_negated),
            Link::Reset => (None, false),
        };
        let own = segment.flags.priority();
        if own.is_none() && inherited_negation {
            segment.flags.negated = true;
        }
        segment.priority = own.or(inherited).unwrap_or(Priority::Must);
        previous = Some(segment.priority);
        previous_negated = segment.flags.negated;
    }
}

#[derive(Debug)]
struct Item {
    slot: Slot,
    segment: usize,
    modifiers: BTreeSet<&'static str>,
    attached: bool,
}

impl Item {
    fn is_joker(&self) -> bool {
        matches!(self.slot, Slot::Entity(Kind::Joker, _))
    }
}

fn flatten(segments: &[Segment]) -> Vec<Item> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| !segment.flags.negated)
        .flat_map(|(index, segment)| {
            segment.slots.iter().map(move |slot| Item {
                slot: *slot,
                segment: index,
                modifiers: BTreeSet::new(),
                attached: false,
            })
        })
        .collect()
}

/// A qualifier goes to the next joker in its own segment, else to the
/// nearest joker before it anywhere in the prompt. A hedged qualifier never
/// reaches back into a must segment; it stays a should of its own.
fn attach_qualifiers(items: &mut [Item], segments: &[Segment]) {
    for index in 0..items.len() {
        let Slot::Qualifier { id, .. } = items[index].slot else {
            continue;
        };
        let segment = items[index].segment;
        let hedged = segments[segment].priority == Priority::Should;
        let target = items[index + 1..]
            .iter()
            .take_while(|item| item.segment == segment)
            .position(Item::is_joker)
            .map(|offset| index + 1 + offset)
            .or_else(|| {
                items[..index]
                    .iter()
                    .rposition(Item::is_joker)
                    .filter(|&target| {
                        !(hedged && segments[items[target].segment].priority == Priority::Must)
                    })
            });

        if let Some(target) = target {
            items[target].modifiers.insert(id);
            items[index].attached = true;
        }
    }
}
