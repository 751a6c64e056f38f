// Completion parsing
//
// Models answer in many shapes: fenced JSON, JSON with chatter around it,
// criteria as bare strings or as objects with slightly different field
// names. This module turns any of those into a RawSearchConfig, or keeps the
// text as-is when no config-shaped JSON can be found. Values are still free
// text here; the synthesizer resolves them against the vocabulary.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::vocab::AnteRange;

/// What a provider returned
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Structured(RawSearchConfig),
    Text(String),
}

/// Config as the model wrote it, before vocabulary validation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSearchConfig {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub deck: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub must: Vec<RawCriterion>,
    #[serde(deserialize_with = "lenient_list")]
    pub should: Vec<RawCriterion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCriterion {
    /// "Perkeo"
    Bare(String),
    /// {"kind": "joker", "value": "Perkeo", "modifiers": ["negative"]}
    Detailed(RawCriterionDetail),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawCriterionDetail {
    #[serde(alias = "type", alias = "category", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(alias = "name", alias = "id", deserialize_with = "lenient_string")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub modifiers: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub edition: Option<String>,
    #[serde(
        alias = "ante",
        alias = "ante_preference",
        deserialize_with = "lenient_ante"
    )]
    pub ante_preference: Option<RawAnte>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawAnte {
    Range { min: i64, max: i64 },
    Pair(i64, i64),
    Single(i64),
}

impl RawAnte {
    /// Convert to a validated range; out-of-range values yield None
    pub fn range(&self) -> Option<AnteRange> {
        let (min, max) = match *self {
            RawAnte::Range { min, max } | RawAnte::Pair(min, max) => (min, max),
            RawAnte::Single(ante) => (ante, ante),
        };
        AnteRange::new(u8::try_from(min).ok()?, u8::try_from(max).ok()?)
    }
}

const CONFIG_KEYS: [&str; 4] = ["name", "deck", "must", "should"];

/// Parse a provider's raw text answer
pub fn parse_completion(text: &str) -> Completion {
    extract_json(text)
        .and_then(|json| serde_json::from_str::<Value>(json).ok())
        .and_then(structured)
        .map(Completion::Structured)
        .unwrap_or_else(|| Completion::Text(text.to_string()))
}

fn structured(mut value: Value) -> Option<RawSearchConfig> {
    if value.get("config").is_some_and(Value::is_object) {
        value = value["config"].take();
    }
    let object = value.as_object()?;
    if !CONFIG_KEYS.iter().any(|key| object.contains_key(*key)) {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Locate the JSON payload in a response (handles markdown code blocks)
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let json_start = start + "```json".len();
        if let Some(end) = text[json_start..].find("```") {
            return Some(text[json_start..json_start + end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let json_start = start + 3;
        if let Some(end) = text[json_start..].find("```") {
            let block = text[json_start..json_start + end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| text[start..=end].trim())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => vec![text],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_ante<'de, D>(deserializer: D) -> Result<Option<RawAnte>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Accept a list (or a lone item); skip elements that fit no criterion shape
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<RawCriterion>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
