// Vocabulary context builder for AI consumption
//
// Prepares a compact JSON representation of the known vocabulary so the
// model answers with identifiers Genie can validate, plus hints naming the
// entities the local lexer already spotted in the prompt.

use serde::Serialize;

use crate::vocab::{Kind, Vocabulary, VocabularyListing};

/// Entity the lexer recognized in the prompt
#[derive(Debug, Serialize)]
pub struct ContextHint<'a> {
    pub kind: Kind,
    pub value: &'a str,
}

/// Complete context sent to the model
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AIContext<'a> {
    #[serde(flatten)]
    pub vocabulary: VocabularyListing<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<ContextHint<'a>>,
}

pub struct VocabularyContextBuilder;

impl VocabularyContextBuilder {
    /// Build context with hints about what the prompt already names
    pub fn build_smart_context(
        vocab: &Vocabulary,
        mentions: &[(Kind, &'static str)],
    ) -> Result<String, serde_json::Error> {
        let context = AIContext {
            vocabulary: vocab.listing(),
            hints: mentions
                .iter()
                .map(|&(kind, value)| ContextHint { kind, value })
                .collect(),
        };

        serde_json::to_string(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::vocabulary;

    #[test]
    fn test_context_without_hints_lists_every_kind() {
        let json = VocabularyContextBuilder::build_smart_context(vocabulary(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["defaultDeck"], "Red Deck");
        assert_eq!(value["jokers"].as_array().unwrap().len(), 150);
        assert!(value["vouchers"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("Observatory")));
        assert!(value["modifiers"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("eternal")));
        assert!(value.get("hints").is_none());
    }

    #[test]
    fn test_smart_context_includes_hints() {
        let json = VocabularyContextBuilder::build_smart_context(
            vocabulary(),
            &[(Kind::Joker, "Perkeo"), (Kind::Voucher, "Observatory")],
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["hints"],
            serde_json::json!([
                {"kind": "joker", "value": "Perkeo"},
                {"kind": "voucher", "value": "Observatory"}
            ])
        );
    }
}
