//! Loosely-typed view of the draft reply.
//!
//! Every field is optional and each one is read independently, so a single
//! oddly-shaped field never discards the rest of the reply. The fallback
//! synthesizer turns this into strict pack fields.

use serde_json::{Map, Value};
use wordpack_protocol::{CollocationSet, Collocations};

const GLOSS_KEYS: &[&str] = &["gloss", "gloss_ja", "definition_ja", "definition"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensePayload {
    pub id: Option<String>,
    pub gloss: Option<String>,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EtymologyPayload {
    pub note: Option<String>,
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPayload {
    pub senses: Option<Vec<SensePayload>>,
    pub collocations: Option<Collocations>,
    pub etymology: Option<EtymologyPayload>,
}

impl DraftPayload {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            senses: obj.get("senses").and_then(read_senses),
            collocations: obj.get("collocations").and_then(read_collocations),
            etymology: obj.get("etymology").and_then(read_etymology),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_none() && self.collocations.is_none() && self.etymology.is_none()
    }
}

fn read_senses(value: &Value) -> Option<Vec<SensePayload>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| SensePayload {
                id: string_field(obj, &["id"]),
                gloss: string_field(obj, GLOSS_KEYS),
                patterns: obj.get("patterns").map(string_list).unwrap_or_default(),
            })
            .collect(),
    )
}

fn read_collocations(value: &Value) -> Option<Collocations> {
    let tiers = value.as_object()?;
    let mut out = Collocations::new();
    for (tier, kinds) in tiers {
        let Some(kinds) = kinds.as_object() else {
            continue;
        };
        let set = CollocationSet {
            verb_object: kinds.get("verb_object").map(string_list).unwrap_or_default(),
            adj_noun: kinds.get("adj_noun").map(string_list).unwrap_or_default(),
            prep_noun: kinds.get("prep_noun").map(string_list).unwrap_or_default(),
        };
        if !set.is_empty() {
            out.insert(tier.trim().to_string(), set);
        }
    }
    Some(out)
}

fn read_etymology(value: &Value) -> Option<EtymologyPayload> {
    match value {
        Value::String(note) => Some(EtymologyPayload {
            note: non_blank(note),
            confidence: None,
        }),
        Value::Object(obj) => Some(EtymologyPayload {
            note: string_field(obj, &["note"]),
            confidence: string_field(obj, &["confidence"]),
        }),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find_map(non_blank)
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).filter_map(non_blank).collect())
        .unwrap_or_default()
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reads_complete_payload() {
        let payload = DraftPayload::from_value(&json!({
            "senses": [
                {"id": "s1", "gloss_ja": "緩和する", "patterns": ["mitigate the risk", 3]},
                {"gloss": "和らげる"}
            ],
            "collocations": {
                "general": {"verb_object": ["mitigate risk"], "adj_noun": [], "prep_noun": []},
                "academic": {"verb_object": [], "adj_noun": [], "prep_noun": []}
            },
            "etymology": {"note": "ラテン語 mitigare から", "confidence": "High"}
        }));

        let senses = payload.senses.unwrap();
        assert_eq!(senses.len(), 2);
        assert_eq!(senses[0].gloss.as_deref(), Some("緩和する"));
        assert_eq!(senses[0].patterns, vec!["mitigate the risk"]);
        assert_eq!(senses[1].id, None);

        let collocations = payload.collocations.unwrap();
        assert_eq!(collocations.len(), 1);
        assert_eq!(collocations["general"].verb_object, vec!["mitigate risk"]);

        let etymology = payload.etymology.unwrap();
        assert_eq!(etymology.confidence.as_deref(), Some("High"));
    }

    #[test]
    fn odd_fields_do_not_poison_the_rest() {
        let payload = DraftPayload::from_value(&json!({
            "senses": "not a list",
            "collocations": 42,
            "etymology": "from Old French"
        }));
        assert_eq!(payload.senses, None);
        assert_eq!(payload.collocations, None);
        assert_eq!(
            payload.etymology,
            Some(EtymologyPayload {
                note: Some("from Old French".to_string()),
                confidence: None
            })
        );
    }

    #[test]
    fn non_object_reply_is_empty() {
        assert!(DraftPayload::from_value(&json!([1, 2])).is_empty());
        assert!(DraftPayload::from_value(&json!({})).is_empty());
    }

    #[test]
    fn blank_etymology_note_is_missing() {
        let payload = DraftPayload::from_value(&json!({"etymology": {"note": "  "}}));
        assert_eq!(payload.etymology.unwrap().note, None);
    }
}
