use crate::payload::{DraftPayload, EtymologyPayload};
use wordpack_protocol::{Collocations, ConfidenceLevel, Etymology, Sense, WordPack};

/// Strict pack fields derived from a (possibly empty) draft payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedFields {
    pub senses: Vec<Sense>,
    pub collocations: Collocations,
    pub etymology: Etymology,
}

/// Closes the gaps the model left in a draft with deterministic defaults.
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    placeholder: String,
}

impl FallbackSynthesizer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn fill(&self, partial: DraftPayload) -> CompletedFields {
        let senses = partial
            .senses
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sense| {
                let gloss = sense.gloss?;
                Some((sense.id, gloss, sense.patterns))
            })
            .enumerate()
            .map(|(idx, (id, gloss, patterns))| Sense {
                id: id.unwrap_or_else(|| format!("s{}", idx + 1)),
                gloss,
                patterns,
            })
            .collect();

        CompletedFields {
            senses,
            collocations: partial.collocations.unwrap_or_default(),
            etymology: self.etymology(partial.etymology),
        }
    }

    /// Model etymology passes through; a missing note becomes the placeholder at `low`.
    pub fn etymology(&self, payload: Option<EtymologyPayload>) -> Etymology {
        match payload {
            Some(EtymologyPayload {
                note: Some(note),
                confidence,
            }) if !note.trim().is_empty() => Etymology {
                note,
                confidence: confidence
                    .as_deref()
                    .and_then(ConfidenceLevel::parse_lenient)
                    .unwrap_or(ConfidenceLevel::Low),
            },
            _ => self.placeholder_etymology(),
        }
    }

    pub fn placeholder_etymology(&self) -> Etymology {
        Etymology {
            note: self.placeholder.clone(),
            confidence: ConfidenceLevel::Low,
        }
    }

    /// Restore the non-empty etymology invariant on an assembled pack.
    pub fn repair(&self, pack: &mut WordPack) {
        if pack.etymology.note.trim().is_empty() {
            log::warn!("Pack for '{}' had an empty etymology note", pack.lemma);
            pack.etymology = self.placeholder_etymology();
        }
    }
}
