//! Parsing and validation of extraction model output.
//!
//! The model is asked for a JSON object keyed `"Review 1"`, `"Review 2"`,
//! ... with either an array of attribute phrases or the string sentinel
//! `"None"` per review. Models wrap JSON in prose often enough that the
//! parser slices from the first `{` to the last `}` before deserializing.
//! Everything else about the payload is treated as untrusted: it is decoded
//! into typed structures, and any review the payload does not cover in a
//! usable form falls back to the generic label.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{DelightError, Result};
use crate::types::GENERIC_LABEL;

/// Key prefix for per-review entries in the model's JSON object.
const REVIEW_KEY_PREFIX: &str = "Review ";

/// Raw per-review value: a list of phrases, or any bare string ("None",
/// "N/A", ...), which all mean "no specific attribute".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttributes {
    Phrases(Vec<String>),
    Sentinel(String),
}

/// Validated extraction result for one batch.
///
/// Indexed by 0-based position within the batch. Reviews the model skipped,
/// mislabeled, or marked with the sentinel resolve to the generic label.
#[derive(Debug, Default)]
pub struct BatchExtraction {
    by_review: FxHashMap<usize, Vec<String>>,
}

impl BatchExtraction {
    /// An extraction that assigns the generic label to every review; the
    /// fallback for a failed extraction call or an unparseable payload.
    pub fn generic() -> Self {
        Self::default()
    }

    /// Attributes for the review at 0-based `index` within its batch.
    pub fn attributes_for(&self, index: usize) -> Vec<String> {
        match self.by_review.get(&index) {
            Some(phrases) => phrases.clone(),
            None => vec![GENERIC_LABEL.to_string()],
        }
    }
}

/// Parse a model's raw text output into a validated [`BatchExtraction`].
///
/// `batch_len` bounds the accepted review indices; entries outside the
/// batch are dropped. Fails only when no JSON object can be decoded at all;
/// per-review problems degrade to the generic label instead.
pub fn parse_batch(raw: &str, batch_len: usize) -> Result<BatchExtraction> {
    let payload = slice_json_object(raw)?;

    let decoded: FxHashMap<String, RawAttributes> = serde_json::from_str(payload)
        .map_err(|err| DelightError::MalformedResponse(err.to_string()))?;

    let mut by_review = FxHashMap::default();
    for (key, value) in decoded {
        let Some(index) = parse_review_index(&key, batch_len) else {
            log::warn!("ignoring unrecognized extraction key {key:?}");
            continue;
        };

        let phrases = match value {
            RawAttributes::Phrases(list) => {
                let cleaned: Vec<String> = list
                    .iter()
                    .map(|phrase| phrase.trim())
                    .filter(|phrase| !phrase.is_empty())
                    .map(str::to_string)
                    .collect();
                if cleaned.is_empty() {
                    vec![GENERIC_LABEL.to_string()]
                } else {
                    cleaned
                }
            }
            RawAttributes::Sentinel(_) => vec![GENERIC_LABEL.to_string()],
        };

        by_review.insert(index, phrases);
    }

    Ok(BatchExtraction { by_review })
}

/// Slice the outermost `{...}` span out of prose-wrapped model output.
fn slice_json_object(raw: &str) -> Result<&str> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(DelightError::MalformedResponse(
            "no JSON object found in model output".to_string(),
        )),
    }
}

/// `"Review 3"` -> `Some(2)`; anything unparseable or out of range -> `None`.
fn parse_review_index(key: &str, batch_len: usize) -> Option<usize> {
    let number: usize = key.strip_prefix(REVIEW_KEY_PREFIX)?.trim().parse().ok()?;
    let index = number.checked_sub(1)?;
    (index < batch_len).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_list_and_sentinel() {
        let raw = r#"{ "Review 1": ["Fragrance", "Lather"], "Review 2": "None" }"#;
        let batch = parse_batch(raw, 2).unwrap();

        assert_eq!(batch.attributes_for(0), vec!["Fragrance", "Lather"]);
        assert_eq!(batch.attributes_for(1), vec![GENERIC_LABEL]);
    }

    #[test]
    fn test_prose_wrapped_json() {
        let raw = "Here are the attributes you asked for:\n{ \"Review 1\": [\"Scent\"] }\nHope this helps!";
        let batch = parse_batch(raw, 1).unwrap();

        assert_eq!(batch.attributes_for(0), vec!["Scent"]);
    }

    #[test]
    fn test_missing_review_defaults_to_generic() {
        let raw = r#"{ "Review 1": ["Scent"] }"#;
        let batch = parse_batch(raw, 3).unwrap();

        assert_eq!(batch.attributes_for(1), vec![GENERIC_LABEL]);
        assert_eq!(batch.attributes_for(2), vec![GENERIC_LABEL]);
    }

    #[test]
    fn test_phrases_are_trimmed_and_empties_dropped() {
        let raw = r#"{ "Review 1": ["  fast shipping ", "", "   "] }"#;
        let batch = parse_batch(raw, 1).unwrap();

        assert_eq!(batch.attributes_for(0), vec!["fast shipping"]);
    }

    #[test]
    fn test_all_empty_phrases_degrade_to_generic() {
        let raw = r#"{ "Review 1": ["", " "] }"#;
        let batch = parse_batch(raw, 1).unwrap();

        assert_eq!(batch.attributes_for(0), vec![GENERIC_LABEL]);
    }

    #[test]
    fn test_out_of_range_and_malformed_keys_ignored() {
        let raw = r#"{
            "Review 0": ["a"],
            "Review 5": ["b"],
            "Summary": ["c"],
            "Review 2": ["Lather"]
        }"#;
        let batch = parse_batch(raw, 2).unwrap();

        assert_eq!(batch.attributes_for(0), vec![GENERIC_LABEL]);
        assert_eq!(batch.attributes_for(1), vec!["Lather"]);
    }

    #[test]
    fn test_no_json_object_is_an_error() {
        let err = parse_batch("I could not process these reviews.", 2).unwrap_err();
        assert!(matches!(err, DelightError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = parse_batch(r#"{ "Review 1": [1, 2, 3 }"#, 1).unwrap_err();
        assert!(matches!(err, DelightError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_string_non_list_value_is_an_error() {
        // An object value fits neither untagged variant.
        let err = parse_batch(r#"{ "Review 1": { "attr": "x" } }"#, 1).unwrap_err();
        assert!(matches!(err, DelightError::MalformedResponse(_)));
    }

    #[test]
    fn test_generic_fallback_covers_every_index() {
        let batch = BatchExtraction::generic();
        assert_eq!(batch.attributes_for(0), vec![GENERIC_LABEL]);
        assert_eq!(batch.attributes_for(99), vec![GENERIC_LABEL]);
    }
}
