//! Frequency table builder.
//!
//! The accumulator consumes attribute occurrences in extraction order across
//! all batches and maintains the deduplicated distinct-phrase list together
//! with per-phrase occurrence counts. It uses an FxHashMap for O(1) phrase
//! lookups with a Vec preserving first-occurrence order, since that order is
//! the tie-break basis for everything downstream.

use rustc_hash::FxHashMap;

use crate::types::GENERIC_LABEL;

/// Accumulates attribute occurrences into a frequency table.
///
/// Invariant: `counts().iter().sum() == total()`, the number of occurrences
/// pushed. The generic label is an ordinary phrase here and is counted like
/// any other.
#[derive(Debug, Clone, Default)]
pub struct AttributeAccumulator {
    /// Maps phrase -> distinct-phrase index.
    phrase_to_id: FxHashMap<String, usize>,
    /// Distinct phrases in first-occurrence order.
    phrases: Vec<String>,
    /// Occurrence count per distinct phrase, aligned with `phrases`.
    counts: Vec<u64>,
}

impl AttributeAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            phrase_to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            phrases: Vec::with_capacity(capacity),
            counts: Vec::with_capacity(capacity),
        }
    }

    /// Record one occurrence of `phrase`, returning its distinct-phrase index.
    pub fn push(&mut self, phrase: &str) -> usize {
        if let Some(&id) = self.phrase_to_id.get(phrase) {
            self.counts[id] += 1;
            return id;
        }

        let id = self.phrases.len();
        self.phrase_to_id.insert(phrase.to_string(), id);
        self.phrases.push(phrase.to_string());
        self.counts.push(1);
        id
    }

    /// Record one occurrence of the generic label.
    pub fn push_generic(&mut self) -> usize {
        self.push(GENERIC_LABEL)
    }

    /// Record every phrase in `phrases`, in order.
    pub fn extend<I, S>(&mut self, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            self.push(phrase.as_ref());
        }
    }

    /// Distinct phrases in first-occurrence order.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Occurrence counts aligned with [`phrases`](Self::phrases).
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Occurrence count for the distinct phrase at `id`.
    pub fn count(&self, id: usize) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Returns `true` if no occurrences were recorded.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Total number of occurrences recorded.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate over `(phrase, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.phrases
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}
