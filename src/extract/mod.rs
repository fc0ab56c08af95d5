//! Delight-attribute extraction.
//!
//! [`DelightExtractor`] is the seam for the external language model that
//! reads a batch of review texts and names the attributes customers loved.
//! The model's raw text output is untrusted; [`response`] turns it into a
//! validated per-review attribute mapping with explicit fallbacks.

pub mod openai;
pub mod response;

pub use openai::OpenAiExtractor;
pub use response::BatchExtraction;

use crate::error::Result;

/// Extracts delight attributes for a batch of reviews.
///
/// Implementations return the model's raw text output; parsing and
/// validation are centralized in [`response::parse_batch`] so every
/// implementation gets the same fallback behavior.
pub trait DelightExtractor {
    /// One extraction call for a batch of review body texts.
    fn extract_batch(&self, reviews: &[String]) -> Result<String>;
}
