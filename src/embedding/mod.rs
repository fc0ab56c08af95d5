//! Semantic embedding providers.
//!
//! The clusterer needs one fixed-length vector per distinct attribute
//! phrase. [`EmbeddingProvider`] is the seam for the external embedding
//! service; [`OpenAiEmbedder`] is the production implementation and tests
//! plug in deterministic stubs.

pub mod openai;

pub use openai::OpenAiEmbedder;

use crate::error::Result;

/// Maps phrases to fixed-length semantic vectors.
///
/// The contract is positional: a successful `embed` returns exactly one
/// vector per input phrase, in input order.
pub trait EmbeddingProvider {
    /// Embed every phrase in one request.
    fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Width of the vectors this provider produces.
    fn dimension(&self) -> usize;

    /// Embed with the degrade-gracefully contract: on any failure, log the
    /// error and substitute a zero vector per phrase, so the clustering
    /// stage always receives a full-length sequence aligned 1:1 with its
    /// input. Clustering zero vectors collapses the affected phrases into a
    /// single group instead of crashing the run.
    fn embed_or_zero(&self, phrases: &[String]) -> Vec<Vec<f32>> {
        match self.embed(phrases) {
            Ok(vectors) => vectors,
            Err(err) => {
                log::error!("error generating embeddings: {err}; substituting zero vectors");
                vec![vec![0.0; self.dimension()]; phrases.len()]
            }
        }
    }
}
