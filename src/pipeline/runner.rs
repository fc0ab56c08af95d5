//! Pipeline runner — orchestrates batch extraction, accumulation, and the
//! final clustering pass.
//!
//! [`ReviewPipeline`] is generic over its two external seams, the extractor
//! and the embedding provider, so tests run the whole pipeline with
//! deterministic stubs and no network.
//!
//! Control flow is batch-sequential: one blocking extraction call per batch
//! of reviews, accumulating attributes and annotated records as it goes;
//! then exactly one embedding call and one in-process clustering pass over
//! the full run's distinct phrases. Failures at any external call site
//! degrade (generic labels, zero vectors, empty table) and never abort the
//! run.

use crate::attributes::{aggregate_clusters, AttributeAccumulator};
use crate::cluster::AgglomerativeClusterer;
use crate::embedding::EmbeddingProvider;
use crate::extract::{response, BatchExtraction, DelightExtractor};
use crate::types::{DelightPoint, ExtractedReview, PipelineConfig, Review};

/// Everything a run produces: one annotated record per input review, plus
/// the clustered frequency table.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<ExtractedReview>,
    pub delight_points: Vec<DelightPoint>,
}

/// The review-analysis pipeline, composed of an extractor and an embedding
/// provider.
#[derive(Debug, Clone)]
pub struct ReviewPipeline<X, E> {
    extractor: X,
    embedder: E,
    config: PipelineConfig,
}

impl<X, E> ReviewPipeline<X, E>
where
    X: DelightExtractor,
    E: EmbeddingProvider,
{
    /// Compose a pipeline with the default configuration.
    pub fn new(extractor: X, embedder: E) -> Self {
        Self {
            extractor,
            embedder,
            config: PipelineConfig::default(),
        }
    }

    /// Replace the run configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Process every review and produce the run output.
    pub fn run(&self, reviews: &[Review]) -> RunOutput {
        let mut accumulator = AttributeAccumulator::new();
        let mut records = Vec::with_capacity(reviews.len());

        let batch_size = self.config.batch_size.max(1);
        let total_batches = reviews.len().div_ceil(batch_size);

        for (batch_idx, batch) in reviews.chunks(batch_size).enumerate() {
            log::info!("processing batch {} of {}", batch_idx + 1, total_batches);
            let extraction = self.extract_batch(batch_idx, batch);

            for (offset, review) in batch.iter().enumerate() {
                let attributes = extraction.attributes_for(offset);
                accumulator.extend(&attributes);

                records.push(ExtractedReview {
                    review_id: review.review_id.clone(),
                    author: review.author.clone(),
                    body: review.body.clone(),
                    delight_attributes: attributes.join(", "),
                });
            }
        }

        let delight_points = self.cluster_attributes(&accumulator);

        RunOutput {
            records,
            delight_points,
        }
    }

    /// One extraction call. Call failures and unparseable payloads both
    /// degrade to the generic label for every review of this batch; later
    /// batches are unaffected.
    fn extract_batch(&self, batch_idx: usize, batch: &[Review]) -> BatchExtraction {
        let bodies: Vec<String> = batch.iter().map(|review| review.body.clone()).collect();

        self.extractor
            .extract_batch(&bodies)
            .and_then(|raw| response::parse_batch(&raw, batch.len()))
            .unwrap_or_else(|err| {
                log::error!(
                    "error extracting delight attributes for batch {}: {err}; \
                     assigning the generic label",
                    batch_idx + 1
                );
                BatchExtraction::generic()
            })
    }

    /// The clustering pass: embed the distinct phrases once, group them,
    /// and aggregate frequencies. Clustering failures degrade to an empty
    /// table for the run.
    fn cluster_attributes(&self, accumulator: &AttributeAccumulator) -> Vec<DelightPoint> {
        if accumulator.is_empty() {
            return Vec::new();
        }

        let embeddings = self.embedder.embed_or_zero(accumulator.phrases());

        let clusterer = AgglomerativeClusterer::with_config(self.config.cluster.clone());
        match clusterer.fit_predict(&embeddings) {
            Ok(labels) => aggregate_clusters(accumulator, &labels),
            Err(err) => {
                log::error!("error clustering attributes: {err}; emitting an empty table");
                Vec::new()
            }
        }
    }
}
