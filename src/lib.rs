//! delight-rank: extracts delight attributes from customer reviews and
//! clusters them into ranked categories.
//!
//! The pipeline runs in two phases. Batches of reviews go to a language
//! model that names the specific things customers loved ("fragrance",
//! "fast shipping"); the phrases accumulate into a frequency table across
//! the whole run. A single embedding call then maps each distinct phrase to
//! a semantic vector, agglomerative clustering merges lexical variants of
//! the same concept, and each cluster is reported under its shortest member
//! phrase with the summed occurrence count.
//!
//! External services sit behind the [`extract::DelightExtractor`] and
//! [`embedding::EmbeddingProvider`] traits; both degrade gracefully on
//! failure, so a run always completes.
//!
//! ```no_run
//! use delight_rank::embedding::OpenAiEmbedder;
//! use delight_rank::extract::OpenAiExtractor;
//! use delight_rank::pipeline::ReviewPipeline;
//! use delight_rank::types::Review;
//!
//! let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
//! let pipeline = ReviewPipeline::new(
//!     OpenAiExtractor::new(&api_key),
//!     OpenAiEmbedder::new(&api_key),
//! );
//!
//! let reviews: Vec<Review> = serde_json::from_str(r#"[{"body": "Smells great"}]"#).unwrap();
//! let output = pipeline.run(&reviews);
//! for point in &output.delight_points {
//!     println!("{}: {}", point.label, point.frequency);
//! }
//! ```

pub mod attributes;
pub mod cluster;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{DelightError, Result};
pub use pipeline::{ReviewPipeline, RunOutput};
pub use types::{DelightPoint, ExtractedReview, PipelineConfig, Review, GENERIC_LABEL};
