//! Core data types shared across pipeline stages.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterConfig;

/// Label assigned to a review when no specific delight attribute is
/// identifiable, and the sentinel the extraction model returns for such
/// reviews.
pub const GENERIC_LABEL: &str = "General";

/// Placeholder for input record fields that are absent.
pub const MISSING_FIELD: &str = "N/A";

fn missing_field() -> String {
    MISSING_FIELD.to_string()
}

/// A raw customer review as it appears in the input file.
///
/// Absent fields default to [`MISSING_FIELD`] so partially-populated
/// exports still process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default = "missing_field")]
    pub review_id: String,
    #[serde(default = "missing_field")]
    pub author: String,
    #[serde(default = "missing_field")]
    pub body: String,
}

/// A review annotated with its extracted delight attributes.
///
/// `delight_attributes` is the comma-joined attribute list, or
/// [`GENERIC_LABEL`] when the review had no specific attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReview {
    pub review_id: String,
    pub author: String,
    pub body: String,
    pub delight_attributes: String,
}

/// One row of the final frequency table: a cluster's representative label
/// and its aggregate occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelightPoint {
    pub label: String,
    pub frequency: u64,
}

/// Run-level configuration for the review pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of reviews sent per extraction call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Clustering parameters for the attribute-grouping stage.
    #[serde(default)]
    pub cluster: ClusterConfig,
}

fn default_batch_size() -> usize {
    100
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the extraction batch size. Values below 1 are clamped to 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the clustering configuration.
    pub fn with_cluster(mut self, cluster: ClusterConfig) -> Self {
        self.cluster = cluster;
        self
    }
}
