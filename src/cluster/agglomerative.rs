//! Agglomerative clustering with a distance threshold.
//!
//! Bottom-up grouping: every phrase starts as its own cluster, and the two
//! closest clusters merge repeatedly until no pair is closer than the
//! configured threshold. No cluster count is specified up front; the
//! threshold alone decides how far merging goes. Inter-cluster distances
//! are maintained with Lance-Williams updates, so each merge is O(n) after
//! the initial pairwise matrix.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::distance::DistanceMetric;
use crate::error::{DelightError, Result};

/// Rule defining the distance between clusters from member distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    /// Ward's minimum-variance criterion. Assumes Euclidean distances.
    #[default]
    Ward,
    /// Mean distance over all member pairs.
    Average,
    /// Maximum distance over all member pairs.
    Complete,
    /// Minimum distance over all member pairs.
    Single,
}

impl Linkage {
    /// Distance from the merged cluster `i U j` to cluster `k`, given the
    /// pre-merge distances and cluster sizes (Lance-Williams).
    fn merged_distance(&self, d_ik: f64, d_jk: f64, d_ij: f64, si: f64, sj: f64, sk: f64) -> f64 {
        match self {
            Self::Ward => {
                let total = si + sj + sk;
                let squared = ((si + sk) * d_ik * d_ik + (sj + sk) * d_jk * d_jk
                    - sk * d_ij * d_ij)
                    / total;
                // Rounding can push the square fractionally below zero.
                squared.max(0.0).sqrt()
            }
            Self::Average => (si * d_ik + sj * d_jk) / (si + sj),
            Self::Complete => d_ik.max(d_jk),
            Self::Single => d_ik.min(d_jk),
        }
    }
}

/// Configuration for the attribute clusterer.
///
/// Defaults to Ward linkage over Euclidean distance with a threshold of
/// 1.0, tuned empirically for unit-norm text embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Clusters merge while their linkage distance is strictly below this.
    #[serde(default = "default_threshold")]
    pub distance_threshold: f64,

    /// Pairwise distance metric between embedding vectors.
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Inter-cluster distance rule.
    #[serde(default)]
    pub linkage: Linkage,
}

fn default_threshold() -> f64 {
    1.0
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_threshold(),
            metric: DistanceMetric::default(),
            linkage: Linkage::default(),
        }
    }
}

/// Threshold-based agglomerative clusterer.
#[derive(Debug, Clone, Default)]
pub struct AgglomerativeClusterer {
    config: ClusterConfig,
}

impl AgglomerativeClusterer {
    /// Create a clusterer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    pub fn with_config(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Set the merge threshold.
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.config.distance_threshold = threshold;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set the linkage rule.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.config.linkage = linkage;
        self
    }

    /// Assign a cluster label to each embedding vector.
    ///
    /// Labels are compact ids in `0..k`, numbered in order of first
    /// appearance; they identify the partition and carry no other meaning.
    /// Zero or one input short-circuits without running the algorithm.
    ///
    /// Fails on vectors of unequal width or a non-finite pairwise distance;
    /// callers are expected to degrade rather than propagate (see the
    /// pipeline runner).
    pub fn fit_predict(&self, embeddings: &[Vec<f32>]) -> Result<Vec<usize>> {
        let n = embeddings.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if n == 1 {
            return Ok(vec![0]);
        }

        let width = embeddings[0].len();
        for vector in embeddings {
            if vector.len() != width {
                return Err(DelightError::DimensionMismatch {
                    expected: width,
                    got: vector.len(),
                });
            }
        }

        let metric = self.config.metric;
        let mut dist: Vec<Vec<f64>> = embeddings
            .par_iter()
            .map(|a| embeddings.iter().map(|b| metric.distance(a, b)).collect())
            .collect();

        for (i, row) in dist.iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                if !d.is_finite() {
                    return Err(DelightError::NonFiniteDistance { left: i, right: j });
                }
            }
        }

        let mut active = vec![true; n];
        let mut size = vec![1.0f64; n];
        // Current cluster root for each point; roots are merged-into indices.
        let mut assignment: Vec<usize> = (0..n).collect();

        loop {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in 0..n {
                if !active[i] {
                    continue;
                }
                for j in (i + 1)..n {
                    if !active[j] {
                        continue;
                    }
                    let d = dist[i][j];
                    if best.map_or(true, |(_, _, best_d)| d < best_d) {
                        best = Some((i, j, d));
                    }
                }
            }

            let Some((i, j, d_ij)) = best else { break };
            if d_ij >= self.config.distance_threshold {
                break;
            }

            // Merge j into i, updating distances from the merged cluster to
            // every other active cluster.
            for k in 0..n {
                if !active[k] || k == i || k == j {
                    continue;
                }
                let merged = self.config.linkage.merged_distance(
                    dist[i][k], dist[j][k], d_ij, size[i], size[j], size[k],
                );
                dist[i][k] = merged;
                dist[k][i] = merged;
            }

            size[i] += size[j];
            active[j] = false;
            for root in assignment.iter_mut() {
                if *root == j {
                    *root = i;
                }
            }
        }

        // Compact root indices into labels ordered by first appearance.
        let mut remap: FxHashMap<usize, usize> = FxHashMap::default();
        let labels = assignment
            .iter()
            .map(|&root| {
                let next = remap.len();
                *remap.entry(root).or_insert(next)
            })
            .collect();

        Ok(labels)
    }
}
