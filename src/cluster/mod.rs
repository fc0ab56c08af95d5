//! Semantic clustering of attribute phrases.
//!
//! This module provides bottom-up agglomerative clustering over embedding
//! vectors with a fixed distance threshold, used to merge lexical variants
//! of the same delight concept ("fragrance", "smell", "odor control") into
//! one group.

pub mod agglomerative;
pub mod distance;

pub use agglomerative::{AgglomerativeClusterer, ClusterConfig, Linkage};
pub use distance::DistanceMetric;
