//! Distance metrics over embedding vectors.

use serde::{Deserialize, Serialize};

/// Pairwise distance metric between embedding vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Cosine distance, `1 - cos(a, b)`.
    Cosine,
}

impl DistanceMetric {
    /// Distance between two equal-length vectors.
    ///
    /// Accumulates in f64 regardless of the f32 storage so large vectors
    /// don't lose precision.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        match self {
            Self::Euclidean => euclidean(a, b),
            Self::Cosine => cosine(a, b),
        }
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine distance with a zero-norm convention: two zero vectors are at
/// distance 0 (they must merge on the embedding-fallback path), a zero
/// vector against a non-zero one is at distance 1.
fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x as f64 * y as f64;
        norm_a += x as f64 * x as f64;
        norm_b += y as f64 * y as f64;
    }

    if norm_a == 0.0 && norm_b == 0.0 {
        return 0.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        let d = DistanceMetric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_euclidean_identical_is_zero() {
        let v = [0.3, -1.2, 0.7];
        assert_eq!(DistanceMetric::Euclidean.distance(&v, &v), 0.0);
    }

    #[test]
    fn test_cosine_identical_direction() {
        let d = DistanceMetric::Cosine.distance(&[1.0, 2.0], &[2.0, 4.0]);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let d = DistanceMetric::Cosine.distance(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite() {
        let d = DistanceMetric::Cosine.distance(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vectors_merge() {
        let d = DistanceMetric::Cosine.distance(&[0.0, 0.0], &[0.0, 0.0]);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_cosine_zero_against_nonzero() {
        let d = DistanceMetric::Cosine.distance(&[0.0, 0.0], &[1.0, 1.0]);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DistanceMetric::Euclidean).unwrap();
        assert_eq!(json, r#""euclidean""#);
        let metric: DistanceMetric = serde_json::from_str(r#""cosine""#).unwrap();
        assert_eq!(metric, DistanceMetric::Cosine);
    }
}
