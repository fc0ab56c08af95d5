//! Representative selection and frequency aggregation.
//!
//! Takes the cluster label assigned to each distinct phrase and produces the
//! final frequency table: one row per cluster, labeled by the shortest member
//! phrase, with the summed occurrence counts of all members.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use crate::attributes::AttributeAccumulator;
use crate::types::DelightPoint;

/// Collapse clustered phrases into `(representative, aggregate frequency)`
/// rows.
///
/// `labels[i]` is the cluster of the i-th distinct phrase in `accumulator`
/// order. The representative of a cluster is its shortest member phrase,
/// ties broken by earliest first-occurrence. Rows are sorted by frequency
/// descending, ties by the cluster's earliest first-occurrence index, so the
/// output is deterministic for a fixed input ordering.
pub fn aggregate_clusters(
    accumulator: &AttributeAccumulator,
    labels: &[usize],
) -> Vec<DelightPoint> {
    debug_assert_eq!(labels.len(), accumulator.len());

    let phrases = accumulator.phrases();

    // Group member indices by cluster label.
    let mut members: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (idx, &label) in labels.iter().enumerate() {
        members.entry(label).or_default().push(idx);
    }

    let mut rows: Vec<(usize, DelightPoint)> = members
        .into_values()
        .map(|cluster| {
            let representative = cluster
                .iter()
                .min_by_key(|&&idx| (phrases[idx].len(), idx))
                .copied()
                .expect("cluster has at least one member");
            let frequency = cluster.iter().map(|&idx| accumulator.count(idx)).sum();
            let first_seen = cluster[0];

            (
                first_seen,
                DelightPoint {
                    label: phrases[representative].clone(),
                    frequency,
                },
            )
        })
        .collect();

    rows.sort_by_key(|(first_seen, point)| (Reverse(point.frequency), *first_seen));
    rows.into_iter().map(|(_, point)| point).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(occurrences: &[&str]) -> AttributeAccumulator {
        let mut acc = AttributeAccumulator::new();
        acc.extend(occurrences.iter().copied());
        acc
    }

    fn row(label: &str, frequency: u64) -> DelightPoint {
        DelightPoint {
            label: label.to_string(),
            frequency,
        }
    }

    #[test]
    fn test_shortest_member_is_representative() {
        let acc = accumulate(&["odor control", "smell", "lather"]);
        // "odor control" and "smell" in one cluster, "lather" alone.
        let points = aggregate_clusters(&acc, &[0, 0, 1]);

        assert_eq!(points, vec![row("smell", 2), row("lather", 1)]);
    }

    #[test]
    fn test_length_tie_breaks_on_first_occurrence() {
        let acc = accumulate(&["scent", "smell"]);
        let points = aggregate_clusters(&acc, &[0, 0]);

        // Equal length; "scent" was seen first.
        assert_eq!(points, vec![row("scent", 2)]);
    }

    #[test]
    fn test_frequencies_sum_over_members() {
        let acc = accumulate(&["deep clean", "cleaning", "deep clean", "Smell"]);
        let points = aggregate_clusters(&acc, &[0, 0, 1]);

        assert_eq!(points, vec![row("cleaning", 3), row("Smell", 1)]);
    }

    #[test]
    fn test_spec_example() {
        // Fragrance x2, fragrance x1, Smell x1; first two cluster together.
        let acc = accumulate(&["Fragrance", "Fragrance", "fragrance", "Smell"]);
        let points = aggregate_clusters(&acc, &[0, 0, 1]);

        assert_eq!(points, vec![row("Fragrance", 3), row("Smell", 1)]);
    }

    #[test]
    fn test_sorted_by_frequency_descending() {
        let acc = accumulate(&["a", "b", "b", "b", "c", "c"]);
        let points = aggregate_clusters(&acc, &[0, 1, 2]);

        assert_eq!(points, vec![row("b", 3), row("c", 2), row("a", 1)]);
    }

    #[test]
    fn test_frequency_ties_keep_input_order() {
        let acc = accumulate(&["zeta", "beta", "alpha"]);
        let points = aggregate_clusters(&acc, &[0, 1, 2]);

        // All frequency 1: order of first occurrence, not alphabetical.
        assert_eq!(
            points,
            vec![row("zeta", 1), row("beta", 1), row("alpha", 1)]
        );
    }

    #[test]
    fn test_frequency_conservation() {
        let acc = accumulate(&["a", "b", "a", "c", "c", "c", "General"]);
        let points = aggregate_clusters(&acc, &[0, 0, 1, 1]);

        let aggregate: u64 = points.iter().map(|p| p.frequency).sum();
        assert_eq!(aggregate, acc.total());
    }

    #[test]
    fn test_single_cluster_collapses_everything() {
        let acc = accumulate(&["fast shipping", "quick delivery", "speedy"]);
        let points = aggregate_clusters(&acc, &[0, 0, 0]);

        assert_eq!(points, vec![row("speedy", 3)]);
    }

    #[test]
    fn test_empty_input() {
        let acc = AttributeAccumulator::new();
        let points = aggregate_clusters(&acc, &[]);
        assert!(points.is_empty());
    }
}
