/// Outcome metrics comparing inferred scores against the hidden truth.
use std::collections::HashSet;

use crate::centrality::ranked_indices;
use crate::types::Item;

/// Percentage of the `k` strongest hidden items that also appear among the
/// `k` highest predicted items. When fewer than `k` items exist, `k` shrinks
/// to the population size. Always in `[0, 100]`.
pub fn top_k_recovery(items: &[Item], k: usize) -> f64 {
    let k = k.min(items.len());
    if k == 0 {
        return 0.0;
    }

    let hidden: Vec<f64> = items.iter().map(|it| it.hidden_score).collect();
    let predicted: Vec<f64> = items.iter().map(|it| it.predicted_score).collect();

    let truth: HashSet<usize> = ranked_indices(&hidden).into_iter().take(k).collect();
    let hits = ranked_indices(&predicted)
        .into_iter()
        .take(k)
        .filter(|idx| truth.contains(idx))
        .count();

    hits as f64 / k as f64 * 100.0
}

/// 1-based rank position of every item under `scores`, highest first.
/// `positions[i]` is the rank of item `i`.
pub fn rank_positions(scores: &[f64]) -> Vec<usize> {
    let mut positions = vec![0usize; scores.len()];
    for (rank, idx) in ranked_indices(scores).into_iter().enumerate() {
        positions[idx] = rank + 1;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items(pairs: &[(f64, f64)]) -> Vec<Item> {
        pairs
            .iter()
            .enumerate()
            .map(|(id, &(hidden_score, predicted_score))| Item { id, hidden_score, predicted_score })
            .collect()
    }

    #[test]
    fn test_perfect_recovery() {
        let pop: Vec<(f64, f64)> = (0..30).map(|i| (i as f64, i as f64 * 2.0)).collect();
        assert_eq!(top_k_recovery(&items(&pop), 10), 100.0);
    }

    #[test]
    fn test_inverted_recovery() {
        let pop: Vec<(f64, f64)> = (0..30).map(|i| (i as f64, -(i as f64))).collect();
        assert_eq!(top_k_recovery(&items(&pop), 10), 0.0);
    }

    #[test]
    fn test_partial_recovery() {
        // Hidden top-10 is 10..19. Predicted top-10 is 5..14, so 5 overlap.
        let pop: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let predicted = if (5..15).contains(&i) { 100.0 + i as f64 } else { i as f64 };
                (i as f64, predicted)
            })
            .collect();
        assert_eq!(top_k_recovery(&items(&pop), 10), 50.0);
    }

    #[test]
    fn test_small_population_shrinks_k() {
        let pop = [(1.0, 1.0), (2.0, 2.0), (3.0, 0.0)];
        // top-3 of 3 items always overlaps fully
        assert_eq!(top_k_recovery(&items(&pop), 10), 100.0);
        assert_eq!(top_k_recovery(&[], 10), 0.0);
    }

    #[test]
    fn test_rank_positions() {
        assert_eq!(rank_positions(&[0.2, 0.9, 0.5]), vec![3, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_recovery_is_a_percentage(
            pop in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), 0..80),
            k in 1usize..20,
        ) {
            let r = top_k_recovery(&items(&pop), k);
            prop_assert!((0.0..=100.0).contains(&r));
        }
    }
}
