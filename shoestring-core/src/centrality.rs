/// Spectral centrality from pairwise outcomes.
///
/// Each estimator builds a row-stochastic N×N transition matrix in which
/// probability mass flows from a loser towards the items that beat it, then
/// takes `POWER_ITERATIONS` steps of power iteration from the uniform vector.
/// The result is a probability vector over items: higher means stronger.
///
/// Two constructions are offered:
///
/// - `Estimator::Simplified` divides raw loss counts by the largest
///   per-item comparison count. Repeat meetings between the same pair add up,
///   so it behaves like a PageRank over the multigraph of results.
/// - `Estimator::RankCentrality` follows Negahban, Oh & Shah: each edge weight
///   is the empirical fraction of meetings the loser lost, normalised by the
///   largest number of distinct opponents.
///
/// Both fall back to the uniform vector when there are no comparisons.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::constants::POWER_ITERATIONS;
use crate::types::Comparison;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Estimator {
    #[default]
    Simplified,
    RankCentrality,
}

impl Estimator {
    /// Stationary-distribution estimate over `num_items` items.
    pub fn estimate(self, num_items: usize, comparisons: &[Comparison]) -> Vec<f64> {
        match self {
            Estimator::Simplified => simplified_centrality(num_items, comparisons),
            Estimator::RankCentrality => rank_centrality(num_items, comparisons),
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Estimator::Simplified => "simplified",
            Estimator::RankCentrality => "rank-centrality",
        })
    }
}

impl FromStr for Estimator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simplified" => Ok(Estimator::Simplified),
            "rank-centrality" => Ok(Estimator::RankCentrality),
            other => Err(format!(
                "Unknown estimator \"{other}\". Use \"simplified\" or \"rank-centrality\"."
            )),
        }
    }
}

/// Uniform `1/N` vector. Empty when `num_items == 0`.
pub fn uniform(num_items: usize) -> Vec<f64> {
    if num_items == 0 {
        return Vec::new();
    }
    vec![1.0 / num_items as f64; num_items]
}

/// Loss-count PageRank: `P[loser][winner] = losses(loser→winner) / d_max`,
/// where `d_max` is the largest `wins + losses` over all items.
pub fn simplified_centrality(num_items: usize, comparisons: &[Comparison]) -> Vec<f64> {
    if comparisons.is_empty() {
        return uniform(num_items);
    }
    check_indices(num_items, comparisons);

    let n = num_items;
    let mut losses_to = vec![0.0; n * n];
    let mut degree = vec![0usize; n];

    for c in comparisons {
        losses_to[c.loser * n + c.winner] += 1.0;
        degree[c.winner] += 1;
        degree[c.loser] += 1;
    }

    let d_max = degree.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut transition = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                transition[i * n + j] = losses_to[i * n + j] / d_max;
            }
        }
    }
    complete_self_loops(n, &mut transition);

    power_iterate(n, &transition, POWER_ITERATIONS)
}

/// Rank Centrality: `P[i][j] = (#j beat i / #i,j met) / d_max`, with `d_max`
/// the largest number of distinct opponents any item has faced.
pub fn rank_centrality(num_items: usize, comparisons: &[Comparison]) -> Vec<f64> {
    if comparisons.is_empty() {
        return uniform(num_items);
    }
    check_indices(num_items, comparisons);

    let n = num_items;
    let mut losses_to = vec![0.0; n * n];
    let mut meetings = vec![0.0; n * n];

    for c in comparisons {
        if c.winner == c.loser {
            continue;
        }
        losses_to[c.loser * n + c.winner] += 1.0;
        meetings[c.loser * n + c.winner] += 1.0;
        meetings[c.winner * n + c.loser] += 1.0;
    }

    let d_max = (0..n)
        .map(|i| (0..n).filter(|&j| meetings[i * n + j] > 0.0).count())
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut transition = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let met = meetings[i * n + j];
            if i != j && met > 0.0 {
                transition[i * n + j] = (losses_to[i * n + j] / met) / d_max;
            }
        }
    }
    complete_self_loops(n, &mut transition);

    power_iterate(n, &transition, POWER_ITERATIONS)
}

/// Item indices ordered by score, highest first. Ties keep index order.
pub fn ranked_indices(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    order
}

/// Number of comparisons each item has won.
pub fn win_counts(num_items: usize, comparisons: &[Comparison]) -> Vec<usize> {
    let mut wins = vec![0usize; num_items];
    for c in comparisons {
        wins[c.winner] += 1;
    }
    wins
}

fn check_indices(num_items: usize, comparisons: &[Comparison]) {
    for c in comparisons {
        assert!(
            c.winner < num_items && c.loser < num_items,
            "comparison {:?} out of range (num_items = {})",
            c,
            num_items
        );
    }
}

/// Set each diagonal entry so its row sums to 1.
fn complete_self_loops(n: usize, transition: &mut [f64]) {
    for i in 0..n {
        let off_diagonal: f64 = (0..n)
            .filter(|&j| j != i)
            .map(|j| transition[i * n + j])
            .sum();
        // Rounding can push the off-diagonal sum a hair past 1.
        transition[i * n + i] = (1.0 - off_diagonal).max(0.0);
    }
}

/// `iterations` steps of `pi <- pi * P` from the uniform vector.
fn power_iterate(n: usize, transition: &[f64], iterations: usize) -> Vec<f64> {
    let mut pi = uniform(n);
    let mut next = vec![0.0; n];

    for _ in 0..iterations {
        next.iter_mut().for_each(|v| *v = 0.0);
        for i in 0..n {
            let mass = pi[i];
            if mass == 0.0 {
                continue;
            }
            let row = &transition[i * n..(i + 1) * n];
            for (j, &p) in row.iter().enumerate() {
                next[j] += mass * p;
            }
        }
        std::mem::swap(&mut pi, &mut next);
    }

    pi
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn comps(pairs: &[(usize, usize)]) -> Vec<Comparison> {
        pairs.iter().copied().map(Comparison::from).collect()
    }

    fn assert_stochastic(v: &[f64]) {
        let sum: f64 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "vector sums to {}", sum);
        for &x in v {
            assert!(x >= 0.0, "negative entry {}", x);
        }
    }

    #[test]
    fn test_no_comparisons_is_uniform() {
        for n in 1..20 {
            let pi = simplified_centrality(n, &[]);
            assert_eq!(pi.len(), n);
            assert_stochastic(&pi);
            assert!(pi.iter().all(|&x| (x - 1.0 / n as f64).abs() < 1e-12));
        }
    }

    #[test]
    fn test_four_item_bracket() {
        let data = comps(&[(0, 1), (2, 3), (0, 2)]);
        assert_eq!(win_counts(4, &data)[0], 2);

        let pi = simplified_centrality(4, &data);
        assert_stochastic(&pi);
        assert!(pi[0] > pi[1]);
        assert!(pi[0] > pi[3]);
        assert!(pi[0] > pi[2]);
    }

    #[test]
    fn test_four_item_bracket_rank_centrality() {
        let data = comps(&[(0, 1), (2, 3), (0, 2)]);
        let pi = rank_centrality(4, &data);
        assert_stochastic(&pi);
        assert!(pi[0] > pi[1]);
        assert!(pi[0] > pi[3]);
    }

    #[test]
    fn test_chain_orders_items() {
        // 0 > 1 > 2 > 3, each pair met twice with the stronger side winning both.
        let data = comps(&[(0, 1), (0, 1), (1, 2), (1, 2), (2, 3), (2, 3), (0, 2), (1, 3)]);
        for est in [Estimator::Simplified, Estimator::RankCentrality] {
            let pi = est.estimate(4, &data);
            assert_eq!(ranked_indices(&pi)[0], 0, "{est}: {:?}", pi);
            assert!(pi[0] > pi[3], "{est}: {:?}", pi);
        }
    }

    #[test]
    fn test_repeat_meetings_weigh_differently() {
        // Simplified counts every repeat; Rank Centrality only sees the fraction.
        let data = comps(&[(0, 1), (0, 1), (0, 1), (1, 0), (2, 1)]);
        let simple = simplified_centrality(3, &data);
        let rc = rank_centrality(3, &data);
        assert_stochastic(&simple);
        assert_stochastic(&rc);
        assert_ne!(simple, rc);
    }

    #[test]
    fn test_ranked_indices_desc_with_stable_ties() {
        let order = ranked_indices(&[0.1, 0.4, 0.4, 0.05]);
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_estimator_parse() {
        assert_eq!("simplified".parse::<Estimator>(), Ok(Estimator::Simplified));
        assert_eq!("rank-centrality".parse::<Estimator>(), Ok(Estimator::RankCentrality));
        assert!("pagerank".parse::<Estimator>().is_err());
        assert_eq!(Estimator::RankCentrality.to_string(), "rank-centrality");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_rejects_unknown_item() {
        simplified_centrality(2, &comps(&[(0, 3)]));
    }

    fn population_and_results() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (2usize..25).prop_flat_map(|n| {
            (Just(n), prop::collection::vec((0..n, 0..n), 0..150))
        })
    }

    proptest! {
        #[test]
        fn prop_simplified_is_stochastic((n, pairs) in population_and_results()) {
            let pi = simplified_centrality(n, &comps(&pairs));
            prop_assert_eq!(pi.len(), n);
            let sum: f64 = pi.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(pi.iter().all(|&x| x >= 0.0));
        }

        #[test]
        fn prop_rank_centrality_is_stochastic((n, pairs) in population_and_results()) {
            let pi = rank_centrality(n, &comps(&pairs));
            prop_assert_eq!(pi.len(), n);
            let sum: f64 = pi.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!(pi.iter().all(|&x| x >= 0.0));
        }

        #[test]
        fn prop_uniform_sums_to_one(n in 1usize..500) {
            let sum: f64 = uniform(n).iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
