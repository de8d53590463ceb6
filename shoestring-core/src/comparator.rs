/// Stochastic pairwise oracle under the Bradley-Terry (logistic) model.
///
/// Works on hidden scores by index. The only state touched is the caller's RNG.
use rand::Rng;

use crate::types::Comparison;

/// P(a beats b) given the two latent strengths.
pub fn win_probability(score_a: f64, score_b: f64) -> f64 {
    1.0 / (1.0 + (-(score_a - score_b)).exp())
}

/// Play one comparison between items `a` and `b`.
///
/// Draws a single uniform value; `a` wins when the draw falls below
/// `win_probability(hidden[a], hidden[b])`.
pub fn compare(hidden_scores: &[f64], a: usize, b: usize, rng: &mut impl Rng) -> Comparison {
    assert!(a < hidden_scores.len(), "item index {} out of range (num_items = {})", a, hidden_scores.len());
    assert!(b < hidden_scores.len(), "item index {} out of range (num_items = {})", b, hidden_scores.len());

    let p = win_probability(hidden_scores[a], hidden_scores[b]);
    if rng.random::<f64>() < p {
        Comparison::new(a, b)
    } else {
        Comparison::new(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_equal_scores_are_a_coin_flip() {
        assert!((win_probability(3.0, 3.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_symmetric() {
        let p = win_probability(7.5, 2.0);
        let q = win_probability(2.0, 7.5);
        assert!((p + q - 1.0).abs() < 1e-12);
        assert!(p > 0.99);
    }

    #[test]
    fn test_compare_returns_one_of_the_pair() {
        let hidden = vec![1.0, 5.0, 9.0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = compare(&hidden, 0, 2, &mut rng);
            assert!(
                (c.winner == 0 && c.loser == 2) || (c.winner == 2 && c.loser == 0),
                "unexpected comparison {:?}",
                c
            );
        }
    }

    #[test]
    fn test_stronger_item_wins_most_of_the_time() {
        // 9.5 vs 0.5: p ~ 0.9999
        let hidden = vec![0.5, 9.5];
        let mut rng = StdRng::seed_from_u64(42);
        let strong_wins = (0..1000)
            .filter(|_| compare(&hidden, 0, 1, &mut rng).winner == 1)
            .count();
        assert!(strong_wins > 990, "strong item only won {}/1000", strong_wins);
    }

    #[test]
    fn test_close_scores_split_roughly_evenly() {
        let hidden = vec![5.0, 5.0];
        let mut rng = StdRng::seed_from_u64(3);
        let first_wins = (0..4000)
            .filter(|_| compare(&hidden, 0, 1, &mut rng).winner == 0)
            .count();
        assert!((1700..2300).contains(&first_wins), "first won {}/4000", first_wins);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_compare_rejects_unknown_index() {
        let mut rng = StdRng::seed_from_u64(0);
        compare(&[1.0, 2.0], 0, 5, &mut rng);
    }
}
