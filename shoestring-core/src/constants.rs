/// Upper bound (exclusive) of the uniform draw for hidden scores.
/// Predicted scores are rescaled onto the same axis for display.
pub const HIDDEN_SCORE_MAX: f64 = 10.0;

/// Smallest population the simulator accepts through `SimulationConfig::new`.
pub const MIN_POPULATION: usize = 50;

/// Largest population the simulator accepts through `SimulationConfig::new`.
/// The centrality estimator is O(N^2) per refresh, so this also caps the cost
/// of a single rigid-set step.
pub const MAX_POPULATION: usize = 200;

pub const MIN_BUDGET_MULTIPLIER: f64 = 2.0;
pub const MAX_BUDGET_MULTIPLIER: f64 = 10.0;

/// Population used when neither config nor flags name one.
pub const DEFAULT_POPULATION: usize = 50;

/// Budget multiplier used when neither config nor flags name one.
pub const DEFAULT_BUDGET_MULTIPLIER: f64 = 5.0;

/// Number of power-iteration rounds applied from the uniform start vector.
/// There is no convergence check; every refresh runs exactly this many.
pub const POWER_ITERATIONS: usize = 20;

/// A pivot that wins more than this share of a full challenger cycle is
/// considered to have "proven" the top set, and the driver moves on to
/// rigid-set refinement.
pub const PIVOT_WIN_RATE_THRESHOLD: f64 = 1.0 / 3.0;

/// During the refinement phases predicted scores are refreshed once every
/// this many comparisons.
pub const REFRESH_EVERY: usize = 5;

/// Size of the top set compared by the recovery metric.
pub const RECOVERY_TOP_K: usize = 10;

/// Pause after each tournament bracket round when the run is animated.
pub const TOURNAMENT_ROUND_DELAY_MS: u64 = 100;

/// Pause after each pivot or rigid-set comparison when the run is animated.
pub const REFINEMENT_STEP_DELAY_MS: u64 = 20;
