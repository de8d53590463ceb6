//! shoestring-core: adaptive pairwise ranking on a shoestring budget.
//!
//! A synthetic population with hidden strengths → a noisy Bradley-Terry
//! oracle → a three-phase budgeted driver (tournament, pivot vs challengers,
//! rigid-set refinement) → spectral centrality scores → top-10 recovery.
//! No IO, no clock, no terminal. Every random draw comes from the caller's RNG.
//!
//! # Quick start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use shoestring_core::{Phase, RankingSimulation, SimulationConfig};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let config = SimulationConfig::new(50, 5.0).unwrap();
//! let mut sim = RankingSimulation::new(config, &mut rng).unwrap();
//!
//! sim.run_to_completion(&mut rng).unwrap();
//!
//! assert_eq!(sim.phase(), Phase::Results);
//! assert_eq!(sim.budget_used(), 250);
//! println!("top-10 recovery: {:.0}%", sim.recovery().unwrap());
//! ```
//!
//! For an animated run, call `start()` once and then `step()` until it
//! returns `Pace::Finished`, sleeping `pace.delay_ms()` in between.

pub mod centrality;
pub mod clt;
pub mod comparator;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod simulation;
pub mod sorting;
pub mod types;

// Re-export primary public API at crate root.
pub use centrality::{
    rank_centrality, ranked_indices, simplified_centrality, win_counts, Estimator,
};
pub use clt::CltHistogram;
pub use comparator::{compare, win_probability};
pub use error::SimulationError;
pub use metrics::{rank_positions, top_k_recovery};
pub use simulation::{rigid_set_size, RankingSimulation, SimulationConfig};
pub use sorting::{random_bars, BubbleSort, SwapFrame};
pub use types::{ChartPoint, Comparison, Item, LogEntry, Pace, Phase};
