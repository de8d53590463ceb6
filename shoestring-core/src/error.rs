use thiserror::Error;

use crate::constants::{MAX_BUDGET_MULTIPLIER, MAX_POPULATION, MIN_BUDGET_MULTIPLIER, MIN_POPULATION};
use crate::types::Phase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Population {0} is out of range. Must be between {min} and {max}", min = MIN_POPULATION, max = MAX_POPULATION)]
    PopulationOutOfRange(usize),

    #[error("Budget multiplier {0} is out of range. Must be between {min} and {max}", min = MIN_BUDGET_MULTIPLIER, max = MAX_BUDGET_MULTIPLIER)]
    BudgetMultiplierOutOfRange(f64),

    #[error("Need at least 2 items to rank, got {0}")]
    TooFewItems(usize),

    #[error("Simulation already started (phase: {0}). Reset before running again")]
    AlreadyStarted(Phase),
}
