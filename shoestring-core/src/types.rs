use std::fmt;

/// One member of the synthetic population.
///
/// `id` is also the item's index into every per-item vector the crate hands
/// out, so callers never need a lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: usize,
    /// True strength, fixed at creation. Never read by the estimator.
    pub hidden_score: f64,
    /// Latest inferred strength on the hidden score's axis. Zero until the
    /// first refresh.
    pub predicted_score: f64,
}

impl Item {
    /// Display label, 1-based.
    pub fn name(&self) -> String {
        format!("P{}", self.id + 1)
    }
}

/// Outcome of a single pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub winner: usize,
    pub loser: usize,
}

impl Comparison {
    pub fn new(winner: usize, loser: usize) -> Self {
        Comparison { winner, loser }
    }
}

impl From<(usize, usize)> for Comparison {
    fn from((winner, loser): (usize, usize)) -> Self {
        Comparison { winner, loser }
    }
}

/// Where the phase driver currently is. Only ever moves forward; `Setup` is
/// reachable again only through `RankingSimulation::reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Setup,
    Tournament,
    PivotChallenge,
    RigidRefinement,
    Results,
}

impl Phase {
    /// True while the driver still has comparisons to spend.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            Phase::Tournament | Phase::PivotChallenge | Phase::RigidRefinement
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Setup => "Idle",
            Phase::Tournament => "Phase I: Tournament",
            Phase::PivotChallenge => "Phase II: Pivot vs Challengers",
            Phase::RigidRefinement => "Phase III: Rigid Set Refinement",
            Phase::Results => "Results",
        };
        f.write_str(label)
    }
}

/// A line in the simulation's scrolling log, tagged with the phase that
/// wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub phase: Phase,
    pub message: String,
}

/// How long the caller should wait before the next `step()` to animate the
/// run at the intended pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// A whole bracket round was just played.
    TournamentRound,
    /// A single pivot or rigid-set comparison was just played.
    RefinementStep,
    /// The run reached `Results`; stop stepping.
    Finished,
}

impl Pace {
    /// Suggested delay in milliseconds. Zero once finished.
    pub fn delay_ms(self) -> u64 {
        match self {
            Pace::TournamentRound => crate::constants::TOURNAMENT_ROUND_DELAY_MS,
            Pace::RefinementStep => crate::constants::REFINEMENT_STEP_DELAY_MS,
            Pace::Finished => 0,
        }
    }
}

/// One point of the hidden-vs-predicted scatter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

impl From<&Item> for ChartPoint {
    fn from(item: &Item) -> Self {
        ChartPoint {
            x: item.hidden_score,
            y: item.predicted_score,
            name: item.name(),
        }
    }
}
