/// Budgeted three-phase ranking simulation.
///
/// Single-threaded and clock-free: the caller drives the run one `step()` at a
/// time and decides how long to wait between steps (the returned `Pace` says
/// how long the animated front end should). Dropping or resetting the
/// simulation abandons whatever was in flight.
///
/// Phases, in order:
///   Tournament: single-elimination bracket over a shuffled population.
///   PivotChallenge: the k-th ranked item plays the next k challengers in turn
///     until it wins more than a third of a full cycle.
///   RigidRefinement: random pairs drawn from the current top-k.
///   Results: budget spent, recovery metric available.
///
/// with `k = ceil(sqrt(N))`.
use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::centrality::{ranked_indices, Estimator};
use crate::comparator::compare;
use crate::constants::{
    DEFAULT_BUDGET_MULTIPLIER, DEFAULT_POPULATION, HIDDEN_SCORE_MAX, MAX_BUDGET_MULTIPLIER,
    MAX_POPULATION, MIN_BUDGET_MULTIPLIER, MIN_POPULATION, PIVOT_WIN_RATE_THRESHOLD,
    RECOVERY_TOP_K, REFRESH_EVERY,
};
use crate::error::SimulationError;
use crate::metrics::top_k_recovery;
use crate::types::{ChartPoint, Comparison, Item, LogEntry, Pace, Phase};

/// Run parameters.
///
/// Fields are public so library callers can build configurations outside the
/// interactive ranges; `SimulationConfig::new` enforces those ranges.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub num_items: usize,
    pub budget_multiplier: f64,
    pub estimator: Estimator,
}

impl SimulationConfig {
    pub fn new(num_items: usize, budget_multiplier: f64) -> Result<Self, SimulationError> {
        if !(MIN_POPULATION..=MAX_POPULATION).contains(&num_items) {
            return Err(SimulationError::PopulationOutOfRange(num_items));
        }
        if !(MIN_BUDGET_MULTIPLIER..=MAX_BUDGET_MULTIPLIER).contains(&budget_multiplier) {
            return Err(SimulationError::BudgetMultiplierOutOfRange(budget_multiplier));
        }
        Ok(SimulationConfig {
            num_items,
            budget_multiplier,
            estimator: Estimator::default(),
        })
    }

    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Total comparisons allowed: the largest whole number not above
    /// `N × multiplier`. The epsilon keeps 50 × 2.3 at 115 despite float error.
    pub fn budget(&self) -> usize {
        (self.num_items as f64 * self.budget_multiplier + BUDGET_EPSILON)
            .floor()
            .max(0.0) as usize
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_items: DEFAULT_POPULATION,
            budget_multiplier: DEFAULT_BUDGET_MULTIPLIER,
            estimator: Estimator::default(),
        }
    }
}

const BUDGET_EPSILON: f64 = 1e-9;

/// Size of the pivot offset, challenger pool and rigid set for `num_items`.
pub fn rigid_set_size(num_items: usize) -> usize {
    (num_items as f64).sqrt().ceil() as usize
}

/// One pivot-vs-challengers cycle in progress.
#[derive(Debug, Clone)]
struct PivotRound {
    pivot: usize,
    challengers: Vec<usize>,
    cursor: usize,
    wins: usize,
    played: usize,
}

pub struct RankingSimulation {
    config: SimulationConfig,
    items: Vec<Item>,
    /// Copy of each item's hidden score, indexed by id, for the comparator.
    hidden_scores: Vec<f64>,
    comparisons: Vec<Comparison>,
    /// Latest raw centrality vector (sums to 1).
    centrality: Vec<f64>,
    phase: Phase,
    budget: usize,
    top_k: usize,
    /// Items still alive in the tournament bracket.
    bracket: Vec<usize>,
    pivot_round: Option<PivotRound>,
    log: Vec<LogEntry>,
}

impl RankingSimulation {
    /// Create a fresh population with hidden scores drawn uniformly from
    /// `[0, HIDDEN_SCORE_MAX)`.
    pub fn new(config: SimulationConfig, rng: &mut impl Rng) -> Result<Self, SimulationError> {
        let hidden = draw_hidden_scores(config.num_items, rng);
        Self::from_hidden_scores(config, hidden)
    }

    /// Create a simulation over a caller-chosen population.
    /// `config.num_items` is replaced by `hidden_scores.len()`.
    pub fn from_hidden_scores(
        mut config: SimulationConfig,
        hidden_scores: Vec<f64>,
    ) -> Result<Self, SimulationError> {
        let num_items = hidden_scores.len();
        if num_items < 2 {
            return Err(SimulationError::TooFewItems(num_items));
        }
        config.num_items = num_items;

        let mut sim = RankingSimulation {
            budget: config.budget(),
            top_k: rigid_set_size(num_items),
            config,
            items: Vec::new(),
            hidden_scores: Vec::new(),
            comparisons: Vec::new(),
            centrality: Vec::new(),
            phase: Phase::Setup,
            bracket: Vec::new(),
            pivot_round: None,
            log: Vec::new(),
        };
        sim.install_population(hidden_scores);
        Ok(sim)
    }

    /// Throw away the current run and draw a new population. Always lands in
    /// `Setup`, whatever phase the run was in.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        let hidden = draw_hidden_scores(self.config.num_items, rng);
        self.install_population(hidden);
    }

    fn install_population(&mut self, hidden_scores: Vec<f64>) {
        let n = hidden_scores.len();
        self.items = hidden_scores
            .iter()
            .enumerate()
            .map(|(id, &hidden_score)| Item { id, hidden_score, predicted_score: 0.0 })
            .collect();
        self.hidden_scores = hidden_scores;
        self.comparisons = Vec::with_capacity(self.budget);
        self.centrality = crate::centrality::uniform(n);
        self.phase = Phase::Setup;
        self.bracket.clear();
        self.pivot_round = None;
        self.log.clear();
        self.push_log("System: Ready to initialize population.".to_string());
        self.push_log(format!("Loading spectral kernel ({})...", self.config.estimator));
        debug!(num_items = n, budget = self.budget, "population installed");
    }

    /// Begin the tournament. Rejected unless the simulation is in `Setup`.
    pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), SimulationError> {
        if self.phase != Phase::Setup {
            return Err(SimulationError::AlreadyStarted(self.phase));
        }

        self.phase = Phase::Tournament;
        self.push_log("Algo: Initializing Tournament Phase...".to_string());
        info!(
            num_items = self.items.len(),
            budget = self.budget,
            estimator = %self.config.estimator,
            "simulation started"
        );

        self.bracket = (0..self.items.len()).collect();
        self.bracket.shuffle(rng);

        self.finish_tournament_if_done();
        Ok(())
    }

    /// Advance by one unit of work: a whole bracket round during the
    /// tournament, otherwise a single comparison.
    ///
    /// Does nothing and returns `Pace::Finished` unless the run is in progress.
    pub fn step(&mut self, rng: &mut impl Rng) -> Pace {
        match self.phase {
            Phase::Tournament => {
                self.play_bracket_round(rng);
                Pace::TournamentRound
            }
            Phase::PivotChallenge => {
                self.play_pivot_comparison(rng);
                Pace::RefinementStep
            }
            Phase::RigidRefinement => {
                self.play_rigid_comparison(rng);
                Pace::RefinementStep
            }
            Phase::Setup | Phase::Results => Pace::Finished,
        }
    }

    /// Start (if needed) and step until `Results`, without pacing.
    pub fn run_to_completion(&mut self, rng: &mut impl Rng) -> Result<(), SimulationError> {
        if self.phase == Phase::Setup {
            self.start(rng)?;
        }
        while self.step(rng) != Pace::Finished {}
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Phase I: tournament
    // -----------------------------------------------------------------------

    fn play_bracket_round(&mut self, rng: &mut impl Rng) {
        let entrants = std::mem::take(&mut self.bracket);
        let mut advancing = Vec::with_capacity(entrants.len() / 2 + 1);

        let mut i = 0;
        while i + 1 < entrants.len() && !self.budget_exhausted() {
            let played = self.play(entrants[i], entrants[i + 1], rng);
            advancing.push(played.winner);
            i += 2;
        }
        // Odd one out, or everyone left unplayed when the budget ran dry.
        advancing.extend_from_slice(&entrants[i..]);

        debug!(from = entrants.len(), to = advancing.len(), "bracket round played");
        self.bracket = advancing;
        self.refresh_predictions();
        self.finish_tournament_if_done();
    }

    fn finish_tournament_if_done(&mut self) {
        if self.bracket.len() > 1 && !self.budget_exhausted() {
            return;
        }

        let used = self.budget_used();
        self.push_log(format!("Tournament Complete. Used {used} comparisons."));
        info!(comparisons = used, "tournament complete");

        if self.budget_exhausted() {
            self.enter_results();
            return;
        }

        let ranked = self.rank();
        match self.select_pivot(&ranked) {
            Some(round) => {
                self.pivot_round = Some(round);
                self.phase = Phase::PivotChallenge;
            }
            None => {
                self.phase = Phase::RigidRefinement;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Phase II: pivot vs challengers
    // -----------------------------------------------------------------------

    /// Pivot is the k-th ranked item; challengers are the next k.
    fn select_pivot(&self, ranked: &[usize]) -> Option<PivotRound> {
        let k = self.top_k;
        let start = k.min(ranked.len());
        let end = (2 * k).min(ranked.len());
        let challengers = ranked[start..end].to_vec();
        if challengers.is_empty() || k == 0 {
            return None;
        }

        let pivot = ranked[k - 1];
        debug!(pivot, challengers = challengers.len(), "pivot selected");
        Some(PivotRound {
            pivot,
            challengers,
            cursor: 0,
            wins: 0,
            played: 0,
        })
    }

    fn play_pivot_comparison(&mut self, rng: &mut impl Rng) {
        let Some(mut round) = self.pivot_round.take() else {
            self.phase = Phase::RigidRefinement;
            self.play_rigid_comparison(rng);
            return;
        };

        let challenger = round.challengers[round.cursor];
        let played = self.play(round.pivot, challenger, rng);

        round.played += 1;
        if played.winner == round.pivot {
            round.wins += 1;
        }
        round.cursor = (round.cursor + 1) % round.challengers.len();

        if round.played >= round.challengers.len() {
            let win_rate = round.wins as f64 / round.played as f64;
            if win_rate > PIVOT_WIN_RATE_THRESHOLD {
                info!(pivot = round.pivot, win_rate, "pivot held, moving to rigid set");
                self.push_log(
                    "System: Pivot proved strength. Switching to Phase III (Rigid Set).".to_string(),
                );
                self.phase = Phase::RigidRefinement;
                self.after_refinement_comparison();
                return;
            }

            debug!(pivot = round.pivot, win_rate, "pivot fell short, re-ranking");
            let ranked = self.rank();
            match self.select_pivot(&ranked) {
                Some(fresh) => round = fresh,
                None => {
                    self.phase = Phase::RigidRefinement;
                    self.after_refinement_comparison();
                    return;
                }
            }
        }

        self.pivot_round = Some(round);
        self.after_refinement_comparison();
    }

    // -----------------------------------------------------------------------
    // Phase III: rigid-set refinement
    // -----------------------------------------------------------------------

    fn play_rigid_comparison(&mut self, rng: &mut impl Rng) {
        let ranked = self.rank();
        let rigid = &ranked[..self.top_k.min(ranked.len())];

        if rigid.len() >= 2 {
            let picks = sample(rng, rigid.len(), 2);
            let (a, b) = (rigid[picks.index(0)], rigid[picks.index(1)]);
            self.play(a, b, rng);
        }
        self.after_refinement_comparison();
    }

    // -----------------------------------------------------------------------
    // Shared bookkeeping
    // -----------------------------------------------------------------------

    fn after_refinement_comparison(&mut self) {
        let used = self.budget_used();
        if used % REFRESH_EVERY == 0 {
            self.refresh_predictions();
        }
        if self.budget_exhausted() {
            self.enter_results();
        }
    }

    fn enter_results(&mut self) {
        self.pivot_round = None;
        self.refresh_predictions();
        self.phase = Phase::Results;

        let recovery = top_k_recovery(&self.items, RECOVERY_TOP_K);
        self.push_log(format!(
            "Simulation Complete. Top-{RECOVERY_TOP_K} recovery: {recovery:.0}%."
        ));
        info!(comparisons = self.budget_used(), recovery, "simulation complete");
    }

    fn play(&mut self, a: usize, b: usize, rng: &mut impl Rng) -> Comparison {
        debug_assert!(!self.budget_exhausted(), "comparison played past the budget");
        let played = compare(&self.hidden_scores, a, b, rng);
        self.comparisons.push(played);
        played
    }

    fn estimate(&self) -> Vec<f64> {
        self.config.estimator.estimate(self.items.len(), &self.comparisons)
    }

    fn rank(&self) -> Vec<usize> {
        ranked_indices(&self.estimate())
    }

    /// Recompute centrality over the full history and rescale it onto the
    /// hidden score axis (max item = `HIDDEN_SCORE_MAX`).
    fn refresh_predictions(&mut self) {
        self.centrality = self.estimate();
        let max = self.centrality.iter().copied().fold(0.0_f64, f64::max);
        for (item, &score) in self.items.iter_mut().zip(&self.centrality) {
            item.predicted_score = if max > 0.0 {
                score / max * HIDDEN_SCORE_MAX
            } else {
                0.0
            };
        }
    }

    fn push_log(&mut self, message: String) {
        debug!(phase = %self.phase, "{message}");
        self.log.push(LogEntry { phase: self.phase, message });
    }

    fn budget_exhausted(&self) -> bool {
        self.comparisons.len() >= self.budget
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Latest centrality vector, as of the most recent refresh.
    pub fn centrality(&self) -> &[f64] {
        &self.centrality
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn budget_used(&self) -> usize {
        self.comparisons.len()
    }

    /// Share of the budget spent, 0–100.
    pub fn progress(&self) -> f64 {
        if self.budget == 0 {
            return 100.0;
        }
        self.budget_used() as f64 / self.budget as f64 * 100.0
    }

    /// `ceil(sqrt(N))`.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Items still alive in the tournament bracket.
    pub fn bracket(&self) -> &[usize] {
        &self.bracket
    }

    /// Current pivot and its challengers, while in `PivotChallenge`.
    pub fn pivot(&self) -> Option<(usize, &[usize])> {
        self.pivot_round
            .as_ref()
            .map(|round| (round.pivot, round.challengers.as_slice()))
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.items.iter().map(ChartPoint::from).collect()
    }

    /// Top-10 recovery percentage. `None` until the run reaches `Results`.
    pub fn recovery(&self) -> Option<f64> {
        (self.phase == Phase::Results).then(|| top_k_recovery(&self.items, RECOVERY_TOP_K))
    }
}

fn draw_hidden_scores(num_items: usize, rng: &mut impl Rng) -> Vec<f64> {
    (0..num_items)
        .map(|_| rng.random::<f64>() * HIDDEN_SCORE_MAX)
        .collect()
}
