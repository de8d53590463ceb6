/// Output formatting: scrolling log, progress line, results table and JSON.
use serde::Serialize;
use shoestring_core::constants::RECOVERY_TOP_K;
use shoestring_core::{
    rank_positions, ranked_indices, win_counts, ChartPoint, Phase, RankingSimulation,
};
use std::io::Write;

/// Prints log entries as the simulation appends them.
#[derive(Default)]
pub struct LogPrinter {
    printed: usize,
    /// A progress line may be sitting on the current stderr row.
    progress_shown: bool,
}

impl LogPrinter {
    pub fn new(progress_shown: bool) -> Self {
        LogPrinter { printed: 0, progress_shown }
    }

    /// Print everything appended since the last call.
    pub fn flush(&mut self, sim: &RankingSimulation) {
        let entries = &sim.log()[self.printed.min(sim.log().len())..];
        let mut stderr = std::io::stderr().lock();
        for entry in entries {
            if self.progress_shown {
                // wipe the progress line before writing over it
                let _ = write!(stderr, "\r\x1b[2K");
            }
            let _ = writeln!(stderr, "{}", format_log_line(entry.phase, &entry.message));
        }
        self.printed = sim.log().len();
    }
}

pub fn format_log_line(phase: Phase, message: &str) -> String {
    format!("[{phase}] {message}")
}

pub fn format_progress(sim: &RankingSimulation) -> String {
    format!(
        "{} | {:>5.1}% Budget Used ({}/{})",
        sim.phase(),
        sim.progress(),
        sim.budget_used(),
        sim.budget(),
    )
}

/// Overwrite the current stderr row with the progress line.
pub fn print_progress(sim: &RankingSimulation) {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "\r\x1b[2K{}", format_progress(sim));
    let _ = stderr.flush();
}

pub fn clear_progress() {
    eprint!("\r\x1b[2K");
}

/// Results table: the `rows` highest predicted items, then a summary.
pub fn format_table(sim: &RankingSimulation, seed: u64, rows: usize) -> String {
    let items = sim.items();
    let hidden: Vec<f64> = items.iter().map(|it| it.hidden_score).collect();
    let predicted: Vec<f64> = items.iter().map(|it| it.predicted_score).collect();
    let hidden_rank = rank_positions(&hidden);
    let wins = win_counts(items.len(), sim.comparisons());

    let mut out = String::new();
    out.push_str("  # | Item | Predicted | Hidden | Wins | Hidden rank\n");
    out.push_str("----|------|-----------|--------|------|------------\n");

    for (i, idx) in ranked_indices(&predicted).into_iter().take(rows).enumerate() {
        let item = &items[idx];
        let marker = if hidden_rank[idx] <= RECOVERY_TOP_K { "*" } else { " " };
        out.push_str(&format!(
            "{:>3} | {:<4} | {:>9.3} | {:>6.3} | {:>4} | {:>10}{}\n",
            i + 1,
            item.name(),
            item.predicted_score,
            item.hidden_score,
            wins[idx],
            hidden_rank[idx],
            marker,
        ));
    }

    out.push_str(&format!(
        "\n{} items, {}/{} comparisons, estimator: {}, seed: {}\n",
        items.len(),
        sim.budget_used(),
        sim.budget(),
        sim.config().estimator,
        seed,
    ));
    match sim.recovery() {
        Some(r) => out.push_str(&format!(
            "Top-{RECOVERY_TOP_K} recovery: {r:.0}% (* = in the hidden top {RECOVERY_TOP_K})\n"
        )),
        None => out.push_str(&format!("Stopped in {}: no recovery score.\n", sim.phase())),
    }
    out
}

pub fn print_table(sim: &RankingSimulation, seed: u64, rows: usize) {
    print!("{}", format_table(sim, seed, rows));
}

#[derive(Serialize)]
pub struct JsonOutput {
    population: usize,
    budget_multiplier: f64,
    estimator: String,
    seed: u64,
    budget: usize,
    comparisons: usize,
    phase: Phase,
    recovery: Option<f64>,
    points: Vec<ChartPoint>,
    log: Vec<String>,
}

pub fn json_output(sim: &RankingSimulation, seed: u64) -> JsonOutput {
    JsonOutput {
        population: sim.items().len(),
        budget_multiplier: sim.config().budget_multiplier,
        estimator: sim.config().estimator.to_string(),
        seed,
        budget: sim.budget(),
        comparisons: sim.budget_used(),
        phase: sim.phase(),
        recovery: sim.recovery(),
        points: sim.chart_points(),
        log: sim.log().iter().map(|e| e.message.clone()).collect(),
    }
}

/// Print results as JSON.
pub fn print_json(sim: &RankingSimulation, seed: u64) {
    match serde_json::to_string_pretty(&json_output(sim, seed)) {
        Ok(s) => println!("{s}"),
        Err(e) => crate::bail(format!("Failed to serialize results: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shoestring_core::SimulationConfig;

    fn finished_run() -> RankingSimulation {
        let mut rng = StdRng::seed_from_u64(12);
        let mut sim = RankingSimulation::new(SimulationConfig::new(50, 3.0).unwrap(), &mut rng).unwrap();
        sim.run_to_completion(&mut rng).unwrap();
        sim
    }

    #[test]
    fn test_table_lists_rows_and_summary() {
        let sim = finished_run();
        let table = format_table(&sim, 12, 10);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].contains("Predicted"));
        // header + rule + 10 rows
        assert!(lines[2].trim_start().starts_with("1 |"));
        assert!(lines[11].trim_start().starts_with("10 |"));
        assert!(table.contains("150/150 comparisons"));
        assert!(table.contains("seed: 12"));
        assert!(table.contains("Top-10 recovery:"));
    }

    #[test]
    fn test_table_shows_win_counts() {
        let sim = finished_run();
        let wins = win_counts(sim.items().len(), sim.comparisons());
        let predicted: Vec<f64> = sim.items().iter().map(|it| it.predicted_score).collect();
        let leader = ranked_indices(&predicted)[0];

        let table = format_table(&sim, 12, 1);
        let row: Vec<&str> = table.lines().nth(2).unwrap().split('|').map(str::trim).collect();
        assert_eq!(row[1], sim.items()[leader].name());
        assert_eq!(row[4], wins[leader].to_string());
    }

    #[test]
    fn test_table_before_results_has_no_recovery() {
        let mut rng = StdRng::seed_from_u64(1);
        let sim = RankingSimulation::new(SimulationConfig::default(), &mut rng).unwrap();
        let table = format_table(&sim, 1, 5);
        assert!(table.contains("no recovery score"));
    }

    #[test]
    fn test_json_output_shape() {
        let sim = finished_run();
        let value = serde_json::to_value(json_output(&sim, 12)).unwrap();
        assert_eq!(value["population"], 50);
        assert_eq!(value["comparisons"], 150);
        assert_eq!(value["estimator"], "simplified");
        assert_eq!(value["phase"], "Results");
        assert_eq!(value["points"].as_array().unwrap().len(), 50);
        assert!(value["points"][0]["x"].is_number());
        assert!(value["recovery"].is_number());
    }

    #[test]
    fn test_progress_line() {
        let sim = finished_run();
        let line = format_progress(&sim);
        assert!(line.contains("100.0% Budget Used"));
        assert!(line.contains("(150/150)"));
    }

    #[test]
    fn test_log_line_has_phase_prefix() {
        assert_eq!(
            format_log_line(Phase::Tournament, "hello"),
            "[Phase I: Tournament] hello"
        );
    }
}
