mod config;
mod logging;
mod output;
mod toys;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shoestring_core::constants::{DEFAULT_BUDGET_MULTIPLIER, DEFAULT_POPULATION};
use shoestring_core::{Estimator, Pace, RankingSimulation, SimulationConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use crate::output::LogPrinter;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "shoestring", version, about = "Adaptive pairwise ranking on a comparison budget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Simulate the three-phase ranking algorithm on a synthetic population
    Rank(RankArgs),
    /// Fill a histogram with means of uniform draws (central limit theorem)
    Clt(ToyArgs),
    /// Watch bubble sort put 15 random bars in order
    Sort(ToyArgs),
    /// Create a default config file at ~/.config/shoestring/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Population size, 50-200
    #[arg(short = 'n', long)]
    population: Option<usize>,

    /// Comparison budget as a multiple of the population, 2.0-10.0
    #[arg(short = 'c', long)]
    budget_multiplier: Option<f64>,

    /// Centrality estimator: "simplified" or "rank-centrality"
    #[arg(long)]
    estimator: Option<Estimator>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the animation delays
    #[arg(long)]
    no_delay: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Rows in the results table
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Show diagnostic logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/shoestring/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ToyArgs {
    /// Batches of 50 samples (clt only)
    #[arg(long, default_value_t = 1)]
    batches: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the animation delays and print only the final frame
    #[arg(long)]
    no_delay: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args).await,
        Commands::Clt(args) => {
            let mut rng = seeded_rng(args.seed);
            toys::run_clt(args.batches, args.no_delay, &mut rng).await;
        }
        Commands::Sort(args) => {
            let mut rng = seeded_rng(args.seed);
            toys::run_sort(args.no_delay, &mut rng).await;
        }
        Commands::Init => {
            let path = config::config_path();
            config::create_default_config(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set your default population, budget, estimator, etc.");
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(|| rand::rng().random()))
}

async fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    logging::init(&logging::resolve_level(args.verbose, cfg.log_level.as_deref()));

    let population = args.population.or(cfg.population).unwrap_or(DEFAULT_POPULATION);
    let budget_multiplier = args
        .budget_multiplier
        .or(cfg.budget_multiplier)
        .unwrap_or(DEFAULT_BUDGET_MULTIPLIER);
    let estimator = args.estimator.or(cfg.estimator).unwrap_or_default();
    let no_delay = args.no_delay || cfg.no_delay.unwrap_or(false);
    let seed = args.seed.or(cfg.seed).unwrap_or_else(|| rand::rng().random());

    let sim_config = SimulationConfig::new(population, budget_multiplier)
        .unwrap_or_else(|e| bail(e))
        .with_estimator(estimator);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sim = RankingSimulation::new(sim_config, &mut rng).unwrap_or_else(|e| bail(e));

    tracing::info!(population, budget_multiplier, %estimator, seed, "configuration resolved");

    let show_progress = !args.json && std::io::stderr().is_terminal();
    let mut printer = LogPrinter::new(show_progress);
    printer.flush(&sim);

    sim.start(&mut rng).unwrap_or_else(|e| bail(e));

    let interrupted = tokio::select! {
        _ = drive(&mut sim, &mut rng, no_delay, &mut printer, show_progress) => false,
        _ = tokio::signal::ctrl_c() => true,
    };

    if show_progress {
        output::clear_progress();
    }
    printer.flush(&sim);

    if interrupted {
        eprintln!(
            "Interrupted during {} after {}/{} comparisons.",
            sim.phase(),
            sim.budget_used(),
            sim.budget(),
        );
        std::process::exit(130);
    }

    if args.json {
        output::print_json(&sim, seed);
    } else {
        output::print_table(&sim, seed, args.rows);
    }
}

/// Step the simulation to `Results`, sleeping between steps so the run
/// animates. Dropping this future abandons the run where it stands.
async fn drive(
    sim: &mut RankingSimulation,
    rng: &mut StdRng,
    no_delay: bool,
    printer: &mut LogPrinter,
    show_progress: bool,
) {
    loop {
        let pace = sim.step(rng);
        printer.flush(sim);
        if show_progress {
            output::print_progress(sim);
        }
        if pace == Pace::Finished {
            break;
        }

        if no_delay {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(Duration::from_millis(pace.delay_ms())).await;
        }
    }
}
