//! Asteroid Maze - CLI Entry Point
//!
//! Headless runner for the maze chase simulation.

use asteroid_maze::stats::Stats;
use asteroid_maze::{benchmark, Config, Direction, InputState, MapLayout, Outcome, Session};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "asteroid-maze")]
#[command(version)]
#[command(about = "Tile-maze chase simulation with annealed spawns and evolving obstacles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless session
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Map layout (JSON or YAML matrix, 0 = floor, 1 = wall)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "5000")]
        steps: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Input script cycled one character per tick (U/D/L/R, '.' = no key)
        #[arg(short, long, default_value = ".")]
        input: String,

        /// Write final stats as JSON
        #[arg(long)]
        stats_out: Option<PathBuf>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many seeds in parallel and tally outcomes
    Sweep {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Map layout (JSON or YAML)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Number of seeds, starting at 0
        #[arg(long, default_value = "64")]
        seeds: u64,

        /// Ticks per session
        #[arg(short, long, default_value = "5000")]
        steps: u64,

        /// Input script cycled one character per tick
        #[arg(short, long, default_value = "DRUL")]
        input: String,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "100000")]
        steps: u64,

        /// Obstacle count
        #[arg(short, long, default_value = "16")]
        obstacles: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the configured level
    let level = configured_log_level(&cli.command);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run {
            config,
            map,
            steps,
            seed,
            input,
            stats_out,
            quiet,
        } => run_session(config, map, steps, seed, &input, stats_out, quiet),

        Commands::Sweep {
            config,
            map,
            seeds,
            steps,
            input,
        } => run_sweep(config, map, seeds, steps, &input),

        Commands::Benchmark { steps, obstacles } => run_benchmark(steps, obstacles),

        Commands::Init { output } => generate_config(output),
    }
}

fn configured_log_level(command: &Commands) -> String {
    let path = match command {
        Commands::Run { config, .. } | Commands::Sweep { config, .. } => Some(config),
        _ => None,
    };
    path.filter(|p| p.exists())
        .and_then(|p| Config::from_file(p).ok())
        .map(|c| c.logging.log_level)
        .unwrap_or_else(|| "info".to_string())
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        println!("Loading config from: {:?}", path);
        Config::from_file(path)
    } else {
        println!("Using default configuration");
        Ok(Config::default())
    }
}

fn load_layout(path: Option<&Path>) -> Result<MapLayout, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(MapLayout::from_file(p)?),
        None => Ok(MapLayout::bordered(15, 19)),
    }
}

/// Parse an input script; unknown characters mean "no key held"
fn parse_script(script: &str) -> Vec<Option<Direction>> {
    let parsed: Vec<_> = script.chars().map(Direction::from_char).collect();
    if parsed.is_empty() {
        vec![None]
    } else {
        parsed
    }
}

fn script_input(script: &[Option<Direction>], time: u64) -> InputState {
    InputState::holding(script[(time % script.len() as u64) as usize])
}

fn run_session(
    config_path: PathBuf,
    map: Option<PathBuf>,
    steps: u64,
    seed: Option<u64>,
    input: &str,
    stats_out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let layout = load_layout(map.as_deref())?;
    let script = parse_script(input);

    let mut session = if let Some(s) = seed {
        println!("Using seed: {}", s);
        Session::new_with_seed(config.clone(), &layout, s)?
    } else {
        Session::new(config.clone(), &layout)?
    };

    println!("Starting session");
    println!("  Grid: {}x{}", session.grid.cols(), session.grid.rows());
    println!("  Obstacles: {}", session.obstacles.len());
    println!("  Pellets: {}", session.stats.pellets_remaining);
    println!("  Steps: {}", steps);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for _ in 0..steps {
        let held = script_input(&script, session.time);
        let outcome = session.step(&held);

        if !quiet && session.time % stats_interval == 0 {
            println!("{}", session.stats.summary());
        }

        if outcome != Outcome::Running {
            break;
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("=== Session Complete ===");
    println!("Outcome: {:?}", session.outcome);
    println!("Ticks: {}", session.time);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Speed: {:.1} ticks/s", session.time as f64 / elapsed.as_secs_f64().max(f64::EPSILON));
    println!("Score: {}", session.stats.score);
    println!("Pellets left: {}", session.stats.pellets_remaining);
    println!("Evolutions: {}", session.stats.evolutions);
    println!("Seed: {}", session.seed());

    if !quiet && !session.stats_history.snapshots.is_empty() {
        println!();
        println!("Score by tick:   {}", format_series(&session.stats_history.score_series()));
        println!("Pellets by tick: {}", format_series(&session.stats_history.pellet_series()));
    }

    if let Some(path) = stats_out {
        session.stats.save_json(&path.to_string_lossy())?;
        println!("Stats: {:?}", path);
    }

    Ok(())
}

fn format_series<T: std::fmt::Display>(series: &[(u64, T)]) -> String {
    series
        .iter()
        .map(|(t, v)| format!("{}:{}", t, v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_sweep(
    config_path: PathBuf,
    map: Option<PathBuf>,
    seeds: u64,
    steps: u64,
    input: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let layout = load_layout(map.as_deref())?;
    let script = parse_script(input);

    println!("=== Seed Sweep ===");
    println!("Seeds: {}", seeds);
    println!("Steps: {}", steps);
    println!();

    let start = Instant::now();

    // Sessions are independent; each one stays single-threaded
    let results: Vec<(u64, Outcome, Stats)> = (0..seeds)
        .into_par_iter()
        .filter_map(|seed| match Session::new_with_seed(config.clone(), &layout, seed) {
            Ok(mut session) => {
                let outcome = session.run_with(steps, |t| script_input(&script, t));
                Some((seed, outcome, session.stats))
            }
            Err(e) => {
                log::error!("Seed {} failed to start: {}", seed, e);
                None
            }
        })
        .collect();

    let mut tally: HashMap<Outcome, usize> = HashMap::new();
    for (_, outcome, _) in &results {
        *tally.entry(*outcome).or_insert(0) += 1;
    }

    let mean_score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|(_, _, s)| s.score as f64).sum::<f64>() / results.len() as f64
    };

    for outcome in [Outcome::Running, Outcome::Caught, Outcome::Cleared] {
        println!("{:?}: {}", outcome, tally.get(&outcome).copied().unwrap_or(0));
    }
    println!("Mean score: {:.1}", mean_score);
    if let Some((seed, _, stats)) = results.iter().max_by_key(|(_, _, s)| s.score) {
        println!("Best seed: {} (score {}, t={})", seed, stats.score, stats.time);
    }
    println!("Elapsed: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

fn run_benchmark(steps: u64, obstacles: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Asteroid Maze Benchmark ===");
    println!("Steps: {}", steps);
    println!("Obstacles: {}", obstacles);
    println!();

    let result = benchmark(steps, obstacles);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
