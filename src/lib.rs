//! # Asteroid Maze
//!
//! Simulation core of a tile-maze chase game. A player steers through a
//! pelleted maze while obstacles ("asteroids") are spawned by simulated
//! annealing and then replay an evolving movement genome.
//!
//! ## Features
//!
//! - **Grid model**: wall / empty / pellet tiles with bounds-checked lookups
//! - **Spawn placement**: annealed search that spreads obstacles apart
//! - **Genome evolution**: biased-fold selection plus per-gene mutation
//! - **Movement**: sub-tile motion, tile-center turn gating, wall collision
//! - **Reproducible**: every random draw comes from a seeded generator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use asteroid_maze::{Config, Direction, InputState, MapLayout, Session};
//!
//! let layout = MapLayout::bordered(15, 19);
//! let mut session = Session::new_with_seed(Config::default(), &layout, 42).unwrap();
//!
//! let outcome = session.run(1000, &InputState::holding(Some(Direction::Down)));
//!
//! println!("Outcome: {:?}", outcome);
//! println!("{}", session.stats.summary());
//! ```

pub mod config;
pub mod direction;
pub mod genome;
pub mod grid;
pub mod movement;
pub mod obstacle;
pub mod player;
pub mod session;
pub mod spawn;
pub mod stats;

// Re-export main types
pub use config::Config;
pub use direction::Direction;
pub use grid::{Cell, MapLayout, Tile, TileGrid};
pub use player::InputState;
pub use session::{Outcome, Session, SessionError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on a bordered arena
pub fn benchmark(steps: u64, obstacle_count: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.obstacle_count = obstacle_count;
    // Obstacles should not end the run early
    config.outcome.capture_radius = 0.0;

    let layout = MapLayout::bordered(32, 32);
    let start = Instant::now();
    let mut session = match Session::new_with_seed(config, &layout, 0) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Benchmark setup failed: {}", e);
            return BenchmarkResult::default();
        }
    };
    let setup_secs = start.elapsed().as_secs_f64();

    let script = [Direction::Down, Direction::Right, Direction::Up, Direction::Left];
    let start = Instant::now();
    session.run_with(steps, |t| InputState::holding(Some(script[(t / 50) as usize % script.len()])));
    let elapsed = start.elapsed();

    BenchmarkResult {
        steps: session.time,
        obstacles: obstacle_count,
        setup_secs,
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: session.time as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        evolutions: session.stats.evolutions,
    }
}

/// Benchmark result
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub obstacles: usize,
    pub setup_secs: f64,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
    pub evolutions: u64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Obstacles: {}", self.obstacles)?;
        writeln!(f, "Setup: {:.4}s", self.setup_secs)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        writeln!(f, "Evolutions: {}", self.evolutions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut config = Config::default();
        config.outcome.capture_radius = 0.0;
        let mut session = Session::new_with_seed(config, &MapLayout::bordered(10, 10), 1).unwrap();

        session.run(100, &InputState::default());

        assert_eq!(session.time, 100);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(100, 4);

        assert_eq!(result.steps, 100);
        assert_eq!(result.evolutions, 20);
        assert!(result.steps_per_second > 0.0);
    }
}
