//! Session: owns the grid, the player and the obstacles, and runs the tick loop.

use crate::config::Config;
use crate::genome::Evolver;
use crate::grid::{GridError, MapLayout, Tile, TileGrid};
use crate::obstacle::Obstacle;
use crate::player::{InputState, Player};
use crate::spawn::{place_obstacle, AnnealingSchedule};
use crate::stats::{Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How a session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    /// An obstacle reached the player
    Caught,
    /// Every pellet was eaten
    Cleared,
}

/// Errors that can occur while setting up a session
#[derive(Debug)]
pub enum SessionError {
    Grid(GridError),
    StartBlocked(Tile),
    NoWalkableTile,
    InvalidConfig(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "Grid error: {}", e),
            Self::StartBlocked(tile) => write!(f, "Player start tile {} is not walkable", tile),
            Self::NoWalkableTile => write!(f, "Grid has no walkable tile for obstacle placement"),
            Self::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// One game session
pub struct Session {
    pub grid: TileGrid,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,

    pub time: u64,
    pub outcome: Outcome,

    pub config: Config,
    evolver: Evolver,

    pub stats: Stats,
    pub stats_history: StatsHistory,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl Session {
    /// Create a session with a random seed
    pub fn new(config: Config, layout: &MapLayout) -> Result<Self, SessionError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, layout, seed)
    }

    /// Create a session with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, layout: &MapLayout, seed: u64) -> Result<Self, SessionError> {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = TileGrid::from_layout(layout)?;
        Self::from_parts(config, grid, rng, seed)
    }

    /// Build a session around an already-prepared grid and generator
    pub fn from_parts(config: Config, grid: TileGrid, mut rng: ChaCha8Rng, seed: u64) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::InvalidConfig)?;

        let start = config.world.player_start;
        if !grid.is_walkable(start) {
            return Err(SessionError::StartBlocked(start));
        }

        let player = Player::new(&config);
        let obstacles = spawn_obstacles(&config, &grid, player.tile(), &mut rng)?;

        log::info!(
            "Session created: grid {}x{}, seed {}, {} obstacles, {} pellets",
            grid.cols(),
            grid.rows(),
            seed,
            obstacles.len(),
            grid.pellets_remaining()
        );

        let stats = Stats {
            pellets_remaining: grid.pellets_remaining(),
            ..Stats::default()
        };

        Ok(Self {
            grid,
            player,
            obstacles,
            time: 0,
            outcome: Outcome::Running,
            evolver: Evolver::from_config(&config.evolution),
            stats,
            stats_history: StatsHistory::new(config.logging.stats_interval),
            config,
            rng,
            seed,
        })
    }

    /// Advance every entity by one tick.
    ///
    /// Order is fixed: player first, then obstacles in spawn order. Once the
    /// session has ended this is a no-op.
    pub fn step(&mut self, input: &InputState) -> Outcome {
        if self.outcome != Outcome::Running {
            return self.outcome;
        }

        let tile_size = self.config.world.tile_size;

        self.player.apply_input(input);
        let player_tick = self.player.update(&mut self.grid, tile_size);
        if player_tick.ate_pellet {
            self.stats.pellets_eaten += 1;
            self.stats.score += u64::from(self.config.outcome.pellet_score);
        }
        if player_tick.stopped {
            self.stats.player_stops += 1;
        }

        for obstacle in &mut self.obstacles {
            let tick = obstacle.update(&self.grid, tile_size, &self.evolver, &mut self.rng);
            if !tick.result.moved() {
                self.stats.blocked_moves += 1;
            }
            if tick.evolved {
                self.stats.evolutions += 1;
            }
        }

        self.time += 1;
        self.update_outcome();
        self.update_stats();

        self.outcome
    }

    fn update_outcome(&mut self) {
        let reach = self.config.outcome.capture_radius * self.config.world.tile_size;
        let caught = reach > 0.0
            && self
                .obstacles
                .iter()
                .any(|o| o.body.distance(&self.player.body) <= reach);

        let outcome = if caught {
            Outcome::Caught
        } else if self.grid.pellets_remaining() == 0 {
            Outcome::Cleared
        } else {
            Outcome::Running
        };

        if outcome != Outcome::Running {
            log::info!("Session ended at t={}: {:?} (score {})", self.time, outcome, self.stats.score);
        }
        self.outcome = outcome;
    }

    fn update_stats(&mut self) {
        self.stats.time = self.time;
        self.stats.pellets_remaining = self.grid.pellets_remaining();
        self.stats.nearest_obstacle = self.nearest_obstacle_distance();
        self.stats_history.maybe_record(&self.stats);
    }

    /// Pixel distance from the player to the closest obstacle
    pub fn nearest_obstacle_distance(&self) -> Option<f64> {
        self.obstacles
            .iter()
            .map(|o| o.body.distance(&self.player.body))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Run for up to `steps` ticks with the same input every tick
    pub fn run(&mut self, steps: u64, input: &InputState) -> Outcome {
        for _ in 0..steps {
            if self.step(input) != Outcome::Running {
                break;
            }
        }
        self.outcome
    }

    /// Run with a per-tick input source
    pub fn run_with<F>(&mut self, steps: u64, mut input: F) -> Outcome
    where
        F: FnMut(u64) -> InputState,
    {
        for _ in 0..steps {
            let held = input(self.time);
            if self.step(&held) != Outcome::Running {
                break;
            }
        }
        self.outcome
    }

    pub fn is_running(&self) -> bool {
        self.outcome == Outcome::Running
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Place all obstacles in order; each placement sees the ones before it
fn spawn_obstacles(
    config: &Config,
    grid: &TileGrid,
    player_tile: Tile,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Obstacle>, SessionError> {
    let schedule = AnnealingSchedule::from_config(&config.annealing);
    let mut obstacles: Vec<Obstacle> = Vec::with_capacity(config.world.obstacle_count);

    for id in 0..config.world.obstacle_count {
        let existing: Vec<Tile> = obstacles.iter().map(Obstacle::tile).collect();
        let placement =
            place_obstacle(grid, &existing, player_tile, &schedule, rng).ok_or(SessionError::NoWalkableTile)?;

        log::debug!(
            "Obstacle {} placed at {} (energy {:.2}, {} of {} moves accepted)",
            id,
            placement.tile,
            placement.energy,
            placement.accepted,
            placement.iterations
        );

        obstacles.push(Obstacle::new(
            id,
            placement.tile,
            config.obstacles.speed,
            config.world.tile_size,
            rng,
        ));
    }

    Ok(obstacles)
}
