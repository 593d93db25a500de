//! Configuration system for the maze simulation.
//!
//! Supports YAML configuration files. Defaults reproduce the reference game
//! constants exactly.

use crate::grid::Tile;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub obstacles: ObstacleConfig,
    pub annealing: AnnealingConfig,
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub outcome: OutcomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Pixel size of one tile, shared by every coordinate conversion
    pub tile_size: f64,
    /// Number of obstacles placed at session start
    pub obstacle_count: usize,
    /// Tile the player starts on
    pub player_start: Tile,
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Pixels moved per tick
    pub speed: f64,
    /// Visual size as a fraction of the tile size
    pub size_ratio: f64,
}

/// Obstacle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Pixels moved per tick, shared by all obstacles
    pub speed: f64,
}

/// Simulated annealing schedule for spawn placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingConfig {
    pub initial_temperature: f64,
    /// Geometric decay factor applied every iteration
    pub cooling_rate: f64,
    /// Search stops once temperature is no longer above this
    pub min_temperature: f64,
}

/// Genome evolution probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Probability the selection fold keeps its accumulator
    pub keep_rate: f64,
    /// Probability a new gene copies the selected gene instead of mutating
    pub inherit_rate: f64,
}

/// End-of-session rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeConfig {
    /// Capture distance as a fraction of the tile size; 0 disables capture
    pub capture_radius: f64,
    /// Score awarded per pellet
    pub pellet_score: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between stats snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: 50.0,
            obstacle_count: 3,
            player_start: Tile::new(1, 1),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            size_ratio: 0.9,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self { speed: 2.0 }
    }
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.9,
            min_temperature: 1.0,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            keep_rate: 0.7,
            inherit_rate: 0.8,
        }
    }
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            capture_radius: 0.8,
            pellet_score: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let tile_size = self.world.tile_size;
        if !(tile_size > 0.0) {
            return Err("tile_size must be > 0".to_string());
        }
        // A step of a full tile or more could jump past a tile center
        for (name, speed) in [("player.speed", self.player.speed), ("obstacles.speed", self.obstacles.speed)] {
            if !(speed > 0.0 && speed < tile_size) {
                return Err(format!("{} must be in (0, tile_size)", name));
            }
        }
        let cooling = self.annealing.cooling_rate;
        if !(cooling > 0.0 && cooling < 1.0) {
            return Err("cooling_rate must be in (0, 1)".to_string());
        }
        if !(self.annealing.initial_temperature > self.annealing.min_temperature && self.annealing.min_temperature > 0.0) {
            return Err("initial_temperature must exceed min_temperature > 0".to_string());
        }
        for (name, p) in [
            ("keep_rate", self.evolution.keep_rate),
            ("inherit_rate", self.evolution.inherit_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{} must be in [0, 1]", name));
            }
        }
        if !(self.outcome.capture_radius >= 0.0) {
            return Err("capture_radius must be >= 0".to_string());
        }
        if self.logging.stats_interval == 0 {
            return Err("stats_interval must be > 0".to_string());
        }
        Ok(())
    }
}
