//! Simulated-annealing spawn placement for obstacles.
//!
//! Each obstacle is placed on the walkable tile that maximizes its summed
//! Euclidean distance to the player and to every obstacle already placed.
//! Placement is sequential: later placements see earlier ones, and nothing
//! is re-evaluated afterwards.

use crate::config::AnnealingConfig;
use crate::grid::{Tile, TileGrid};
use rand::Rng;

/// Placement quality: sum of distances to the player and existing obstacles.
/// Higher is better.
pub fn energy(tile: Tile, player_tile: Tile, existing: &[Tile]) -> f64 {
    existing
        .iter()
        .fold(tile.distance(player_tile), |score, &other| score + tile.distance(other))
}

/// Geometric cooling schedule
#[derive(Debug, Clone, Copy)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub min_temperature: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self::from_config(&AnnealingConfig::default())
    }
}

impl AnnealingSchedule {
    pub fn from_config(config: &AnnealingConfig) -> Self {
        Self {
            initial_temperature: config.initial_temperature,
            cooling_rate: config.cooling_rate,
            min_temperature: config.min_temperature,
        }
    }

    /// Temperatures visited by the search, in order.
    ///
    /// Uses the same repeated multiplication as the search itself, so the
    /// step count matches exactly (44 for 100 / 0.9 / 1).
    pub fn temperatures(&self) -> impl Iterator<Item = f64> {
        let min = self.min_temperature;
        let rate = self.cooling_rate;
        std::iter::successors(Some(self.initial_temperature), move |t| Some(t * rate))
            .take_while(move |&t| t > min)
    }

    /// Number of annealing iterations
    pub fn iteration_count(&self) -> usize {
        self.temperatures().count()
    }
}

/// Outcome of one placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub tile: Tile,
    pub energy: f64,
    pub iterations: usize,
    pub accepted: usize,
}

/// Choose a spawn tile for a new obstacle.
///
/// Returns `None` only if the grid has no walkable tile.
pub fn place_obstacle(
    grid: &TileGrid,
    existing: &[Tile],
    player_tile: Tile,
    schedule: &AnnealingSchedule,
    rng: &mut impl Rng,
) -> Option<Placement> {
    let mut current = grid.random_walkable_tile(rng)?;
    let mut best = current;
    let mut iterations = 0;
    let mut accepted = 0;

    for temperature in schedule.temperatures() {
        let next = grid.random_walkable_tile(rng)?;

        let e_current = energy(current, player_tile, existing);
        let e_next = energy(next, player_tile, existing);

        // Maximization-form Metropolis acceptance
        if e_next > e_current || rng.gen::<f64>() < ((e_next - e_current) / temperature).exp() {
            current = next;
            accepted += 1;
        }

        if energy(current, player_tile, existing) > energy(best, player_tile, existing) {
            best = current;
        }

        iterations += 1;
    }

    Some(Placement {
        tile: best,
        energy: energy(best, player_tile, existing),
        iterations,
        accepted,
    })
}
