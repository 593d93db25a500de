//! Obstacles ("asteroids") driven by a replayed genome.

use crate::direction::Direction;
use crate::genome::{Evolver, Genome, GENOME_LENGTH};
use crate::grid::{Tile, TileGrid};
use crate::movement::{Body, MoveResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque handle the renderer attaches to an obstacle; never inspected here
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle(pub u32);

/// What happened to an obstacle during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleTick {
    pub gene: Direction,
    pub result: MoveResult,
    /// The genome ran out and was replaced this tick
    pub evolved: bool,
}

/// A mobile obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: usize,
    pub body: Body,
    /// Direction of the last gene that actually moved the obstacle
    pub direction: Option<Direction>,
    pub genome: Genome,
    /// Index of the next gene to replay, always below `GENOME_LENGTH`
    cursor: usize,
    pub speed: f64,
    pub generation: u32,
    pub sprite: SpriteHandle,
}

impl Obstacle {
    /// New obstacle centered on `tile` with a random genome
    pub fn new(id: usize, tile: Tile, speed: f64, tile_size: f64, rng: &mut impl Rng) -> Self {
        Self::with_genome(id, tile, speed, tile_size, Genome::random(rng))
    }

    pub fn with_genome(id: usize, tile: Tile, speed: f64, tile_size: f64, genome: Genome) -> Self {
        Self {
            id,
            body: Body::at_tile_center(tile, tile_size),
            direction: None,
            genome,
            cursor: 0,
            speed,
            generation: 0,
            sprite: SpriteHandle(id as u32),
        }
    }

    #[inline]
    pub fn tile(&self) -> Tile {
        self.body.tile()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replay the current gene, then advance the cursor.
    ///
    /// A blocked gene still uses up its step. Running off the end of the
    /// genome evolves a replacement and rewinds the cursor.
    pub fn update(&mut self, grid: &TileGrid, tile_size: f64, evolver: &Evolver, rng: &mut impl Rng) -> ObstacleTick {
        let gene = self.genome.gene(self.cursor);
        let result = self.body.attempt_move(gene, self.speed, grid, tile_size);
        if result.moved() {
            self.direction = Some(gene);
        }

        self.cursor += 1;
        let evolved = self.cursor >= GENOME_LENGTH;
        if evolved {
            self.genome = evolver.evolve(&self.genome, rng);
            self.cursor = 0;
            self.generation += 1;
            log::debug!("Obstacle {} evolved to generation {}", self.id, self.generation);
        }

        ObstacleTick { gene, result, evolved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MapLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_grid() -> TileGrid {
        TileGrid::from_layout(&MapLayout::new(vec![vec![0; 5]; 5])).unwrap()
    }

    #[test]
    fn test_spawns_at_tile_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let obstacle = Obstacle::new(0, Tile::new(2, 3), 2.0, 50.0, &mut rng);
        assert_eq!((obstacle.body.x, obstacle.body.y), (125.0, 175.0));
        assert_eq!(obstacle.tile(), Tile::new(2, 3));
        assert_eq!(obstacle.cursor(), 0);
        assert_eq!(obstacle.direction, None);
    }

    #[test]
    fn test_replays_genes_in_order() {
        let grid = open_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let evolver = Evolver::default();
        let mut genes = [Direction::Right; GENOME_LENGTH];
        genes[1] = Direction::Down;
        let mut obstacle = Obstacle::with_genome(0, Tile::new(2, 2), 2.0, 50.0, Genome::from_genes(genes));

        let tick = obstacle.update(&grid, 50.0, &evolver, &mut rng);
        assert_eq!(tick.gene, Direction::Right);
        assert_eq!((obstacle.body.x, obstacle.body.y), (127.0, 125.0));

        obstacle.update(&grid, 50.0, &evolver, &mut rng);
        assert_eq!((obstacle.body.x, obstacle.body.y), (127.0, 127.0));
        assert_eq!(obstacle.direction, Some(Direction::Down));
        assert_eq!(obstacle.cursor(), 2);
    }

    #[test]
    fn test_blocked_gene_still_advances_cursor() {
        // Single open tile: every gene is blocked once it would leave
        let grid = TileGrid::from_layout(&MapLayout::bordered(3, 3)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let evolver = Evolver::default();
        let mut obstacle = Obstacle::with_genome(
            0,
            Tile::new(1, 1),
            30.0,
            50.0,
            Genome::from_genes([Direction::Up; GENOME_LENGTH]),
        );

        let tick = obstacle.update(&grid, 50.0, &evolver, &mut rng);
        assert_eq!(tick.result, MoveResult::Blocked);
        assert_eq!(obstacle.cursor(), 1);
        assert_eq!(obstacle.direction, None);
        assert_eq!((obstacle.body.x, obstacle.body.y), (75.0, 75.0));
    }

    #[test]
    fn test_evolves_once_per_traversal() {
        let grid = open_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let evolver = Evolver::default();
        let mut obstacle = Obstacle::new(0, Tile::new(2, 2), 2.0, 50.0, &mut rng);

        let mut evolutions = 0;
        for tick in 1..=GENOME_LENGTH * 5 {
            let result = obstacle.update(&grid, 50.0, &evolver, &mut rng);
            assert!(obstacle.cursor() < GENOME_LENGTH);
            if result.evolved {
                evolutions += 1;
                assert_eq!(tick % GENOME_LENGTH, 0);
                assert_eq!(obstacle.cursor(), 0);
            }
            assert!(grid.is_walkable(obstacle.tile()));
        }
        assert_eq!(evolutions, 5);
        assert_eq!(obstacle.generation, 5);
    }
}
