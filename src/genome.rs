//! Obstacle behavior genome and its evolution step.
//!
//! A genome is a fixed sequence of directions replayed one per tick. When it
//! is used up, a "best" gene is picked by a biased random fold and a new
//! genome is bred from it with per-gene mutation. No fitness score takes part
//! in this step.

use crate::config::EvolutionConfig;
use crate::direction::Direction;
use crate::grid::Tile;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of genes in every genome
pub const GENOME_LENGTH: usize = 20;

/// Fixed-length movement program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    genes: [Direction; GENOME_LENGTH],
}

impl Genome {
    /// Genome with every gene drawn uniformly from the four cardinals
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            genes: std::array::from_fn(|_| Direction::random(rng)),
        }
    }

    pub fn from_genes(genes: [Direction; GENOME_LENGTH]) -> Self {
        Self { genes }
    }

    /// Build from a slice; `None` unless it holds exactly `GENOME_LENGTH` genes
    pub fn from_slice(genes: &[Direction]) -> Option<Self> {
        let genes: [Direction; GENOME_LENGTH] = genes.try_into().ok()?;
        Some(Self { genes })
    }

    #[inline]
    pub fn gene(&self, index: usize) -> Direction {
        self.genes[index]
    }

    pub fn genes(&self) -> &[Direction; GENOME_LENGTH] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        GENOME_LENGTH
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Parameters of the selection fold and mutation step
#[derive(Debug, Clone, Copy)]
pub struct Evolver {
    pub keep_rate: f64,
    pub inherit_rate: f64,
}

impl Default for Evolver {
    fn default() -> Self {
        Self::from_config(&EvolutionConfig::default())
    }
}

impl Evolver {
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self {
            keep_rate: config.keep_rate,
            inherit_rate: config.inherit_rate,
        }
    }

    /// Left fold over the genome: the accumulator starts at the first gene and
    /// each later gene replaces it with probability `1 - keep_rate`.
    pub fn select_gene(&self, genome: &Genome, rng: &mut impl Rng) -> Direction {
        genome.genes[1..]
            .iter()
            .fold(genome.genes[0], |best, &gene| if rng.gen::<f64>() < self.keep_rate { best } else { gene })
    }

    /// New genome where each gene is `best` with probability `inherit_rate`,
    /// otherwise a fresh uniform direction.
    pub fn breed(&self, best: Direction, rng: &mut impl Rng) -> Genome {
        Genome {
            genes: std::array::from_fn(|_| {
                if rng.gen::<f64>() < self.inherit_rate {
                    best
                } else {
                    Direction::random(rng)
                }
            }),
        }
    }

    /// One full evolution step
    pub fn evolve(&self, genome: &Genome, rng: &mut impl Rng) -> Genome {
        let best = self.select_gene(genome, rng);
        self.breed(best, rng)
    }
}

/// Closeness to the player; higher is better.
///
/// Not consulted by [`Evolver::evolve`]; selection stays fitness-free.
pub fn fitness(obstacle_tile: Tile, player_tile: Tile) -> f64 {
    -obstacle_tile.distance(player_tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_genome_has_fixed_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let genome = Genome::random(&mut rng);
        assert_eq!(genome.len(), 20);
        assert_eq!(genome.genes().len(), GENOME_LENGTH);
    }

    #[test]
    fn test_from_slice_requires_exact_length() {
        assert!(Genome::from_slice(&[Direction::Up; 19]).is_none());
        assert!(Genome::from_slice(&[Direction::Up; 21]).is_none());
        assert!(Genome::from_slice(&[]).is_none());
        let genome = Genome::from_slice(&[Direction::Left; 20]).unwrap();
        assert_eq!(genome.gene(19), Direction::Left);
    }

    #[test]
    fn test_length_survives_many_generations() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let evolver = Evolver::default();
        let mut genome = Genome::random(&mut rng);
        for _ in 0..1000 {
            genome = evolver.evolve(&genome, &mut rng);
            assert_eq!(genome.genes().len(), GENOME_LENGTH);
        }
    }

    #[test]
    fn test_select_gene_always_keep() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let evolver = Evolver {
            keep_rate: 1.0,
            inherit_rate: 0.8,
        };
        let mut genes = [Direction::Down; GENOME_LENGTH];
        genes[0] = Direction::Up;
        assert_eq!(evolver.select_gene(&Genome::from_genes(genes), &mut rng), Direction::Up);
    }

    #[test]
    fn test_select_gene_never_keep_takes_last() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let evolver = Evolver {
            keep_rate: 0.0,
            inherit_rate: 0.8,
        };
        let mut genes = [Direction::Down; GENOME_LENGTH];
        genes[GENOME_LENGTH - 1] = Direction::Right;
        assert_eq!(evolver.select_gene(&Genome::from_genes(genes), &mut rng), Direction::Right);
    }

    #[test]
    fn test_first_gene_survival_rate() {
        // First gene survives the fold with probability 0.7^19 (about 0.0011);
        // the last gene wins with probability 0.3.
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let evolver = Evolver::default();
        let mut genes = [Direction::Down; GENOME_LENGTH];
        genes[0] = Direction::Up;
        genes[GENOME_LENGTH - 1] = Direction::Left;
        let genome = Genome::from_genes(genes);

        let trials = 50_000;
        let mut first = 0;
        let mut last = 0;
        for _ in 0..trials {
            match evolver.select_gene(&genome, &mut rng) {
                Direction::Up => first += 1,
                Direction::Left => last += 1,
                _ => {}
            }
        }
        let first_rate = first as f64 / trials as f64;
        let last_rate = last as f64 / trials as f64;
        assert!(first_rate < 0.005, "first gene rate {}", first_rate);
        assert!((last_rate - 0.3).abs() < 0.02, "last gene rate {}", last_rate);
    }

    #[test]
    fn test_breed_inherit_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let evolver = Evolver::default();
        let best = Direction::Up;

        let samples = 5_000;
        let mut inherited_or_matching = 0usize;
        let mut other = [0usize; 4];
        for _ in 0..samples {
            let genome = evolver.breed(best, &mut rng);
            for &gene in genome.genes() {
                if gene == best {
                    inherited_or_matching += 1;
                } else {
                    let idx = Direction::ALL.iter().position(|&d| d == gene).unwrap();
                    other[idx] += 1;
                }
            }
        }

        // 0.8 copied plus a quarter of the 0.2 mutations landing on `best`
        let total = (samples * GENOME_LENGTH) as f64;
        let rate = inherited_or_matching as f64 / total;
        assert!((rate - 0.85).abs() < 0.01, "best rate {}", rate);

        // Mutations are uniform over the other three directions (0.05 each)
        for (idx, &count) in other.iter().enumerate() {
            if Direction::ALL[idx] == best {
                continue;
            }
            let share = count as f64 / total;
            assert!((share - 0.05).abs() < 0.005, "mutation share {}", share);
        }
    }

    #[test]
    fn test_fitness_prefers_closer() {
        let player = Tile::new(0, 0);
        assert!(fitness(Tile::new(1, 0), player) > fitness(Tile::new(5, 5), player));
        assert_eq!(fitness(player, player), 0.0);
    }
}
