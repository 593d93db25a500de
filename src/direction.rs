//! Cardinal directions used by every moving entity.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// One of the four axis-aligned unit vectors.
///
/// A stopped entity has no direction, modelled as `Option<Direction>::None`,
/// so diagonal or non-unit motion cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// All directions, in the order random draws index into.
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Down, Direction::Up];

    /// Draw a direction uniformly from the four cardinals
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..4)]
    }

    /// Unit vector as (dx, dy) in tile steps
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    /// Facing angle in radians, screen coordinates (y grows downward)
    pub fn angle(self) -> f64 {
        match self {
            Direction::Right => 0.0,
            Direction::Left => PI,
            Direction::Down => FRAC_PI_2,
            Direction::Up => -FRAC_PI_2,
        }
    }

    /// Parse a single-letter script command (U/D/L/R, case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Direction::Right),
            'L' => Some(Direction::Left),
            'D' => Some(Direction::Down),
            'U' => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Tile-step delta of an optional heading; `None` is the zero vector.
#[inline]
pub fn delta_of(direction: Option<Direction>) -> (i32, i32) {
    direction.map_or((0, 0), Direction::delta)
}
