//! Continuous position with a cached tile, and the shared wall-collision move.

use crate::direction::Direction;
use crate::grid::{Tile, TileGrid};
use serde::{Deserialize, Serialize};

/// Result of a single move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    /// Target tile is a wall or off the grid; position unchanged
    Blocked,
}

impl MoveResult {
    #[inline]
    pub fn moved(self) -> bool {
        self == MoveResult::Moved
    }
}

/// Pixel position plus the tile it lies in.
///
/// `tile` is always `floor(position / tile_size)`; it is only ever
/// recomputed from the position, never set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    tile: Tile,
}

impl Body {
    /// Body resting on the center of `tile`
    pub fn at_tile_center(tile: Tile, tile_size: f64) -> Self {
        let (x, y) = tile.center(tile_size);
        Self::at(x, y, tile_size)
    }

    pub fn at(x: f64, y: f64, tile_size: f64) -> Self {
        Self {
            x,
            y,
            tile: Tile::containing(x, y, tile_size),
        }
    }

    #[inline]
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Move to a new position and refresh the cached tile
    #[inline]
    pub fn set_position(&mut self, x: f64, y: f64, tile_size: f64) {
        self.x = x;
        self.y = y;
        self.tile = Tile::containing(x, y, tile_size);
    }

    /// Advance by `direction * speed` without any collision check
    #[inline]
    pub fn advance(&mut self, direction: Direction, speed: f64, tile_size: f64) {
        let (dx, dy) = direction.delta();
        self.set_position(self.x + f64::from(dx) * speed, self.y + f64::from(dy) * speed, tile_size);
    }

    /// Euclidean pixel distance between two bodies
    pub fn distance(&self, other: &Body) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move by `direction * speed` if the destination tile is walkable.
    ///
    /// Out-of-bounds destinations count as walls. On `Blocked` the body is
    /// left untouched.
    pub fn attempt_move(&mut self, direction: Direction, speed: f64, grid: &TileGrid, tile_size: f64) -> MoveResult {
        let (dx, dy) = direction.delta();
        let next_x = self.x + f64::from(dx) * speed;
        let next_y = self.y + f64::from(dy) * speed;

        if grid.is_walkable(Tile::containing(next_x, next_y, tile_size)) {
            self.set_position(next_x, next_y, tile_size);
            MoveResult::Moved
        } else {
            MoveResult::Blocked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MapLayout;

    fn corridor() -> TileGrid {
        // Single open row between walls
        TileGrid::from_layout(&MapLayout::new(vec![
            vec![1, 1, 1, 1],
            vec![1, 0, 0, 1],
            vec![1, 1, 1, 1],
        ]))
        .unwrap()
    }

    #[test]
    fn test_body_tracks_tile() {
        let mut body = Body::at_tile_center(Tile::new(1, 1), 50.0);
        assert_eq!((body.x, body.y), (75.0, 75.0));
        assert_eq!(body.tile(), Tile::new(1, 1));

        body.set_position(100.0, 75.0, 50.0);
        assert_eq!(body.tile(), Tile::new(2, 1));
    }

    #[test]
    fn test_attempt_move_into_open_tile() {
        let grid = corridor();
        let mut body = Body::at_tile_center(Tile::new(1, 1), 50.0);
        assert_eq!(body.attempt_move(Direction::Right, 30.0, &grid, 50.0), MoveResult::Moved);
        assert_eq!(body.x, 105.0);
        assert_eq!(body.tile(), Tile::new(2, 1));
    }

    #[test]
    fn test_attempt_move_into_wall_is_rejected() {
        let grid = corridor();
        let mut body = Body::at(60.0, 60.0, 50.0);
        let before = body;

        // Up crosses into row 0, which is all walls
        assert_eq!(body.attempt_move(Direction::Up, 20.0, &grid, 50.0), MoveResult::Blocked);
        assert_eq!(body, before);

        // Moving within the same tile is fine even next to a wall
        assert!(body.attempt_move(Direction::Up, 5.0, &grid, 50.0).moved());
        assert_eq!(body.y, 55.0);
    }

    #[test]
    fn test_attempt_move_off_grid_is_rejected() {
        let grid = TileGrid::from_layout(&MapLayout::new(vec![vec![0]])).unwrap();
        let mut body = Body::at_tile_center(Tile::new(0, 0), 50.0);
        for dir in Direction::ALL {
            assert_eq!(body.attempt_move(dir, 30.0, &grid, 50.0), MoveResult::Blocked);
        }
        assert_eq!(body.tile(), Tile::new(0, 0));
    }
}
