//! Player entity: buffered input and tile-center turn gating.

use crate::config::Config;
use crate::direction::{delta_of, Direction};
use crate::grid::{Tile, TileGrid};
use crate::movement::Body;
use serde::{Deserialize, Serialize};

/// Directional keys currently held, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Input with a single key held (or none)
    pub fn holding(direction: Option<Direction>) -> Self {
        let mut input = Self::default();
        match direction {
            Some(Direction::Up) => input.up = true,
            Some(Direction::Down) => input.down = true,
            Some(Direction::Left) => input.left = true,
            Some(Direction::Right) => input.right = true,
            None => {}
        }
        input
    }

    /// Requested direction; with several keys held the later of
    /// Up, Down, Left, Right wins.
    pub fn desired(&self) -> Option<Direction> {
        let mut desired = None;
        if self.up {
            desired = Some(Direction::Up);
        }
        if self.down {
            desired = Some(Direction::Down);
        }
        if self.left {
            desired = Some(Direction::Left);
        }
        if self.right {
            desired = Some(Direction::Right);
        }
        desired
    }
}

/// What happened to the player during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    pub ate_pellet: bool,
    /// Heading was zeroed in front of a wall this tick
    pub stopped: bool,
    /// Buffered direction was adopted this tick
    pub turned: bool,
}

/// The player-controlled ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Current heading; `None` when stopped
    pub direction: Option<Direction>,
    /// Latest requested heading, applied only near a tile center
    pub next_direction: Direction,
    pub speed: f64,
    /// Facing angle in radians
    pub angle: f64,
    pub size: f64,
}

impl Player {
    /// Player centered on the configured start tile, heading right
    pub fn new(config: &Config) -> Self {
        let tile_size = config.world.tile_size;
        Self {
            body: Body::at_tile_center(config.world.player_start, tile_size),
            direction: Some(Direction::Right),
            next_direction: Direction::Right,
            speed: config.player.speed,
            angle: Direction::Right.angle(),
            size: tile_size * config.player.size_ratio,
        }
    }

    #[inline]
    pub fn tile(&self) -> Tile {
        self.body.tile()
    }

    /// Record the held keys; no keys leaves the buffered direction alone
    pub fn apply_input(&mut self, input: &InputState) {
        if let Some(dir) = input.desired() {
            self.next_direction = dir;
        }
    }

    /// Within one step of the tile center on both axes
    pub fn near_center(&self, tile_size: f64) -> bool {
        let (cx, cy) = self.tile().center(tile_size);
        (self.body.x - cx).abs() < self.speed && (self.body.y - cy).abs() < self.speed
    }

    /// Advance one tick: gated turn, move, eat, re-aim
    pub fn update(&mut self, grid: &mut TileGrid, tile_size: f64) -> PlayerTick {
        let mut tick = PlayerTick::default();
        let tile = self.tile();

        if self.near_center(tile_size) {
            // Snap so tile math never drifts off-center
            let (cx, cy) = tile.center(tile_size);
            self.body.set_position(cx, cy, tile_size);

            if grid.is_walkable(tile.offset(self.next_direction.delta())) {
                tick.turned = self.direction != Some(self.next_direction);
                self.direction = Some(self.next_direction);
            }

            if self.direction.is_some() && !grid.is_walkable(tile.offset(delta_of(self.direction))) {
                self.direction = None;
                tick.stopped = true;
            }
        }

        if let Some(dir) = self.direction {
            self.body.advance(dir, self.speed, tile_size);
        }

        tick.ate_pellet = grid.consume_pellet(self.tile());

        if let Some(dir) = self.direction {
            self.angle = dir.angle();
        }

        tick
    }
}
