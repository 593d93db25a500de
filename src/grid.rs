//! Tile grid: cell kinds, bounds-checked lookups and tile/pixel conversion.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw layout code for an open floor tile
pub const CODE_EMPTY: u8 = 0;
/// Raw layout code for a wall
pub const CODE_WALL: u8 = 1;
/// Raw layout code for a pellet (produced by the setup transform)
pub const CODE_PELLET: u8 = 2;

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Empty,
    Pellet,
}

impl Cell {
    /// Setup transform: open floor starts pelleted
    fn from_code(code: u8) -> Option<Self> {
        match code {
            CODE_EMPTY | CODE_PELLET => Some(Cell::Pellet),
            CODE_WALL => Some(Cell::Wall),
            _ => None,
        }
    }

    #[inline]
    pub fn is_walkable(self) -> bool {
        self != Cell::Wall
    }
}

/// Integer tile address (column, row). May lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring tile offset by a tile-step delta
    #[inline]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance in tiles
    #[inline]
    pub fn distance(self, other: Tile) -> f64 {
        f64::from(self.x - other.x).hypot(f64::from(self.y - other.y))
    }

    /// Tile containing a continuous position: `floor(pos / tile_size)` per axis
    #[inline]
    pub fn containing(x: f64, y: f64, tile_size: f64) -> Self {
        Self::new((x / tile_size).floor() as i32, (y / tile_size).floor() as i32)
    }

    /// Continuous coordinates of this tile's center
    #[inline]
    pub fn center(self, tile_size: f64) -> (f64, f64) {
        (
            f64::from(self.x) * tile_size + tile_size / 2.0,
            f64::from(self.y) * tile_size + tile_size / 2.0,
        )
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Raw maze layout as supplied by the map-selection collaborator.
///
/// `0` is floor and `1` is wall. Stored row-major: `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapLayout {
    pub rows: Vec<Vec<u8>>,
}

impl MapLayout {
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// Open arena surrounded by a single ring of walls
    pub fn bordered(rows: usize, cols: usize) -> Self {
        let grid = (0..rows)
            .map(|y| {
                (0..cols)
                    .map(|x| {
                        if y == 0 || x == 0 || y + 1 == rows || x + 1 == cols {
                            CODE_WALL
                        } else {
                            CODE_EMPTY
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(grid)
    }

    /// Load a layout from JSON (`.json`) or YAML (anything else)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layout = if is_json {
            serde_json::from_str(&contents).map_err(|e| GridError::Parse(e.to_string()))?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| GridError::Parse(e.to_string()))?
        };
        Ok(layout)
    }
}

/// Errors raised while building a grid from a raw layout
#[derive(Debug)]
pub enum GridError {
    Empty,
    Ragged { row: usize, expected: usize, found: usize },
    UnknownCell { x: usize, y: usize, code: u8 },
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Layout has no cells"),
            Self::Ragged { row, expected, found } => {
                write!(f, "Row {} has {} cells, expected {}", row, found, expected)
            }
            Self::UnknownCell { x, y, code } => {
                write!(f, "Unknown cell code {} at ({}, {})", code, x, y)
            }
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

impl From<std::io::Error> for GridError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// The playable maze. Shape is fixed for the session; only pellets change.
///
/// Serialized as its cell matrix; deserializing re-checks the shape and
/// rebuilds the counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "CellMatrix", try_from = "CellMatrix")]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    /// cells[y][x]
    cells: Vec<Vec<Cell>>,
    walkable: usize,
    pellets: usize,
}

/// Wire form of a [`TileGrid`]
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CellMatrix {
    cells: Vec<Vec<Cell>>,
}

impl From<TileGrid> for CellMatrix {
    fn from(grid: TileGrid) -> Self {
        Self { cells: grid.cells }
    }
}

impl TryFrom<CellMatrix> for TileGrid {
    type Error = GridError;

    fn try_from(matrix: CellMatrix) -> Result<Self, GridError> {
        TileGrid::from_cells(matrix.cells)
    }
}

impl TileGrid {
    /// Build the playable grid, converting every open tile to a pellet
    pub fn from_layout(layout: &MapLayout) -> Result<Self, GridError> {
        let rows = layout.rows.len();
        let cols = layout.rows.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(rows);
        for (y, row) in layout.rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::Ragged {
                    row: y,
                    expected: cols,
                    found: row.len(),
                });
            }
            let converted = row
                .iter()
                .enumerate()
                .map(|(x, &code)| Cell::from_code(code).ok_or(GridError::UnknownCell { x, y, code }))
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(converted);
        }

        Self::from_cells(cells)
    }

    /// Wrap an already-converted cell matrix after checking it is rectangular
    fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }
        if let Some((y, row)) = cells.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(GridError::Ragged {
                row: y,
                expected: cols,
                found: row.len(),
            });
        }

        let walkable = cells.iter().flatten().filter(|c| c.is_walkable()).count();
        let pellets = cells.iter().flatten().filter(|&&c| c == Cell::Pellet).count();
        Ok(Self {
            rows,
            cols,
            cells,
            walkable,
            pellets,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, tile: Tile) -> Option<(usize, usize)> {
        let x = usize::try_from(tile.x).ok()?;
        let y = usize::try_from(tile.y).ok()?;
        (x < self.cols && y < self.rows).then_some((x, y))
    }

    /// Bounds-checked lookup; `None` means out of bounds
    #[inline]
    pub fn cell(&self, tile: Tile) -> Option<Cell> {
        let (x, y) = self.index(tile)?;
        self.cells.get(y)?.get(x).copied()
    }

    /// True iff the tile exists and is not a wall
    #[inline]
    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.cell(tile).is_some_and(Cell::is_walkable)
    }

    /// Turn a pellet into empty floor. Returns whether a pellet was eaten.
    #[inline]
    pub fn consume_pellet(&mut self, tile: Tile) -> bool {
        let Some((x, y)) = self.index(tile) else {
            return false;
        };
        match self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) if *cell == Cell::Pellet => {
                *cell = Cell::Empty;
                self.pellets -= 1;
                true
            }
            _ => false,
        }
    }

    /// Number of pellets left on the board
    #[inline]
    pub fn pellets_remaining(&self) -> usize {
        self.pellets
    }

    /// Number of non-wall tiles
    #[inline]
    pub fn walkable_count(&self) -> usize {
        self.walkable
    }

    /// Rejection-sample a uniformly random walkable tile.
    ///
    /// Returns `None` only when the grid has no walkable tile at all.
    pub fn random_walkable_tile(&self, rng: &mut impl Rng) -> Option<Tile> {
        if self.walkable_count() == 0 {
            return None;
        }
        loop {
            let tile = Tile::new(rng.gen_range(0..self.cols as i32), rng.gen_range(0..self.rows as i32));
            if self.is_walkable(tile) {
                return Some(tile);
            }
        }
    }

    /// Raw code matrix (0 empty, 1 wall, 2 pellet), for renderers and snapshots
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Empty => CODE_EMPTY,
                        Cell::Wall => CODE_WALL,
                        Cell::Pellet => CODE_PELLET,
                    })
                    .collect()
            })
            .collect()
    }
}
