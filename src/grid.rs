//! Occupancy grid and grid coordinates
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single grid cell identified by (row, column).
///
/// Ordering is row-major: points compare by row first, then column. The
/// search frontier relies on this to break priority ties deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another point. Exact remaining cost for
    /// unit-cost axis-aligned movement, which keeps A* optimal.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors raised when occupancy data is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {got} columns (expected {expected})")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("grid config parse error: {0}")]
    Parse(String),
}

/// Immutable rows x cols occupancy map. A cell is either passable or
/// blocked for the lifetime of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Build a grid from row data where 0 marks a passable cell and any
    /// other value marks an obstacle.
    ///
    /// # Errors
    ///
    /// Returns `GridError::Empty` when no rows or columns are present and
    /// `GridError::RaggedRow` when rows disagree on column count.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::RaggedRow {
                    row: idx,
                    expected: cols,
                    got: row.len(),
                });
            }
            cells.extend(row.iter().map(|&cell| cell != 0));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the point lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, point: Point) -> bool {
        point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.rows
            && (point.col as usize) < self.cols
    }

    /// Whether the cell at `point` holds an obstacle. Out-of-bounds points
    /// count as blocked so callers can treat the edge as a wall.
    #[must_use]
    pub fn is_blocked(&self, point: Point) -> bool {
        if !self.in_bounds(point) {
            return true;
        }
        self.cells[point.row as usize * self.cols + point.col as usize]
    }
}

/// Pathfinding scenario configuration: occupancy data plus endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub grid: Vec<Vec<u8>>,
    pub start: Point,
    pub goal: Point,
}

impl GridConfig {
    /// Load a grid configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the occupancy
    /// data is malformed.
    pub fn from_json(json_str: &str) -> Result<Self, GridError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| GridError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the occupancy data forms a proper rectangle.
    ///
    /// Endpoint placement is deliberately not checked here; the search
    /// validates endpoints itself and reports them as `PathError`.
    ///
    /// # Errors
    ///
    /// Returns `GridError` when the grid is empty or ragged.
    pub fn validate(&self) -> Result<(), GridError> {
        self.build_grid().map(|_| ())
    }

    /// Materialize the immutable occupancy grid.
    ///
    /// # Errors
    ///
    /// Returns `GridError` when the grid is empty or ragged.
    pub fn build_grid(&self) -> Result<OccupancyGrid, GridError> {
        OccupancyGrid::from_rows(&self.grid)
    }

    /// Embedded default scenario: a 5x5 grid with a small obstacle wall,
    /// corner to corner.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            grid: vec![
                vec![0, 0, 0, 0, 0],
                vec![0, 1, 1, 0, 0],
                vec![0, 0, 0, 1, 0],
                vec![0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0],
            ],
            start: Point::new(0, 0),
            goal: Point::new(4, 4),
        }
    }
}
