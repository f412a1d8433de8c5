#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Voice Maze engine.
//!
//! This crate defines the value types that connect the recognition boundary,
//! the authoritative world, and the presentation adapters. Producers translate
//! recognised words into [`Command`] values and push the directional ones onto
//! a shared queue, the world consumes one [`Direction`] per scheduling tick
//! against its [`Grid`], and then broadcasts [`Event`] values describing what
//! happened so adapters can react without reaching into world internals.

use std::{collections::VecDeque, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod grid;

pub use grid::Grid;

/// Title shown by presentation adapters when the experience boots.
pub const WINDOW_TITLE: &str = "Voice Maze Solver";

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable cell drawn as a filled block.
    Wall,
    /// Traversable cell the token may occupy.
    Open,
}

impl Cell {
    /// Reports whether the token may occupy the cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Cardinal movement directions understood by the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed canonical order.
    pub const ALL: [Direction; 4] = [Self::Down, Self::Up, Self::Right, Self::Left];

    /// Unit offset applied to a `(column, row)` pair when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete commands produced by the recognition boundary.
///
/// `Stop` never reaches the queue: producers translate it into a synchronous
/// clear. Only the directional variants map onto a [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move the token one cell up.
    Up,
    /// Move the token one cell down.
    Down,
    /// Move the token one cell left.
    Left,
    /// Move the token one cell right.
    Right,
    /// Discard every pending movement command.
    Stop,
}

impl Command {
    /// Direction carried by the command, or `None` for [`Command::Stop`].
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Stop => None,
        }
    }
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell reached by taking a single step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant. The
    /// upper bounds depend on the grid and are checked by [`Grid::cell`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }
}

/// Validated maze dimensions measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeDimensions {
    rows: u32,
    columns: u32,
}

impl MazeDimensions {
    /// Smallest accepted extent along either axis.
    pub const MIN_EXTENT: u32 = 2;

    /// Creates a dimension descriptor, rejecting grids that cannot hold both a
    /// start and a distinct goal cell.
    pub fn new(rows: u32, columns: u32) -> Result<Self, DimensionError> {
        if rows < Self::MIN_EXTENT || columns < Self::MIN_EXTENT {
            return Err(DimensionError::TooSmall { rows, columns });
        }

        Ok(Self { rows, columns })
    }

    /// Derives square dimensions from a world edge length and a cell edge length.
    ///
    /// Partial cells at the far edge are discarded, so a 600 unit world with
    /// 40 unit cells yields a 15 × 15 grid.
    pub fn from_world(world_size: u32, cell_size: u32) -> Result<Self, DimensionError> {
        if cell_size == 0 {
            return Err(DimensionError::ZeroCellSize);
        }

        let extent = world_size / cell_size;
        Self::new(extent, extent)
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Bottom-left cell where the token enters every maze.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(0, self.rows - 1)
    }

    /// Bottom-right cell the token must reach.
    #[must_use]
    pub const fn goal(&self) -> Goal {
        Goal::at(CellCoord::new(self.columns - 1, self.rows - 1))
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let rows = usize::try_from(self.rows).unwrap_or(usize::MAX);
        let columns = usize::try_from(self.columns).unwrap_or(usize::MAX);
        rows.saturating_mul(columns)
    }
}

/// Reasons a set of maze dimensions may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// Either axis is shorter than [`MazeDimensions::MIN_EXTENT`].
    #[error("maze must be at least 2 x 2 cells (received {rows} rows x {columns} columns)")]
    TooSmall {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// Cell edge length of zero cannot subdivide the world.
    #[error("cell size must be positive")]
    ZeroCellSize,
}

/// Canonical representation of the cell the token is racing toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Goal {
    cell: CellCoord,
}

impl Goal {
    /// Creates a goal anchored at the provided cell coordinate.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self { cell }
    }

    /// Returns the cell that defines the goal.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

/// Number of scheduling ticks between successive move attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveCadence(NonZeroU32);

impl MoveCadence {
    /// Cadence used when no explicit value is configured.
    pub const DEFAULT: MoveCadence = match NonZeroU32::new(4) {
        Some(ticks) => MoveCadence(ticks),
        None => unreachable!(),
    };

    /// Creates a cadence, returning `None` when `ticks` is zero.
    #[must_use]
    pub const fn new(ticks: u32) -> Option<Self> {
        match NonZeroU32::new(ticks) {
            Some(ticks) => Some(Self(ticks)),
            None => None,
        }
    }

    /// Number of ticks that make up one move attempt.
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.0.get()
    }
}

impl Default for MoveCadence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why the world discarded its pending commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClearReason {
    /// A dequeued command pointed out of bounds or into a wall.
    Collision,
    /// The token reached the goal and a new maze was installed.
    Goal,
}

/// Events broadcast by the world after each tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the token moved between two open cells.
    TokenMoved {
        /// Cell the token occupied before moving.
        from: CellCoord,
        /// Cell the token occupies after the move.
        to: CellCoord,
    },
    /// Reports that a dequeued command would have left the grid or hit a wall.
    MoveRejected {
        /// Cell the token stayed on.
        from: CellCoord,
        /// Direction that was rejected.
        direction: Direction,
    },
    /// Reports that pending commands were discarded.
    QueueCleared {
        /// Trigger for the clear.
        reason: ClearReason,
        /// Number of commands that were still waiting.
        discarded: usize,
    },
    /// Announces that the token arrived on the goal cell.
    GoalReached {
        /// Goal cell the token occupied.
        cell: CellCoord,
    },
    /// Announces that a fresh maze replaced the previous one.
    MazeRegenerated {
        /// Ordinal of the installed maze, starting at one for the first maze.
        generation: u64,
    },
}

/// Reasons a token placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the maze")]
    OutOfBounds,
    /// The requested cell is a wall.
    #[error("cell is a wall")]
    Blocked,
}

/// Enumerates the in-bounds 4-neighbours of `cell`.
pub fn neighbors(cell: CellCoord, dimensions: MazeDimensions) -> impl Iterator<Item = CellCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction))
        .filter(move |neighbor| dimensions.contains(*neighbor))
}

pub(crate) fn breadth_first<F>(
    dimensions: MazeDimensions,
    start: CellCoord,
    mut is_passable: F,
) -> Vec<bool>
where
    F: FnMut(CellCoord) -> bool,
{
    let mut visited = vec![false; dimensions.cell_count()];
    let Some(start_index) = grid::index(dimensions, start) else {
        return visited;
    };
    if !is_passable(start) {
        return visited;
    }

    visited[start_index] = true;
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for neighbor in neighbors(cell, dimensions) {
            let Some(index) = grid::index(dimensions, neighbor) else {
                continue;
            };
            if visited[index] || !is_passable(neighbor) {
                continue;
            }
            visited[index] = true;
            queue.push_back(neighbor);
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Command, DimensionError, Direction, MazeDimensions, MoveCadence};

    #[test]
    fn step_applies_unit_deltas() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.step(Direction::Up), Some(CellCoord::new(3, 2)));
        assert_eq!(origin.step(Direction::Down), Some(CellCoord::new(3, 4)));
        assert_eq!(origin.step(Direction::Left), Some(CellCoord::new(2, 3)));
        assert_eq!(origin.step(Direction::Right), Some(CellCoord::new(4, 3)));
    }

    #[test]
    fn step_off_the_top_left_edge_is_none() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
    }

    #[test]
    fn stop_has_no_direction() {
        assert_eq!(Command::Stop.direction(), None);
        for direction in Direction::ALL {
            assert_eq!(Command::from(direction).direction(), Some(direction));
        }
    }

    #[test]
    fn dimensions_place_start_and_goal_on_bottom_row() {
        let dimensions = MazeDimensions::new(15, 15).expect("valid dimensions");
        assert_eq!(dimensions.start(), CellCoord::new(0, 14));
        assert_eq!(dimensions.goal().cell(), CellCoord::new(14, 14));
    }

    #[test]
    fn dimensions_reject_degenerate_grids() {
        assert_eq!(
            MazeDimensions::new(1, 5),
            Err(DimensionError::TooSmall {
                rows: 1,
                columns: 5
            })
        );
        assert!(MazeDimensions::new(2, 2).is_ok());
    }

    #[test]
    fn dimensions_from_world_truncate_partial_cells() {
        let dimensions = MazeDimensions::from_world(600, 40).expect("valid world");
        assert_eq!((dimensions.rows(), dimensions.columns()), (15, 15));

        let dimensions = MazeDimensions::from_world(630, 40).expect("valid world");
        assert_eq!(dimensions.rows(), 15);

        assert_eq!(
            MazeDimensions::from_world(600, 0),
            Err(DimensionError::ZeroCellSize)
        );
    }

    #[test]
    fn cadence_rejects_zero() {
        assert!(MoveCadence::new(0).is_none());
        assert_eq!(MoveCadence::default().ticks(), 4);
    }
}
