#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze carving.
//!
//! Rooms sit on even coordinates two cells apart and the odd cells between
//! them act as optional walls. Carving walks the room lattice depth-first from
//! the top-left room, visiting neighbours in a freshly shuffled order at each
//! room, so the carved passages form a spanning tree over every room. The walk
//! uses an explicit stack of pending rooms, which keeps large grids away from
//! call-stack limits.
//!
//! After carving, the bottom-left start cell and the bottom-right goal cell
//! are forced open. A forced cell that ends up with no open neighbour (which
//! happens when both of its coordinates are odd) is anchored back onto the
//! lattice by opening the adjacent passage cell, so every open cell stays
//! reachable from the start for any grid of at least 2 × 2 cells.

use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voice_maze_core::{neighbors, Cell, CellCoord, Direction, Grid, MazeDimensions};

/// Stateful maze source that owns its random number generator.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a generator whose mazes are fully determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Carves the next maze from the generator's random stream.
    #[must_use]
    pub fn next_maze(&mut self, dimensions: MazeDimensions) -> Grid {
        generate(dimensions, &mut self.rng)
    }
}

/// Produces a fresh maze for `dimensions` using `rng` as the only source of
/// randomness.
///
/// The returned grid keeps the start and goal cells open and every open cell
/// 4-connected to the start.
pub fn generate<R>(dimensions: MazeDimensions, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let mut grid = Grid::filled(dimensions, Cell::Wall);
    carve_passages(&mut grid, CellCoord::new(0, 0), rng);

    let start = dimensions.start();
    let goal = dimensions.goal().cell();
    grid.open(start);
    grid.open(goal);
    anchor(&mut grid, start);
    anchor(&mut grid, goal);

    debug_assert!(grid.has_path(start, goal));
    debug_assert!(grid.is_connected_from(start));
    grid
}

/// Pending room on the carving stack together with its shuffled exits.
struct Frame {
    room: CellCoord,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new<R>(room: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            room,
            directions,
            next: 0,
        }
    }
}

fn carve_passages<R>(grid: &mut Grid, origin: CellCoord, rng: &mut R)
where
    R: Rng + ?Sized,
{
    grid.open(origin);
    let mut stack = vec![Frame::new(origin, rng)];

    while let Some(frame) = stack.last_mut() {
        let Some(direction) = frame.directions.get(frame.next).copied() else {
            let _ = stack.pop();
            continue;
        };
        frame.next += 1;

        let Some(passage) = frame.room.step(direction) else {
            continue;
        };
        let Some(target) = passage.step(direction) else {
            continue;
        };

        // Out-of-bounds rooms report `None`, visited rooms are already open.
        if grid.cell(target) != Some(Cell::Wall) {
            continue;
        }

        grid.open(passage);
        grid.open(target);
        stack.push(Frame::new(target, rng));
    }
}

/// Opens passage cells from `cell` toward the room lattice until it touches
/// an already open cell.
fn anchor(grid: &mut Grid, cell: CellCoord) {
    let dimensions = grid.dimensions();
    if neighbors(cell, dimensions).any(|neighbor| grid.is_open(neighbor)) {
        return;
    }

    let mut cursor = cell;
    while let Some(next) = toward_lattice(cursor) {
        if grid.is_open(next) {
            break;
        }
        debug!(
            "anchoring isolated cell ({}, {}) by opening ({}, {})",
            cell.column(),
            cell.row(),
            next.column(),
            next.row()
        );
        grid.open(next);
        cursor = next;
    }
}

fn toward_lattice(cell: CellCoord) -> Option<CellCoord> {
    if cell.column() % 2 == 1 {
        cell.step(Direction::Left)
    } else if cell.row() % 2 == 1 {
        cell.step(Direction::Up)
    } else {
        None
    }
}
