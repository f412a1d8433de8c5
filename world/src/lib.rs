#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Voice Maze.
//!
//! The world owns the installed maze, the token, the goal and the move
//! scheduler. Adapters drive it exclusively through [`tick`], which consumes
//! at most one queued direction per completed cadence, and observe it through
//! the [`query`] module and the [`Event`] values each tick reports.

mod scheduler;

use log::{debug, info};
use voice_maze_core::{
    CellCoord, ClearReason, Event, Goal, Grid, MazeDimensions, MoveCadence, PlacementError,
};
use voice_maze_system_command_queue::CommandQueue;
use voice_maze_system_maze_generation::MazeGenerator;

use self::scheduler::MoveScheduler;

/// Startup parameters that stay fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldConfig {
    /// Ticks between successive move attempts.
    pub cadence: MoveCadence,
    /// Seed for the maze generator; `None` draws from operating system entropy.
    pub seed: Option<u64>,
}

impl WorldConfig {
    /// Returns a copy using `cadence` between move attempts.
    #[must_use]
    pub fn with_cadence(mut self, cadence: MoveCadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Returns a copy whose mazes are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Represents the authoritative Voice Maze world state.
#[derive(Debug)]
pub struct World {
    dimensions: MazeDimensions,
    grid: Grid,
    token: CellCoord,
    goal: Goal,
    scheduler: MoveScheduler,
    queue: CommandQueue,
    generator: MazeGenerator,
    generation: u64,
    tick_index: u64,
}

impl World {
    /// Creates a world with a freshly generated maze that consumes `queue`.
    #[must_use]
    pub fn new(dimensions: MazeDimensions, config: WorldConfig, queue: CommandQueue) -> Self {
        let mut generator = generator_for(config);
        let grid = generator.next_maze(dimensions);
        Self::assemble(grid, config, generator, queue)
    }

    /// Creates a world whose first maze is `grid` instead of a generated one.
    ///
    /// Later mazes still come from the generator. Fails when the start cell
    /// of `grid` is a wall.
    pub fn with_grid(
        grid: Grid,
        config: WorldConfig,
        queue: CommandQueue,
    ) -> Result<Self, PlacementError> {
        if !grid.is_open(grid.dimensions().start()) {
            return Err(PlacementError::Blocked);
        }

        Ok(Self::assemble(grid, config, generator_for(config), queue))
    }

    fn assemble(
        grid: Grid,
        config: WorldConfig,
        generator: MazeGenerator,
        queue: CommandQueue,
    ) -> Self {
        let dimensions = grid.dimensions();
        Self {
            dimensions,
            token: dimensions.start(),
            goal: dimensions.goal(),
            grid,
            scheduler: MoveScheduler::new(config.cadence),
            queue,
            generator,
            generation: 1,
            tick_index: 0,
        }
    }

    fn attempt_move(&mut self, out_events: &mut Vec<Event>) {
        let Some(direction) = self.queue.try_dequeue() else {
            return;
        };

        let from = self.token;
        match from.step(direction).filter(|cell| self.grid.is_open(*cell)) {
            Some(to) => {
                self.token = to;
                out_events.push(Event::TokenMoved { from, to });
            }
            None => {
                out_events.push(Event::MoveRejected { from, direction });
                let discarded = self.queue.clear();
                debug!(
                    "{direction:?} blocked at ({}, {}); discarded {discarded} pending commands",
                    from.column(),
                    from.row()
                );
                out_events.push(Event::QueueCleared {
                    reason: ClearReason::Collision,
                    discarded,
                });
            }
        }
    }

    fn complete_maze(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.goal.cell();
        info!("goal reached after {} ticks", self.tick_index);
        out_events.push(Event::GoalReached { cell });

        self.grid = self.generator.next_maze(self.dimensions);
        self.generation = self.generation.saturating_add(1);
        self.token = self.dimensions.start();
        self.goal = self.dimensions.goal();
        out_events.push(Event::MazeRegenerated {
            generation: self.generation,
        });

        let discarded = self.queue.clear();
        out_events.push(Event::QueueCleared {
            reason: ClearReason::Goal,
            discarded,
        });
    }
}

fn generator_for(config: WorldConfig) -> MazeGenerator {
    match config.seed {
        Some(seed) => MazeGenerator::seeded(seed),
        None => MazeGenerator::from_entropy(),
    }
}

/// Advances the world by one scheduling tick.
///
/// Once every `cadence` ticks the oldest queued direction is applied: an open
/// destination moves the token, while a wall or the grid edge leaves the
/// token in place and clears the whole queue. Independently of the cadence,
/// a token resting on the goal installs a new maze, returns to the start and
/// clears the queue.
pub fn tick(world: &mut World, out_events: &mut Vec<Event>) {
    world.tick_index = world.tick_index.saturating_add(1);

    if world.scheduler.advance() {
        world.attempt_move(out_events);
    }

    if world.token == world.goal.cell() {
        world.complete_maze(out_events);
    }
}

/// Moves the token directly onto `cell`, bypassing the queue.
///
/// The goal check still runs on the next [`tick`].
pub fn place_token(world: &mut World, cell: CellCoord) -> Result<(), PlacementError> {
    match world.grid.cell(cell) {
        None => Err(PlacementError::OutOfBounds),
        Some(state) if !state.is_open() => Err(PlacementError::Blocked),
        Some(_) => {
            world.token = cell;
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use voice_maze_core::{CellCoord, Goal, Grid};

    use super::World;

    /// Provides read-only access to the installed maze.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently occupied by the token.
    #[must_use]
    pub fn token(world: &World) -> CellCoord {
        world.token
    }

    /// Goal the token is racing toward.
    #[must_use]
    pub fn goal(world: &World) -> Goal {
        world.goal
    }

    /// Cell the token returns to whenever a new maze is installed.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.dimensions.start()
    }

    /// Number of directions waiting in the shared queue.
    #[must_use]
    pub fn pending_commands(world: &World) -> usize {
        world.queue.len()
    }

    /// Ordinal of the installed maze, starting at one.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
