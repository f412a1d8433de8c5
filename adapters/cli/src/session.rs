//! Bridges real frame time and keyboard input onto the world's fixed ticks.

use std::time::Duration;

use log::debug;
use voice_maze_core::{CellCoord, Command, Event};
use voice_maze_rendering::{FrameInput, MazePresentation, Palette, RenderingError, Scene};
use voice_maze_system_voice::VoiceCommandProducer;
use voice_maze_world::{self as world, query, World};

/// Banner shown while a solved maze stays on screen.
pub(crate) const GOAL_BANNER: &str = "Goal reached!";

/// Upper bound on ticks replayed after a slow frame; the rest is dropped.
const MAX_CATCH_UP_TICKS: u32 = 8;

/// Converts variable frame durations into a whole number of fixed ticks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickPacer {
    interval: Duration,
    accumulated: Duration,
}

impl TickPacer {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `frame` to the backlog and returns how many ticks are due.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulated += frame;

        let mut ticks = 0;
        while self.accumulated >= self.interval && ticks < MAX_CATCH_UP_TICKS {
            self.accumulated -= self.interval;
            ticks += 1;
        }

        if ticks == MAX_CATCH_UP_TICKS && self.accumulated >= self.interval {
            debug!("frame overran; dropping {:?} of backlog", self.accumulated);
            self.accumulated = Duration::ZERO;
        }
        ticks
    }
}

/// Game state driven once per rendered frame.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    producer: VoiceCommandProducer,
    pacer: TickPacer,
    goal_pause: Duration,
    pause_remaining: Duration,
    shown_generation: u64,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(
        world: World,
        producer: VoiceCommandProducer,
        tick_interval: Duration,
        goal_pause: Duration,
    ) -> Self {
        let shown_generation = query::generation(&world);
        Self {
            world,
            producer,
            pacer: TickPacer::new(tick_interval),
            goal_pause,
            pause_remaining: Duration::ZERO,
            shown_generation,
            events: Vec::new(),
        }
    }

    /// Builds the first frame from the installed maze.
    pub(crate) fn initial_scene(&self, cell_length: f32) -> Result<Scene, RenderingError> {
        let maze = MazePresentation::from_grid(query::grid(&self.world), cell_length)?;
        Ok(Scene::new(
            maze,
            query::goal(&self.world).cell(),
            query::token(&self.world),
            Palette::default(),
        ))
    }

    /// Applies one rendered frame: keyboard commands, due ticks and scene refresh.
    ///
    /// Keyboard input is ignored while a solved maze is on screen, and anything
    /// the listener queued meanwhile is discarded when the next maze appears.
    pub(crate) fn update(&mut self, frame: Duration, input: FrameInput, scene: &mut Scene) {
        if self.pause_remaining > Duration::ZERO {
            self.pause_remaining = self.pause_remaining.saturating_sub(frame);
            if self.pause_remaining > Duration::ZERO {
                return;
            }
            if let Some(discarded) = self.producer.submit(Command::Stop) {
                debug!("discarded {discarded} commands given during the goal pause");
            }
            scene.banner = None;
            self.refresh(scene);
            return;
        }

        for command in input.commands {
            let _ = self.producer.submit(command);
        }

        for _ in 0..self.pacer.advance(frame) {
            world::tick(&mut self.world, &mut self.events);
            if let Some(cell) = goal_reached(&self.events) {
                self.events.clear();
                self.hold_solved_maze(cell, scene);
                return;
            }
            self.events.clear();
        }

        self.refresh(scene);
    }

    fn hold_solved_maze(&mut self, cell: CellCoord, scene: &mut Scene) {
        if self.goal_pause.is_zero() {
            self.refresh(scene);
            return;
        }

        scene.token = cell;
        scene.banner = Some(GOAL_BANNER.to_owned());
        self.pause_remaining = self.goal_pause;
    }

    fn refresh(&mut self, scene: &mut Scene) {
        let generation = query::generation(&self.world);
        if generation != self.shown_generation {
            scene.maze.refresh_from_grid(query::grid(&self.world));
            self.shown_generation = generation;
        }
        scene.goal = query::goal(&self.world).cell();
        scene.token = query::token(&self.world);
    }

    #[cfg(test)]
    fn world(&self) -> &World {
        &self.world
    }
}

fn goal_reached(events: &[Event]) -> Option<CellCoord> {
    events.iter().find_map(|event| match event {
        Event::GoalReached { cell } => Some(*cell),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_maze_core::{Cell, Grid, MazeDimensions, MoveCadence};
    use voice_maze_system_command_queue::CommandQueue;
    use voice_maze_world::WorldConfig;

    const TICK: Duration = Duration::from_millis(10);

    fn session(goal_pause: Duration) -> (Session, Scene) {
        let dimensions = MazeDimensions::new(3, 3).expect("valid dimensions");
        let queue = CommandQueue::new();
        let config = WorldConfig::default()
            .with_cadence(MoveCadence::new(1).expect("non-zero cadence"))
            .with_seed(11);
        let world = World::with_grid(Grid::filled(dimensions, Cell::Open), config, queue.clone())
            .expect("start is open");
        let session = Session::new(world, VoiceCommandProducer::new(queue), TICK, goal_pause);
        let scene = session.initial_scene(10.0).expect("valid cell length");
        (session, scene)
    }

    fn keys(commands: &[Command]) -> FrameInput {
        FrameInput {
            commands: commands.to_vec(),
        }
    }

    #[test]
    fn pacer_emits_whole_ticks_and_keeps_the_remainder() {
        let mut pacer = TickPacer::new(TICK);

        assert_eq!(pacer.advance(Duration::from_millis(4)), 0);
        assert_eq!(pacer.advance(Duration::from_millis(7)), 1);
        assert_eq!(pacer.advance(Duration::from_millis(29)), 3);
    }

    #[test]
    fn pacer_caps_catch_up_after_a_stall() {
        let mut pacer = TickPacer::new(TICK);

        assert_eq!(pacer.advance(Duration::from_secs(2)), MAX_CATCH_UP_TICKS);
        assert_eq!(pacer.advance(Duration::ZERO), 0);
    }

    #[test]
    fn keyboard_commands_move_the_token() {
        let (mut session, mut scene) = session(Duration::ZERO);

        session.update(TICK, keys(&[Command::Up]), &mut scene);

        assert_eq!(scene.token, CellCoord::new(0, 1));
        assert_eq!(query::token(session.world()), CellCoord::new(0, 1));
    }

    #[test]
    fn keyboard_stop_discards_pending_commands() {
        let (mut session, mut scene) = session(Duration::ZERO);

        session.update(
            Duration::ZERO,
            keys(&[Command::Up, Command::Right, Command::Stop]),
            &mut scene,
        );
        session.update(TICK, FrameInput::default(), &mut scene);

        assert_eq!(scene.token, CellCoord::new(0, 2));
    }

    #[test]
    fn solved_maze_is_held_on_screen_for_the_pause() {
        let (mut session, mut scene) = session(Duration::from_millis(50));
        let open_walls = scene.maze.walls.clone();

        session.update(TICK, keys(&[Command::Right, Command::Right]), &mut scene);
        session.update(TICK, FrameInput::default(), &mut scene);

        assert_eq!(scene.token, CellCoord::new(2, 2));
        assert_eq!(scene.banner.as_deref(), Some(GOAL_BANNER));
        assert_eq!(scene.maze.walls, open_walls);
        assert_eq!(query::generation(session.world()), 2);
        assert_eq!(query::token(session.world()), CellCoord::new(0, 2));

        session.update(Duration::from_millis(30), FrameInput::default(), &mut scene);
        assert_eq!(scene.banner.as_deref(), Some(GOAL_BANNER));

        session.update(Duration::from_millis(30), FrameInput::default(), &mut scene);
        assert!(scene.banner.is_none());
        assert_eq!(scene.token, CellCoord::new(0, 2));
        assert_ne!(scene.maze.walls, open_walls);
    }

    #[test]
    fn commands_given_during_the_pause_never_reach_the_next_maze() {
        let (mut session, mut scene) = session(Duration::from_millis(50));
        session.update(TICK, keys(&[Command::Right, Command::Right]), &mut scene);
        session.update(TICK, FrameInput::default(), &mut scene);
        assert_eq!(query::generation(session.world()), 2);

        session.update(Duration::from_millis(30), keys(&[Command::Right]), &mut scene);
        let _ = session.producer.submit(Command::Up);
        assert_eq!(query::pending_commands(session.world()), 1);

        session.update(Duration::from_millis(30), FrameInput::default(), &mut scene);
        assert_eq!(query::pending_commands(session.world()), 0);

        session.update(TICK, FrameInput::default(), &mut scene);
        assert_eq!(query::token(session.world()), CellCoord::new(0, 2));
        assert_eq!(scene.token, CellCoord::new(0, 2));
    }

    #[test]
    fn ticks_are_suspended_during_the_pause() {
        let (mut session, mut scene) = session(Duration::from_millis(50));
        session.update(TICK, keys(&[Command::Right, Command::Right]), &mut scene);
        session.update(TICK, FrameInput::default(), &mut scene);
        let ticks = query::tick_index(session.world());

        session.update(Duration::from_millis(20), FrameInput::default(), &mut scene);

        assert_eq!(query::tick_index(session.world()), ticks);
    }
}
