#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Voice Maze experience.

mod config;
mod session;

use std::{path::PathBuf, thread::JoinHandle};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use voice_maze_core::WINDOW_TITLE;
use voice_maze_rendering::{Presentation, RenderingBackend};
use voice_maze_rendering_macroquad::MacroquadBackend;
use voice_maze_system_command_queue::CommandQueue;
use voice_maze_system_voice::{spawn_listener, LineTranscriptSource, VoiceCommandProducer};
use voice_maze_world::{World, WorldConfig};

use crate::{
    config::{GameConfig, Settings, TranscriptInput},
    session::Session,
};

/// Command-line arguments for the Voice Maze binary.
#[derive(Debug, Parser)]
#[command(
    name = "voice-maze",
    about = "Steer a token through generated mazes with spoken directions"
)]
struct CliArgs {
    /// TOML file providing defaults for every other option.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Edge length of the square play area in world units.
    #[arg(long, value_name = "UNITS")]
    world_size: Option<u32>,
    /// Edge length of a single maze cell in world units.
    #[arg(long, value_name = "UNITS")]
    cell_size: Option<u32>,
    /// Number of ticks between move attempts.
    #[arg(long, value_name = "TICKS")]
    move_cadence: Option<u32>,
    /// World ticks per second.
    #[arg(long, value_name = "HZ")]
    frame_rate: Option<u32>,
    /// Milliseconds the solved maze stays visible.
    #[arg(long, value_name = "MS")]
    goal_pause_ms: Option<u64>,
    /// Seed that makes the maze sequence reproducible.
    #[arg(long)]
    seed: Option<u64>,
    /// Recogniser transcript to listen to, one utterance per line; `-` reads stdin.
    #[arg(long, value_name = "PATH")]
    transcript: Option<PathBuf>,
    /// Render as fast as possible instead of waiting for the display.
    #[arg(long)]
    no_vsync: bool,
    /// Log the measured frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

impl CliArgs {
    fn resolve(&self) -> Result<Settings> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(world_size) = self.world_size {
            config.world_size = world_size;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(move_cadence) = self.move_cadence {
            config.move_cadence = move_cadence;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(goal_pause_ms) = self.goal_pause_ms {
            config.goal_pause_ms = goal_pause_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.transcript.is_some() {
            config.transcript.clone_from(&self.transcript);
        }
        if self.no_vsync {
            config.vsync = false;
        }
        if self.show_fps {
            config.show_fps = true;
        }

        Ok(config.validate()?)
    }
}

/// Entry point for the Voice Maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = CliArgs::parse().resolve()?;
    info!(
        "{WINDOW_TITLE}: {}x{} maze, one move every {} ticks",
        settings.dimensions.columns(),
        settings.dimensions.rows(),
        settings.cadence.ticks()
    );

    let queue = CommandQueue::new();
    let producer = VoiceCommandProducer::new(queue.clone());
    // The listener is detached; process exit reclaims it.
    drop(start_listener(settings.transcript.as_ref(), &producer));

    let mut world_config = WorldConfig::default().with_cadence(settings.cadence);
    if let Some(seed) = settings.seed {
        world_config = world_config.with_seed(seed);
    }
    let world = World::new(settings.dimensions, world_config, queue);

    let mut session = Session::new(world, producer, settings.tick_interval, settings.goal_pause);
    let scene = session
        .initial_scene(settings.cell_length)
        .context("failed to build the initial scene")?;

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(
            Presentation::new(WINDOW_TITLE, scene),
            move |frame, input, scene| session.update(frame, input, scene),
        )
}

/// Starts the recogniser listener, or explains why the game runs on keys only.
fn start_listener(
    transcript: Option<&TranscriptInput>,
    producer: &VoiceCommandProducer,
) -> Option<JoinHandle<()>> {
    let spawned = match transcript {
        None => {
            info!("no transcript source configured; keyboard input only");
            return None;
        }
        Some(TranscriptInput::Stdin) => {
            spawn_listener(LineTranscriptSource::stdin(), producer.clone())
        }
        Some(TranscriptInput::File(path)) => match LineTranscriptSource::open(path) {
            Ok(source) => spawn_listener(source, producer.clone()),
            Err(error) => {
                warn!("{:#}; continuing with keyboard input only", anyhow::Error::new(error));
                return None;
            }
        },
    };

    match spawned {
        Ok(handle) => Some(handle),
        Err(error) => {
            warn!("failed to start the voice listener: {error}; keyboard input only");
            None
        }
    }
}
