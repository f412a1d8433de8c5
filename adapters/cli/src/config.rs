//! Startup configuration for the Voice Maze binary.
//!
//! Values come from built-in defaults, optionally replaced by a TOML file and
//! then by command-line flags. Everything is fixed once the game starts.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use voice_maze_core::{DimensionError, MazeDimensions, MoveCadence};

/// Transcript path that selects standard input.
pub(crate) const STDIN_TRANSCRIPT: &str = "-";

/// Raw configuration as read from disk and the command line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Edge length of the square play area in world units.
    pub(crate) world_size: u32,
    /// Edge length of a single cell in world units.
    pub(crate) cell_size: u32,
    /// Ticks between move attempts.
    pub(crate) move_cadence: u32,
    /// World ticks per second.
    pub(crate) frame_rate: u32,
    /// How long the solved maze stays on screen before the next one appears.
    pub(crate) goal_pause_ms: u64,
    /// Seed for reproducible mazes.
    pub(crate) seed: Option<u64>,
    /// Wait for the display refresh before presenting each frame.
    pub(crate) vsync: bool,
    /// Log the measured frame rate once per second.
    pub(crate) show_fps: bool,
    /// Newline-delimited recogniser output; `-` reads standard input.
    pub(crate) transcript: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_size: 600,
            cell_size: 40,
            move_cadence: MoveCadence::DEFAULT.ticks(),
            frame_rate: 60,
            goal_pause_ms: 500,
            seed: None,
            vsync: true,
            show_fps: false,
            transcript: None,
        }
    }
}

/// Where recognised transcripts are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TranscriptInput {
    Stdin,
    File(PathBuf),
}

/// Validated settings consumed by the game session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) dimensions: MazeDimensions,
    pub(crate) cell_length: f32,
    pub(crate) cadence: MoveCadence,
    pub(crate) tick_interval: Duration,
    pub(crate) goal_pause: Duration,
    pub(crate) seed: Option<u64>,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) transcript: Option<TranscriptInput>,
}

/// Reasons the configuration cannot start a game.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid maze size")]
    Dimensions(#[from] DimensionError),
    #[error("move_cadence must be at least one tick")]
    ZeroCadence,
    #[error("frame_rate must be at least one tick per second")]
    ZeroFrameRate,
}

impl GameConfig {
    /// Reads a configuration file; missing keys keep their defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Checks the configuration and converts it into game settings.
    pub(crate) fn validate(&self) -> Result<Settings, ConfigError> {
        let dimensions = MazeDimensions::from_world(self.world_size, self.cell_size)?;
        let cadence = MoveCadence::new(self.move_cadence).ok_or(ConfigError::ZeroCadence)?;
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        let transcript = self.transcript.as_ref().map(|path| {
            if path.as_os_str() == STDIN_TRANSCRIPT {
                TranscriptInput::Stdin
            } else {
                TranscriptInput::File(path.clone())
            }
        });

        Ok(Settings {
            dimensions,
            cell_length: self.cell_size as f32,
            cadence,
            tick_interval: Duration::from_secs(1) / self.frame_rate,
            goal_pause: Duration::from_millis(self.goal_pause_ms),
            seed: self.seed,
            vsync: self.vsync,
            show_fps: self.show_fps,
            transcript,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_fifteen_cell_maze() {
        let settings = GameConfig::default().validate().expect("defaults are valid");

        assert_eq!(settings.dimensions.rows(), 15);
        assert_eq!(settings.dimensions.columns(), 15);
        assert_eq!(settings.cadence.ticks(), 4);
        assert_eq!(settings.cell_length, 40.0);
        assert_eq!(settings.goal_pause, Duration::from_millis(500));
        assert_eq!(settings.tick_interval, Duration::from_nanos(16_666_666));
        assert!(settings.vsync);
        assert!(settings.transcript.is_none());
    }

    #[test]
    fn toml_overrides_only_the_keys_it_names() {
        let config = GameConfig::from_toml(
            r#"
            world_size = 420
            cell_size = 20
            seed = 7
            transcript = "-"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.world_size, 420);
        assert_eq!(config.move_cadence, 4);
        assert_eq!(config.seed, Some(7));

        let settings = config.validate().expect("valid config");
        assert_eq!(settings.dimensions.rows(), 21);
        assert_eq!(settings.transcript, Some(TranscriptInput::Stdin));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::from_toml("world_sise = 600").is_err());
    }

    #[test]
    fn transcript_paths_other_than_dash_are_files() {
        let config = GameConfig {
            transcript: Some(PathBuf::from("words.jsonl")),
            ..GameConfig::default()
        };

        let settings = config.validate().expect("valid config");
        assert_eq!(
            settings.transcript,
            Some(TranscriptInput::File(PathBuf::from("words.jsonl")))
        );
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let zero_cell = GameConfig {
            cell_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            zero_cell.validate(),
            Err(ConfigError::Dimensions(DimensionError::ZeroCellSize))
        ));

        let tiny_world = GameConfig {
            world_size: 79,
            ..GameConfig::default()
        };
        assert!(matches!(
            tiny_world.validate(),
            Err(ConfigError::Dimensions(DimensionError::TooSmall { .. }))
        ));

        let zero_cadence = GameConfig {
            move_cadence: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            zero_cadence.validate(),
            Err(ConfigError::ZeroCadence)
        ));

        let zero_rate = GameConfig {
            frame_rate: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            zero_rate.validate(),
            Err(ConfigError::ZeroFrameRate)
        ));
    }

    #[test]
    fn missing_config_file_reports_its_path() {
        let error = GameConfig::load(Path::new("/nonexistent/voice-maze.toml"))
            .expect_err("file does not exist");

        assert!(error.to_string().contains("/nonexistent/voice-maze.toml"));
    }
}
