#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Voice Maze adapters.
//!
//! Backends receive a [`Scene`] describing the maze walls, the goal marker and
//! the token, and report keyboard input back through [`FrameInput`]. Nothing
//! here depends on a concrete drawing library.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use voice_maze_core::{CellCoord, Command, Grid};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Colors applied to each scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Background behind open cells.
    pub background: Color,
    /// Fill used for wall cells.
    pub wall: Color,
    /// Fill used for the goal marker.
    pub goal: Color,
    /// Fill used for the token.
    pub token: Color,
    /// Color used for overlay text.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(15, 15, 15),
            wall: Color::from_rgb_u8(70, 70, 90),
            goal: Color::from_rgb_u8(50, 255, 50),
            token: Color::from_rgb_u8(255, 50, 50),
            text: Color::from_rgb_u8(245, 245, 245),
        }
    }
}

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Upper-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Describes the maze grid as a set of square cells.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Cells drawn as filled wall blocks.
    pub walls: Vec<CellCoord>,
}

impl MazePresentation {
    /// Gap left between neighbouring wall blocks.
    pub const WALL_GAP: f32 = 1.0;

    /// Fraction of the cell length left empty around the goal marker.
    pub const GOAL_INSET_RATIO: f32 = 0.1;

    /// Token radius as a fraction of the cell length.
    pub const TOKEN_RADIUS_RATIO: f32 = 1.0 / 3.0;

    /// Captures the walls of `grid` for presentation.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn from_grid(grid: &Grid, cell_length: f32) -> Result<Self, RenderingError> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns: grid.columns(),
            rows: grid.rows(),
            cell_length,
            walls: grid.wall_cells().collect(),
        })
    }

    /// Replaces the captured walls with those of `grid`, keeping the cell length.
    pub fn refresh_from_grid(&mut self, grid: &Grid) {
        self.columns = grid.columns();
        self.rows = grid.rows();
        self.walls.clear();
        self.walls.extend(grid.wall_cells());
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Upper-left corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }

    /// Center point of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_length * 0.5)
    }

    /// Block drawn for a wall cell.
    #[must_use]
    pub fn wall_rect(&self, cell: CellCoord) -> Rect {
        let side = (self.cell_length - Self::WALL_GAP).max(0.0);
        Rect::new(self.cell_origin(cell), Vec2::splat(side))
    }

    /// Marker drawn on the goal cell.
    #[must_use]
    pub fn goal_rect(&self, cell: CellCoord) -> Rect {
        let inset = self.cell_length * Self::GOAL_INSET_RATIO;
        Rect::new(
            self.cell_origin(cell) + Vec2::splat(inset),
            Vec2::splat(self.cell_length - 2.0 * inset),
        )
    }

    /// Radius of the token circle.
    #[must_use]
    pub fn token_radius(&self) -> f32 {
        self.cell_length * Self::TOKEN_RADIUS_RATIO
    }
}

/// Snapshot of everything drawn in a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Maze walls and geometry.
    pub maze: MazePresentation,
    /// Cell marked as the goal.
    pub goal: CellCoord,
    /// Cell occupied by the token.
    pub token: CellCoord,
    /// Colors used for each element.
    pub palette: Palette,
    /// Optional line of text drawn over the maze.
    pub banner: Option<String>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        maze: MazePresentation,
        goal: CellCoord,
        token: CellCoord,
        palette: Palette,
    ) -> Self {
        Self {
            maze,
            goal,
            token,
            palette,
            banner: None,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Commands entered on the keyboard this frame, in key order.
    pub commands: Vec<Command>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Voice Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and may mutate the scene before it
    /// is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive and finite to produce visible cells.
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive and finite (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_maze_core::{Cell, MazeDimensions};

    fn grid() -> Grid {
        let dimensions = MazeDimensions::new(2, 3).expect("valid dimensions");
        let mut grid = Grid::filled(dimensions, Cell::Wall);
        grid.open(CellCoord::new(0, 1));
        grid.open(CellCoord::new(1, 1));
        grid.open(CellCoord::new(2, 1));
        grid
    }

    #[test]
    fn from_grid_collects_wall_cells() {
        let maze = MazePresentation::from_grid(&grid(), 40.0).expect("valid length");

        assert_eq!(maze.columns, 3);
        assert_eq!(maze.rows, 2);
        assert_eq!(
            maze.walls,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0)
            ]
        );
        assert_eq!(maze.width(), 120.0);
        assert_eq!(maze.height(), 80.0);
    }

    #[test]
    fn from_grid_rejects_non_positive_cell_length() {
        for cell_length in [0.0, -4.0, f32::NAN] {
            let error = MazePresentation::from_grid(&grid(), cell_length)
                .expect_err("invalid cell length must be rejected");
            assert!(matches!(error, RenderingError::InvalidCellLength { .. }));
        }
    }

    #[test]
    fn cell_geometry_matches_cell_length() {
        let maze = MazePresentation::from_grid(&grid(), 40.0).expect("valid length");
        let cell = CellCoord::new(2, 1);

        assert_eq!(maze.cell_origin(cell), Vec2::new(80.0, 40.0));
        assert_eq!(maze.cell_center(cell), Vec2::new(100.0, 60.0));
        assert_eq!(
            maze.wall_rect(cell),
            Rect::new(Vec2::new(80.0, 40.0), Vec2::splat(39.0))
        );
        assert_eq!(
            maze.goal_rect(cell),
            Rect::new(Vec2::new(84.0, 44.0), Vec2::splat(32.0))
        );
        assert!((maze.token_radius() - 40.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn scene_starts_without_banner() {
        let maze = MazePresentation::from_grid(&grid(), 10.0).expect("valid length");
        let scene = Scene::new(
            maze,
            CellCoord::new(2, 1),
            CellCoord::new(0, 1),
            Palette::default(),
        );

        assert!(scene.banner.is_none());
        assert_eq!(scene.palette.wall, Color::from_rgb_u8(70, 70, 90));
    }
}
