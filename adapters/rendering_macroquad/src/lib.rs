#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Voice Maze.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Besides drawing, the adapter polls the arrow keys and the space bar so the
//! maze stays playable when no recogniser is attached.

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_pressed, KeyCode};
use std::time::Duration;
use voice_maze_core::Command;
use voice_maze_rendering::{
    Color, FrameInput, MazePresentation, Presentation, Rect, RenderingBackend, Scene,
};

/// Key bindings that mirror the spoken vocabulary.
const COMMAND_KEYS: [(KeyCode, Command); 5] = [
    (KeyCode::Up, Command::Up),
    (KeyCode::Down, Command::Down),
    (KeyCode::Left, Command::Left),
    (KeyCode::Right, Command::Right),
    (KeyCode::Space, Command::Stop),
];

/// Font size used for the banner overlay, relative to the cell length.
const BANNER_FONT_RATIO: f32 = 0.9;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.maze.width().round() as i32,
            window_height: scene.maze.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                let frame_input = FrameInput {
                    commands: commands_from_keys(is_key_pressed),
                };
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_maze(
                    &scene.maze,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                macroquad::window::clear_background(to_macroquad_color(
                    scene.palette.background,
                ));
                draw_scene(&scene, &metrics);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Translates the keys pressed this frame into commands, in binding order.
fn commands_from_keys<P>(mut pressed: P) -> Vec<Command>
where
    P: FnMut(KeyCode) -> bool,
{
    COMMAND_KEYS
        .iter()
        .filter(|(key, _)| pressed(*key))
        .map(|(_, command)| *command)
        .collect()
}

/// Uniform scale and offset that fit the maze inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    fn from_maze(maze: &MazePresentation, screen_width: f32, screen_height: f32) -> Self {
        let world_width = maze.width();
        let world_height = maze.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let offset = Vec2::new(
            ((screen_width - world_width * scale) * 0.5).max(0.0),
            ((screen_height - world_height * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::new(self.to_screen(rect.origin), rect.size * self.scale)
    }
}

fn draw_scene(scene: &Scene, metrics: &SceneMetrics) {
    let maze = &scene.maze;

    let wall_color = to_macroquad_color(scene.palette.wall);
    for wall in &maze.walls {
        fill_rect(metrics.rect_to_screen(maze.wall_rect(*wall)), wall_color);
    }

    fill_rect(
        metrics.rect_to_screen(maze.goal_rect(scene.goal)),
        to_macroquad_color(scene.palette.goal),
    );

    let center = metrics.to_screen(maze.cell_center(scene.token));
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        maze.token_radius() * metrics.scale,
        to_macroquad_color(scene.palette.token),
    );

    if let Some(banner) = &scene.banner {
        let font_size = maze.cell_length * BANNER_FONT_RATIO * metrics.scale;
        let origin = metrics.to_screen(Vec2::new(maze.cell_length * 0.5, maze.cell_length));
        let _ = macroquad::text::draw_text(
            banner,
            origin.x,
            origin.y,
            font_size,
            to_macroquad_color(scene.palette.text),
        );
    }
}

fn fill_rect(rect: Rect, color: macroquad::color::Color) {
    macroquad::shapes::draw_rectangle(
        rect.origin.x,
        rect.origin.y,
        rect.size.x,
        rect.size.y,
        color,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_maze_core::{Cell, Grid, MazeDimensions};

    fn maze(rows: u32, columns: u32) -> MazePresentation {
        let dimensions = MazeDimensions::new(rows, columns).expect("valid dimensions");
        MazePresentation::from_grid(&Grid::filled(dimensions, Cell::Wall), 40.0)
            .expect("valid cell length")
    }

    #[test]
    fn metrics_fit_square_maze_into_matching_window() {
        let metrics = SceneMetrics::from_maze(&maze(15, 15), 600.0, 600.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::ZERO);
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_maze(&maze(15, 15), 1200.0, 600.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::new(300.0, 0.0));
        assert_eq!(
            metrics.to_screen(Vec2::new(40.0, 40.0)),
            Vec2::new(340.0, 40.0)
        );
    }

    #[test]
    fn metrics_scale_down_into_small_windows() {
        let metrics = SceneMetrics::from_maze(&maze(10, 10), 200.0, 200.0);

        assert_eq!(metrics.scale, 0.5);
        let rect = metrics.rect_to_screen(Rect::new(Vec2::new(40.0, 0.0), Vec2::splat(40.0)));
        assert_eq!(rect, Rect::new(Vec2::new(20.0, 0.0), Vec2::splat(20.0)));
    }

    #[test]
    fn keys_map_onto_the_spoken_vocabulary() {
        assert_eq!(
            commands_from_keys(|key| matches!(key, KeyCode::Left | KeyCode::Space)),
            vec![Command::Left, Command::Stop]
        );
        assert!(commands_from_keys(|_| false).is_empty());
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        let rate = counter.record_frame(frame).expect("one second elapsed");
        assert!((rate - 4.0).abs() < 1e-3);
    }
}
