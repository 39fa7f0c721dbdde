#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed platform adapter for the raycast maze.
//!
//! Macroquad is pulled in without its `audio` feature; the maze is silent and
//! the audio stack needs native ALSA headers to build.
//!
//! The adapter owns the window, the frame clock and input polling. Each frame
//! the software-rendered [`FrameBuffer`] is uploaded into a single
//! nearest-filtered texture and stretched over the whole window.

use anyhow::{anyhow, Context, Result};
use glam::DVec2;
use macroquad::{
    color::{Color, BLACK, WHITE},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, set_cursor_grab,
        show_mouse, KeyCode, MouseButton,
    },
    texture::{draw_texture_ex, DrawTextureParams, FilterMode, Image, Texture2D},
};
use raycast_maze_core::{DisplayMode, FALLBACK_SCREEN_SIZE};
use raycast_maze_rendering::{
    Announcement, FrameBuffer, FrameInput, Presentation, RenderingBackend, WallTexture,
};
use std::{
    collections::VecDeque,
    path::Path,
    time::{Duration, Instant},
};

const OVERLAY_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.65);
const TITLE_FONT_SIZE: f32 = 36.0;
const MESSAGE_FONT_SIZE: f32 = 22.0;
const HINT_FONT_SIZE: f32 = 18.0;
const ACKNOWLEDGE_HINT: &str = "Click, Enter or Space to continue";

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    grab_cursor: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            grab_cursor: true,
        }
    }
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

    /// Configures whether the backend logs frame timing once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the cursor is hidden and confined to the window during play.
    #[must_use]
    pub fn with_cursor_grab(mut self, grab: bool) -> Self {
        self.grab_cursor = grab;
        self
    }
}

/// Loads a wall texture from an image file.
///
/// # Errors
///
/// Fails when the file cannot be read, cannot be decoded, or does not hold a
/// 64x64 image.
pub fn load_wall_texture(path: &Path) -> Result<WallTexture> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read wall texture {}", path.display()))?;
    // Decoding panics on malformed input in this macroquad release.
    let image = std::panic::catch_unwind(|| Image::from_file_with_format(&bytes, None))
        .map_err(|_| anyhow!("failed to decode wall texture {}", path.display()))?;
    WallTexture::from_rgba8(u32::from(image.width), u32::from(image.height), &image.bytes)
        .with_context(|| format!("unsupported wall texture {}", path.display()))
}

const REPORT_INTERVAL: Duration = Duration::from_secs(1);
const TRAILING_REPORTS: usize = 10;

/// Frame timing summarised over one report interval.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f64,
    /// Mean of the most recent per-interval rates.
    trailing_fps: f64,
    mean_update: Duration,
    worst_frame: Duration,
}

/// Accumulates frame and update durations between reports.
#[derive(Debug, Default)]
struct FrameStats {
    window: Duration,
    frames: u32,
    update_total: Duration,
    worst_frame: Duration,
    history: VecDeque<f64>,
}

impl FrameStats {
    /// Adds one frame; yields a report each time a full interval has elapsed.
    fn record(&mut self, frame: Duration, update: Duration) -> Option<FrameReport> {
        self.window += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_total += update;
        self.worst_frame = self.worst_frame.max(frame);
        if self.window < REPORT_INTERVAL {
            return None;
        }

        let fps = f64::from(self.frames) / self.window.as_secs_f64();
        if self.history.len() == TRAILING_REPORTS {
            let _ = self.history.pop_front();
        }
        self.history.push_back(fps);
        let trailing_fps = self.history.iter().sum::<f64>() / self.history.len() as f64;

        let report = FrameReport {
            fps,
            trailing_fps,
            mean_update: self.update_total / self.frames,
            worst_frame: self.worst_frame,
        };
        let history = std::mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
        Some(report)
    }
}

/// Computes relative mouse motion; the first sample after a reset reports no motion.
fn mouse_delta(previous: Option<(f32, f32)>, current: (f32, f32)) -> DVec2 {
    previous.map_or(DVec2::ZERO, |(x, y)| {
        DVec2::new(f64::from(current.0 - x), f64::from(current.1 - y))
    })
}

/// Decides the size of the software frame buffer for the drawable area.
fn frame_size(screen_width: f32, screen_height: f32) -> (usize, usize) {
    if screen_width >= 1.0 && screen_height >= 1.0 {
        (screen_width as usize, screen_height as usize)
    } else {
        (FALLBACK_SCREEN_SIZE.0 as usize, FALLBACK_SCREEN_SIZE.1 as usize)
    }
}

fn window_conf(presentation: &Presentation, swap_interval: Option<i32>) -> macroquad::window::Conf {
    let (width, height) = match presentation.display_mode {
        DisplayMode::Windowed => presentation.window_size,
        DisplayMode::Fullscreen => FALLBACK_SCREEN_SIZE,
    };
    let mut config = macroquad::window::Conf {
        window_title: presentation.window_title.clone(),
        window_width: i32::try_from(width).unwrap_or(i32::MAX),
        window_height: i32::try_from(height).unwrap_or(i32::MAX),
        fullscreen: presentation.display_mode == DisplayMode::Fullscreen,
        window_resizable: false,
        ..macroquad::window::Conf::default()
    };
    if let Some(swap_interval) = swap_interval {
        config.platform.swap_interval = Some(swap_interval);
    }
    config
}

fn poll_frame_input(previous_mouse: &mut Option<(f32, f32)>) -> FrameInput {
    let current = mouse_position();
    let delta = mouse_delta(*previous_mouse, current);
    *previous_mouse = Some(current);

    FrameInput {
        forward: is_key_down(KeyCode::W),
        backward: is_key_down(KeyCode::S),
        strafe_left: is_key_down(KeyCode::A),
        strafe_right: is_key_down(KeyCode::D),
        run: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
        turn_left: is_key_down(KeyCode::Left),
        turn_right: is_key_down(KeyCode::Right),
        mouse_delta: delta,
    }
}

fn acknowledged() -> bool {
    is_mouse_button_pressed(MouseButton::Left)
        || is_key_pressed(KeyCode::Enter)
        || is_key_pressed(KeyCode::KpEnter)
        || is_key_pressed(KeyCode::Space)
}

fn set_play_cursor(grab: bool, playing: bool) {
    if grab {
        set_cursor_grab(playing);
        show_mouse(!playing);
    }
}

/// GPU texture mirroring the software frame buffer.
struct FrameSurface {
    texture: Texture2D,
    image: Image,
    size: (usize, usize),
}

impl FrameSurface {
    fn new(frame: &FrameBuffer) -> Self {
        let mut image = Image {
            bytes: Vec::new(),
            width: u16::try_from(frame.width()).unwrap_or(u16::MAX),
            height: u16::try_from(frame.height()).unwrap_or(u16::MAX),
        };
        frame.write_rgba8(&mut image.bytes);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);
        Self {
            texture,
            image,
            size: (frame.width(), frame.height()),
        }
    }

    fn upload(&mut self, frame: &FrameBuffer) {
        if self.size != (frame.width(), frame.height()) {
            self.texture.delete();
            *self = Self::new(frame);
            return;
        }
        frame.write_rgba8(&mut self.image.bytes);
        self.texture.update(&self.image);
    }

    fn draw(&self) {
        draw_texture_ex(
            self.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(macroquad::math::vec2(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                )),
                ..DrawTextureParams::default()
            },
        );
    }
}

fn draw_centered_text(text: &str, y: f32, font_size: f32, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let x = (macroquad::window::screen_width() - dimensions.width) / 2.0;
    let _ = macroquad::text::draw_text(text, x.max(0.0), y, font_size, color);
}

fn draw_announcement(announcement: &Announcement) {
    let width = macroquad::window::screen_width();
    let height = macroquad::window::screen_height();
    macroquad::shapes::draw_rectangle(0.0, 0.0, width, height, OVERLAY_COLOR);

    let centre = height / 2.0;
    draw_centered_text(&announcement.title, centre - 40.0, TITLE_FONT_SIZE, WHITE);
    draw_centered_text(&announcement.message, centre, MESSAGE_FONT_SIZE, WHITE);
    draw_centered_text(ACKNOWLEDGE_HINT, centre + 40.0, HINT_FONT_SIZE, Color::new(0.8, 0.8, 0.8, 1.0));
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut FrameBuffer) -> raycast_maze_rendering::FrameOutcome
            + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            grab_cursor,
        } = self;
        let config = window_conf(&presentation, swap_interval);
        log::info!(
            "opening {:?} window {}x{}",
            presentation.display_mode,
            config.window_width,
            config.window_height
        );

        macroquad::Window::from_config(config, async move {
            let screen_width = macroquad::window::screen_width();
            let screen_height = macroquad::window::screen_height();
            let (width, height) = frame_size(screen_width, screen_height);
            if screen_width < 1.0 || screen_height < 1.0 {
                log::warn!("screen size unavailable, rendering at {width}x{height}");
            }

            let mut frame = FrameBuffer::new(width, height);
            let mut surface = FrameSurface::new(&frame);
            let mut frame_stats = FrameStats::default();
            let mut previous_mouse = None;
            set_play_cursor(grab_cursor, true);

            'frames: loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                let (width, height) = frame_size(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                frame.resize(width, height);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let input = poll_frame_input(&mut previous_mouse);

                let render_start = Instant::now();
                let outcome = update_frame(frame_dt, input, &mut frame);
                surface.upload(&frame);
                let render_duration = render_start.elapsed();

                macroquad::window::clear_background(BLACK);
                surface.draw();

                let report = frame_stats.record(frame_dt, render_duration);
                if let (true, Some(report)) = (show_fps, report) {
                    log::info!(
                        "FPS {:.1} (10 s avg {:.1}) | update {:.2} ms | worst frame {:.2} ms",
                        report.fps,
                        report.trailing_fps,
                        report.mean_update.as_secs_f64() * 1_000.0,
                        report.worst_frame.as_secs_f64() * 1_000.0,
                    );
                }

                macroquad::window::next_frame().await;

                if let Some(announcement) = outcome.announcement {
                    log::debug!("announcing {:?}", announcement.title);
                    set_play_cursor(grab_cursor, false);
                    loop {
                        macroquad::window::clear_background(BLACK);
                        surface.draw();
                        draw_announcement(&announcement);
                        macroquad::window::next_frame().await;
                        if is_key_pressed(KeyCode::Escape) {
                            break 'frames;
                        }
                        if acknowledged() {
                            break;
                        }
                    }
                    set_play_cursor(grab_cursor, true);
                    previous_mouse = None;
                }
            }

            set_play_cursor(grab_cursor, false);
        });

        Ok(())
    }
}
