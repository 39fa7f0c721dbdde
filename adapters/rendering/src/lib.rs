#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for raycast maze adapters.
//!
//! Colours travel as packed `0xAARRGGBB` words. The renderer writes them into
//! a [`FrameBuffer`]; platform backends own the window, the clock and input,
//! and present the buffer once per frame.

use anyhow::Result as AnyResult;
use glam::DVec2;
use raycast_maze_core::{DisplayMode, TEXTURE_SIZE, WINDOWED_SIZE};
use std::{ops::Range, time::Duration};
use thiserror::Error;

/// Packs opaque 8-bit RGB channels into a `0xAARRGGBB` word.
#[must_use]
pub const fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    pack_rgba(red, green, blue, 0xFF)
}

/// Packs 8-bit RGBA channels into a `0xAARRGGBB` word.
#[must_use]
pub const fn pack_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> u32 {
    (alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32
}

/// Splits a packed colour into `[red, green, blue, alpha]` bytes.
#[must_use]
pub const fn unpack(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

/// Halves every colour channel while keeping alpha.
#[must_use]
pub const fn darken(color: u32) -> u32 {
    (color & 0xFF00_0000) | ((color >> 1) & 0x007F_7F7F)
}

/// Writable pixel buffer addressed by row and column.
///
/// Row `r` starts at `r * pitch`; `pitch` is at least `width`, and the
/// padding after each row is never presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Creates a tightly packed buffer filled with opaque black.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_pitch(width, height, width)
    }

    /// Creates a buffer whose rows are `pitch` pixels apart.
    ///
    /// A pitch narrower than `width` is widened to `width`.
    #[must_use]
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Self {
        let pitch = pitch.max(width);
        Self {
            width,
            height,
            pitch,
            pixels: vec![pack_rgb(0, 0, 0); pitch * height],
        }
    }

    /// Width of the visible area in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the visible area in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Distance in pixels between the starts of consecutive rows.
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.pitch
    }

    /// Resizes the buffer to a tightly packed layout, keeping the allocation when possible.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pitch = width;
        self.pixels.clear();
        self.pixels.resize(width * height, pack_rgb(0, 0, 0));
    }

    /// Reads the pixel at the provided row and column.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<u32> {
        self.index(row, column)
            .and_then(|index| self.pixels.get(index).copied())
    }

    /// Writes the pixel at the provided row and column; out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, column: usize, color: u32) {
        if let Some(index) = self.index(row, column) {
            if let Some(slot) = self.pixels.get_mut(index) {
                *slot = color;
            }
        }
    }

    /// Fills whole rows with a single colour; the range is clamped to the buffer height.
    pub fn fill_rows(&mut self, rows: Range<usize>, color: u32) {
        let end = rows.end.min(self.height);
        for row in rows.start.min(end)..end {
            let start = row * self.pitch;
            self.pixels[start..start + self.width].fill(color);
        }
    }

    /// Returns the visible pixels of a row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[u32]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.pitch;
        self.pixels.get(start..start + self.width)
    }

    /// Converts the visible area into tightly packed RGBA bytes for upload.
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.width * self.height * 4);
        for row in 0..self.height {
            if let Some(pixels) = self.row(row) {
                for color in pixels {
                    out.extend_from_slice(&unpack(*color));
                }
            }
        }
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.height && column < self.width).then(|| row * self.pitch + column)
    }
}

/// Square wall texture of [`TEXTURE_SIZE`] texels per edge, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallTexture {
    texels: Vec<u32>,
}

impl WallTexture {
    /// Builds a texture from tightly packed RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::TextureDimensions`] unless the image is
    /// exactly [`TEXTURE_SIZE`] square, and [`RenderingError::TextureData`]
    /// when the byte count does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RenderingError> {
        let expected_edge = TEXTURE_SIZE as u32;
        if width != expected_edge || height != expected_edge {
            return Err(RenderingError::TextureDimensions { width, height });
        }

        let expected = TEXTURE_SIZE * TEXTURE_SIZE * 4;
        if bytes.len() != expected {
            return Err(RenderingError::TextureData {
                expected,
                actual: bytes.len(),
            });
        }

        let texels = bytes
            .chunks_exact(4)
            .map(|texel| pack_rgba(texel[0], texel[1], texel[2], texel[3]))
            .collect();
        Ok(Self { texels })
    }

    /// Procedural brick pattern used when no texture asset is supplied.
    #[must_use]
    pub fn brick() -> Self {
        const BRICK_WIDTH: usize = 32;
        const BRICK_HEIGHT: usize = 16;
        const MORTAR: usize = 2;

        let mut texels = Vec::with_capacity(TEXTURE_SIZE * TEXTURE_SIZE);
        for v in 0..TEXTURE_SIZE {
            let course = v / BRICK_HEIGHT;
            let shift = if course % 2 == 0 { 0 } else { BRICK_WIDTH / 2 };
            for u in 0..TEXTURE_SIZE {
                let shifted = (u + shift) % TEXTURE_SIZE;
                let mortar = v % BRICK_HEIGHT < MORTAR || shifted % BRICK_WIDTH < MORTAR;
                let color = if mortar {
                    pack_rgb(118, 112, 104)
                } else {
                    let brick = shifted / BRICK_WIDTH + course * 3;
                    let shade = ((brick * 37) % 5) as u8 * 9;
                    pack_rgb(140 + shade, 58 + shade / 2, 42)
                };
                texels.push(color);
            }
        }
        Self { texels }
    }

    /// Samples the texel at `(u, v)`; coordinates wrap around the edge.
    #[must_use]
    pub fn sample(&self, u: usize, v: usize) -> u32 {
        let mask = TEXTURE_SIZE - 1;
        self.texels[(v & mask) * TEXTURE_SIZE + (u & mask)]
    }
}

/// Input snapshot gathered by adapters before updating the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// `W` is held.
    pub forward: bool,
    /// `S` is held.
    pub backward: bool,
    /// `A` is held.
    pub strafe_left: bool,
    /// `D` is held.
    pub strafe_right: bool,
    /// Either shift key is held.
    pub run: bool,
    /// The left arrow key is held.
    pub turn_left: bool,
    /// The right arrow key is held.
    pub turn_right: bool,
    /// Relative mouse motion since the previous frame, in pixels.
    pub mouse_delta: DVec2,
}

/// Blocking notification shown to the player before play resumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    /// Short heading of the notification.
    pub title: String,
    /// Body text of the notification.
    pub message: String,
}

impl Announcement {
    /// Creates a new announcement.
    #[must_use]
    pub fn new<T, M>(title: T, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Result of updating a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Notification the backend must show, blocking until acknowledged.
    pub announcement: Option<Announcement>,
}

impl FrameOutcome {
    /// Outcome that asks the backend to announce something after presenting.
    #[must_use]
    pub fn announce(announcement: Announcement) -> Self {
        Self {
            announcement: Some(announcement),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Whether to open a window or take over the screen.
    pub display_mode: DisplayMode,
    /// Window size used in windowed mode.
    pub window_size: (u32, u32),
}

impl Presentation {
    /// Constructs a new presentation descriptor using the reference window size.
    #[must_use]
    pub fn new<T>(window_title: T, display_mode: DisplayMode) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            display_mode,
            window_size: WINDOWED_SIZE,
        }
    }

    /// Overrides the windowed-mode size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }
}

/// Rendering backend capable of presenting raycast maze frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until the player quits.
    ///
    /// Every frame the backend gathers input, calls `update_frame` with the
    /// elapsed time and a frame buffer sized to the drawable area, presents
    /// the buffer and, when the outcome carries an [`Announcement`], shows it
    /// and waits for acknowledgement before the next frame.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut FrameBuffer) -> FrameOutcome + 'static;
}

/// Errors that can occur when constructing rendering resources.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Wall textures must be exactly the reference size.
    #[error("wall texture must be {expected}x{expected} texels (received {width}x{height})", expected = TEXTURE_SIZE)]
    TextureDimensions {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },
    /// Pixel data does not match the declared dimensions.
    #[error("wall texture data holds {actual} bytes, expected {expected}")]
    TextureData {
        /// Number of bytes implied by the dimensions.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_round_trips_channels() {
        let color = pack_rgba(12, 34, 56, 78);
        assert_eq!(color, 0x4E0C_2238);
        assert_eq!(unpack(color), [12, 34, 56, 78]);
    }

    #[test]
    fn darken_halves_rgb_and_keeps_alpha() {
        assert_eq!(darken(pack_rgba(255, 101, 2, 0x80)), pack_rgba(127, 50, 1, 0x80));
        assert_eq!(darken(pack_rgb(1, 1, 1)), pack_rgb(0, 0, 0));
    }

    #[test]
    fn pitched_rows_do_not_overlap() {
        let mut frame = FrameBuffer::with_pitch(3, 2, 5);
        frame.fill_rows(0..1, 7);
        frame.set(1, 2, 9);
        assert_eq!(frame.row(0), Some(&[7, 7, 7][..]));
        assert_eq!(frame.get(1, 0), Some(pack_rgb(0, 0, 0)));
        assert_eq!(frame.get(1, 2), Some(9));
        assert_eq!(frame.get(2, 0), None);
        assert_eq!(frame.get(0, 3), None);
    }

    #[test]
    fn fill_rows_clamps_to_height() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.fill_rows(1..10, 5);
        frame.fill_rows(8..9, 6);
        assert_eq!(frame.row(0), Some(&[pack_rgb(0, 0, 0); 2][..]));
        assert_eq!(frame.row(1), Some(&[5, 5][..]));
    }

    #[test]
    fn rgba_upload_skips_pitch_padding() {
        let mut frame = FrameBuffer::with_pitch(1, 2, 4);
        frame.set(0, 0, pack_rgb(1, 2, 3));
        frame.set(1, 0, pack_rgba(4, 5, 6, 7));
        let mut bytes = Vec::new();
        frame.write_rgba8(&mut bytes);
        assert_eq!(bytes, vec![1, 2, 3, 255, 4, 5, 6, 7]);
    }

    #[test]
    fn resize_discards_old_contents() {
        let mut frame = FrameBuffer::with_pitch(2, 2, 4);
        frame.fill_rows(0..2, 3);
        frame.resize(4, 1);
        assert_eq!(frame.pitch(), 4);
        assert_eq!(frame.row(0), Some(&[pack_rgb(0, 0, 0); 4][..]));
    }

    #[test]
    fn texture_requires_reference_dimensions() {
        let error = WallTexture::from_rgba8(32, 64, &[0; 32 * 64 * 4])
            .expect_err("undersized texture must be rejected");
        assert_eq!(
            error,
            RenderingError::TextureDimensions {
                width: 32,
                height: 64
            }
        );

        let error = WallTexture::from_rgba8(64, 64, &[0; 10])
            .expect_err("truncated texture must be rejected");
        assert!(matches!(error, RenderingError::TextureData { actual: 10, .. }));
    }

    #[test]
    fn texture_samples_in_row_major_order() {
        let mut bytes = vec![0; TEXTURE_SIZE * TEXTURE_SIZE * 4];
        let offset = (2 * TEXTURE_SIZE + 5) * 4;
        bytes[offset..offset + 4].copy_from_slice(&[10, 20, 30, 255]);
        let texture = WallTexture::from_rgba8(64, 64, &bytes).expect("valid texture");
        assert_eq!(texture.sample(5, 2), pack_rgb(10, 20, 30));
        assert_eq!(texture.sample(5 + TEXTURE_SIZE, 2), pack_rgb(10, 20, 30));
    }

    #[test]
    fn brick_texture_is_opaque_and_patterned() {
        let texture = WallTexture::brick();
        assert_eq!(texture.texels.len(), TEXTURE_SIZE * TEXTURE_SIZE);
        assert!(texture.texels.iter().all(|texel| texel >> 24 == 0xFF));
        assert_ne!(texture.sample(0, 0), texture.sample(8, 8));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let message = RenderingError::TextureDimensions {
            width: 10,
            height: 12,
        }
        .to_string();
        assert_eq!(
            message,
            "wall texture must be 64x64 texels (received 10x12)"
        );
    }
}
