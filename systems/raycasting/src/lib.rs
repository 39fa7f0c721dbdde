#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Column-by-column DDA raycaster producing the first-person view.
//!
//! Every screen column casts one ray from the player through the camera
//! plane, marches it across grid lines until it enters a cell that stops
//! rays, and draws a textured vertical strip whose height is inversely
//! proportional to the perpendicular distance of the hit.

use glam::DVec2;
use raycast_maze_core::{CellKind, GridMap, Pose, TEXTURE_SIZE};
use raycast_maze_rendering::{darken, pack_rgb, FrameBuffer, WallTexture};

/// Colour of the upper half of the screen.
pub const CEILING_COLOR: u32 = pack_rgb(70, 70, 70);
/// Colour of the lower half of the screen.
pub const FLOOR_COLOR: u32 = pack_rgb(40, 40, 40);
/// Edge of one checkerboard square on finish walls, in texels.
pub const FINISH_BLOCK: usize = 8;

const FINISH_LIGHT: u32 = pack_rgb(255, 255, 255);
const FINISH_DARK: u32 = pack_rgb(0, 0, 0);
// Stands in for an infinite step distance along an axis the ray never crosses.
const UNREACHABLE_STEP: f64 = 1e30;
const MIN_PERP_DISTANCE: f64 = 1e-6;

/// Grid axis crossed by the final step of a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitAxis {
    /// The ray crossed a vertical grid line (an X step).
    X,
    /// The ray crossed a horizontal grid line (a Y step); these faces are shaded darker.
    Y,
}

/// Describes where a ray stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Signed column and row of the cell that stopped the ray.
    pub cell: (i64, i64),
    /// Axis crossed by the final step.
    pub axis: HitAxis,
    /// Step sign per axis, each either `-1` or `1`.
    pub step: (i64, i64),
    /// Distance from the camera plane to the hit, measured along the facing axis.
    pub perp_distance: f64,
    /// Kind of the cell that stopped the ray; off-grid cells report [`CellKind::Wall`].
    pub kind: CellKind,
}

impl RayHit {
    /// Fractional position of the hit along the struck wall face, in `[0, 1)`.
    #[must_use]
    pub fn wall_offset(&self, position: DVec2, ray_direction: DVec2) -> f64 {
        let along = match self.axis {
            HitAxis::X => position.y + self.perp_distance * ray_direction.y,
            HitAxis::Y => position.x + self.perp_distance * ray_direction.x,
        };
        along - along.floor()
    }
}

/// Marches a ray from `position` along `ray_direction` until it enters a cell that stops rays.
///
/// Zero direction components never divide: the axis is given an
/// unreachable step distance so the ray never crosses it. Leaving the grid
/// always stops the ray because off-grid cells read as walls.
#[must_use]
pub fn cast_ray(position: DVec2, ray_direction: DVec2, grid: &GridMap) -> RayHit {
    let mut column = position.x.floor() as i64;
    let mut row = position.y.floor() as i64;

    let delta_x = step_distance(ray_direction.x);
    let delta_y = step_distance(ray_direction.y);
    let step_x: i64 = if ray_direction.x < 0.0 { -1 } else { 1 };
    let step_y: i64 = if ray_direction.y < 0.0 { -1 } else { 1 };

    let mut side_x = if ray_direction.x < 0.0 {
        (position.x - column as f64) * delta_x
    } else {
        (column as f64 + 1.0 - position.x) * delta_x
    };
    let mut side_y = if ray_direction.y < 0.0 {
        (position.y - row as f64) * delta_y
    } else {
        (row as f64 + 1.0 - position.y) * delta_y
    };

    let (axis, kind) = loop {
        let axis = if side_x < side_y {
            side_x += delta_x;
            column += step_x;
            HitAxis::X
        } else {
            side_y += delta_y;
            row += step_y;
            HitAxis::Y
        };
        let kind = grid.get(column, row);
        if kind.stops_rays() {
            break (axis, kind);
        }
    };

    let perp_distance = match axis {
        HitAxis::X => {
            (column as f64 - position.x + (1 - step_x) as f64 / 2.0) / ray_direction.x
        }
        HitAxis::Y => (row as f64 - position.y + (1 - step_y) as f64 / 2.0) / ray_direction.y,
    };

    RayHit {
        cell: (column, row),
        axis,
        step: (step_x, step_y),
        perp_distance,
        kind,
    }
}

/// Converts a wall offset into a texture column.
///
/// The column is mirrored for X hits travelling toward positive X and Y hits
/// travelling toward negative Y so the texture reads the same way from
/// every side.
#[must_use]
pub fn texture_column(wall_offset: f64, axis: HitAxis, ray_direction: DVec2) -> usize {
    let scaled = (wall_offset.clamp(0.0, 1.0) * TEXTURE_SIZE as f64) as usize;
    let column = scaled.min(TEXTURE_SIZE - 1);
    let mirrored = match axis {
        HitAxis::X => ray_direction.x > 0.0,
        HitAxis::Y => ray_direction.y < 0.0,
    };
    if mirrored {
        TEXTURE_SIZE - column - 1
    } else {
        column
    }
}

/// Colour of a finish wall at the provided texture coordinate.
#[must_use]
pub const fn finish_texel(u: usize, v: usize) -> u32 {
    if (u / FINISH_BLOCK + v / FINISH_BLOCK) % 2 == 0 {
        FINISH_LIGHT
    } else {
        FINISH_DARK
    }
}

/// Renders one full frame of the first-person view into `frame`.
///
/// Every visible pixel is written: the ceiling and floor halves first, then
/// one wall strip per column.
pub fn render_frame(pose: &Pose, grid: &GridMap, texture: &WallTexture, frame: &mut FrameBuffer) {
    let width = frame.width();
    let height = frame.height();
    let midline = height / 2;
    frame.fill_rows(0..midline, CEILING_COLOR);
    frame.fill_rows(midline..height, FLOOR_COLOR);

    if width == 0 || height == 0 {
        return;
    }

    for x in 0..width {
        let camera_x = 2.0 * x as f64 / width as f64 - 1.0;
        let ray_direction = pose.direction + pose.plane * camera_x;
        let hit = cast_ray(pose.position, ray_direction, grid);
        draw_strip(frame, x, pose.position, ray_direction, &hit, texture);
    }
}

fn draw_strip(
    frame: &mut FrameBuffer,
    x: usize,
    position: DVec2,
    ray_direction: DVec2,
    hit: &RayHit,
    texture: &WallTexture,
) {
    let height = frame.height();
    let perp_distance = if hit.perp_distance.is_finite() {
        hit.perp_distance.max(MIN_PERP_DISTANCE)
    } else {
        return;
    };

    let line_height = (height as f64 / perp_distance).min(i64::MAX as f64) as i64;
    if line_height <= 0 {
        return;
    }
    let screen = height as i64;
    let draw_start = (screen / 2 - line_height / 2).max(0);
    let draw_end = (screen / 2 + line_height / 2).min(screen);

    let u = texture_column(hit.wall_offset(position, ray_direction), hit.axis, ray_direction);
    let texel_step = TEXTURE_SIZE as f64 / line_height as f64;
    let first = (draw_start - screen / 2 + line_height / 2) as f64 * texel_step;

    for (index, y) in (draw_start..draw_end).enumerate() {
        let v = (first + index as f64 * texel_step) as usize & (TEXTURE_SIZE - 1);
        let color = match hit.kind {
            CellKind::Finish => finish_texel(u, v),
            _ => {
                let texel = texture.sample(u, v);
                match hit.axis {
                    HitAxis::X => texel,
                    HitAxis::Y => darken(texel),
                }
            }
        };
        frame.set(y as usize, x, color);
    }
}

fn step_distance(component: f64) -> f64 {
    if component == 0.0 {
        UNREACHABLE_STEP
    } else {
        (1.0 / component).abs()
    }
}
