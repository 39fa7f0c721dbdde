#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Circle-versus-grid collision resolution.
//!
//! The player is a solid circle; every [`CellKind::Wall`] cell is a unit
//! square, and so is every cell beyond the grid edge. Walls overlapping the
//! circle are resolved one at a time in
//! row-major order, each pushing the centre out along the separating vector.
//! A tight corner can therefore keep a sliver of penetration into the second
//! wall until the next call.

use glam::DVec2;
use raycast_maze_core::{CellKind, GridMap};

/// Pushes `position` out of every wall cell its hitbox overlaps.
///
/// A centre lying exactly on a wall's closest point has no separating
/// direction and is pushed toward negative Y.
#[must_use]
pub fn resolve(position: DVec2, hitbox_radius: f64, grid: &GridMap) -> DVec2 {
    let Some((min_column, max_column)) = scan_range(position.x, hitbox_radius) else {
        return position;
    };
    let Some((min_row, max_row)) = scan_range(position.y, hitbox_radius) else {
        return position;
    };

    let mut resolved = position;
    let radius_squared = hitbox_radius * hitbox_radius;

    for row in min_row..=max_row {
        for column in min_column..=max_column {
            if grid.get(column, row) != CellKind::Wall {
                continue;
            }

            let cell_min = DVec2::new(column as f64, row as f64);
            let closest = resolved.clamp(cell_min, cell_min + DVec2::ONE);
            let offset = resolved - closest;
            let distance_squared = offset.length_squared();
            if distance_squared >= radius_squared {
                continue;
            }

            let distance = distance_squared.sqrt();
            let penetration = hitbox_radius - distance;
            if distance == 0.0 {
                resolved.y -= penetration;
            } else {
                resolved += offset / distance * penetration;
            }
        }
    }

    resolved
}

/// Applies a displacement and resolves the resulting overlap.
#[must_use]
pub fn slide(position: DVec2, displacement: DVec2, hitbox_radius: f64, grid: &GridMap) -> DVec2 {
    resolve(position + displacement, hitbox_radius, grid)
}

/// Cells whose span may overlap `center ± radius` along one axis.
///
/// The range is not clipped to the grid: off-grid cells read as walls and
/// must block like any other.
fn scan_range(center: f64, radius: f64) -> Option<(i64, i64)> {
    if !center.is_finite() || !radius.is_finite() {
        return None;
    }
    let low = (center - radius).floor() as i64;
    let high = (center + radius).ceil() as i64;
    (low <= high).then_some((low, high))
}
