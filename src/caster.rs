use crate::camera::Pose;
use crate::grid::{Tile, TileGrid};

/// Result of marching one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Radial distance along the ray, not fisheye corrected.
    /// Equals `max_depth` when nothing was hit.
    pub distance: f32,
}

/// Fixed-step ray march from `pose` along `angle`.
///
/// Samples `k * step_size` for `k = 1, 2, ...` while it stays below `max_depth`
/// (`max_depth` need not be a whole number of steps), and returns
/// the first sample whose enclosing tile is a wall. Samples outside the grid
/// are skipped, not treated as a stop.
pub fn cast(pose: &Pose, angle: f32, grid: &TileGrid, max_depth: f32, step_size: f32) -> WallHit {
    let (sin_a, cos_a) = angle.sin_cos();
    let steps = (max_depth / step_size).ceil() as usize;

    for k in 1..=steps {
        let distance = k as f32 * step_size;
        if distance >= max_depth {
            break;
        }
        let col = (pose.x + cos_a * distance).floor() as i64;
        let row = (pose.y + sin_a * distance).floor() as i64;

        if grid.tile(col, row) == Some(Tile::Wall) {
            return WallHit { distance };
        }
    }

    WallHit {
        distance: max_depth,
    }
}
