use rayon::prelude::*;

use crate::camera::{Pose, ViewConfig};
use crate::caster::cast;
use crate::grid::TileGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[inline]
    pub const fn grey(v: u8) -> Self {
        Self(v, v, v)
    }

    /// 0RGB in a u32, the layout softbuffer presents.
    #[inline]
    pub const fn pack(self) -> u32 {
        (self.2 as u32) | ((self.1 as u32) << 8) | ((self.0 as u32) << 16)
    }
}

/// One vertical wall slice. `top` may be negative and `top + height` may run
/// past the bottom of the screen; the rasterizer clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub column: usize,
    pub top: i32,
    pub height: i32,
    pub color: Rgb,
}

/// Casts one ray per column and turns each hit into a centred, shaded slice.
pub fn project(pose: &Pose, cfg: &ViewConfig, grid: &TileGrid) -> Vec<ColumnSpan> {
    (0..cfg.ray_count)
        .map(|column| project_column(pose, cfg, grid, column))
        .collect()
}

/// Same spans as [`project`], columns computed on the rayon pool.
pub fn project_par(pose: &Pose, cfg: &ViewConfig, grid: &TileGrid) -> Vec<ColumnSpan> {
    (0..cfg.ray_count)
        .into_par_iter()
        .map(|column| project_column(pose, cfg, grid, column))
        .collect()
}

fn project_column(pose: &Pose, cfg: &ViewConfig, grid: &TileGrid, column: usize) -> ColumnSpan {
    let angle = cfg.ray_angle(pose.heading, column);
    let distance = cast(pose, angle, grid, cfg.max_depth, cfg.step_size).distance;

    // Fisheye: project the radial distance onto the forward axis.
    let corrected = distance * (pose.heading - angle).cos();

    // `as` saturates, so a near-zero divisor clamps instead of overflowing.
    let height = (cfg.screen_height / (corrected + cfg.epsilon)) as i32;
    let top = (cfg.screen_height as i32).saturating_sub(height).div_euclid(2);

    // Shade on the raw ray length, not the corrected one.
    let shade = 255i32.saturating_sub((distance * cfg.shade_falloff) as i32);

    ColumnSpan {
        column,
        top,
        height,
        color: Rgb::grey(shade.clamp(0, 255) as u8),
    }
}
