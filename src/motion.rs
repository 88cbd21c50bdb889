use std::f32::consts::{PI, TAU};

use crate::camera::Pose;
use crate::grid::{Tile, TileGrid};

/// Directional keys held during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Advances the viewer by one fixed simulation tick.
#[derive(Debug, Clone, Copy)]
pub struct MotionController {
    pub move_speed: f32, // tiles per tick
    pub turn_speed: f32, // radians per tick
}

impl Default for MotionController {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            turn_speed: 0.05,
        }
    }
}

impl MotionController {
    /// Moves along the pre-turn heading, then turns. The move is dropped if the
    /// destination tile is a wall or off the map; the turn always applies.
    /// Only the destination tile is tested, so a large `move_speed` can step
    /// through a one-tile wall.
    pub fn step(&self, pose: Pose, keys: KeyState, grid: &TileGrid) -> Pose {
        let (sin_h, cos_h) = pose.heading.sin_cos();

        let mut dir = 0.0;
        if keys.forward {
            dir += 1.0;
        }
        if keys.back {
            dir -= 1.0;
        }
        let new_x = pose.x + cos_h * self.move_speed * dir;
        let new_y = pose.y + sin_h * self.move_speed * dir;

        let mut heading = pose.heading;
        if keys.turn_left {
            heading -= self.turn_speed;
        }
        if keys.turn_right {
            heading += self.turn_speed;
        }

        let (x, y) = if grid.tile_at(new_x, new_y) == Some(Tile::Open) {
            (new_x, new_y)
        } else {
            (pose.x, pose.y)
        };

        Pose::new(x, y, wrap_angle(heading))
    }
}

/// Wraps into (-pi, pi] to stop float drift over long sessions.
fn wrap_angle(a: f32) -> f32 {
    let mut a = a % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}
