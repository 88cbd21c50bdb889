use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};

use thiserror::Error;

/// Viewer snapshot handed to the projector once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub heading: f32, // radians, 0 faces +x, increasing toward +y
}

impl Pose {
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(3.0, 3.0, FRAC_PI_4)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("ray count must be at least 1")]
    NoRays,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub fov: f32,            // radians, full horizontal width
    pub ray_count: usize,    // one ray per screen column
    pub max_depth: f32,      // tiles
    pub step_size: f32,      // ray march increment, tiles
    pub screen_height: f32,  // pixels
    pub epsilon: f32,        // keeps the height divisor away from zero
    pub shade_falloff: f32,  // grey levels lost per tile of distance
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_3,
            ray_count: 800,
            max_depth: 20.0,
            step_size: 0.1,
            screen_height: 600.0,
            epsilon: 1e-4,
            shade_falloff: 15.0,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ray_count == 0 {
            return Err(ConfigError::NoRays);
        }
        let checks = [
            ("fov", self.fov),
            ("max_depth", self.max_depth),
            ("step_size", self.step_size),
            ("screen_height", self.screen_height),
            ("epsilon", self.epsilon),
        ];
        for (name, value) in checks {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Angle of the ray for screen column `column`, left edge first.
    ///
    /// Equivalent to `heading - fov/2 + (column/ray_count) * fov`, written so
    /// that columns `c` and `ray_count - c` land on exactly mirrored angles.
    #[inline]
    pub fn ray_angle(&self, heading: f32, column: usize) -> f32 {
        let t = column as f32 / self.ray_count as f32;
        heading + (t - 0.5) * self.fov
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ViewConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_config() {
        let cfg = ViewConfig {
            ray_count: 0,
            ..ViewConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRays));

        let cfg = ViewConfig {
            step_size: 0.0,
            ..ViewConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                name: "step_size",
                ..
            })
        ));

        let cfg = ViewConfig {
            epsilon: f32::NAN,
            ..ViewConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn ray_angles_span_fov_from_left() {
        let cfg = ViewConfig {
            fov: 1.0,
            ray_count: 4,
            ..ViewConfig::default()
        };
        assert_eq!(cfg.ray_angle(0.0, 0), -0.5);
        assert_eq!(cfg.ray_angle(0.0, 2), 0.0);
        assert_eq!(cfg.ray_angle(0.0, 1), -cfg.ray_angle(0.0, 3));
        assert!((cfg.ray_angle(2.0, 3) - 2.25).abs() < 1e-6);
    }
}
