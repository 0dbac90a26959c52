use bevy::prelude::Resource;
use glam::Vec2;

use crate::error::ParamError;

pub const MIN_RESOLUTION: usize = 2;
pub const MAX_RESOLUTION: usize = 500;

/// Tuning inputs for the displacement field. Read once per frame.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    pub resolution: usize, // cells per side
    pub mouse_factor: f32, // influence radius as a fraction of the grid
    pub strength: f32,     // injection gain
    pub relaxation: f32,   // per-frame decay, 1 = none
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            resolution: 30,
            mouse_factor: 0.25,
            strength: 0.15,
            relaxation: 0.9,
        }
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), ParamError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamError::OutOfUnitRange { name, value })
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ParamError::Resolution(self.resolution));
        }
        check_unit("mouse_factor", self.mouse_factor)?;
        check_unit("strength", self.strength)?;
        check_unit("relaxation", self.relaxation)?;
        Ok(())
    }

    /// Bounded copy; non-finite values fall back to the defaults.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            resolution: self.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION),
            mouse_factor: clamp_unit(self.mouse_factor, defaults.mouse_factor),
            strength: clamp_unit(self.strength, defaults.strength),
            relaxation: clamp_unit(self.relaxation, defaults.relaxation),
        }
    }

    /// Influence radius in grid cells.
    #[inline]
    pub fn max_dist(&self) -> f32 {
        self.resolution as f32 * self.mouse_factor
    }
}

/// Render surface size in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0 }
    }
}

impl ViewportState {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    // width / height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    // height / width, divides the horizontal term of the grid distance
    pub fn aspect_correction(&self) -> f32 {
        self.height / self.width
    }
}
