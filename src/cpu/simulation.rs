use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use glam::Vec2;

use crate::cpu::field::DisplacementField;
use crate::cpu::pointer::PointerState;
use crate::gpu::ffi::{GPUTexel, pack_texels};
use crate::params::{SimulationParameters, ViewportState};

/// Everything the frame loop feeds into one step.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub cursor: Option<Vec2>, // normalized, only when the pointer moved
    pub viewport: ViewportState,
    pub params: SimulationParameters,
}

/// Packed result of a step, ready for upload.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    pub resolution: u32,
    pub reallocated: bool, // texture size changed
    pub viewport: ViewportState,
    pub texels: Vec<GPUTexel>,
}

#[derive(Resource)]
pub struct DisplacementSimulation {
    pub field: DisplacementField,
    pub pointer: PointerState,
    pub params: SimulationParameters,
    pub viewport: ViewportState,
    pointer_seen: bool,
    warned: bool,
}

impl DisplacementSimulation {
    pub fn new(params: SimulationParameters) -> Self {
        Self::from_field(DisplacementField::new(params.clamped().resolution), params)
    }

    pub fn from_field(field: DisplacementField, params: SimulationParameters) -> Self {
        Self {
            params: SimulationParameters { resolution: field.resolution(), ..params.clamped() },
            field,
            pointer: PointerState::default(),
            viewport: ViewportState::default(),
            pointer_seen: false,
            warned: false,
        }
    }

    fn apply_params(&mut self, params: SimulationParameters) -> bool {
        let params = match params.validate() {
            Ok(()) => {
                self.warned = false;
                params
            }
            Err(err) => {
                // log once until valid parameters come back
                if !self.warned {
                    warn!("invalid simulation parameters ({err}), clamping");
                    self.warned = true;
                }
                params.clamped()
            }
        };

        let reallocate = params.resolution != self.field.resolution();
        if reallocate {
            info!(
                "reallocating displacement field {0}x{0} -> {1}x{1}",
                self.field.resolution(),
                params.resolution
            );
            self.field.initialize(params.resolution, &mut rand::thread_rng());
        }
        self.params = params;
        reallocate
    }

    pub fn step(&mut self, input: FrameInput) -> RenderFrame {
        let reallocated = self.apply_params(input.params);

        if input.viewport.is_degenerate() {
            debug!("ignoring degenerate viewport {:?}", input.viewport);
        } else {
            self.viewport = input.viewport;
        }

        if let Some(cursor) = input.cursor.filter(|c| c.is_finite()) {
            if self.pointer_seen {
                self.pointer.move_to(cursor);
            } else {
                // first sighting, no velocity from the origin
                self.pointer = PointerState::new(cursor.clamp(Vec2::ZERO, Vec2::ONE));
                self.pointer_seen = true;
            }
        }

        self.field
            .update(&mut self.pointer, &self.params, self.viewport.aspect_correction());

        let frame = RenderFrame {
            resolution: self.field.resolution() as u32,
            reallocated,
            viewport: self.viewport,
            texels: pack_texels(&self.field),
        };
        self.field.mark_clean();
        frame
    }
}
