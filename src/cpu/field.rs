// velocity-reactive displacement grid (CPU side, uploaded as a texture)
use glam::{Vec2, Vec4};
use rand::Rng;

use crate::cpu::pointer::PointerState;
use crate::params::SimulationParameters;

/// Upper bound of the inverse-distance falloff.
pub const MAX_POWER: f32 = 10.0;
/// Initial x/y values are drawn from [-INIT_SPREAD, INIT_SPREAD].
pub const INIT_SPREAD: f32 = 125.0;
/// Converts the per-frame pointer velocity into displacement units.
pub const INJECTION_SCALE: f32 = 100.0;

// inverse distance falloff, clamped so the pointer's own cell stays finite
#[inline]
pub fn falloff_power(dist_sq: f32, max_dist: f32) -> f32 {
    (max_dist / dist_sq.sqrt()).clamp(0.0, MAX_POWER)
}

// squared grid distance, horizontal term divided by height/width
#[inline]
pub fn corrected_dist_sq(grid_pointer: Vec2, i: usize, j: usize, aspect_correction: f32) -> f32 {
    let dx = grid_pointer.x - i as f32;
    let dy = grid_pointer.y - j as f32;
    dx * dx / aspect_correction + dy * dy
}

/// N x N cells, row-major with `index = i + N * j`. `i` is the column and
/// `j` the row counted from the bottom. Only x/y are simulated; z mirrors the
/// initial x and w is 1 so the buffer fits an RGBA texture.
#[derive(Clone, Debug)]
pub struct DisplacementField {
    resolution: usize,
    cells: Vec<Vec4>,
    dirty: bool,
}

impl DisplacementField {
    pub fn new(resolution: usize) -> Self {
        Self::with_rng(resolution, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(resolution: usize, rng: &mut R) -> Self {
        let mut field = Self { resolution: 0, cells: Vec::new(), dirty: false };
        field.initialize(resolution, rng);
        field
    }

    /// Calm field, no initial noise.
    pub fn zeroed(resolution: usize) -> Self {
        Self {
            resolution,
            cells: vec![Vec4::new(0.0, 0.0, 0.0, 1.0); resolution * resolution],
            dirty: true,
        }
    }

    // (re)allocating the grid with random x/y
    pub fn initialize<R: Rng>(&mut self, resolution: usize, rng: &mut R) {
        self.cells.clear();
        self.cells.reserve(resolution * resolution);
        for _ in 0..resolution * resolution {
            let x = rng.gen_range(-INIT_SPREAD..=INIT_SPREAD);
            let y = rng.gen_range(-INIT_SPREAD..=INIT_SPREAD);
            self.cells.push(Vec4::new(x, y, x, 1.0));
        }
        self.resolution = resolution;
        self.dirty = true;
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn cells(&self) -> &[Vec4] {
        &self.cells
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i + self.resolution * j
    }

    pub fn cell(&self, i: usize, j: usize) -> Vec4 {
        self.cells[self.index(i, j)]
    }

    pub fn set_cell(&mut self, i: usize, j: usize, value: Vec4) {
        let idx = self.index(i, j);
        self.cells[idx] = value;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Pointer position in grid units; y is flipped so rows count upwards.
    pub fn grid_pointer(&self, pointer: Vec2) -> Vec2 {
        let n = self.resolution as f32;
        Vec2::new(n * pointer.x, n * (1.0 - pointer.y))
    }

    // decay x/y toward zero, z/w stay put
    pub fn relax(&mut self, relaxation: f32) {
        for c in &mut self.cells {
            c.x *= relaxation;
            c.y *= relaxation;
        }
    }

    pub fn inject(&mut self, pointer: &PointerState, params: &SimulationParameters, aspect_correction: f32) {
        let n = self.resolution;
        let grid_pointer = self.grid_pointer(pointer.pos);
        let max_dist = n as f32 * params.mouse_factor;
        let max_dist_sq = max_dist * max_dist;
        let gain = params.strength * INJECTION_SCALE;

        for i in 0..n {
            for j in 0..n {
                let dist = corrected_dist_sq(grid_pointer, i, j, aspect_correction);
                if dist < max_dist_sq {
                    let power = falloff_power(dist, max_dist);
                    let c = &mut self.cells[i + n * j];
                    c.x += gain * pointer.vel.x * power;
                    // pointer y grows downward, field y upward
                    c.y -= gain * pointer.vel.y * power;
                }
            }
        }
    }

    /// One frame: relax, inject around the pointer, then decay the pointer velocity.
    pub fn update(&mut self, pointer: &mut PointerState, params: &SimulationParameters, aspect_correction: f32) {
        self.relax(params.relaxation);
        self.inject(pointer, params, aspect_correction);
        pointer.decay_velocity();
        self.dirty = true;
    }

    /// Nearest-cell lookup at field-space `uv` (y-up), clamped to the edge.
    pub fn sample(&self, uv: Vec2) -> Vec2 {
        let n = self.resolution;
        if n == 0 {
            return Vec2::ZERO;
        }
        let to_cell = |t: f32| -> usize {
            let c = (t * n as f32).floor();
            if c.is_nan() { 0 } else { (c.max(0.0) as usize).min(n - 1) }
        };
        let c = self.cell(to_cell(uv.x), to_cell(uv.y));
        Vec2::new(c.x, c.y)
    }
}
