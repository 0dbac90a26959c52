use glam::Vec2;

/// Applied to the pointer velocity after every field update.
pub const VELOCITY_DECAY: f32 = 0.9;

/// Normalized pointer: x from the left edge, y from the top edge, both in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub pos: Vec2,
    pub prev: Vec2,
    pub vel: Vec2, // per frame, not per second
}

impl PointerState {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, prev: pos, vel: Vec2::ZERO }
    }

    /// New motion replaces the velocity with the frame delta.
    /// Non-finite positions are dropped, finite ones clamped to the unit square.
    pub fn move_to(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        let pos = pos.clamp(Vec2::ZERO, Vec2::ONE);
        self.prev = self.pos;
        self.pos = pos;
        self.vel = self.pos - self.prev;
    }

    pub fn decay_velocity(&mut self) {
        self.vel *= VELOCITY_DECAY;
    }
}

/// Window cursor (logical px, origin top-left) to normalized pointer space.
pub fn normalize_cursor(cursor: Vec2, window_size: Vec2) -> Option<Vec2> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    let n = cursor / window_size;
    n.is_finite().then(|| n.clamp(Vec2::ZERO, Vec2::ONE))
}
