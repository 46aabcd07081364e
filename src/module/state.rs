// Module state (speed + heading) and the shortest-rotation optimization

use serde::{Deserialize, Serialize};

use super::heading::Heading;

/// Largest steer rotation (degrees) a single update is allowed to request.
/// A raw delta of exactly this size is kept as-is; only larger deltas flip.
pub const MAX_STEER_DELTA_DEG: f64 = 90.0;

/// Slack on the quarter-turn limit that absorbs rounding in heading subtraction.
/// A delta within this of ±90° counts as a quarter turn and never flips.
pub const STEER_DELTA_TOLERANCE_DEG: f64 = 1e-9;

const HALF_TURN_DEG: f64 = 180.0;

/// Wheel speed and heading, either desired or measured
///
/// A negative speed at heading `h` moves the wheel the same way as the
/// positive speed at `h + 180°`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleState {
    /// Linear wheel speed in m/s (signed)
    pub speed: f64,
    pub heading: Heading,
}

impl ModuleState {
    pub fn new(speed: f64, heading: Heading) -> Self {
        Self { speed, heading }
    }

    /// The same physical motion expressed with reversed speed and opposite heading
    pub fn flipped(&self) -> Self {
        Self {
            speed: -self.speed,
            heading: self.heading.opposite(),
        }
    }

    /// Pick the equivalent target that needs the least steer travel from `current`
    ///
    /// If reaching `self.heading` would take more than a quarter turn, the
    /// target is replaced by its flipped twin so the steer delta stays within
    /// [-90°, 90°] (up to [`STEER_DELTA_TOLERANCE_DEG`]). Re-optimizing an
    /// optimized state returns it unchanged.
    pub fn optimize(&self, current: Heading) -> Self {
        let delta = self.heading - current;
        if delta.abs() <= MAX_STEER_DELTA_DEG + STEER_DELTA_TOLERANCE_DEG {
            return *self;
        }

        // Rotate the short way round; the flipped heading is built from the
        // reduced delta so a second pass sees the same delta
        let reduced = delta - HALF_TURN_DEG.copysign(delta);
        Self {
            speed: -self.speed,
            heading: current.rotate_by(reduced),
        }
    }

    /// Planar wheel velocity vector (x, y) in m/s
    pub fn velocity(&self) -> (f64, f64) {
        let (sin, cos) = self.heading.radians().sin_cos();
        (self.speed * cos, self.speed * sin)
    }
}
