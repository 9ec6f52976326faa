//! Per-tick integration and the slow-motion window

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::FRICTION_REFERENCE_HZ;
use crate::settings::{SceneConfig, SlowMotionConfig};

/// Advance one body: gravity, position, then air friction.
///
/// Friction decays as `friction^(dt * time_scale * 60)` so the per-frame
/// feel tuned at 60 Hz holds at other frame rates.
pub fn integrate_body(body: &mut Body, config: &SceneConfig, dt: f32, time_scale: f32) {
    let step = dt * time_scale;

    if config.gravity_enabled {
        body.vel.y += config.gravity * step;
    }
    body.pos += body.vel * step;
    body.vel *= config.friction.powf(step * FRICTION_REFERENCE_HZ);

    if config.trails {
        body.record_trail(config.trail_length);
    } else {
        body.clear_trail();
    }
}

/// Bounded window during which simulated time runs slower
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlowMotion {
    remaining_ms: f32,
}

impl SlowMotion {
    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    /// Current time multiplier
    pub fn time_scale(&self, config: &SlowMotionConfig) -> f32 {
        if self.is_active() { config.time_scale } else { 1.0 }
    }

    /// Consume real elapsed time. Returns true on the tick the window closes.
    pub fn advance(&mut self, real_ms: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining_ms -= real_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            return true;
        }
        false
    }

    /// Open a window if `speed` crosses the threshold and none is running
    pub fn try_trigger(&mut self, speed: f32, config: &SlowMotionConfig) -> bool {
        if !config.enabled || self.is_active() || speed <= config.speed_threshold {
            return false;
        }
        self.remaining_ms = config.duration_ms;
        self.is_active()
    }
}
