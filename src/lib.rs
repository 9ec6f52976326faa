//! Flick Sandbox - gesture-driven circle physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation kernel (bodies, collisions, springs, gestures)
//! - `settings`: Data-driven scene configuration and gesture tuning
//! - `renderer`: Read-only snapshot of scene state for an external drawing layer

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{GestureTuning, SceneConfig, SlowMotionConfig};
pub use sim::{Scene, SimError, SimEvent, SimResult, Variant};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Largest wall-clock step accepted by a tick (guards against tab stalls)
    pub const MAX_DT: f32 = 0.05;
    /// Reference frame rate the per-tick air friction is tuned against
    pub const FRICTION_REFERENCE_HZ: f32 = 60.0;
    /// Contact distance floor used when two centers coincide
    pub const MIN_CONTACT_DISTANCE: f32 = 1.0;

    /// Arena defaults (pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = 900.0;
    /// Per-frame velocity retention at the reference rate
    pub const FRICTION: f32 = 0.999;
    /// Scene-wide multiplier on every bounce
    pub const GLOBAL_RESTITUTION: f32 = 0.85;

    /// Ball defaults
    pub const BALL_RESTITUTION: f32 = 0.8;
    pub const MASS_PER_RADIUS: f32 = 0.1;
    pub const TRAIL_LENGTH: usize = 20;

    /// Velocity retained after bouncing off a fixed obstacle
    pub const OBSTACLE_DAMPING: f32 = 0.8;

    /// Slow-motion window
    pub const SLOW_MOTION_SPEED: f32 = 1200.0;
    pub const SLOW_MOTION_DURATION_MS: f32 = 1000.0;
    pub const SLOW_MOTION_SCALE: f32 = 0.25;

    /// Gesture defaults
    pub const GRAB_MARGIN: f32 = 8.0;
    pub const SLINGSHOT_THRESHOLD: f32 = 12.0;
    pub const SLINGSHOT_STRENGTH: f32 = 1.2;
    pub const DRAG_STIFFNESS: f32 = 8.0;
    /// Drag impulses are integrated over a fixed step, not the frame delta
    pub const DRAG_FORCE_STEP: f32 = 1.0 / 60.0;
    pub const HISTORY_MS: f64 = 120.0;
    pub const MIN_TRACE_SECS: f32 = 0.001;
    pub const SWIPE_CAPTURE_RADIUS: f32 = 140.0;
    pub const CLICK_GAIN: f32 = 2.0;
    pub const CLICK_MAX_IMPULSE: f32 = 600.0;
    pub const TAP_SLOP: f32 = 6.0;
}

/// Unit normal along `delta` plus the contact distance.
///
/// The distance is floored at [`consts::MIN_CONTACT_DISTANCE`] so coincident
/// centers never produce NaN; in that case the normal falls back to +X.
#[inline]
pub fn safe_normal(delta: Vec2) -> (Vec2, f32) {
    let dist = delta.length();
    let normal = delta.try_normalize().unwrap_or(Vec2::X);
    (normal, dist.max(consts::MIN_CONTACT_DISTANCE))
}

/// Closest point to `p` on an axis-aligned rectangle
#[inline]
pub fn closest_point_on_rect(center: Vec2, half_extents: Vec2, p: Vec2) -> Vec2 {
    p.clamp(center - half_extents, center + half_extents)
}
