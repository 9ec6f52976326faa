//! Scene configuration and tuning
//!
//! Everything the host can tune lives here. Values are plain data so a scene
//! can be described in JSON; missing keys fall back to the defaults in
//! [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{SimError, SimResult};

/// Slow-motion window triggered by a high-speed body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowMotionConfig {
    pub enabled: bool,
    /// Body speed (pixels/s) that opens a window
    pub speed_threshold: f32,
    /// Window length in real milliseconds
    pub duration_ms: f32,
    /// Time multiplier while the window is open
    pub time_scale: f32,
}

impl Default for SlowMotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_threshold: SLOW_MOTION_SPEED,
            duration_ms: SLOW_MOTION_DURATION_MS,
            time_scale: SLOW_MOTION_SCALE,
        }
    }
}

/// Gesture interpreter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Extra pick radius around a body (pixels)
    pub grab_margin: f32,
    /// Pull length past which a grab becomes a slingshot
    pub slingshot_threshold: f32,
    pub slingshot_strength: f32,
    /// Mass floor used when dividing slingshot impulses
    pub slingshot_mass_floor: f32,
    pub drag_stiffness: f32,
    /// Mass floor used when dividing drag impulses
    pub drag_mass_floor: f32,
    /// Trace samples older than this are dropped (always keeping two)
    pub history_ms: f64,
    /// Lower bound on trace duration for velocity estimates (seconds)
    pub min_trace_secs: f32,
    /// Empty-space swipes only throw bodies within this distance of release
    pub swipe_capture_radius: f32,
    /// Tap on empty space steers a body instead of swiping
    pub click_to_move: bool,
    /// Click-to-move impulse per pixel of distance (1/s)
    pub click_gain: f32,
    pub click_max_impulse: f32,
    /// Pointer travel below which a gesture still counts as a tap
    pub tap_slop: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            grab_margin: GRAB_MARGIN,
            slingshot_threshold: SLINGSHOT_THRESHOLD,
            slingshot_strength: SLINGSHOT_STRENGTH,
            slingshot_mass_floor: 1.0,
            drag_stiffness: DRAG_STIFFNESS,
            drag_mass_floor: 0.1,
            history_ms: HISTORY_MS,
            min_trace_secs: MIN_TRACE_SECS,
            swipe_capture_radius: SWIPE_CAPTURE_RADIUS,
            click_to_move: false,
            click_gain: CLICK_GAIN,
            click_max_impulse: CLICK_MAX_IMPULSE,
            tap_slop: TAP_SLOP,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Forces ===
    pub gravity_enabled: bool,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Air friction in (0, 1]; applied as `friction^(dt * 60)`.
    /// Tuned at 60 Hz, so treat it as a feel knob rather than a drag law.
    pub friction: f32,

    // === Collisions ===
    /// Multiplier applied to every restitution value
    pub global_restitution: f32,
    /// Restitution given to newly spawned bodies
    pub default_restitution: f32,
    /// Velocity kept after bouncing off fixed obstacles
    pub obstacle_damping: f32,
    /// Spawned body mass = radius * mass_per_radius
    pub mass_per_radius: f32,

    // === Visuals ===
    pub trails: bool,
    pub trail_length: usize,
    /// Draw velocity arrows on bodies
    pub show_vectors: bool,

    pub slow_motion: SlowMotionConfig,
    pub gesture: GestureTuning,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            gravity_enabled: true,
            gravity: GRAVITY,
            friction: FRICTION,

            global_restitution: GLOBAL_RESTITUTION,
            default_restitution: BALL_RESTITUTION,
            obstacle_damping: OBSTACLE_DAMPING,
            mass_per_radius: MASS_PER_RADIUS,

            trails: true,
            trail_length: TRAIL_LENGTH,
            show_vectors: false,

            slow_motion: SlowMotionConfig::default(),
            gesture: GestureTuning::default(),
        }
    }
}

impl SceneConfig {
    /// Parse a JSON scene description and validate it
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| SimError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Reject values that would break the integrator or the collision math
    pub fn validate(&self) -> SimResult<()> {
        fn invalid(reason: String) -> SimResult<()> {
            Err(SimError::InvalidConfig { reason })
        }

        if !(self.arena_width.is_finite() && self.arena_width > 0.0)
            || !(self.arena_height.is_finite() && self.arena_height > 0.0)
        {
            return invalid(format!(
                "arena must be positive, got {}x{}",
                self.arena_width, self.arena_height
            ));
        }
        if !self.gravity.is_finite() {
            return invalid(format!("gravity must be finite, got {}", self.gravity));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return invalid(format!("friction must be in (0, 1], got {}", self.friction));
        }
        if !(0.0..=1.0).contains(&self.global_restitution) {
            return invalid(format!(
                "global_restitution must be in [0, 1], got {}",
                self.global_restitution
            ));
        }
        if !(0.0..=1.0).contains(&self.default_restitution) {
            return invalid(format!(
                "default_restitution must be in [0, 1], got {}",
                self.default_restitution
            ));
        }
        if !(0.0..=1.0).contains(&self.obstacle_damping) {
            return invalid(format!(
                "obstacle_damping must be in [0, 1], got {}",
                self.obstacle_damping
            ));
        }
        if !(self.mass_per_radius.is_finite() && self.mass_per_radius > 0.0) {
            return invalid(format!("mass_per_radius must be > 0, got {}", self.mass_per_radius));
        }
        let slow = &self.slow_motion;
        if !(slow.time_scale > 0.0 && slow.time_scale <= 1.0) {
            return invalid(format!("slow_motion.time_scale must be in (0, 1], got {}", slow.time_scale));
        }
        if !(slow.duration_ms >= 0.0) {
            return invalid(format!("slow_motion.duration_ms must be >= 0, got {}", slow.duration_ms));
        }
        let g = &self.gesture;
        if !(g.slingshot_mass_floor > 0.0 && g.drag_mass_floor > 0.0 && g.min_trace_secs > 0.0) {
            return invalid("gesture mass floors and min_trace_secs must be > 0".to_string());
        }
        if !(g.history_ms > 0.0) {
            return invalid(format!("gesture.history_ms must be > 0, got {}", g.history_ms));
        }
        Ok(())
    }

    /// Load a JSON config from disk, falling back to defaults on any failure
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded scene config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
