//! Deterministic simulation module
//!
//! All physics and gesture logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! Time comes in from the host as a variable `dt`, clamped per tick.

pub mod body;
pub mod collision;
pub mod error;
pub mod gesture;
pub mod integrate;
pub mod scene;
pub mod spring;
pub mod tick;
pub mod variant;

pub use body::{Body, FixedObstacle, RectKind, RectRegion};
pub use collision::{CollisionResult, Wall, WallImpact, resolve_body_pair, resolve_boundary};
pub use error::{SimError, SimResult};
pub use gesture::{GestureMode, GestureState, Impulse, PointerEvent, TraceSample, VelocityChange};
pub use integrate::{SlowMotion, integrate_body};
pub use scene::{MAX_PENDING_EVENTS, Scene, SimEvent};
pub use spring::{Spring, apply_spring};
pub use tick::tick;
pub use variant::Variant;
