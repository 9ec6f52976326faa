//! Linear springs between body pairs
//!
//! Hooke's law with no intrinsic damping; global air friction bleeds energy.

use serde::Serialize;

use super::body::Body;
use super::error::{SimError, SimResult};

/// A spring joining two distinct bodies by id
#[derive(Debug, Clone, Serialize)]
pub struct Spring {
    pub id: u32,
    pub a: u32,
    pub b: u32,
    pub rest_length: f32,
    pub stiffness: f32,
}

impl Spring {
    pub fn new(id: u32, a: u32, b: u32, rest_length: f32, stiffness: f32) -> SimResult<Self> {
        if a == b {
            return Err(SimError::InvalidSpring {
                reason: "endpoints must be different bodies",
            });
        }
        if !(rest_length.is_finite() && rest_length >= 0.0) {
            return Err(SimError::InvalidSpring {
                reason: "rest length must be finite and >= 0",
            });
        }
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(SimError::InvalidSpring {
                reason: "stiffness must be finite and > 0",
            });
        }
        Ok(Self {
            id,
            a,
            b,
            rest_length,
            stiffness,
        })
    }

    pub fn connects(&self, body: u32) -> bool {
        self.a == body || self.b == body
    }
}

/// Apply one step of spring force to both endpoints.
///
/// `F = stiffness * (d - rest_length)` along the axis from `a` to `b`; each
/// endpoint's velocity changes by `F / m * dt` in opposite directions.
/// Returns the signed force (positive = stretched). Coincident endpoints have
/// no axis and receive no force.
pub fn apply_spring(spring: &Spring, a: &mut Body, b: &mut Body, dt: f32) -> f32 {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return 0.0;
    }

    let axis = delta / dist;
    let force = spring.stiffness * (dist - spring.rest_length);
    a.vel += axis * (force / a.mass() * dt);
    b.vel -= axis * (force / b.mass() * dt);
    force
}
