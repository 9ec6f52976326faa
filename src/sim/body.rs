//! Simulation entities
//!
//! Mobile circles, immovable circular posts, and axis-aligned rectangles
//! (one-shot collectibles or solid obstacles).

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::error::{SimResult, require_positive};
use crate::closest_point_on_rect;

/// A mobile circular body
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    /// Fixed at spawn; the scene keeps bodies sorted by it
    pub(crate) id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub(crate) radius: f32,
    /// Always > 0; only settable through validated constructors
    mass: f32,
    /// Fraction of normal velocity kept on bounce, in [0, 1]
    pub(crate) restitution: f32,
    /// Recent positions for rendering (oldest at the front)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Body {
    /// Create a body whose mass grows linearly with its radius
    pub fn new(id: u32, pos: Vec2, radius: f32, mass_per_radius: f32, restitution: f32) -> SimResult<Self> {
        let radius = require_positive("radius", radius)?;
        let mass = require_positive("mass", radius * mass_per_radius)?;
        Ok(Self::build(id, pos, radius, mass, restitution))
    }

    /// Create a body with an explicit mass
    pub fn with_mass(id: u32, pos: Vec2, radius: f32, mass: f32, restitution: f32) -> SimResult<Self> {
        let radius = require_positive("radius", radius)?;
        let mass = require_positive("mass", mass)?;
        Ok(Self::build(id, pos, radius, mass, restitution))
    }

    fn build(id: u32, pos: Vec2, radius: f32, mass: f32, restitution: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            restitution: clamp_restitution(restitution),
            trail: VecDeque::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Clamped to [0, 1]; NaN becomes 0
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = clamp_restitution(restitution);
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Record current position to the trail, evicting the oldest past `limit`
    pub fn record_trail(&mut self, limit: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > limit {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

fn clamp_restitution(restitution: f32) -> f32 {
    if restitution.is_finite() { restitution.clamp(0.0, 1.0) } else { 0.0 }
}

/// An immovable circular obstacle (infinite effective mass)
#[derive(Debug, Clone, Serialize)]
pub struct FixedObstacle {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

impl FixedObstacle {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> SimResult<Self> {
        let radius = require_positive("radius", radius)?;
        Ok(Self { id, pos, radius })
    }
}

/// What a rectangle does when a body touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RectKind {
    /// Awards `value` to the first body that overlaps it, then goes inert
    Collectible { value: u32, consumed: bool },
    /// Solid wall the bodies bounce off
    Obstacle,
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Serialize)]
pub struct RectRegion {
    pub id: u32,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: RectKind,
}

impl RectRegion {
    pub fn collectible(id: u32, center: Vec2, width: f32, height: f32, value: u32) -> SimResult<Self> {
        Self::build(id, center, width, height, RectKind::Collectible { value, consumed: false })
    }

    pub fn obstacle(id: u32, center: Vec2, width: f32, height: f32) -> SimResult<Self> {
        Self::build(id, center, width, height, RectKind::Obstacle)
    }

    fn build(id: u32, center: Vec2, width: f32, height: f32, kind: RectKind) -> SimResult<Self> {
        let width = require_positive("width", width)?;
        let height = require_positive("height", height)?;
        Ok(Self { id, center, width, height, kind })
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let local = (p - self.center).abs();
        let half = self.half_extents();
        local.x <= half.x && local.y <= half.y
    }

    /// Closest-point test against a circle
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = closest_point_on_rect(self.center, self.half_extents(), center);
        (center - closest).length_squared() < radius * radius
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self.kind, RectKind::Collectible { consumed: true, .. })
    }

    /// Consume the collectible if the circle overlaps it.
    ///
    /// Returns the awarded value the first time only; obstacles and spent
    /// collectibles always return `None`.
    pub fn try_collect(&mut self, center: Vec2, radius: f32) -> Option<u32> {
        let overlapping = self.overlaps_circle(center, radius);
        match &mut self.kind {
            RectKind::Collectible { value, consumed } if !*consumed && overlapping => {
                *consumed = true;
                Some(*value)
            }
            _ => None,
        }
    }
}
