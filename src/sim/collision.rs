//! Collision detection and response
//!
//! Discrete, per-tick tests: arena walls, body pairs, fixed circular posts and
//! rectangular obstacles. Fast bodies may tunnel through thin geometry; the
//! sandbox accepts that.

use glam::Vec2;
use serde::Serialize;

use super::body::{Body, FixedObstacle, RectRegion};
use crate::{closest_point_on_rect, safe_normal};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the first shape's surface
    pub point: Vec2,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Arena edge a body bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// A boundary bounce: which wall and the normal speed going in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallImpact {
    pub wall: Wall,
    pub impact_speed: f32,
}

/// Check overlap between two circles.
///
/// Coincident centers are separated along +X with the distance floored at
/// [`crate::consts::MIN_CONTACT_DISTANCE`].
pub fn circle_circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let (normal, dist) = safe_normal(b_pos - a_pos);
    let min_dist = a_radius + b_radius;
    if dist >= min_dist {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        point: a_pos + normal * a_radius,
        normal,
        penetration: min_dist - dist,
    }
}

/// Keep a body inside the `width` x `height` arena.
///
/// Any crossed edge clamps the position and negates that velocity component,
/// scaled by `restitution * global_restitution`. Tangential velocity is left
/// alone. Returns the hardest impact if any edge was crossed.
pub fn resolve_boundary(body: &mut Body, width: f32, height: f32, global_restitution: f32) -> Option<WallImpact> {
    let e = body.restitution * global_restitution;
    let r = body.radius;
    let mut hardest: Option<WallImpact> = None;
    let mut record = |wall: Wall, impact_speed: f32| {
        if hardest.is_none_or(|h| impact_speed > h.impact_speed) {
            hardest = Some(WallImpact { wall, impact_speed });
        }
    };

    if body.pos.x - r < 0.0 {
        body.pos.x = r;
        record(Wall::Left, body.vel.x.abs());
        body.vel.x = -body.vel.x * e;
    }
    if body.pos.x + r > width {
        body.pos.x = width - r;
        record(Wall::Right, body.vel.x.abs());
        body.vel.x = -body.vel.x * e;
    }
    if body.pos.y - r < 0.0 {
        body.pos.y = r;
        record(Wall::Top, body.vel.y.abs());
        body.vel.y = -body.vel.y * e;
    }
    if body.pos.y + r > height {
        body.pos.y = height - r;
        record(Wall::Bottom, body.vel.y.abs());
        body.vel.y = -body.vel.y * e;
    }

    hardest
}

/// Separate two overlapping bodies and exchange momentum along the normal.
///
/// Each body moves half the penetration depth. Velocities change only when
/// the pair is approaching, using `min(restitution) * global_restitution`.
/// Returns the impulse magnitude (0 if separating) or `None` when apart.
pub fn resolve_body_pair(a: &mut Body, b: &mut Body, global_restitution: f32) -> Option<f32> {
    let contact = circle_circle_contact(a.pos, a.radius, b.pos, b.radius);
    if !contact.hit {
        return None;
    }

    let n = contact.normal;
    let half = contact.penetration / 2.0;
    a.pos -= n * half;
    b.pos += n * half;

    let rel = (b.vel - a.vel).dot(n);
    if rel >= 0.0 {
        return Some(0.0);
    }

    let e = a.restitution.min(b.restitution) * global_restitution;
    let impulse = -(1.0 + e) * rel / (1.0 / a.mass() + 1.0 / b.mass());
    let j = n * impulse;
    a.vel -= j / a.mass();
    b.vel += j / b.mass();
    Some(impulse)
}

/// Push a body out of an immovable circle and bounce it.
///
/// The body takes the full penetration depth. Its velocity is reflected
/// about the contact normal and scaled by `damping` when approaching.
pub fn resolve_fixed_obstacle(body: &mut Body, obstacle: &FixedObstacle, damping: f32) -> Option<CollisionResult> {
    let contact = circle_circle_contact(obstacle.pos, obstacle.radius, body.pos, body.radius);
    if !contact.hit {
        return None;
    }
    push_and_reflect(body, contact.normal, contact.penetration, damping);
    Some(contact)
}

/// Push a body out of a solid rectangle and bounce it.
///
/// The normal runs from the closest rectangle point to the body center; a
/// center inside the rectangle exits through the nearest face.
pub fn resolve_rect_obstacle(body: &mut Body, rect: &RectRegion, damping: f32) -> Option<CollisionResult> {
    let half = rect.half_extents();
    let closest = closest_point_on_rect(rect.center, half, body.pos);
    let delta = body.pos - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= body.radius * body.radius {
        return None;
    }

    let (normal, penetration) = if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        (delta / dist, body.radius - dist)
    } else {
        let local = body.pos - rect.center;
        let overlap_x = half.x - local.x.abs();
        let overlap_y = half.y - local.y.abs();
        if overlap_x < overlap_y {
            (Vec2::new(local.x.signum(), 0.0), overlap_x + body.radius)
        } else {
            (Vec2::new(0.0, local.y.signum()), overlap_y + body.radius)
        }
    };

    push_and_reflect(body, normal, penetration, damping);
    Some(CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration,
    })
}

fn push_and_reflect(body: &mut Body, normal: Vec2, penetration: f32, damping: f32) {
    body.pos += normal * penetration;
    if body.vel.dot(normal) < 0.0 {
        body.vel = reflect_velocity(body.vel, normal) * damping;
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(id: u32, x: f32, y: f32, r: f32, restitution: f32) -> Body {
        Body::new(id, Vec2::new(x, y), r, 0.1, restitution).unwrap()
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_circle_contact() {
        let miss = circle_circle_contact(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0);
        assert!(!miss.hit);

        let hit = circle_circle_contact(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0);
        assert!(hit.hit);
        assert_eq!(hit.normal, Vec2::X);
        assert!((hit.penetration - 5.0).abs() < 1e-5);
        assert_eq!(hit.point, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_boundary_bottom_bounce() {
        let mut b = body(1, 200.0, 395.0, 20.0, 0.8);
        b.vel = Vec2::new(30.0, 500.0);

        let impact = resolve_boundary(&mut b, 400.0, 400.0, 0.85).unwrap();
        assert_eq!(impact.wall, Wall::Bottom);
        assert_eq!(impact.impact_speed, 500.0);
        assert_eq!(b.pos.y, 380.0);
        assert!((b.vel.y - (-500.0 * 0.8 * 0.85)).abs() < 1e-3);
        // Tangential component untouched
        assert_eq!(b.vel.x, 30.0);
    }

    #[test]
    fn test_boundary_corner_reports_hardest() {
        let mut b = body(1, 5.0, 5.0, 10.0, 1.0);
        b.vel = Vec2::new(-50.0, -200.0);

        let impact = resolve_boundary(&mut b, 400.0, 400.0, 1.0).unwrap();
        assert_eq!(impact.wall, Wall::Top);
        assert_eq!(b.pos, Vec2::new(10.0, 10.0));
        assert_eq!(b.vel, Vec2::new(50.0, 200.0));
    }

    #[test]
    fn test_boundary_inside_untouched() {
        let mut b = body(1, 200.0, 200.0, 20.0, 0.8);
        b.vel = Vec2::new(10.0, 10.0);
        assert!(resolve_boundary(&mut b, 400.0, 400.0, 0.85).is_none());
        assert_eq!(b.vel, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_pair_head_on_equal_mass_elastic() {
        let mut a = body(1, 0.0, 0.0, 10.0, 1.0);
        let mut b = body(2, 19.0, 0.0, 10.0, 1.0);
        a.vel = Vec2::new(100.0, 0.0);
        b.vel = Vec2::new(-100.0, 0.0);

        let impulse = resolve_body_pair(&mut a, &mut b, 1.0).unwrap();
        assert!(impulse > 0.0);
        // Equal masses swap velocities in a perfectly elastic hit
        assert!((a.vel.x + 100.0).abs() < 1e-3);
        assert!((b.vel.x - 100.0).abs() < 1e-3);
        // Symmetric separation of the 1px overlap
        assert!((a.pos.x + 0.5).abs() < 1e-5);
        assert!((b.pos.x - 19.5).abs() < 1e-5);
    }

    #[test]
    fn test_pair_separating_only_pushed() {
        let mut a = body(1, 0.0, 0.0, 10.0, 1.0);
        let mut b = body(2, 15.0, 0.0, 10.0, 1.0);
        a.vel = Vec2::new(-10.0, 0.0);
        b.vel = Vec2::new(10.0, 0.0);

        assert_eq!(resolve_body_pair(&mut a, &mut b, 1.0), Some(0.0));
        assert_eq!(a.vel, Vec2::new(-10.0, 0.0));
        assert_eq!(b.vel, Vec2::new(10.0, 0.0));
        assert!(b.pos.x - a.pos.x >= 20.0 - 1e-4);
    }

    #[test]
    fn test_pair_coincident_centers_no_nan() {
        let mut a = body(1, 50.0, 50.0, 10.0, 0.8);
        let mut b = body(2, 50.0, 50.0, 10.0, 0.8);
        resolve_body_pair(&mut a, &mut b, 0.85).unwrap();
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!(b.pos.x > a.pos.x);
    }

    #[test]
    fn test_pair_resolution_deterministic() {
        let make = || {
            let mut a = body(1, 0.0, 0.0, 12.0, 0.7);
            let mut b = body(2, 18.0, 7.0, 17.0, 0.9);
            a.vel = Vec2::new(123.4, -56.7);
            b.vel = Vec2::new(-89.1, 23.4);
            (a, b)
        };
        let (mut a1, mut b1) = make();
        let (mut a2, mut b2) = make();
        resolve_body_pair(&mut a1, &mut b1, 0.85);
        resolve_body_pair(&mut a2, &mut b2, 0.85);
        assert_eq!(a1.vel.to_array().map(f32::to_bits), a2.vel.to_array().map(f32::to_bits));
        assert_eq!(b1.pos.to_array().map(f32::to_bits), b2.pos.to_array().map(f32::to_bits));
    }

    #[test]
    fn test_fixed_obstacle_bounce() {
        let post = FixedObstacle::new(9, Vec2::new(100.0, 100.0), 10.0).unwrap();
        let mut b = body(1, 70.0, 100.0, 25.0, 0.8);
        b.vel = Vec2::new(200.0, 0.0);

        let contact = resolve_fixed_obstacle(&mut b, &post, 0.8).unwrap();
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        // Full 5px penetration goes to the mobile body
        assert!((b.pos.x - 65.0).abs() < 1e-4);
        assert!((b.vel.x - (-160.0)).abs() < 1e-3);
        assert_eq!(post.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_fixed_obstacle_receding_keeps_velocity() {
        let post = FixedObstacle::new(9, Vec2::new(100.0, 100.0), 10.0).unwrap();
        let mut b = body(1, 70.0, 100.0, 25.0, 0.8);
        b.vel = Vec2::new(-200.0, 0.0);

        resolve_fixed_obstacle(&mut b, &post, 0.8).unwrap();
        assert_eq!(b.vel, Vec2::new(-200.0, 0.0));
    }

    #[test]
    fn test_rect_obstacle_face_and_inside() {
        let wall = RectRegion::obstacle(3, Vec2::new(100.0, 100.0), 20.0, 100.0).unwrap();

        // Approaching the left face
        let mut b = body(1, 85.0, 100.0, 10.0, 0.8);
        b.vel = Vec2::new(100.0, 20.0);
        let contact = resolve_rect_obstacle(&mut b, &wall, 0.8).unwrap();
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        assert!((b.pos.x - 80.0).abs() < 1e-4);
        assert!((b.vel.x + 80.0).abs() < 1e-3);
        assert!((b.vel.y - 16.0).abs() < 1e-3);

        // Center inside: leaves through the nearest (right) face
        let mut inside = body(2, 105.0, 100.0, 10.0, 0.8);
        let contact = resolve_rect_obstacle(&mut inside, &wall, 0.8).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((inside.pos.x - 120.0).abs() < 1e-4);

        let mut far = body(3, 200.0, 100.0, 10.0, 0.8);
        assert!(resolve_rect_obstacle(&mut far, &wall, 0.8).is_none());
    }

    proptest! {
        #[test]
        fn prop_boundary_bounce_loses_speed(
            vx in -2000.0f32..2000.0,
            vy in 1.0f32..2000.0,
            restitution in 0.0f32..0.999,
            global in 0.0f32..=1.0,
        ) {
            let mut b = body(1, 200.0, 395.0, 20.0, restitution);
            b.vel = Vec2::new(vx, vy);
            let before = b.vel.y.abs();
            resolve_boundary(&mut b, 400.0, 400.0, global);
            prop_assert!(b.vel.y.abs() < before);
            prop_assert!(b.vel.y <= 0.0);
            prop_assert_eq!(b.vel.x, vx);
        }

        #[test]
        fn prop_elastic_pair_conserves_momentum(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 5.0f32..40.0, rb in 5.0f32..40.0,
            angle in 0.0f32..std::f32::consts::TAU,
            overlap in 0.1f32..0.9,
        ) {
            let dist = (ra + rb) * overlap;
            let offset = Vec2::new(angle.cos(), angle.sin()) * dist;
            let mut a = body(1, 200.0, 200.0, ra, 1.0);
            let mut b = body(2, 200.0 + offset.x, 200.0 + offset.y, rb, 1.0);
            a.vel = Vec2::new(ax, ay);
            b.vel = Vec2::new(bx, by);

            let before = a.momentum() + b.momentum();
            let energy_before = a.kinetic_energy() + b.kinetic_energy();
            resolve_body_pair(&mut a, &mut b, 1.0);
            let after = a.momentum() + b.momentum();
            let energy_after = a.kinetic_energy() + b.kinetic_energy();

            let scale = 1.0 + before.length();
            prop_assert!((after - before).length() / scale < 1e-3);
            prop_assert!((energy_after - energy_before).abs() / (1.0 + energy_before) < 1e-3);
        }
    }
}
