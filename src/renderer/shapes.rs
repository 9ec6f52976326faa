//! Shape generation for 2D primitives

use glam::Vec2;
use std::collections::VecDeque;

use super::vertex::{CircleInstance, LineInstance, Vertex, colors};
use crate::sim::Body;

/// Speeds at the ends of the color gradient (px/s)
pub const SPEED_COLOR_MIN: f32 = 0.0;
pub const SPEED_COLOR_MAX: f32 = 1200.0;

/// Drawn velocity vector length per px/s
pub const VELOCITY_VECTOR_SCALE: f32 = 0.2;
/// Launch preview length per px of slingshot pull
pub const LAUNCH_PREVIEW_SCALE: f32 = 0.6;

/// Interpolate color based on velocity (slow=blue, medium=green, fast=red/orange)
pub fn velocity_color(speed: f32, alpha: f32) -> [f32; 4] {
    let t = ((speed - SPEED_COLOR_MIN) / (SPEED_COLOR_MAX - SPEED_COLOR_MIN)).clamp(0.0, 1.0);

    // blue -> cyan -> green -> yellow -> orange -> red
    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, alpha]
}

/// A body as a speed-colored disc
pub fn body_circle(body: &Body, controlled: bool) -> CircleInstance {
    let circle = CircleInstance::new(body.pos, body.radius, velocity_color(body.speed(), 1.0));
    if controlled {
        circle.with_outline(3.0, colors::CONTROLLED_OUTLINE)
    } else {
        circle
    }
}

/// Velocity arrow shaft from the body center
pub fn velocity_line(body: &Body) -> Option<LineInstance> {
    if body.vel.length_squared() < 1.0 {
        return None;
    }
    Some(LineInstance::new(
        body.pos,
        body.pos + body.vel * VELOCITY_VECTOR_SCALE,
        2.0,
        colors::VELOCITY,
    ))
}

/// Slingshot tether from the anchor to the pointer, plus the launch preview
/// pointing the opposite way
pub fn slingshot_lines(anchor: Vec2, pointer: Vec2) -> [LineInstance; 2] {
    let pull = anchor - pointer;
    [
        LineInstance::new(anchor, pointer, 2.0, colors::TETHER),
        LineInstance::new(anchor, anchor + pull * LAUNCH_PREVIEW_SCALE, 2.0, colors::LAUNCH_PREVIEW),
    ]
}

/// Triangles for a fading trail; the newest point is at the back
pub fn body_trail(trail: &VecDeque<Vec2>, radius: f32, speed: f32) -> Vec<Vertex> {
    if trail.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((trail.len() - 1) * 6);
    let trail_len = trail.len() as f32;

    // Walk newest -> oldest so t is the age fraction
    let points: Vec<Vec2> = trail.iter().rev().copied().collect();
    for (i, pair) in points.windows(2).enumerate() {
        let (p1, p2) = (pair[0], pair[1]);
        let t1 = i as f32 / trail_len;
        let t2 = (i + 1) as f32 / trail_len;

        let color1 = velocity_color(speed, (1.0 - t1) * 0.8);
        let color2 = velocity_color(speed, (1.0 - t2) * 0.8);
        let width1 = radius * (1.0 - t1 * 0.7);
        let width2 = radius * (1.0 - t2 * 0.7);

        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * width1;
        let v1b = p1 - perp * width1;
        let v2a = p2 + perp * width2;
        let v2b = p2 - perp * width2;

        vertices.push(Vertex::new(v1a.x, v1a.y, color1));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2a.x, v2a.y, color2));

        vertices.push(Vertex::new(v2a.x, v2a.y, color2));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2b.x, v2b.y, color2));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_color_gradient() {
        let slow = velocity_color(0.0, 1.0);
        let fast = velocity_color(SPEED_COLOR_MAX * 2.0, 0.5);
        assert_eq!(slow, [0.2, 0.4, 1.0, 1.0]);
        assert_eq!(fast[0], 1.0);
        assert_eq!(fast[3], 0.5);
    }

    #[test]
    fn test_trail_fades_with_age() {
        let trail: VecDeque<Vec2> = (0..5).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        let verts = body_trail(&trail, 10.0, 100.0);
        assert_eq!(verts.len(), 4 * 6);
        // First quad starts at the newest point
        assert_eq!(verts[0].position[0], 40.0);
        assert!(verts[0].color[3] > verts[verts.len() - 1].color[3]);
    }

    #[test]
    fn test_short_trail_empty() {
        let trail: VecDeque<Vec2> = std::iter::once(Vec2::ZERO).collect();
        assert!(body_trail(&trail, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_controlled_outline() {
        let body = Body::new(1, Vec2::new(10.0, 10.0), 5.0, 0.1, 0.8).unwrap();
        let plain = body_circle(&body, false);
        assert_eq!(plain.outline, 0.0);
        let steered = body_circle(&body, true);
        assert_eq!(steered.outline, 3.0);
        assert_eq!(steered.outline_color, colors::CONTROLLED_OUTLINE);
    }

    #[test]
    fn test_slingshot_preview_opposes_pull() {
        let [tether, preview] = slingshot_lines(Vec2::new(100.0, 100.0), Vec2::new(50.0, 100.0));
        assert_eq!(tether.end, [50.0, 100.0]);
        assert_eq!(preview.start, [100.0, 100.0]);
        assert!((Vec2::from_array(preview.end) - Vec2::new(130.0, 100.0)).length() < 1e-4);
        assert_eq!(preview.color, colors::LAUNCH_PREVIEW);
    }

    #[test]
    fn test_velocity_line_scaled() {
        let mut body = Body::new(1, Vec2::new(10.0, 10.0), 5.0, 0.1, 0.8).unwrap();
        assert!(velocity_line(&body).is_none());
        body.vel = Vec2::new(100.0, 0.0);
        let line = velocity_line(&body).unwrap();
        assert_eq!(line.end, [30.0, 10.0]);
    }
}
