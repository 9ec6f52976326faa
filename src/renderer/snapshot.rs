//! Frame snapshot: everything a drawing layer needs, copied out of the scene

use bytemuck::Pod;
use glam::Vec2;
use serde::Serialize;

use super::shapes::{body_circle, body_trail, slingshot_lines, velocity_line};
use super::vertex::{CircleInstance, LineInstance, RectInstance, Vertex, colors};
use crate::sim::{RectKind, Scene};

#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
    pub arena: Vec2,
    pub circles: Vec<CircleInstance>,
    pub rects: Vec<RectInstance>,
    pub lines: Vec<LineInstance>,
    pub trails: Vec<Vertex>,
    pub hud: Hud,
}

/// Text overlay values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub body_count: usize,
    pub slow_motion: bool,
}

impl RenderSnapshot {
    pub fn capture(scene: &Scene) -> Self {
        let mut snap = Self {
            arena: Vec2::new(scene.config().arena_width, scene.config().arena_height),
            hud: Hud {
                score: scene.score(),
                body_count: scene.bodies().len(),
                slow_motion: scene.slow_motion().is_active(),
            },
            ..Default::default()
        };

        // Fixtures first so bodies draw on top
        for rect in scene.rects() {
            let color = match rect.kind {
                RectKind::Obstacle => colors::OBSTACLE,
                RectKind::Collectible { consumed: true, .. } => continue,
                RectKind::Collectible { .. } => colors::COLLECTIBLE,
            };
            snap.rects.push(RectInstance {
                center: rect.center.to_array(),
                half_extents: rect.half_extents().to_array(),
                color,
            });
        }
        for obstacle in scene.obstacles() {
            snap.circles
                .push(CircleInstance::new(obstacle.pos, obstacle.radius, colors::OBSTACLE));
        }

        for spring in scene.springs() {
            if let (Some(a), Some(b)) = (scene.body(spring.a), scene.body(spring.b)) {
                snap.lines.push(LineInstance::new(a.pos, b.pos, 2.0, colors::SPRING));
            }
        }

        let controlled = scene.controlled_body();
        let show_vectors = scene.config().show_vectors;
        for body in scene.bodies() {
            snap.trails
                .extend(body_trail(&body.trail, body.radius * 0.5, body.speed()));
            snap.circles.push(body_circle(body, controlled == Some(body.id)));
            if show_vectors && let Some(line) = velocity_line(body) {
                snap.lines.push(line);
            }
        }

        if let Some((anchor, pointer)) = scene.gesture().and_then(|g| g.tether()) {
            snap.lines.extend(slingshot_lines(anchor, pointer));
        }

        snap
    }
}

/// Raw bytes of an instance slice for a GPU upload
pub fn as_bytes<T: Pod>(instances: &[T]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
