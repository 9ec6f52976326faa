//! Per-frame simulation tick
//!
//! Order within one tick:
//! 1. clamp `dt`, advance the slow-motion window
//! 2. integrate every body and keep it inside the arena
//! 3. game-state update (collectibles)
//! 4. springs
//! 5. fixed obstacles (circles, then rectangles)
//! 6. pairwise body collisions
//! 7. open a slow-motion window if something is moving fast enough

use super::body::{Body, RectKind};
use super::collision::{resolve_body_pair, resolve_boundary, resolve_fixed_obstacle, resolve_rect_obstacle};
use super::integrate::integrate_body;
use super::scene::{Scene, SimEvent, push_event};
use super::spring::apply_spring;
use crate::consts::MAX_DT;

impl Scene {
    /// Advance the scene by `dt` seconds of wall-clock time
    pub fn tick(&mut self, dt: f32) {
        tick(self, dt);
    }
}

/// Advance the scene by one variable-length step
pub fn tick(scene: &mut Scene, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
    if dt <= 0.0 {
        return;
    }

    if scene.slow_motion.advance(dt * 1000.0) {
        log::debug!("Slow motion ended");
        scene.push_event(SimEvent::SlowMotionEnded);
    }
    let time_scale = scene.slow_motion.time_scale(&scene.config.slow_motion);

    integrate_bodies(scene, dt, time_scale);
    collect_regions(scene);
    apply_springs(scene, dt * time_scale);
    resolve_obstacles(scene);
    resolve_pairs(scene);
    check_slow_motion(scene);

    scene.time_ticks += 1;
}

fn integrate_bodies(scene: &mut Scene, dt: f32, time_scale: f32) {
    let Scene {
        config,
        bodies,
        events,
        ..
    } = scene;

    for body in bodies.iter_mut() {
        integrate_body(body, config, dt, time_scale);
        if let Some(impact) = resolve_boundary(body, config.arena_width, config.arena_height, config.global_restitution) {
            push_event(
                events,
                SimEvent::WallImpact {
                    body: body.id,
                    wall: impact.wall,
                    impact_speed: impact.impact_speed,
                },
            );
        }
    }
}

fn collect_regions(scene: &mut Scene) {
    let mut awarded = 0u64;
    {
        let Scene {
            bodies,
            rects,
            events,
            ..
        } = scene;

        for rect in rects.iter_mut() {
            if !matches!(rect.kind, RectKind::Collectible { consumed: false, .. }) {
                continue;
            }
            for body in bodies.iter() {
                if let Some(value) = rect.try_collect(body.pos, body.radius) {
                    awarded += u64::from(value);
                    push_event(
                        events,
                        SimEvent::Collected {
                            body: body.id,
                            region: rect.id,
                            value,
                        },
                    );
                    break;
                }
            }
        }
    }
    if awarded > 0 {
        scene.add_score(awarded);
    }
}

fn apply_springs(scene: &mut Scene, step: f32) {
    for i in 0..scene.springs.len() {
        let spring = &scene.springs[i];
        let (Some(ia), Some(ib)) = (scene.index_of(spring.a), scene.index_of(spring.b)) else {
            continue;
        };
        let Some((a, b)) = pair_mut(&mut scene.bodies, ia, ib) else {
            continue;
        };
        apply_spring(&scene.springs[i], a, b, step);
    }
}

fn resolve_obstacles(scene: &mut Scene) {
    let Scene {
        config,
        bodies,
        obstacles,
        rects,
        events,
        ..
    } = scene;

    for body in bodies.iter_mut() {
        for obstacle in obstacles.iter() {
            if resolve_fixed_obstacle(body, obstacle, config.obstacle_damping).is_some() {
                push_event(
                    events,
                    SimEvent::ObstacleImpact {
                        body: body.id,
                        obstacle: obstacle.id,
                    },
                );
            }
        }
        for rect in rects.iter().filter(|r| r.kind == RectKind::Obstacle) {
            if resolve_rect_obstacle(body, rect, config.obstacle_damping).is_some() {
                push_event(
                    events,
                    SimEvent::ObstacleImpact {
                        body: body.id,
                        obstacle: rect.id,
                    },
                );
            }
        }
    }
}

fn resolve_pairs(scene: &mut Scene) {
    let Scene {
        config,
        bodies,
        events,
        ..
    } = scene;

    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let Some((a, b)) = pair_mut(bodies, i, j) else {
                continue;
            };
            if let Some(impulse) = resolve_body_pair(a, b, config.global_restitution)
                && impulse > 0.0
            {
                push_event(
                    events,
                    SimEvent::BodyCollision {
                        a: a.id,
                        b: b.id,
                        impulse,
                    },
                );
            }
        }
    }
}

fn check_slow_motion(scene: &mut Scene) {
    if !scene.config.slow_motion.enabled || scene.slow_motion.is_active() {
        return;
    }
    let fastest = scene
        .bodies
        .iter()
        .map(|b| (b.id, b.speed()))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((id, speed)) = fastest
        && scene.slow_motion.try_trigger(speed, &scene.config.slow_motion)
    {
        log::debug!("Slow motion: body {} at {:.0} px/s", id, speed);
        scene.push_event(SimEvent::SlowMotionStarted { body: id, speed });
    }
}

/// Two distinct mutable bodies from one slice
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> Option<(&mut Body, &mut Body)> {
    if i == j || i.max(j) >= bodies.len() {
        return None;
    }
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        Some((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = bodies.split_at_mut(i);
        Some((&mut right[0], &mut left[j]))
    }
}
