//! Pointer gesture interpreter
//!
//! A gesture is a value moved through pure transitions:
//!
//! ```text
//! on_down -> Candidate --on_move--> DragForce <-> Slingshot   (grabbed a body)
//!                      \-on_move--> Swipe | ClickToMove       (empty space)
//! on_up / cancel -> gone
//! ```
//!
//! Transitions never touch bodies directly. They return an [`Impulse`] that
//! the scene applies on the spot, so the whole state machine can be driven
//! from tests with a synthetic clock.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::body::Body;
use crate::consts::DRAG_FORCE_STEP;
use crate::settings::GestureTuning;

/// Raw pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub pos: Vec2,
    /// Host timestamp in milliseconds
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn new(pointer_id: u32, pos: Vec2, time_ms: f64) -> Self {
        Self { pointer_id, pos, time_ms }
    }
}

/// One time-stamped point of the pointer trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSample {
    pub pos: Vec2,
    pub time_ms: f64,
}

/// What the active gesture is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GestureMode {
    /// Pointer is down, nothing decided yet
    Candidate,
    /// Grabbed body is pulled toward the pointer each move
    DragForce,
    /// Grabbed body is held while the pointer pulls back
    Slingshot,
    /// Started on empty space; release throws the nearest body
    Swipe,
    /// Tap on empty space; release steers a body toward the pointer
    ClickToMove,
}

/// How an impulse changes a body's velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VelocityChange {
    Add(Vec2),
    Set(Vec2),
}

/// Velocity change produced by a gesture, addressed by body id
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Impulse {
    pub body: u32,
    pub change: VelocityChange,
}

impl Impulse {
    pub fn add(body: u32, delta: Vec2) -> Self {
        Self { body, change: VelocityChange::Add(delta) }
    }

    pub fn set(body: u32, velocity: Vec2) -> Self {
        Self { body, change: VelocityChange::Set(velocity) }
    }

    pub fn apply(&self, body: &mut Body) {
        match self.change {
            VelocityChange::Add(delta) => body.vel += delta,
            VelocityChange::Set(velocity) => body.vel = velocity,
        }
    }
}

/// Transient record of the one active pointer
#[derive(Debug, Clone, Serialize)]
pub struct GestureState {
    pub pointer_id: u32,
    pub start_pos: Vec2,
    /// Recent samples, oldest first; never fewer than one
    pub history: VecDeque<TraceSample>,
    /// Grabbed body, if the press landed on one
    pub target: Option<u32>,
    pub mode: GestureMode,
    /// Grabbed body's position at press time (slingshot origin)
    pub anchor: Option<Vec2>,
}

impl GestureState {
    /// Start a gesture, grabbing the topmost body under the pointer
    pub fn on_down(bodies: &[Body], event: &PointerEvent, tuning: &GestureTuning) -> Self {
        let grabbed = hit_test(bodies, event.pos, tuning.grab_margin);
        let mut history = VecDeque::new();
        history.push_back(TraceSample {
            pos: event.pos,
            time_ms: event.time_ms,
        });

        Self {
            pointer_id: event.pointer_id,
            start_pos: event.pos,
            history,
            target: grabbed.map(|b| b.id),
            mode: GestureMode::Candidate,
            anchor: grabbed.map(|b| b.pos),
        }
    }

    /// Whether `event` belongs to this gesture's pointer
    pub fn owns(&self, event: &PointerEvent) -> bool {
        self.pointer_id == event.pointer_id
    }

    /// Record a move and pick the mode it implies.
    ///
    /// While dragging, returns the spring-like pull toward the pointer.
    /// Events from other pointers leave the gesture untouched.
    pub fn on_move(mut self, bodies: &[Body], event: &PointerEvent, tuning: &GestureTuning) -> (Self, Option<Impulse>) {
        if !self.owns(event) {
            return (self, None);
        }
        self.push_sample(
            TraceSample {
                pos: event.pos,
                time_ms: event.time_ms,
            },
            tuning.history_ms,
        );

        let mut impulse = None;
        match (self.target, self.anchor) {
            (Some(id), Some(anchor)) => {
                let pull = event.pos - anchor;
                if pull.length() > tuning.slingshot_threshold {
                    self.mode = GestureMode::Slingshot;
                } else {
                    self.mode = GestureMode::DragForce;
                    // A grabbed body may have been removed mid-gesture
                    if let Some(body) = find_body(bodies, id) {
                        let toward = event.pos - body.pos;
                        let gain = tuning.drag_stiffness * DRAG_FORCE_STEP / body.mass().max(tuning.drag_mass_floor);
                        impulse = Some(Impulse::add(id, toward * gain));
                    }
                }
            }
            _ => {
                let is_tap = self.mode != GestureMode::Swipe
                    && event.pos.distance(self.start_pos) <= tuning.tap_slop;
                self.mode = if tuning.click_to_move && is_tap {
                    GestureMode::ClickToMove
                } else {
                    GestureMode::Swipe
                };
            }
        }

        (self, impulse)
    }

    /// Finish the gesture and compute its release impulse.
    ///
    /// `controlled` is the body click-to-move steers; when absent, the
    /// nearest body is steered instead.
    pub fn on_up(
        self,
        bodies: &[Body],
        event: &PointerEvent,
        tuning: &GestureTuning,
        controlled: Option<u32>,
    ) -> Option<Impulse> {
        if !self.owns(event) {
            return None;
        }
        let release = self.release_position();
        let velocity = self.trace_velocity(tuning.min_trace_secs);

        if let Some(id) = self.target {
            let body = find_body(bodies, id)?;
            return match (self.mode, self.anchor) {
                (GestureMode::Slingshot, Some(anchor)) => {
                    let pull = anchor - release;
                    let scale = tuning.slingshot_strength / body.mass().max(tuning.slingshot_mass_floor);
                    Some(Impulse::add(id, pull * scale))
                }
                // Throw: the body leaves with the pointer's velocity
                _ => Some(Impulse::set(id, velocity)),
            };
        }

        let click = match self.mode {
            GestureMode::ClickToMove => true,
            GestureMode::Candidate => tuning.click_to_move,
            _ => false,
        };
        if click {
            let body = controlled
                .and_then(|id| find_body(bodies, id))
                .or_else(|| nearest_body(bodies, release).map(|(b, _)| b))?;
            let toward = (release - body.pos) * tuning.click_gain;
            return Some(Impulse::add(body.id, toward.clamp_length_max(tuning.click_max_impulse)));
        }

        match nearest_body(bodies, release) {
            Some((body, dist)) if dist < tuning.swipe_capture_radius => Some(Impulse::add(body.id, velocity)),
            _ => None,
        }
    }

    /// Newest retained pointer position
    pub fn release_position(&self) -> Vec2 {
        self.history.back().map(|s| s.pos).unwrap_or(self.start_pos)
    }

    /// Finite-difference velocity between the oldest and newest samples.
    ///
    /// Elapsed time is floored at `min_secs` so a single sample gives zero
    /// velocity rather than a division by zero.
    pub fn trace_velocity(&self, min_secs: f32) -> Vec2 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return Vec2::ZERO;
        };
        let elapsed = (((last.time_ms - first.time_ms) / 1000.0) as f32).max(min_secs);
        (last.pos - first.pos) / elapsed
    }

    /// Slingshot tether (anchor, pointer) for display while pulling
    pub fn tether(&self) -> Option<(Vec2, Vec2)> {
        match (self.mode, self.anchor) {
            (GestureMode::Slingshot, Some(anchor)) => Some((anchor, self.release_position())),
            _ => None,
        }
    }

    /// Append a sample and drop ones older than `horizon_ms`, keeping two
    fn push_sample(&mut self, sample: TraceSample, horizon_ms: f64) {
        self.history.push_back(sample);
        while self.history.len() > 2 {
            match self.history.front() {
                Some(oldest) if sample.time_ms - oldest.time_ms > horizon_ms => {
                    self.history.pop_front();
                }
                _ => break,
            }
        }
    }
}

/// Topmost (last spawned) body within `radius + margin` of `point`
pub fn hit_test(bodies: &[Body], point: Vec2, margin: f32) -> Option<&Body> {
    bodies
        .iter()
        .rev()
        .find(|b| b.pos.distance(point) <= b.radius + margin)
}

/// Nearest body center to `point` and its distance; ties keep the earliest
pub fn nearest_body(bodies: &[Body], point: Vec2) -> Option<(&Body, f32)> {
    let mut best: Option<(&Body, f32)> = None;
    for body in bodies {
        let dist = body.pos.distance(point);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((body, dist));
        }
    }
    best
}

fn find_body(bodies: &[Body], id: u32) -> Option<&Body> {
    bodies.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball(id: u32, x: f32, y: f32, r: f32) -> Body {
        Body::new(id, Vec2::new(x, y), r, 0.1, 0.8).unwrap()
    }

    fn ev(x: f32, y: f32, t: f64) -> PointerEvent {
        PointerEvent::new(1, Vec2::new(x, y), t)
    }

    #[test]
    fn test_down_grabs_topmost_within_margin() {
        let bodies = vec![ball(1, 100.0, 100.0, 20.0), ball(2, 110.0, 100.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(105.0, 100.0, 0.0), &tuning);
        assert_eq!(g.target, Some(2));
        assert_eq!(g.anchor, Some(Vec2::new(110.0, 100.0)));
        assert_eq!(g.mode, GestureMode::Candidate);

        // 27px from body 1: outside radius, inside the 8px margin
        let g = GestureState::on_down(&bodies, &ev(73.0, 100.0, 0.0), &tuning);
        assert_eq!(g.target, Some(1));

        let g = GestureState::on_down(&bodies, &ev(300.0, 300.0, 0.0), &tuning);
        assert_eq!(g.target, None);
        assert_eq!(g.anchor, None);
    }

    #[test]
    fn test_slingshot_release_opposes_pull() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &tuning);
        let (g, impulse) = g.on_move(&bodies, &ev(150.0, 150.0, 50.0), &tuning);
        assert_eq!(g.mode, GestureMode::Slingshot);
        assert!(impulse.is_none());
        assert_eq!(g.tether(), Some((Vec2::new(200.0, 200.0), Vec2::new(150.0, 150.0))));

        let impulse = g.on_up(&bodies, &ev(150.0, 150.0, 80.0), &tuning, None).unwrap();
        // mass = 20 * 0.1 = 2, floored at 1
        let expected = Vec2::new(50.0, 50.0) * 1.2 / 2.0;
        assert_eq!(impulse.body, 1);
        match impulse.change {
            VelocityChange::Add(v) => assert!((v - expected).length() < 1e-4),
            other => panic!("expected additive impulse, got {other:?}"),
        }
    }

    #[test]
    fn test_small_pull_drags_toward_pointer() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &tuning);
        let (g, impulse) = g.on_move(&bodies, &ev(210.0, 200.0, 16.0), &tuning);
        assert_eq!(g.mode, GestureMode::DragForce);
        let impulse = impulse.unwrap();
        match impulse.change {
            // 10px * 8 * (1/60) / 2
            VelocityChange::Add(v) => assert!((v.x - 10.0 * 8.0 / 60.0 / 2.0).abs() < 1e-5 && v.y == 0.0),
            other => panic!("expected additive impulse, got {other:?}"),
        }

        // Pulling past the threshold switches to slingshot, and back again
        let (g, _) = g.on_move(&bodies, &ev(230.0, 200.0, 32.0), &tuning);
        assert_eq!(g.mode, GestureMode::Slingshot);
        let (g, _) = g.on_move(&bodies, &ev(205.0, 200.0, 48.0), &tuning);
        assert_eq!(g.mode, GestureMode::DragForce);
    }

    #[test]
    fn test_drag_release_throws_with_trace_velocity() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(205.0, 200.0, 50.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(210.0, 200.0, 100.0), &tuning);
        assert_eq!(g.mode, GestureMode::DragForce);

        let impulse = g.on_up(&bodies, &ev(210.0, 200.0, 110.0), &tuning, None).unwrap();
        assert_eq!(impulse.body, 1);
        match impulse.change {
            // 10px over 100ms
            VelocityChange::Set(v) => assert!((v - Vec2::new(100.0, 0.0)).length() < 1e-3),
            other => panic!("expected a throw, got {other:?}"),
        }
    }

    #[test]
    fn test_swipe_throws_nearest_within_capture() {
        let bodies = vec![ball(1, 150.0, 150.0, 20.0), ball(2, 600.0, 100.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(300.0, 300.0, 0.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(250.0, 250.0, 40.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(200.0, 200.0, 80.0), &tuning);
        assert_eq!(g.mode, GestureMode::Swipe);

        let impulse = g.on_up(&bodies, &ev(200.0, 200.0, 90.0), &tuning, None).unwrap();
        assert_eq!(impulse.body, 1);
        match impulse.change {
            VelocityChange::Add(v) => assert!((v - Vec2::new(-1250.0, -1250.0)).length() < 1e-2),
            other => panic!("expected additive impulse, got {other:?}"),
        }
    }

    #[test]
    fn test_swipe_far_from_bodies_does_nothing() {
        let bodies = vec![ball(1, 100.0, 100.0, 20.0)];
        let tuning = GestureTuning::default();

        let g = GestureState::on_down(&bodies, &ev(700.0, 500.0, 0.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(650.0, 500.0, 40.0), &tuning);
        assert!(g.on_up(&bodies, &ev(650.0, 500.0, 50.0), &tuning, None).is_none());
    }

    #[test]
    fn test_click_to_move_capped() {
        let bodies = vec![ball(1, 100.0, 100.0, 20.0), ball(2, 500.0, 100.0, 20.0)];
        let tuning = GestureTuning {
            click_to_move: true,
            ..Default::default()
        };

        // Near click: 50px * 2.0 gain
        let g = GestureState::on_down(&bodies, &ev(150.0, 100.0, 0.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(152.0, 100.0, 10.0), &tuning);
        assert_eq!(g.mode, GestureMode::ClickToMove);
        let impulse = g.on_up(&bodies, &ev(152.0, 100.0, 20.0), &tuning, Some(1)).unwrap();
        assert_eq!(impulse, Impulse::add(1, Vec2::new(104.0, 0.0)));

        // Far click on the controlled body is capped at 600 px/s
        let g = GestureState::on_down(&bodies, &ev(100.0, 500.0, 0.0), &tuning);
        let impulse = g.on_up(&bodies, &ev(100.0, 500.0, 5.0), &tuning, Some(2)).unwrap();
        assert_eq!(impulse.body, 2);
        match impulse.change {
            VelocityChange::Add(v) => {
                assert!((v.length() - 600.0).abs() < 1e-2);
                assert!(v.x < 0.0 && v.y > 0.0);
            }
            other => panic!("expected additive impulse, got {other:?}"),
        }
    }

    #[test]
    fn test_click_to_move_becomes_swipe_once_dragged() {
        let bodies = vec![ball(1, 100.0, 100.0, 20.0)];
        let tuning = GestureTuning {
            click_to_move: true,
            ..Default::default()
        };
        let g = GestureState::on_down(&bodies, &ev(200.0, 100.0, 0.0), &tuning);
        let (g, _) = g.on_move(&bodies, &ev(230.0, 100.0, 10.0), &tuning);
        assert_eq!(g.mode, GestureMode::Swipe);
        // Coming back near the start does not turn it into a tap
        let (g, _) = g.on_move(&bodies, &ev(201.0, 100.0, 20.0), &tuning);
        assert_eq!(g.mode, GestureMode::Swipe);
    }

    #[test]
    fn test_missing_target_is_not_an_error() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let tuning = GestureTuning::default();
        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &tuning);

        let empty: Vec<Body> = Vec::new();
        let (g, impulse) = g.on_move(&empty, &ev(205.0, 200.0, 10.0), &tuning);
        assert!(impulse.is_none());
        assert!(g.on_up(&empty, &ev(205.0, 200.0, 20.0), &tuning, None).is_none());
    }

    #[test]
    fn test_foreign_pointer_ignored() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let tuning = GestureTuning::default();
        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &tuning);

        let other = PointerEvent::new(9, Vec2::new(100.0, 100.0), 10.0);
        let (g, impulse) = g.on_move(&bodies, &other, &tuning);
        assert!(impulse.is_none());
        assert_eq!(g.history.len(), 1);
        assert_eq!(g.mode, GestureMode::Candidate);
        assert!(g.on_up(&bodies, &other, &tuning, None).is_none());
    }

    #[test]
    fn test_single_sample_velocity_is_zero() {
        let bodies = vec![ball(1, 200.0, 200.0, 20.0)];
        let g = GestureState::on_down(&bodies, &ev(200.0, 200.0, 0.0), &GestureTuning::default());
        assert_eq!(g.trace_velocity(0.001), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_history_bounded(steps in proptest::collection::vec((0.0f64..60.0, -20.0f32..20.0), 1..80)) {
            let tuning = GestureTuning::default();
            let mut g = GestureState::on_down(&[], &ev(0.0, 0.0, 0.0), &tuning);
            let mut now = 0.0;
            let mut x = 0.0;
            for (dt, dx) in steps {
                now += dt;
                x += dx;
                g = g.on_move(&[], &ev(x, 0.0, now), &tuning).0;

                prop_assert!(!g.history.is_empty());
                if now > tuning.history_ms {
                    prop_assert!(g.history.len() >= 2);
                }
                // Only the single oldest sample may be past the horizon
                let stale = g.history.iter().filter(|s| now - s.time_ms > tuning.history_ms).count();
                prop_assert!(stale <= 1);
                if stale == 1 {
                    let oldest = g.history.front().unwrap();
                    prop_assert!(now - oldest.time_ms > tuning.history_ms);
                }
                prop_assert_eq!(g.history.back().map(|s| s.time_ms), Some(now));
            }
        }
    }
}
