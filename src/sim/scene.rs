//! Scene: the single owner of all mutable simulation state
//!
//! Bodies, obstacles, rectangles and springs live here, along with the active
//! gesture and the slow-motion window. Every mutation funnels through a
//! method on [`Scene`], so the host never touches the collections directly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::{Body, FixedObstacle, RectRegion};
use super::collision::Wall;
use super::error::{SimError, SimResult};
use super::gesture::{GestureState, Impulse, PointerEvent};
use super::integrate::SlowMotion;
use super::spring::Spring;
use crate::settings::SceneConfig;

/// Cap on undrained events; later events are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Radius range for the "add ball" action
pub const RANDOM_RADIUS_MIN: f32 = 24.0;
pub const RANDOM_RADIUS_MAX: f32 = 46.0;
/// Initial speed range (per axis) of randomly added balls
pub const RANDOM_SPEED: f32 = 75.0;

/// Things that happened during a tick, for the game-mode layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    WallImpact { body: u32, wall: Wall, impact_speed: f32 },
    BodyCollision { a: u32, b: u32, impulse: f32 },
    ObstacleImpact { body: u32, obstacle: u32 },
    Collected { body: u32, region: u32, value: u32 },
    SlowMotionStarted { body: u32, speed: f32 },
    SlowMotionEnded,
    BodyRemoved { body: u32 },
}

/// Complete sandbox state
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub(crate) config: SceneConfig,
    /// Mobile bodies, sorted by id (spawn order = draw order)
    pub(crate) bodies: Vec<Body>,
    pub(crate) obstacles: Vec<FixedObstacle>,
    pub(crate) rects: Vec<RectRegion>,
    pub(crate) springs: Vec<Spring>,
    pub(crate) gesture: Option<GestureState>,
    pub(crate) slow_motion: SlowMotion,
    /// Body steered by click-to-move
    pub(crate) controlled: Option<u32>,
    pub(crate) score: u64,
    pub(crate) time_ticks: u64,
    #[serde(skip)]
    pub(crate) events: Vec<SimEvent>,
    seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene. The seed drives every random spawn.
    pub fn new(config: SceneConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        log::info!(
            "Scene {}x{} (gravity {}, seed {})",
            config.arena_width,
            config.arena_height,
            if config.gravity_enabled { config.gravity } else { 0.0 },
            seed
        );
        Ok(Self {
            config,
            bodies: Vec::new(),
            obstacles: Vec::new(),
            rects: Vec::new(),
            springs: Vec::new(),
            gesture: None,
            slow_motion: SlowMotion::default(),
            controlled: None,
            score: 0,
            time_ticks: 0,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Accessors ===

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    /// Mutable access for the game-mode layer (teleports, velocity resets)
    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.bodies[i])
    }

    pub fn obstacles(&self) -> &[FixedObstacle] {
        &self.obstacles
    }

    pub fn rects(&self) -> &[RectRegion] {
        &self.rects
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    pub fn controlled_body(&self) -> Option<u32> {
        self.controlled
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn slow_motion(&self) -> &SlowMotion {
        &self.slow_motion
    }

    /// Time multiplier the next tick will use
    pub fn time_scale(&self) -> f32 {
        self.slow_motion.time_scale(&self.config.slow_motion)
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub(crate) fn index_of(&self, id: u32) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    // === Spawning ===

    /// Spawn a resting body; mass follows from the radius
    pub fn spawn_body(&mut self, pos: Vec2, radius: f32) -> SimResult<u32> {
        self.spawn_body_with_velocity(pos, radius, Vec2::ZERO)
    }

    pub fn spawn_body_with_velocity(&mut self, pos: Vec2, radius: f32, vel: Vec2) -> SimResult<u32> {
        let id = self.next_entity_id();
        let mut body = Body::new(
            id,
            pos,
            radius,
            self.config.mass_per_radius,
            self.config.default_restitution,
        )?;
        body.vel = vel;
        self.bodies.push(body);
        Ok(id)
    }

    /// Spawn a body with an explicit mass (spring blocks, heavy anchors)
    pub fn spawn_body_with_mass(&mut self, pos: Vec2, radius: f32, mass: f32) -> SimResult<u32> {
        let id = self.next_entity_id();
        let body = Body::with_mass(id, pos, radius, mass, self.config.default_restitution)?;
        self.bodies.push(body);
        Ok(id)
    }

    /// The "add ball" action: random size, position and drift
    pub fn spawn_random_body(&mut self) -> SimResult<u32> {
        let radius = self.rng.random_range(RANDOM_RADIUS_MIN..RANDOM_RADIUS_MAX);
        let max_x = (self.config.arena_width - radius).max(radius);
        let max_y = (self.config.arena_height - radius).max(radius);
        let pos = Vec2::new(
            self.rng.random_range(radius..=max_x),
            self.rng.random_range(radius..=max_y),
        );
        let vel = self.random_velocity(RANDOM_SPEED);
        self.spawn_body_with_velocity(pos, radius, vel)
    }

    /// Uniform velocity in [-max, max) on each axis
    pub fn random_velocity(&mut self, max: f32) -> Vec2 {
        if max <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.rng.random_range(-max..max),
            self.rng.random_range(-max..max),
        )
    }

    /// Remove a body, detaching every spring that referenced it
    pub fn remove_body(&mut self, id: u32) -> SimResult<Body> {
        let index = self.index_of(id).ok_or(SimError::UnknownBody { id })?;
        let body = self.bodies.remove(index);
        self.springs.retain(|s| !s.connects(id));
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        self.push_event(SimEvent::BodyRemoved { body: id });
        Ok(body)
    }

    /// Remove every mobile body (race reset)
    pub fn clear_bodies(&mut self) {
        for body in std::mem::take(&mut self.bodies) {
            push_event(&mut self.events, SimEvent::BodyRemoved { body: body.id });
        }
        // Every spring hangs off a body
        self.springs.clear();
        self.controlled = None;
    }

    pub fn add_obstacle(&mut self, pos: Vec2, radius: f32) -> SimResult<u32> {
        let id = self.next_entity_id();
        self.obstacles.push(FixedObstacle::new(id, pos, radius)?);
        Ok(id)
    }

    pub fn add_collectible(&mut self, center: Vec2, width: f32, height: f32, value: u32) -> SimResult<u32> {
        let id = self.next_entity_id();
        self.rects.push(RectRegion::collectible(id, center, width, height, value)?);
        Ok(id)
    }

    pub fn add_rect_obstacle(&mut self, center: Vec2, width: f32, height: f32) -> SimResult<u32> {
        let id = self.next_entity_id();
        self.rects.push(RectRegion::obstacle(id, center, width, height)?);
        Ok(id)
    }

    /// Link two bodies. `rest_length` defaults to their current separation.
    pub fn attach_spring(&mut self, a: u32, b: u32, rest_length: Option<f32>, stiffness: f32) -> SimResult<u32> {
        let pos_a = self.body(a).ok_or(SimError::UnknownBody { id: a })?.pos;
        let pos_b = self.body(b).ok_or(SimError::UnknownBody { id: b })?.pos;
        let rest = rest_length.unwrap_or_else(|| pos_a.distance(pos_b));
        let spring = Spring::new(0, a, b, rest, stiffness)?;
        let id = self.next_entity_id();
        self.springs.push(Spring { id, ..spring });
        Ok(id)
    }

    /// Returns false if no spring has this id
    pub fn detach_spring(&mut self, id: u32) -> bool {
        let before = self.springs.len();
        self.springs.retain(|s| s.id != id);
        self.springs.len() != before
    }

    pub fn set_controlled_body(&mut self, id: Option<u32>) -> SimResult<()> {
        if let Some(id) = id {
            self.index_of(id).ok_or(SimError::UnknownBody { id })?;
        }
        self.controlled = id;
        Ok(())
    }

    // === Settings ===

    /// Replace the whole config. An invalid config is rejected and the
    /// current one kept.
    pub fn set_config(&mut self, config: SceneConfig) -> SimResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        log::debug!("Gravity {}", if enabled { "on" } else { "off" });
        self.config.gravity_enabled = enabled;
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.set_gravity_enabled(!self.config.gravity_enabled);
        self.config.gravity_enabled
    }

    pub fn set_show_vectors(&mut self, show: bool) {
        self.config.show_vectors = show;
    }

    pub fn toggle_vectors(&mut self) -> bool {
        self.config.show_vectors = !self.config.show_vectors;
        self.config.show_vectors
    }

    /// Turning trails off drops the recorded history on the next tick
    pub fn set_trails(&mut self, enabled: bool) {
        self.config.trails = enabled;
    }

    /// Also closes any running slow-motion window when disabled
    pub fn set_slow_motion_enabled(&mut self, enabled: bool) {
        self.config.slow_motion.enabled = enabled;
        if !enabled {
            self.slow_motion = SlowMotion::default();
        }
    }

    pub fn set_click_to_move(&mut self, enabled: bool) {
        self.config.gesture.click_to_move = enabled;
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    // === Pointer input ===

    /// Begin a gesture. A second pointer while one is active is ignored.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if let Some(active) = &self.gesture {
            log::debug!(
                "Ignoring pointer {} down: pointer {} is active",
                event.pointer_id,
                active.pointer_id
            );
            return false;
        }
        let gesture = GestureState::on_down(&self.bodies, &event, &self.config.gesture);
        log::debug!("Gesture start at {:?}, target {:?}", event.pos, gesture.target);
        self.gesture = Some(gesture);
        true
    }

    /// Feed a move. With no active gesture this is a no-op.
    pub fn pointer_move(&mut self, event: PointerEvent) -> SimResult<()> {
        let Some(gesture) = self.take_gesture_for(&event)? else {
            return Ok(());
        };
        let previous = gesture.mode;
        let (gesture, impulse) = gesture.on_move(&self.bodies, &event, &self.config.gesture);
        if gesture.mode != previous {
            log::debug!("Gesture {:?} -> {:?}", previous, gesture.mode);
        }
        self.gesture = Some(gesture);
        if let Some(impulse) = impulse {
            self.apply_impulse(&impulse);
        }
        Ok(())
    }

    /// Release the pointer and apply the resulting impulse
    pub fn pointer_up(&mut self, event: PointerEvent) -> SimResult<()> {
        let Some(gesture) = self.take_gesture_for(&event)? else {
            return Ok(());
        };
        let mode = gesture.mode;
        let impulse = gesture.on_up(&self.bodies, &event, &self.config.gesture, self.controlled);
        log::debug!("Gesture released as {:?}: {:?}", mode, impulse);
        if let Some(impulse) = impulse {
            self.apply_impulse(&impulse);
        }
        Ok(())
    }

    /// Drop the gesture without applying anything
    pub fn pointer_cancel(&mut self, event: PointerEvent) -> SimResult<()> {
        if self.take_gesture_for(&event)?.is_some() {
            log::debug!("Gesture cancelled (pointer {})", event.pointer_id);
        }
        Ok(())
    }

    /// Take the active gesture if `event` belongs to it.
    ///
    /// A foreign pointer leaves the gesture in place and reports
    /// [`SimError::StaleGesture`].
    fn take_gesture_for(&mut self, event: &PointerEvent) -> SimResult<Option<GestureState>> {
        match &self.gesture {
            None => Ok(None),
            Some(active) if !active.owns(event) => {
                log::debug!(
                    "Stale pointer {} (active {})",
                    event.pointer_id,
                    active.pointer_id
                );
                Err(SimError::StaleGesture {
                    expected: active.pointer_id,
                    got: event.pointer_id,
                })
            }
            Some(_) => Ok(self.gesture.take()),
        }
    }

    /// Apply an impulse now; a missing body is silently skipped
    pub fn apply_impulse(&mut self, impulse: &Impulse) {
        match self.body_mut(impulse.body) {
            Some(body) => impulse.apply(body),
            None => log::debug!("Impulse for missing body {}", impulse.body),
        }
    }

    // === Events ===

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        push_event(&mut self.events, event);
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Buffer an event unless the buffer is full
pub(crate) fn push_event(events: &mut Vec<SimEvent>, event: SimEvent) {
    if events.len() < MAX_PENDING_EVENTS {
        events.push(event);
    }
}
