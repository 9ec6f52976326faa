//! Product variants built on the shared kernel
//!
//! Each variant tweaks the config and lays out a starting scene. Gameplay
//! rules beyond that (race timers, shot clocks) belong to the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::SimResult;
use super::scene::{RANDOM_SPEED, Scene};
use crate::settings::SceneConfig;

/// Race obstacle posts
const RACE_POSTS: [Vec2; 5] = [
    Vec2::new(250.0, 200.0),
    Vec2::new(250.0, 400.0),
    Vec2::new(400.0, 300.0),
    Vec2::new(550.0, 200.0),
    Vec2::new(550.0, 400.0),
];
const RACE_POST_RADIUS: f32 = 18.0;
const RACE_COINS: [Vec2; 3] = [Vec2::new(400.0, 150.0), Vec2::new(400.0, 450.0), Vec2::new(700.0, 300.0)];

const HOOP_LEFT: Vec2 = Vec2::new(600.0, 260.0);
const HOOP_RIGHT: Vec2 = Vec2::new(680.0, 260.0);
const RIM_RADIUS: f32 = 6.0;
const BASKET_POINTS: u32 = 2;

const SPRING_REST: f32 = 150.0;
const SPRING_STIFFNESS: f32 = 40.0;
const SPRING_DISPLACEMENT: f32 = 50.0;
const ANCHOR_MASS: f32 = 1000.0;
const BLOCK_MASS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Sandbox,
    ObstacleRace,
    Basketball,
    SpringBlock,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Sandbox,
        Variant::ObstacleRace,
        Variant::Basketball,
        Variant::SpringBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Sandbox => "Sandbox",
            Variant::ObstacleRace => "ObstacleRace",
            Variant::Basketball => "Basketball",
            Variant::SpringBlock => "SpringBlock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" => Some(Variant::Sandbox),
            "obstaclerace" | "obstacle-race" | "race" => Some(Variant::ObstacleRace),
            "basketball" | "hoops" => Some(Variant::Basketball),
            "springblock" | "spring-block" | "spring" => Some(Variant::SpringBlock),
            _ => None,
        }
    }

    /// Adjust the config for this variant before the scene is created
    pub fn configure(&self, config: &mut SceneConfig) {
        match self {
            Variant::Sandbox | Variant::Basketball => {}
            Variant::ObstacleRace => {
                config.gravity_enabled = false;
                config.gesture.click_to_move = true;
                config.slow_motion.enabled = false;
            }
            Variant::SpringBlock => {
                config.gravity_enabled = false;
            }
        }
    }

    /// Lay out the starting bodies and fixtures
    pub fn populate(&self, scene: &mut Scene) -> SimResult<()> {
        match self {
            Variant::Sandbox => {
                for i in 0..3 {
                    let i = i as f32;
                    let vel = scene.random_velocity(RANDOM_SPEED);
                    scene.spawn_body_with_velocity(
                        Vec2::new(120.0 + 80.0 * i, 150.0 + 40.0 * i),
                        28.0 + 6.0 * i,
                        vel,
                    )?;
                }
            }
            Variant::ObstacleRace => {
                let player = scene.spawn_body(Vec2::new(80.0, 300.0), 20.0)?;
                scene.set_controlled_body(Some(player))?;
                for post in RACE_POSTS {
                    scene.add_obstacle(post, RACE_POST_RADIUS)?;
                }
                for coin in RACE_COINS {
                    scene.add_collectible(coin, 30.0, 30.0, 1)?;
                }
            }
            Variant::Basketball => {
                scene.spawn_body(Vec2::new(150.0, 450.0), 24.0)?;
                // Backboard, then the two rim edges
                scene.add_rect_obstacle(Vec2::new(700.0, 200.0), 12.0, 120.0)?;
                scene.add_obstacle(HOOP_LEFT, RIM_RADIUS)?;
                scene.add_obstacle(HOOP_RIGHT, RIM_RADIUS)?;
                let net = (HOOP_LEFT + HOOP_RIGHT) / 2.0 + Vec2::new(0.0, 25.0);
                scene.add_collectible(net, HOOP_RIGHT.x - HOOP_LEFT.x - 20.0, 20.0, BASKET_POINTS)?;
            }
            Variant::SpringBlock => {
                let anchor = scene.spawn_body_with_mass(Vec2::new(200.0, 300.0), 30.0, ANCHOR_MASS)?;
                let block = scene.spawn_body_with_mass(
                    Vec2::new(200.0 + SPRING_REST + SPRING_DISPLACEMENT, 300.0),
                    30.0,
                    BLOCK_MASS,
                )?;
                scene.attach_spring(anchor, block, Some(SPRING_REST), SPRING_STIFFNESS)?;
            }
        }
        log::info!(
            "{}: {} bodies, {} obstacles, {} regions, {} springs",
            self.as_str(),
            scene.bodies().len(),
            scene.obstacles().len(),
            scene.rects().len(),
            scene.springs().len()
        );
        Ok(())
    }

    /// Configure, create and populate a scene in one go
    pub fn build(&self, mut config: SceneConfig, seed: u64) -> SimResult<Scene> {
        self.configure(&mut config);
        let mut scene = Scene::new(config, seed)?;
        self.populate(&mut scene)?;
        Ok(scene)
    }
}
