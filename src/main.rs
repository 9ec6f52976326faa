//! Flick Sandbox headless driver
//!
//! Usage: `flick-sandbox [variant] [config.json]`
//!
//! Builds a scene, flicks the first body with a scripted slingshot and runs
//! it for a few simulated seconds, logging state once per second.
//! Set `RUST_LOG=debug` to see gesture and slow-motion transitions.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> flick_sandbox::SimResult<()> {
    use flick_sandbox::renderer::RenderSnapshot;
    use flick_sandbox::sim::PointerEvent;
    use flick_sandbox::{SceneConfig, Variant};
    use glam::Vec2;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const FRAMES_PER_SECOND: u64 = 60;
    const SECONDS: u64 = 5;

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => Variant::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using Sandbox", name);
            Variant::Sandbox
        }),
        None => Variant::Sandbox,
    };
    let config = args.next().map(SceneConfig::load).unwrap_or_default();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut scene = variant.build(config, seed)?;
    log::info!("Flick Sandbox ({}) starting, seed {}", variant.as_str(), seed);

    // Pull the first body back and let go
    if let Some(first) = scene.bodies().first() {
        let anchor = first.pos;
        let pull = anchor - Vec2::new(80.0, -40.0);
        scene.pointer_down(PointerEvent::new(1, anchor, 0.0));
        scene.pointer_move(PointerEvent::new(1, pull, 100.0))?;
        scene.pointer_up(PointerEvent::new(1, pull, 150.0))?;
    }

    let mut clock_ms = 150.0;
    for frame in 1..=SECONDS * FRAMES_PER_SECOND {
        scene.tick(FRAME_DT);
        clock_ms += f64::from(FRAME_DT) * 1000.0;

        for event in scene.drain_events() {
            log::debug!("{:?}", event);
        }

        if frame % FRAMES_PER_SECOND == 0 {
            let hud = RenderSnapshot::capture(&scene).hud;
            log::info!(
                "t={:.1}s score={} slow_motion={} energy={:.0}",
                clock_ms / 1000.0,
                hud.score,
                hud.slow_motion,
                scene.kinetic_energy()
            );
            for body in scene.bodies() {
                log::info!(
                    "  body {} pos=({:.1}, {:.1}) vel=({:.1}, {:.1})",
                    body.id(),
                    body.pos.x,
                    body.pos.y,
                    body.vel.x,
                    body.vel.y
                );
            }
        }
    }

    Ok(())
}
