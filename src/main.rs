//! Headless companion demo
//!
//! Builds a small level, starts a session so a companion spawns next to a
//! scripted actor, and logs what the companion does while the actor walks
//! around and eventually teleports away.
//!
//! Run with `RUST_LOG=debug` to see state transitions. An optional first
//! argument names a RON settings file.

use critter::prelude::*;

const TICK_RATE: f32 = 60.0;
const RUN_SECONDS: f32 = 90.0;

/// Actor that walks a loop of waypoints at walking pace
struct ScriptedActor {
    pose: ActorPose,
    waypoints: Vec<Vec3>,
    next: usize,
    speed: f32,
}

impl ScriptedActor {
    fn new() -> Self {
        Self {
            pose: ActorPose::default(),
            waypoints: vec![
                Vec3::new(0.0, 0.0, -30.0),
                Vec3::new(30.0, 0.0, -30.0),
                Vec3::new(30.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 10.0),
            ],
            next: 0,
            speed: 1.4,
        }
    }

    fn update(&mut self, dt: f32) {
        let Some(&target) = self.waypoints.get(self.next) else {
            return;
        };

        let offset = target - self.pose.position;
        let step = self.speed * dt;
        if offset.length() <= step {
            self.pose.position = target;
            self.next = (self.next + 1) % self.waypoints.len();
            return;
        }

        let direction = offset.normalize();
        self.pose.position += direction * step;
        self.pose.orientation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
    }

    /// Jump somewhere else, dragging the whole route along
    fn teleport(&mut self, position: Vec3) {
        let delta = position - self.pose.position;
        self.pose.position = position;
        for waypoint in &mut self.waypoints {
            *waypoint += delta;
        }
    }
}

/// Flat ground with a ramp and a wall on it
fn build_level(physics: &mut Physics) {
    physics.add_ground_plane(0.0);

    // Ramp climbing toward -Z
    physics.add_static_box(
        Vec3::new(15.0, -0.5, -20.0),
        Quat::from_rotation_x(12.0_f32.to_radians()),
        Vec3::new(6.0, 0.5, 6.0),
    );

    // Wall across the start of the route
    physics.add_static_box(
        Vec3::new(0.0, 1.0, -12.0),
        Quat::IDENTITY,
        Vec3::new(4.0, 1.0, 0.2),
    );

    physics.update_queries();
}

fn load_config() -> CompanionConfig {
    let Some(path) = std::env::args().nth(1) else {
        return CompanionConfig::default();
    };

    match CompanionConfig::load_ron(&path) {
        Ok(config) => {
            log::info!("Loaded settings from {}", path);
            config
        }
        Err(err) => {
            log::warn!(
                "Using default settings, {} could not be loaded: {}",
                path,
                err
            );
            CompanionConfig::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut physics = Physics::new();
    build_level(&mut physics);

    let mut registry =
        CompanionRegistry::new(AppearanceCatalog::with_default_cats(), load_config());
    let mut actor = ScriptedActor::new();
    let mut events = EventQueue::new();
    events.push(CompanionEvent::SessionStarted);

    let dt = 1.0 / TICK_RATE;
    let ticks = (RUN_SECONDS * TICK_RATE) as u32;
    let teleport_at = ticks * 2 / 3;

    for frame in 0..ticks {
        events.swap();
        registry.process_events(&mut physics, &actor.pose, &mut events);

        actor.update(dt);
        if frame == teleport_at {
            actor.teleport(Vec3::new(-60.0, 0.0, 60.0));
            events.push(CompanionEvent::TeleportFinished);
        }

        physics.step(dt);
        if let Some(handle) = registry.current() {
            registry.tick(handle, dt, &actor.pose, &physics);
        }
        registry.sync_volumes(&mut physics);

        if frame % TICK_RATE as u32 == 0 {
            log_status(&registry, &actor, frame as f32 * dt);
        }
    }

    events.push(CompanionEvent::UnloadRequested);
    events.swap();
    registry.process_events(&mut physics, &actor.pose, &mut events);
}

fn log_status(registry: &CompanionRegistry, actor: &ScriptedActor, time: f32) {
    let Some(handle) = registry.current() else {
        log::info!("[{:5.1}s] no companion", time);
        return;
    };
    let Some(transform) = registry.transform(handle) else {
        return;
    };
    let Some(companion) = registry.companion(handle) else {
        return;
    };

    let distance = (actor.pose.position - transform.position).length();
    log::info!(
        "[{:5.1}s] {:<15} pos=({:6.2}, {:5.2}, {:6.2}) speed={:.2} sprinting={} actor {:.1}m away",
        time,
        companion.state().name(),
        transform.position.x,
        transform.position.y,
        transform.position.z,
        companion.speed(),
        companion.is_sprinting(),
        distance
    );
}
