//! Companion controller
//!
//! One [`Companion`] component per agent. Each tick runs the transition
//! checks in priority order (catch up with the actor, return to wandering,
//! idle countdown, arrival) and stops at the first one that fires. Only a
//! tick that fires none of them moves the body.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::behavior::{Behavior, BehaviorState, ControlMode, TickOutcome};
use super::motion::{
    SprintLatch, animation_speed, look_rotation, planar_distance_squared, project_on_plane,
    rotate_towards, smooth_damp,
};
use super::ports::{AnimationPort, ReferenceActor};
use super::surface::{SurfaceProbe, sample_surface};
use super::wander::{WanderDraw, resolve_wander_target, uniform};
use crate::core::CompanionConfig;
use crate::ecs::Transform;
use crate::physics::{ColliderHandle, SpatialQuery};

/// Collaborators a single tick reads from and writes to
pub struct TickContext<'a> {
    /// The actor being followed
    pub actor: &'a dyn ReferenceActor,
    /// Level geometry for obstacle and ground probes
    pub space: &'a dyn SpatialQuery,
    /// Animation outputs
    pub animation: &'a mut dyn AnimationPort,
    /// Foot probe offsets
    pub probe: SurfaceProbe,
}

/// Behavior and locomotion state of one companion.
#[derive(Debug, Clone)]
pub struct Companion {
    mode: ControlMode,
    behavior: Behavior,
    speed: f32,
    speed_velocity: f32,
    movement_block: f32,
    sprint: SprintLatch,
    body: Option<ColliderHandle>,
    rng: StdRng,
    config: CompanionConfig,
}

impl Companion {
    /// Create an idle companion with a fresh idle countdown
    pub fn new(mode: ControlMode, config: CompanionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut companion = Self {
            mode,
            behavior: Behavior::Idle { countdown: 0.0 },
            speed: 0.0,
            speed_velocity: 0.0,
            movement_block: 0.0,
            sprint: SprintLatch::default(),
            body: None,
            rng,
            config,
        };
        companion.behavior = Behavior::Idle {
            countdown: companion.draw_idle_duration(),
        };
        companion
    }

    /// Attach the collision volume that probes must ignore
    #[must_use]
    pub fn with_body(mut self, body: ColliderHandle) -> Self {
        self.body = Some(body);
        self
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn state(&self) -> BehaviorState {
        self.behavior.state()
    }

    /// Current destination; `None` while idle
    pub fn destination(&self) -> Option<Vec3> {
        self.behavior.destination()
    }

    /// Seconds left on the idle countdown; `None` unless idle
    pub fn idle_countdown(&self) -> Option<f32> {
        match self.behavior {
            Behavior::Idle { countdown } => Some(countdown),
            _ => None,
        }
    }

    /// Current linear speed, never negative
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Seconds left before motion may start
    pub fn movement_block(&self) -> f32 {
        self.movement_block
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint.is_sprinting()
    }

    /// Own collision volume, if any
    pub fn body(&self) -> Option<ColliderHandle> {
        self.body
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    /// Advance one simulation step of `dt` seconds.
    ///
    /// Only `transform` and the animation outputs are written.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        dt: f32,
        ctx: TickContext<'_>,
    ) -> TickOutcome {
        if !(dt > 0.0) {
            return TickOutcome::Waiting;
        }

        let TickContext {
            actor,
            space,
            animation,
            probe,
        } = ctx;
        let from = self.behavior.state();

        if self.is_too_far(transform.position, actor) {
            let actor_position = actor.position();
            if let Behavior::Following { target } = &mut self.behavior {
                *target = actor_position;
            } else {
                self.behavior = Behavior::Following {
                    target: actor_position,
                };
                self.prepare_for_move(animation);
                return self.transitioned(from);
            }
        } else if from == BehaviorState::Following {
            self.choose_wander_target(transform.position, actor, space, animation);
            return self.transitioned(from);
        }

        if let Behavior::Idle { countdown } = &mut self.behavior {
            *countdown -= dt;
            if *countdown > 0.0 {
                return TickOutcome::Waiting;
            }
            self.choose_wander_target(transform.position, actor, space, animation);
            return self.transitioned(from);
        }

        let Some(target) = self.behavior.destination() else {
            return TickOutcome::Waiting;
        };

        if planar_distance_squared(transform.position, target)
            <= self.config.arrival_radius_squared
        {
            self.behavior = Behavior::Idle {
                countdown: self.draw_idle_duration(),
            };
            self.set_speed(0.0, animation);
            return self.transitioned(from);
        }

        if self.movement_block > 0.0 {
            self.movement_block -= dt;
            if self.movement_block > 0.0 {
                return TickOutcome::Blocked;
            }
            self.movement_block = 0.0;
        }

        self.advance(transform, target, dt, space, animation, &probe);
        TickOutcome::Moved
    }

    fn is_too_far(&self, position: Vec3, actor: &dyn ReferenceActor) -> bool {
        match self.mode {
            ControlMode::CarWander => false,
            ControlMode::GroundFollow => {
                planar_distance_squared(position, actor.position())
                    > self.config.max_follow_distance_squared()
            }
        }
    }

    fn transitioned(&self, from: BehaviorState) -> TickOutcome {
        let to = self.behavior.state();
        if from == to {
            return TickOutcome::Waiting;
        }
        log::debug!("Companion {} -> {}", from, to);
        TickOutcome::Transitioned { from, to }
    }

    fn draw_idle_duration(&mut self) -> f32 {
        uniform(
            &mut self.rng,
            self.config.min_idle_time,
            self.config.max_idle_time,
        )
    }

    /// Hold motion until the current clip cycle finishes, but only when
    /// starting from a standstill.
    fn prepare_for_move(&mut self, animation: &dyn AnimationPort) {
        if !(self.speed > 0.0 || self.movement_block > 0.0) {
            self.movement_block = animation.remaining_cycle_time().max(0.0);
        }
    }

    fn choose_wander_target(
        &mut self,
        position: Vec3,
        actor: &dyn ReferenceActor,
        space: &dyn SpatialQuery,
        animation: &dyn AnimationPort,
    ) {
        match self.mode {
            ControlMode::GroundFollow => {
                let draw = WanderDraw::random(&mut self.rng, &self.config);
                let target =
                    resolve_wander_target(position, actor, draw, space, self.body, &self.config);
                self.behavior = Behavior::MoveTowardPoint { target };
                self.prepare_for_move(animation);
            }
            ControlMode::CarWander => {
                let countdown = self.draw_idle_duration();
                log::trace!("No wander policy in car mode, idling for {:.1}s", countdown);
                self.behavior = Behavior::Idle { countdown };
            }
        }
    }

    fn set_speed(&mut self, speed: f32, animation: &mut dyn AnimationPort) {
        self.speed = speed;
        if speed == 0.0 {
            self.speed_velocity = 0.0;
        }

        animation.set_moving(speed != 0.0);
        animation.set_speed_multiplier(animation_speed(speed, self.config.anim_speed_scale));
    }

    fn advance(
        &mut self,
        transform: &mut Transform,
        target: Vec3,
        dt: f32,
        space: &dyn SpatialQuery,
        animation: &mut dyn AnimationPort,
        probe: &SurfaceProbe,
    ) {
        let start_rotation = transform.rotation;
        let max_turn = self.config.max_turn_radians();

        let to_target = project_on_plane(target - transform.position, Vec3::Y);
        let distance_squared = to_target.length_squared();

        let sprinting = self.sprint.update(
            distance_squared,
            self.config.max_follow_distance_squared(),
            self.config.sprint_distance_squared(),
        );
        let target_speed = if sprinting {
            self.config.sprint_speed
        } else {
            self.config.walk_speed
        };
        let speed = smooth_damp(
            self.speed,
            target_speed,
            &mut self.speed_velocity,
            dt * self.config.speed_smoothing,
            dt,
        );
        self.set_speed(speed.max(0.0), animation);

        if let Some(heading) = look_rotation(to_target, Vec3::Y) {
            transform.rotation = rotate_towards(transform.rotation, heading, max_turn);
        }

        let step = self.speed * dt;
        if distance_squared < step * step {
            transform.position = target;
        } else {
            transform.position += transform.forward() * step;
        }

        self.align_to_surface(transform, space, probe, max_turn);

        // Steering and alignment share one turn budget per tick
        transform.rotation = rotate_towards(start_rotation, transform.rotation, max_turn);
    }

    fn align_to_surface(
        &self,
        transform: &mut Transform,
        space: &dyn SpatialQuery,
        probe: &SurfaceProbe,
        max_turn: f32,
    ) {
        let Some(contact) = sample_surface(
            space,
            transform,
            probe,
            self.config.ground_probe_depth,
            self.body,
        ) else {
            log::trace!("Foot probe found no ground, alignment skipped");
            return;
        };

        transform.position = contact.position;
        if let Some(rotation) = contact.rotation {
            transform.rotation = rotate_towards(transform.rotation, rotation, max_turn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companion::ActorPose;
    use crate::physics::{Physics, RayHits, RaycastHit};
    use approx::assert_abs_diff_eq;
    use glam::Quat;

    const DT: f32 = 1.0 / 60.0;

    /// Animation port that remembers everything written to it
    #[derive(Default)]
    struct Recorder {
        moving: Vec<bool>,
        multipliers: Vec<f32>,
        remaining: f32,
    }

    impl AnimationPort for Recorder {
        fn set_moving(&mut self, moving: bool) {
            self.moving.push(moving);
        }

        fn set_speed_multiplier(&mut self, multiplier: f32) {
            self.multipliers.push(multiplier);
        }

        fn remaining_cycle_time(&self) -> f32 {
            self.remaining
        }
    }

    struct Empty;

    impl SpatialQuery for Empty {
        fn ray_hits(&self, _: Vec3, _: Vec3, _: f32, _: &mut RayHits) {}
    }

    /// Infinite horizontal floor at a fixed height
    struct Floor(f32);

    impl SpatialQuery for Floor {
        fn ray_hits(&self, origin: Vec3, direction: Vec3, max_distance: f32, hits: &mut RayHits) {
            if direction.y >= 0.0 {
                return;
            }
            let distance = (origin.y - self.0) / -direction.y;
            if (0.0..=max_distance).contains(&distance) {
                hits.push(RaycastHit {
                    collider: ColliderHandle(
                        rapier3d::geometry::ColliderHandle::from_raw_parts(1, 0),
                    ),
                    point: origin + direction * distance,
                    distance,
                });
            }
        }
    }

    fn companion(mode: ControlMode) -> Companion {
        Companion::new(mode, CompanionConfig::default().with_seed(7))
    }

    fn tick(
        companion: &mut Companion,
        transform: &mut Transform,
        dt: f32,
        actor: &ActorPose,
        space: &dyn SpatialQuery,
        animation: &mut Recorder,
    ) -> TickOutcome {
        let probe = SurfaceProbe::from_config(companion.config());
        companion.tick(
            transform,
            dt,
            TickContext {
                actor,
                space,
                animation,
                probe,
            },
        )
    }

    #[test]
    fn test_new_companion_is_idle() {
        let companion = companion(ControlMode::GroundFollow);
        let countdown = companion.idle_countdown().unwrap();

        assert_eq!(companion.state(), BehaviorState::Idle);
        assert!((1.0..20.0).contains(&countdown));
        assert_eq!(companion.speed(), 0.0);
        assert_eq!(companion.destination(), None);
    }

    #[test]
    fn test_far_actor_starts_following() {
        let mut companion = companion(ControlMode::GroundFollow);
        let mut transform = Transform::default();
        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 25.0));
        let mut animation = Recorder {
            remaining: 0.4,
            ..Default::default()
        };

        let outcome = tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut animation,
        );

        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: BehaviorState::Idle,
                to: BehaviorState::Following
            }
        );
        assert_eq!(companion.destination(), Some(actor.position));
        // Waits out the idle clip before running off
        assert_eq!(companion.movement_block(), 0.4);
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_following_tracks_moving_actor() {
        let mut companion = companion(ControlMode::GroundFollow);
        let mut transform = Transform::default();
        let mut animation = Recorder::default();

        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 25.0));
        tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut animation,
        );

        let moved = ActorPose::at(Vec3::new(3.0, 0.0, 26.0));
        let outcome = tick(
            &mut companion,
            &mut transform,
            DT,
            &moved,
            &Empty,
            &mut animation,
        );

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(companion.destination(), Some(moved.position));
        assert!(companion.speed() > 0.0);
        assert!(transform.position.length() > 0.0);
    }

    #[test]
    fn test_actor_height_does_not_count() {
        let mut companion = companion(ControlMode::GroundFollow);
        let mut transform = Transform::default();
        // 30m straight up is still right next to the companion
        let actor = ActorPose::at(Vec3::new(0.0, 30.0, 1.0));

        tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut Recorder::default(),
        );
        assert_eq!(companion.state(), BehaviorState::Idle);
    }

    #[test]
    fn test_return_to_wander_when_caught_up() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::Following {
            target: Vec3::new(0.0, 0.0, 25.0),
        };
        let mut transform = Transform::default();
        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 5.0));

        let outcome = tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut Recorder::default(),
        );

        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: BehaviorState::Following,
                to: BehaviorState::MoveTowardPoint
            }
        );
        let target = companion.destination().unwrap();
        assert!(planar_distance_squared(actor.position, target) < 401.0);
    }

    #[test]
    fn test_idle_countdown_picks_wander_target() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::Idle { countdown: 0.03 };
        let mut transform = Transform::default();
        let actor = ActorPose::default();
        let mut animation = Recorder {
            remaining: 1.5,
            ..Default::default()
        };

        let first = tick(
            &mut companion,
            &mut transform,
            0.02,
            &actor,
            &Empty,
            &mut animation,
        );
        assert_eq!(first, TickOutcome::Waiting);
        assert_abs_diff_eq!(companion.idle_countdown().unwrap(), 0.01, epsilon = 1e-6);

        let second = tick(
            &mut companion,
            &mut transform,
            0.02,
            &actor,
            &Empty,
            &mut animation,
        );
        assert_eq!(
            second,
            TickOutcome::Transitioned {
                from: BehaviorState::Idle,
                to: BehaviorState::MoveTowardPoint
            }
        );
        let distance = companion.destination().unwrap().length();
        assert!(distance >= 0.5 - 1e-4 && distance < 20.0);
        assert_eq!(companion.movement_block(), 1.5);
    }

    #[test]
    fn test_wander_target_stops_short_of_real_wall() {
        let config = CompanionConfig::default();
        let mut physics = Physics::new();
        // Square pen with inner faces 4m from the origin
        for (center, half_extents) in [
            (Vec3::new(0.0, 1.0, -4.25), Vec3::new(4.5, 1.0, 0.25)),
            (Vec3::new(0.0, 1.0, 4.25), Vec3::new(4.5, 1.0, 0.25)),
            (Vec3::new(-4.25, 1.0, 0.0), Vec3::new(0.25, 1.0, 4.5)),
            (Vec3::new(4.25, 1.0, 0.0), Vec3::new(0.25, 1.0, 4.5)),
        ] {
            physics.add_static_box(center, Quat::IDENTITY, half_extents);
        }
        // Own volume encloses the obstacle ray origin
        let body = physics.add_ball_volume(Vec3::Y * config.obstacle_probe_height, 0.6);
        physics.update_queries();

        let actor = ActorPose::default();
        let mut shortened = 0;
        for seed in 0..8 {
            let seeded = config.clone().with_seed(seed);
            let mut companion = Companion::new(ControlMode::GroundFollow, seeded);
            companion.body = Some(body);
            companion.behavior = Behavior::Idle { countdown: 0.01 };
            let mut transform = Transform::default();
            let mut animation = Recorder::default();
            tick(
                &mut companion,
                &mut transform,
                DT,
                &actor,
                &physics,
                &mut animation,
            );

            let destination = companion.destination().unwrap();
            let distance = destination.length();
            let direction = destination / distance;
            let wall = 4.0 / direction.x.abs().max(direction.z.abs());

            assert!(distance >= config.personal_space - 1e-4);
            assert!(distance < wall);
            if (distance - (wall - config.personal_space)).abs() < 1e-3 {
                shortened += 1;
            }
        }
        assert!(shortened > 0);
    }

    #[test]
    fn test_car_wander_never_follows_or_wanders() {
        let mut companion = companion(ControlMode::CarWander);
        companion.behavior = Behavior::Idle { countdown: 0.01 };
        let mut transform = Transform::default();
        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 100.0));

        let outcome = tick(
            &mut companion,
            &mut transform,
            0.02,
            &actor,
            &Empty,
            &mut Recorder::default(),
        );

        assert_eq!(outcome, TickOutcome::Waiting);
        assert_eq!(companion.state(), BehaviorState::Idle);
        assert_eq!(companion.destination(), None);
        assert!(companion.idle_countdown().unwrap() >= 1.0);
        assert_eq!(companion.movement_block(), 0.0);
    }

    #[test]
    fn test_arrival_goes_idle() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.0, 0.05),
        };
        companion.speed = 1.2;
        companion.speed_velocity = 0.3;
        let mut transform = Transform::default();
        let mut animation = Recorder::default();

        let outcome = tick(
            &mut companion,
            &mut transform,
            DT,
            &ActorPose::default(),
            &Empty,
            &mut animation,
        );

        assert_eq!(
            outcome,
            TickOutcome::Transitioned {
                from: BehaviorState::MoveTowardPoint,
                to: BehaviorState::Idle
            }
        );
        assert_eq!(companion.destination(), None);
        assert_eq!(companion.speed(), 0.0);
        assert_eq!(companion.speed_velocity, 0.0);
        assert!((1.0..20.0).contains(&companion.idle_countdown().unwrap()));
        assert_eq!(animation.moving, vec![false]);
        assert_eq!(animation.multipliers, vec![1.0]);
    }

    #[test]
    fn test_arrival_within_radius_from_any_side() {
        let radius = CompanionConfig::default().arrival_radius_squared.sqrt();

        for i in 0..16 {
            let bearing = i as f32 * std::f32::consts::TAU / 16.0;
            for fraction in [0.0, 0.5, 0.99] {
                let offset = Quat::from_rotation_y(bearing) * Vec3::NEG_Z * radius * fraction;
                let position = Vec3::new(2.0, 0.0, -3.0);

                let mut companion = companion(ControlMode::GroundFollow);
                companion.behavior = Behavior::MoveTowardPoint {
                    target: position + offset + Vec3::Y * 0.4,
                };
                companion.speed = 3.0;
                let mut transform = Transform::from_position(position);
                let actor = ActorPose::at(position);

                tick(
                    &mut companion,
                    &mut transform,
                    DT,
                    &actor,
                    &Empty,
                    &mut Recorder::default(),
                );
                assert_eq!(companion.state(), BehaviorState::Idle);
                assert_eq!(companion.speed(), 0.0);
            }
        }
    }

    #[test]
    fn test_movement_block_delays_motion() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.0, -5.0),
        };
        companion.movement_block = 0.04;
        let mut transform = Transform::default();
        let actor = ActorPose::default();
        let mut animation = Recorder::default();

        for _ in 0..2 {
            let outcome = tick(
                &mut companion,
                &mut transform,
                DT,
                &actor,
                &Empty,
                &mut animation,
            );
            assert_eq!(outcome, TickOutcome::Blocked);
            assert_eq!(transform.position, Vec3::ZERO);
        }
        assert!(animation.moving.is_empty());

        let outcome = tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut animation,
        );
        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(companion.movement_block(), 0.0);
        assert!(transform.position.z < 0.0);
    }

    #[test]
    fn test_prepare_for_move_skipped_while_moving() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.speed = 1.0;
        let mut transform = Transform::default();
        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 25.0));
        let mut animation = Recorder {
            remaining: 2.0,
            ..Default::default()
        };

        tick(
            &mut companion,
            &mut transform,
            DT,
            &actor,
            &Empty,
            &mut animation,
        );
        assert_eq!(companion.state(), BehaviorState::Following);
        assert_eq!(companion.movement_block(), 0.0);
    }

    #[test]
    fn test_moving_drives_animation() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.0, -5.0),
        };
        let mut transform = Transform::default();
        let mut animation = Recorder::default();

        tick(
            &mut companion,
            &mut transform,
            DT,
            &ActorPose::default(),
            &Empty,
            &mut animation,
        );

        assert_eq!(animation.moving, vec![true]);
        let multiplier = animation.multipliers[0];
        assert!(multiplier >= 0.1);
        assert_abs_diff_eq!(
            multiplier,
            (companion.speed() * 0.75).max(0.1),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_no_overshoot_snaps_to_destination() {
        let mut companion = companion(ControlMode::GroundFollow);
        let target = Vec3::new(0.0, 0.0, -0.5);
        companion.behavior = Behavior::MoveTowardPoint { target };
        companion.speed = 3.9;
        let mut transform = Transform::default();

        // 0.5s at >= 1.6 m/s covers far more than the 0.5m left
        let outcome = tick(
            &mut companion,
            &mut transform,
            0.5,
            &ActorPose::default(),
            &Empty,
            &mut Recorder::default(),
        );

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(transform.position, target);
    }

    #[test]
    fn test_advances_along_forward() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.0, -10.0),
        };
        let mut transform = Transform::default();

        tick(
            &mut companion,
            &mut transform,
            DT,
            &ActorPose::default(),
            &Empty,
            &mut Recorder::default(),
        );

        let expected = companion.speed() * DT;
        assert_abs_diff_eq!(transform.position.z, -expected, epsilon = 1e-6);
        assert_abs_diff_eq!(transform.position.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sprint_hysteresis_through_ticks() {
        let mut companion = companion(ControlMode::GroundFollow);
        let mut transform = Transform::default();
        let actor = ActorPose::default();
        let mut animation = Recorder::default();

        let mut walk_to = |companion: &mut Companion, transform: &mut Transform, z: f32| {
            companion.behavior = Behavior::MoveTowardPoint {
                target: Vec3::new(0.0, 0.0, z),
            };
            tick(companion, transform, DT, &actor, &Empty, &mut animation);
            companion.is_sprinting()
        };

        // Inside the band from a standstill: keep walking
        assert!(!walk_to(&mut companion, &mut transform, -30.0));
        // Past 4 * D_max^2
        assert!(walk_to(&mut companion, &mut transform, -45.0));
        // Back inside the band: keep sprinting
        assert!(walk_to(&mut companion, &mut transform, -30.0));
        assert!(walk_to(&mut companion, &mut transform, -21.0));
        // Below D_max^2
        assert!(!walk_to(&mut companion, &mut transform, -15.0));
    }

    #[test]
    fn test_turn_rate_is_bounded() {
        let max_turn = CompanionConfig::default().max_turn_radians();

        for i in 0..12 {
            let bearing = i as f32 * 30.0_f32.to_radians();
            let target = Quat::from_rotation_y(bearing) * Vec3::new(0.0, 0.0, -8.0);

            // Start pitched hard so ground alignment also wants a big turn
            let start = Quat::from_rotation_x(1.0);
            let mut transform = Transform::from_position_rotation(Vec3::ZERO, start);
            let mut companion = companion(ControlMode::GroundFollow);
            companion.behavior = Behavior::MoveTowardPoint { target };

            let mut previous = transform.rotation;
            for _ in 0..30 {
                tick(
                    &mut companion,
                    &mut transform,
                    DT,
                    &ActorPose::default(),
                    &Floor(0.0),
                    &mut Recorder::default(),
                );
                let turned = previous.angle_between(transform.rotation);
                assert!(turned <= max_turn + 1e-4, "turned {turned} rad in one tick");
                previous = transform.rotation;
            }
        }
    }

    #[test]
    fn test_settles_on_floor() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.0, -10.0),
        };
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.3, 0.0));

        tick(
            &mut companion,
            &mut transform,
            DT,
            &ActorPose::default(),
            &Floor(0.0),
            &mut Recorder::default(),
        );

        assert_abs_diff_eq!(transform.position.y, 0.0, epsilon = 1e-5);
        assert!((transform.up() - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_probe_miss_skips_alignment() {
        let mut companion = companion(ControlMode::GroundFollow);
        companion.behavior = Behavior::MoveTowardPoint {
            target: Vec3::new(0.0, 0.3, -10.0),
        };
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.3, 0.0));

        // Floor far below the probes' reach
        tick(
            &mut companion,
            &mut transform,
            DT,
            &ActorPose::default(),
            &Floor(-50.0),
            &mut Recorder::default(),
        );

        assert_abs_diff_eq!(transform.position.y, 0.3, epsilon = 1e-6);
        assert!(transform.position.z < 0.0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut companion = companion(ControlMode::GroundFollow);
        let before = companion.idle_countdown();
        let mut transform = Transform::default();
        let actor = ActorPose::at(Vec3::new(0.0, 0.0, 25.0));
        let mut animation = Recorder::default();

        for dt in [0.0, -1.0] {
            let outcome = tick(
                &mut companion,
                &mut transform,
                dt,
                &actor,
                &Empty,
                &mut animation,
            );
            assert_eq!(outcome, TickOutcome::Waiting);
        }
        assert_eq!(companion.state(), BehaviorState::Idle);
        assert_eq!(companion.idle_countdown(), before);
    }

    #[test]
    fn test_seeded_companions_agree() {
        let a = companion(ControlMode::GroundFollow);
        let b = companion(ControlMode::GroundFollow);
        assert_eq!(a.idle_countdown(), b.idle_countdown());
    }
}
