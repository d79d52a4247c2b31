//! Companion lifecycle owner
//!
//! Holds the ECS world the companion lives in and at most one active
//! companion. Spawning, despawning, and respawning all go through here,
//! and so do the host's lifecycle events.

use glam::{Quat, Vec3};
use hecs::Entity;
use smallvec::SmallVec;

use super::behavior::{BehaviorState, ControlMode, TickOutcome};
use super::controller::{Companion, TickContext};
use super::ports::ReferenceActor;
use super::surface::{ProbeMarker, SurfaceProbe};
use crate::animation::CompanionAnimator;
use crate::assets::{AppearanceCatalog, AssetHandle, CreatureModel};
use crate::core::{CompanionConfig, CompanionEvent, EventQueue, SpawnError};
use crate::ecs::{Children, Name, Parent, Transform, World};
use crate::physics::{Physics, SpatialQuery};

/// Handle to a spawned companion.
///
/// Handles outlive the companion they point to; every operation taking a
/// stale handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompanionHandle(Entity);

impl CompanionHandle {
    /// Underlying ECS entity
    #[must_use]
    pub const fn entity(self) -> Entity {
        self.0
    }
}

/// Where and how to spawn a companion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub orientation: Quat,
    pub mode: ControlMode,
}

impl SpawnRequest {
    /// Spawn at a pose
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat, mode: ControlMode) -> Self {
        Self {
            position,
            orientation,
            mode,
        }
    }

    /// Spawn on foot, one meter ahead of the actor
    #[must_use]
    pub fn near(actor: &dyn ReferenceActor) -> Self {
        Self::new(
            actor.transform_point(Vec3::NEG_Z),
            Quat::IDENTITY,
            ControlMode::GroundFollow,
        )
    }
}

/// Owner of the active companion
pub struct CompanionRegistry {
    world: World,
    current: Option<CompanionHandle>,
    catalog: AppearanceCatalog,
    config: CompanionConfig,
}

impl CompanionRegistry {
    /// Create a registry with no companion
    pub fn new(catalog: AppearanceCatalog, config: CompanionConfig) -> Self {
        Self {
            world: World::new(),
            current: None,
            catalog,
            config,
        }
    }

    /// The active companion, if any
    pub fn current(&self) -> Option<CompanionHandle> {
        self.current
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn catalog_mut(&mut self) -> &mut AppearanceCatalog {
        &mut self.catalog
    }

    /// ECS world holding the companion and its foot markers
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn a companion, tearing down the current one first.
    ///
    /// Fails without creating anything if the configured appearance has no
    /// model in the catalog. The previous companion is gone either way.
    pub fn spawn(
        &mut self,
        physics: &mut Physics,
        request: SpawnRequest,
    ) -> Result<CompanionHandle, SpawnError> {
        if let Some(previous) = self.current.take() {
            self.despawn(physics, previous);
        }

        let appearance = self.config.appearance;
        let Some(model) = self.catalog.model_for(appearance) else {
            log::error!("Failed to load model for appearance {:?}", appearance);
            return Err(SpawnError::AppearanceUnavailable { appearance });
        };

        let transform = Transform::from_position_rotation(request.position, request.orientation);
        let radius = self.config.body_radius;
        let body = physics.add_ball_volume(volume_center(&transform, radius), radius);

        let companion = Companion::new(request.mode, self.config.clone()).with_body(body);
        let animator = CompanionAnimator::for_model(&model);
        let entity = self.world.spawn((
            companion,
            transform,
            animator,
            Name::new(model.name.clone()),
            model.clone(),
        ));

        let probe = SurfaceProbe::from_config(&self.config);
        let mut children = Children::new();
        for marker in probe.markers() {
            let child = self.world.spawn((
                marker,
                Parent::new(entity),
                Name::new(marker.kind.marker_name()),
            ));
            children.add(child);
        }

        if let Err(err) = self.world.insert_one(entity, children) {
            log::warn!("Failed to instantiate companion {}: {}", model.name, err);
            self.world.despawn_recursive(entity);
            physics.remove_collider(body);
            return Err(SpawnError::Instantiation {
                model: model.name.clone(),
            });
        }

        let handle = CompanionHandle(entity);
        self.current = Some(handle);
        log::info!("Spawned companion {} ({:?})", model.name, request.mode);
        Ok(handle)
    }

    /// Spawn on foot next to the actor
    pub fn spawn_near(
        &mut self,
        physics: &mut Physics,
        actor: &dyn ReferenceActor,
    ) -> Result<CompanionHandle, SpawnError> {
        self.spawn(physics, SpawnRequest::near(actor))
    }

    /// Remove a companion, its foot markers, and its collision volume.
    ///
    /// Returns false if the handle was already stale.
    pub fn despawn(&mut self, physics: &mut Physics, handle: CompanionHandle) -> bool {
        let body = match self.world.get::<Companion>(handle.0) {
            Ok(companion) => companion.body(),
            Err(_) => {
                log::trace!("Despawn of stale companion handle ignored");
                return false;
            }
        };

        if let Some(body) = body {
            physics.remove_collider(body);
        }
        let removed = self.world.despawn_recursive(handle.0);
        if self.current == Some(handle) {
            self.current = None;
        }

        log::info!("Despawned companion ({} entities)", removed);
        true
    }

    /// Remove the active companion, if there is one
    pub fn despawn_current(&mut self, physics: &mut Physics) -> bool {
        match self.current {
            Some(handle) => self.despawn(physics, handle),
            None => {
                log::info!("No companion to despawn");
                false
            }
        }
    }

    /// Respawn the active companion with the current settings, keeping its
    /// pose and control mode.
    ///
    /// Returns `Ok(None)` when there is no companion.
    pub fn refresh(
        &mut self,
        physics: &mut Physics,
    ) -> Result<Option<CompanionHandle>, SpawnError> {
        let Some(handle) = self.current else {
            return Ok(None);
        };
        let Some(request) = self.respawn_request(handle) else {
            return Ok(None);
        };

        let handle = self.spawn(physics, request)?;
        log::info!("Refreshed companion");
        Ok(Some(handle))
    }

    fn respawn_request(&self, handle: CompanionHandle) -> Option<SpawnRequest> {
        let transform = *self.world.get::<Transform>(handle.0).ok()?;
        let mode = self.world.get::<Companion>(handle.0).ok()?.mode();
        let request = SpawnRequest::new(transform.position, transform.rotation, mode);
        Some(request)
    }

    /// Advance a companion by `dt` seconds.
    ///
    /// Returns `None` for a stale handle.
    pub fn tick(
        &mut self,
        handle: CompanionHandle,
        dt: f32,
        actor: &dyn ReferenceActor,
        space: &dyn SpatialQuery,
    ) -> Option<TickOutcome> {
        let probe = self
            .probe_for(handle.0)
            .unwrap_or_else(|| SurfaceProbe::from_config(&self.config));

        let Ok((companion, transform, animator)) = self
            .world
            .inner
            .query_one_mut::<(&mut Companion, &mut Transform, &mut CompanionAnimator)>(handle.0)
        else {
            log::trace!("Tick of stale companion handle ignored");
            return None;
        };

        let outcome = companion.tick(
            transform,
            dt,
            TickContext {
                actor,
                space,
                animation: &mut *animator,
                probe,
            },
        );
        if dt > 0.0 {
            animator.update(dt);
        }
        Some(outcome)
    }

    /// Foot probe offsets from the companion's marker children
    fn probe_for(&self, entity: Entity) -> Option<SurfaceProbe> {
        let children = self.world.get::<Children>(entity).ok()?;
        let markers: SmallVec<[ProbeMarker; 2]> = children
            .iter()
            .filter_map(|child| self.world.get::<ProbeMarker>(*child).ok())
            .map(|marker| *marker)
            .collect();
        SurfaceProbe::from_markers(&markers)
    }

    /// Move the active companion's collision volume to its transform and
    /// refresh the query pipeline.
    pub fn sync_volumes(&self, physics: &mut Physics) {
        let Some(handle) = self.current else {
            return;
        };
        let (Ok(companion), Ok(transform)) = (
            self.world.get::<Companion>(handle.0),
            self.world.get::<Transform>(handle.0),
        ) else {
            return;
        };

        if let Some(body) = companion.body() {
            let radius = self.config.body_radius;
            physics.set_collider_pose(body, volume_center(&transform, radius), transform.rotation);
            physics.update_queries();
        }
    }

    /// React to a host lifecycle event
    pub fn handle_event(
        &mut self,
        physics: &mut Physics,
        actor: &dyn ReferenceActor,
        event: CompanionEvent,
    ) -> Result<(), SpawnError> {
        log::debug!("Handling {}", event.name());

        match event {
            CompanionEvent::SessionStarted => {
                self.spawn_near(physics, actor)?;
            }
            CompanionEvent::TeleportFinished => {
                let Some(transform) = self.current.and_then(|h| self.transform(h)) else {
                    log::trace!("Teleport finished with no companion");
                    return Ok(());
                };
                let distance_squared = (actor.position() - transform.position).length_squared();
                if distance_squared > self.config.teleport_distance_squared() {
                    self.spawn_near(physics, actor)?;
                }
            }
            CompanionEvent::UnloadRequested => {
                self.despawn_current(physics);
            }
            CompanionEvent::SettingsChanged(config) => {
                if let Err(err) = config.validate() {
                    log::warn!("Ignoring invalid companion settings: {}", err);
                    return Ok(());
                }
                self.config = config;
                self.refresh(physics)?;
            }
        }
        Ok(())
    }

    /// Handle every event that is ready in the queue.
    ///
    /// Failures are logged and do not stop later events.
    pub fn process_events(
        &mut self,
        physics: &mut Physics,
        actor: &dyn ReferenceActor,
        queue: &mut EventQueue,
    ) {
        for event in queue.drain() {
            let name = event.name();
            if let Err(err) = self.handle_event(physics, actor, event) {
                log::warn!("{} not applied: {}", name, err);
            }
        }
    }

    /// Copy of a companion's transform
    pub fn transform(&self, handle: CompanionHandle) -> Option<Transform> {
        self.world.get::<Transform>(handle.0).ok().map(|t| *t)
    }

    pub fn state(&self, handle: CompanionHandle) -> Option<BehaviorState> {
        self.companion(handle).map(|c| c.state())
    }

    pub fn companion(&self, handle: CompanionHandle) -> Option<hecs::Ref<'_, Companion>> {
        self.world.get::<Companion>(handle.0).ok()
    }

    pub fn animator(&self, handle: CompanionHandle) -> Option<hecs::Ref<'_, CompanionAnimator>> {
        self.world.get::<CompanionAnimator>(handle.0).ok()
    }

    /// Model the companion was spawned with
    pub fn model(&self, handle: CompanionHandle) -> Option<AssetHandle<CreatureModel>> {
        self.world
            .get::<AssetHandle<CreatureModel>>(handle.0)
            .ok()
            .map(|model| (*model).clone())
    }
}

impl Default for CompanionRegistry {
    fn default() -> Self {
        Self::new(
            AppearanceCatalog::with_default_cats(),
            CompanionConfig::default(),
        )
    }
}

/// Center of the body volume, resting on the ground under the transform
fn volume_center(transform: &Transform, radius: f32) -> Vec3 {
    transform.transform_point(Vec3::Y * radius)
}
