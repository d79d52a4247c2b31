//! Physics world using rapier3d
//!
//! The companion never simulates dynamics itself. It needs static level
//! geometry to probe, its own collision volume to exclude from those
//! probes, and a query pipeline to cast rays against.

use glam::{Quat, Vec3};
use rapier3d::na::{self, UnitQuaternion};
use rapier3d::prelude::*;

use super::query::{MAX_RAY_HITS, RayHits, RaycastHit, SpatialQuery};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert a glam pose to a rapier isometry
fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        na::Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Rebuild the query pipeline from current collider poses without
    /// stepping the simulation
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a box collider to a rigid body
    pub fn add_box_collider(
        &mut self,
        body: RigidBodyHandle,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a static box to the level in one call
    pub fn add_static_box(
        &mut self,
        center: Vec3,
        rotation: Quat,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let body = self.create_static_body(center, rotation);
        self.add_box_collider(body, half_extents)
    }

    /// Add a flat 200 x 200 ground slab whose top face sits at `height`
    pub fn add_ground_plane(&mut self, height: f32) -> ColliderHandle {
        self.add_static_box(
            Vec3::new(0.0, height - 0.1, 0.0),
            Quat::IDENTITY,
            Vec3::new(100.0, 0.1, 100.0),
        )
    }

    /// Add a free-standing ball collider, not attached to any body.
    ///
    /// Used for volumes the host moves by hand, such as a companion's body.
    pub fn add_ball_volume(&mut self, position: Vec3, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![position.x, position.y, position.z])
            .build();

        ColliderHandle(self.collider_set.insert(collider))
    }

    /// Move a free-standing collider
    pub fn set_collider_pose(&mut self, collider: ColliderHandle, position: Vec3, rotation: Quat) {
        if let Some(c) = self.collider_set.get_mut(collider.0) {
            c.set_position(isometry(position, rotation));
        }
    }

    /// Get the world position of a collider
    pub fn collider_position(&self, collider: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(collider.0).map(|c| {
            let pos = c.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Check if a collider exists
    pub fn contains_collider(&self, collider: ColliderHandle) -> bool {
        self.collider_set.contains(collider.0)
    }

    /// Remove a collider
    ///
    /// Returns true if the collider existed
    pub fn remove_collider(&mut self, collider: ColliderHandle) -> bool {
        self.collider_set
            .remove(
                collider.0,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .is_some()
    }

    /// Number of colliders in the world
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for Physics {
    fn ray_hits(&self, origin: Vec3, direction: Vec3, max_distance: f32, hits: &mut RayHits) {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                let point = ray.point_at(intersection.time_of_impact);
                hits.push(RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance: intersection.time_of_impact,
                });
                hits.len() < MAX_RAY_HITS
            },
        );
    }
}
