//! Ground conforming
//!
//! Two foot probes, one ahead of and one behind the body center, cast
//! straight down. The body is placed on the midpoint of the two contacts
//! and pitched along the line from the rear contact to the front one.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use super::motion::look_rotation;
use crate::core::CompanionConfig;
use crate::ecs::Transform;
use crate::physics::{ColliderHandle, SpatialQuery, resolve_ray};

/// Which foot a probe marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    /// Ahead of the body center
    Front,
    /// Behind the body center
    Rear,
}

impl ProbeKind {
    /// Name given to the marker entity
    #[must_use]
    pub const fn marker_name(self) -> &'static str {
        match self {
            Self::Front => "[front foot]",
            Self::Rear => "[rear foot]",
        }
    }
}

/// ECS component marking a foot probe owned by a companion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeMarker {
    /// Which foot
    pub kind: ProbeKind,
    /// Offset from the companion, in its local space
    pub local_offset: Vec3,
}

/// Local offsets of the two foot probes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProbe {
    /// Front probe origin, companion local space
    pub front: Vec3,
    /// Rear probe origin, companion local space
    pub rear: Vec3,
}

impl SurfaceProbe {
    /// Probes `foot_offset` ahead and behind, `surface_probe_height` up
    #[must_use]
    pub fn from_config(config: &CompanionConfig) -> Self {
        let height = Vec3::Y * config.surface_probe_height;
        let along = Vec3::NEG_Z * config.foot_offset;
        Self {
            front: height + along,
            rear: height - along,
        }
    }

    /// Rebuild from marker components; `None` unless both feet are present
    #[must_use]
    pub fn from_markers<'a>(markers: impl IntoIterator<Item = &'a ProbeMarker>) -> Option<Self> {
        let mut front = None;
        let mut rear = None;
        for marker in markers {
            match marker.kind {
                ProbeKind::Front => front = Some(marker.local_offset),
                ProbeKind::Rear => rear = Some(marker.local_offset),
            }
        }
        Some(Self {
            front: front?,
            rear: rear?,
        })
    }

    /// Marker components for both feet
    #[must_use]
    pub const fn markers(&self) -> [ProbeMarker; 2] {
        [
            ProbeMarker {
                kind: ProbeKind::Front,
                local_offset: self.front,
            },
            ProbeMarker {
                kind: ProbeKind::Rear,
                local_offset: self.rear,
            },
        ]
    }

    /// World-space probe origins for the given pose, as (front, rear)
    #[must_use]
    pub fn world_origins(&self, transform: &Transform) -> (Vec3, Vec3) {
        (
            transform.transform_point(self.front),
            transform.transform_point(self.rear),
        )
    }
}

/// Where the ground says the body should rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceContact {
    /// Midpoint between the two foot contacts
    pub position: Vec3,
    /// Orientation along the slope; `None` when both feet hit the same point
    pub rotation: Option<Quat>,
}

/// Probe the ground under both feet.
///
/// Returns `None` if either probe finds nothing within `depth`.
pub fn sample_surface<S: SpatialQuery + ?Sized>(
    space: &S,
    transform: &Transform,
    probe: &SurfaceProbe,
    depth: f32,
    body: Option<ColliderHandle>,
) -> Option<SurfaceContact> {
    let (front_origin, rear_origin) = probe.world_origins(transform);
    let front = resolve_ray(space, front_origin, Vec3::NEG_Y, depth, body)?;
    let rear = resolve_ray(space, rear_origin, Vec3::NEG_Y, depth, body)?;

    let position = (front.point + rear.point) * 0.5;

    // A quarter turn about the body's right axis takes the foot line to
    // the slope normal
    let look_dir = front.point - rear.point;
    let up = Quat::from_axis_angle(transform.right(), FRAC_PI_2) * look_dir;
    let rotation = look_rotation(look_dir, up);

    Some(SurfaceContact { position, rotation })
}
