//! Per-object collision records

use crate::foundation::math::Vec3;
use crate::geometry::plane::{PlaneRelation, PlaneSide};
use crate::geometry::{Aabb, Frustum, Plane};
use crate::physics::ShapeHandle;
use crate::scene::Selectable;

/// Which collision world an object's shape lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldKind {
    /// Regular selectable objects
    Objects,
    /// Landscape terrain, queried separately for ground snapping
    Landscape,
}

/// Collision record for one selectable object
#[derive(Debug, Clone)]
pub struct CollisionObject {
    /// Object this record mirrors
    pub key: Selectable,
    /// Handle of the shape in its collision world
    pub handle: ShapeHandle,
    /// World the shape lives in
    pub world: WorldKind,
    /// Bounding box relative to the object position
    pub local_box: Aabb,
}

impl CollisionObject {
    /// Bounding box in world space, given the object's current position
    pub fn world_box(&self, position: Vec3) -> Aabb {
        self.local_box.translated(position)
    }

    /// Classify the world-space box against a single plane
    pub fn classify_to_plane(&self, position: Vec3, plane: &Plane) -> PlaneSide {
        plane.classify_aabb(&self.world_box(position))
    }

    /// Classify the world-space box against a plane set, returning `Outside`
    /// as soon as any plane has the box entirely behind it.
    pub fn classify_to_planes(&self, position: Vec3, frustum: &Frustum) -> PlaneRelation {
        frustum.classify_aabb(&self.world_box(position))
    }
}
