//! Collision world
//!
//! A flat container of world-space shapes with segment queries. The
//! broadphase is a linear scan over shape bounds, which is plenty for editor
//! scenes; queries count narrowphase tests so callers can assert caching
//! behavior.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, SegmentHit};
use crate::physics::shape::CollisionShape;

new_key_type! {
    /// Handle to a shape stored in a collision world
    pub struct ShapeHandle;
}

/// Hit returned by world ray tests
#[derive(Debug, Clone, Copy)]
pub struct WorldRayHit {
    /// Shape that was hit
    pub handle: ShapeHandle,
    /// Segment intersection details
    pub hit: SegmentHit,
}

#[derive(Debug)]
struct WorldShape {
    shape: CollisionShape,
    bounds: Aabb,
}

/// Container of collision shapes supporting segment queries
#[derive(Debug, Default)]
pub struct CollisionWorld {
    shapes: SlotMap<ShapeHandle, WorldShape>,
    ray_test_count: u64,
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape, returning its handle
    pub fn insert(&mut self, shape: CollisionShape) -> ShapeHandle {
        let bounds = shape.bounds();
        self.shapes.insert(WorldShape { shape, bounds })
    }

    /// Remove a shape. Removing an absent handle is a no-op.
    pub fn remove(&mut self, handle: ShapeHandle) {
        self.shapes.remove(handle);
    }

    /// Number of shapes in the world
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True when the world holds no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World-space bounds of a shape
    pub fn bounds(&self, handle: ShapeHandle) -> Option<Aabb> {
        self.shapes.get(handle).map(|s| s.bounds)
    }

    /// Iterate over all shape handles and bounds
    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, Aabb)> + '_ {
        self.shapes.iter().map(|(handle, s)| (handle, s.bounds))
    }

    /// Remove every shape
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Number of segment queries executed so far
    pub fn ray_test_count(&self) -> u64 {
        self.ray_test_count
    }

    /// Intersect the segment `from -> to` with every shape, unordered
    pub fn ray_test_all(&mut self, from: Vec3, to: Vec3) -> Vec<WorldRayHit> {
        self.ray_test_count += 1;
        let mut hits = Vec::new();
        for (handle, world_shape) in &self.shapes {
            if world_shape.bounds.intersect_segment(from, to).is_none() {
                continue;
            }
            if let Some(hit) = world_shape.shape.intersect_segment(from, to) {
                hits.push(WorldRayHit { handle, hit });
            }
        }
        hits
    }

    /// Intersect the segment with every shape and return the nearest hit
    pub fn ray_test_closest(&mut self, from: Vec3, to: Vec3) -> Option<WorldRayHit> {
        self.ray_test_all(from, to)
            .into_iter()
            .min_by(|a, b| a.hit.fraction.total_cmp(&b.hit.fraction))
    }
}
