//! Planes and plane sets for frustum-style clipping

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;

/// Result of classifying a box against a single plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely on the positive side of the plane
    InFront,
    /// Entirely on the negative side of the plane
    Behind,
    /// Straddles the plane
    Intersects,
}

/// Result of classifying a box against a set of planes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneRelation {
    /// Entirely behind at least one plane
    Outside,
    /// Inside or intersecting the region bounded by the planes
    ContainsOrIntersects,
}

/// Plane in the form `normal . p + distance = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal, pointing to the positive half-space
    pub normal: Vec3,
    /// Signed distance term
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and distance term
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Create a plane from a normal and a point on the plane
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            distance: -normal.dot(&point),
        }
    }

    /// Signed distance from a point to the plane
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }

    /// Classify an axis-aligned box against the plane using the projected
    /// radius of the box onto the plane normal.
    pub fn classify_aabb(&self, aabb: &Aabb) -> PlaneSide {
        let center = aabb.center();
        let half = aabb.half_extents();
        let radius =
            half.x * self.normal.x.abs() + half.y * self.normal.y.abs() + half.z * self.normal.z.abs();
        let distance = self.signed_distance(center);

        if distance > radius {
            PlaneSide::InFront
        } else if distance < -radius {
            PlaneSide::Behind
        } else {
            PlaneSide::Intersects
        }
    }
}

/// Convex region described by a set of inward-facing planes
#[derive(Debug, Clone, Default)]
pub struct Frustum {
    /// Bounding planes, normals pointing inward
    pub planes: Vec<Plane>,
}

impl Frustum {
    /// Create a frustum from a plane list
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    /// Classify a box against every plane, stopping at the first plane the
    /// box is entirely behind.
    pub fn classify_aabb(&self, aabb: &Aabb) -> PlaneRelation {
        for plane in &self.planes {
            if plane.classify_aabb(aabb) == PlaneSide::Behind {
                return PlaneRelation::Outside;
            }
        }
        PlaneRelation::ContainsOrIntersects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_aabb_sides() {
        let plane = Plane::from_point_normal(Vec3::zeros(), Vec3::y_axis().into_inner());

        let above = Aabb::cube(Vec3::new(0.0, 5.0, 0.0), 2.0);
        let below = Aabb::cube(Vec3::new(0.0, -5.0, 0.0), 2.0);
        let straddling = Aabb::cube(Vec3::zeros(), 2.0);

        assert_eq!(plane.classify_aabb(&above), PlaneSide::InFront);
        assert_eq!(plane.classify_aabb(&below), PlaneSide::Behind);
        assert_eq!(plane.classify_aabb(&straddling), PlaneSide::Intersects);
    }

    #[test]
    fn test_frustum_outside_on_any_plane() {
        let frustum = Frustum::new(vec![
            Plane::from_point_normal(Vec3::new(-10.0, 0.0, 0.0), Vec3::x_axis().into_inner()),
            Plane::from_point_normal(Vec3::new(10.0, 0.0, 0.0), -Vec3::x_axis().into_inner()),
        ]);

        let inside = Aabb::cube(Vec3::zeros(), 2.0);
        let outside = Aabb::cube(Vec3::new(20.0, 0.0, 0.0), 2.0);

        assert_eq!(frustum.classify_aabb(&inside), PlaneRelation::ContainsOrIntersects);
        assert_eq!(frustum.classify_aabb(&outside), PlaneRelation::Outside);
    }

    #[test]
    fn test_touching_box_intersects() {
        let plane = Plane::from_point_normal(Vec3::zeros(), Vec3::y_axis().into_inner());
        let touching = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));

        assert_eq!(plane.classify_aabb(&touching), PlaneSide::Intersects);
    }
}
