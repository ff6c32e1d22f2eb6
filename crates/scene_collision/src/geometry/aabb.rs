//! Axis-aligned bounding boxes

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a bounding box from min/max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box that unions as the identity
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Create a cube of the given edge length centered at a point
    pub fn cube(center: Vec3, size: f32) -> Self {
        let half = size * 0.5;
        let h = Vec3::new(half, half, half);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Create a box centered at a point with the given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// True if the box has no extent on any axis
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center point of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full edge lengths of the box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half extents of the box
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Union with another box
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grow the box to contain a point
    pub fn expand_to_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Offset the box by a translation
    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Test overlap with another box
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The eight corner points of the box
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Transform the box by a matrix, returning the axis-aligned box of the
    /// transformed corners.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut result = Aabb::empty();
        for corner in self.corners() {
            let p = matrix.transform_point(&Point3::from(corner));
            result.expand_to_point(p.coords);
        }
        result
    }

    /// Slab test against the segment `from -> to`. Returns the entry fraction
    /// in `[0, 1]` when the segment reaches the box.
    pub fn intersect_segment(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let dir = to - from;
        let mut t_min: f32 = 0.0;
        let mut t_max: f32 = 1.0;

        for axis in 0..3 {
            if dir[axis].abs() < f32::EPSILON {
                if from[axis] < self.min[axis] || from[axis] > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[axis];
                let mut t0 = (self.min[axis] - from[axis]) * inv;
                let mut t1 = (self.max[axis] - from[axis]) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_union_identity() {
        let a = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let merged = Aabb::empty().union(&a);

        assert_eq!(merged, a);
    }

    #[test]
    fn test_cube_extents() {
        let b = Aabb::cube(Vec3::new(1.0, 2.0, 3.0), 2.0);

        assert_relative_eq!(b.min, Vec3::new(0.0, 1.0, 2.0));
        assert_relative_eq!(b.max, Vec3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_segment_hit_and_miss() {
        let b = Aabb::cube(Vec3::zeros(), 2.0);

        let t = b.intersect_segment(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(t.unwrap(), 0.4, epsilon = 1e-6);

        let miss = b.intersect_segment(Vec3::new(3.0, 0.0, 5.0), Vec3::new(3.0, 0.0, -5.0));
        assert!(miss.is_none());
    }

    #[test]
    fn test_segment_starting_inside() {
        let b = Aabb::cube(Vec3::zeros(), 2.0);
        let t = b.intersect_segment(Vec3::zeros(), Vec3::new(0.0, 0.0, -5.0));

        assert_relative_eq!(t.unwrap(), 0.0);
    }

    #[test]
    fn test_segment_too_short() {
        let b = Aabb::cube(Vec3::zeros(), 2.0);
        let t = b.intersect_segment(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 2.0));

        assert!(t.is_none());
    }

    #[test]
    fn test_transformed_rotation() {
        let b = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        let rot =
            Mat4::from_axis_angle(&crate::foundation::math::Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let t = b.transformed(&rot);

        // 90 degree Y rotation swaps the x and z extents
        assert_relative_eq!(t.min, Vec3::new(-3.0, -2.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(t.max, Vec3::new(3.0, 2.0, 1.0), epsilon = 1e-5);
    }
}
