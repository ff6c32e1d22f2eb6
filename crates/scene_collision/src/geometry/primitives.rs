//! Ray and triangle primitives

use crate::foundation::math::Vec3;

/// Ray with origin and (not necessarily normalized) direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray between two points; the direction spans the full segment
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self {
            origin: from,
            direction: to - from,
        }
    }

    /// Point at parametric distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Intersection of a segment with a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Fraction along the segment in `[0, 1]`
    pub fraction: f32,
    /// Hit point in world space
    pub point: Vec3,
}

/// Triangle defined by three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Triangle vertices
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Create a triangle from three vertices
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Moller-Trumbore ray/triangle intersection. Returns the parametric
    /// distance along the ray direction when the ray crosses the triangle.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);
        if a.abs() < EPSILON {
            return None; // parallel to the triangle plane
        }

        let f = 1.0 / a;
        let s = ray.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > EPSILON).then_some(t)
    }
}
