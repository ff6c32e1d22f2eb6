//! Collision shape types
//!
//! Shapes are baked in world space: when an entity moves, its shape is
//! rebuilt rather than re-transformed per query. Every shape answers segment
//! intersection queries with a hit fraction in `[0, 1]`.

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Ray, SegmentHit, Triangle};

/// World-space axis-aligned box shape
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    /// Box center in world space
    pub center: Vec3,
    /// Half extents along each axis
    pub half_extents: Vec3,
}

/// Regular-grid heightfield over the XZ plane, heights along Y
#[derive(Debug, Clone, PartialEq)]
pub struct HeightfieldShape {
    /// World position of the (0, 0) sample
    pub origin: Vec3,
    /// World-space spacing between adjacent samples
    pub cell: f32,
    /// Samples along each edge
    pub resolution: usize,
    /// Height samples, row-major (`z * resolution + x`)
    pub heights: Vec<f32>,
}

/// Triangle soup shape in world space
#[derive(Debug, Clone, PartialEq)]
pub struct MeshShape {
    /// World-space triangles
    pub triangles: Vec<Triangle>,
    /// Bounds of all triangles
    pub bounds: Aabb,
}

impl MeshShape {
    /// Build a mesh shape from world-space triangles
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let mut bounds = Aabb::empty();
        for tri in &triangles {
            for v in tri.vertices {
                bounds.expand_to_point(v);
            }
        }
        Self { triangles, bounds }
    }
}

impl HeightfieldShape {
    /// Sampled height at grid coordinates, clamped to the edge
    fn height_at(&self, x: usize, z: usize) -> f32 {
        let x = x.min(self.resolution - 1);
        let z = z.min(self.resolution - 1);
        self.heights[z * self.resolution + x]
    }

    /// World position of a grid sample
    fn sample_position(&self, x: usize, z: usize) -> Vec3 {
        Vec3::new(
            self.origin.x + x as f32 * self.cell,
            self.origin.y + self.height_at(x, z),
            self.origin.z + z as f32 * self.cell,
        )
    }

    /// Range of grid cells overlapped by the XZ footprint of a segment
    fn cell_range(&self, from: Vec3, to: Vec3) -> (usize, usize, usize, usize) {
        let last = self.resolution - 2;
        let to_cell = |world: f32, origin: f32| -> usize {
            let c = (world - origin) / self.cell;
            (c.floor().max(0.0) as usize).min(last)
        };
        let (min_x, max_x) = if from.x <= to.x { (from.x, to.x) } else { (to.x, from.x) };
        let (min_z, max_z) = if from.z <= to.z { (from.z, to.z) } else { (to.z, from.z) };
        (
            to_cell(min_x, self.origin.x),
            to_cell(max_x, self.origin.x),
            to_cell(min_z, self.origin.z),
            to_cell(max_z, self.origin.z),
        )
    }

    fn intersect_segment(&self, from: Vec3, to: Vec3) -> Option<SegmentHit> {
        if self.resolution < 2 {
            return None;
        }
        let ray = Ray::between(from, to);
        let (x0, x1, z0, z1) = self.cell_range(from, to);

        let mut best: Option<f32> = None;
        for z in z0..=z1 {
            for x in x0..=x1 {
                let p00 = self.sample_position(x, z);
                let p10 = self.sample_position(x + 1, z);
                let p01 = self.sample_position(x, z + 1);
                let p11 = self.sample_position(x + 1, z + 1);

                for tri in [Triangle::new(p00, p10, p11), Triangle::new(p00, p11, p01)] {
                    if let Some(t) = tri.intersect_ray(&ray) {
                        if t <= 1.0 && best.map_or(true, |b| t < b) {
                            best = Some(t);
                        }
                    }
                }
            }
        }

        best.map(|fraction| SegmentHit {
            fraction,
            point: ray.point_at(fraction),
        })
    }
}

/// Collision shape mirrored from a scene object
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box
    Box(BoxShape),
    /// Heightfield terrain
    Heightfield(HeightfieldShape),
    /// Triangle mesh
    Mesh(MeshShape),
}

impl CollisionShape {
    /// World-space bounds of the shape
    pub fn bounds(&self) -> Aabb {
        match self {
            CollisionShape::Box(b) => Aabb::from_center_half_extents(b.center, b.half_extents),
            CollisionShape::Heightfield(h) => {
                if h.resolution < 2 || h.heights.is_empty() {
                    return Aabb::empty();
                }
                let extent = (h.resolution - 1) as f32 * h.cell;
                let mut min_h = f32::MAX;
                let mut max_h = f32::MIN;
                for &height in &h.heights {
                    min_h = min_h.min(height);
                    max_h = max_h.max(height);
                }
                Aabb::new(
                    Vec3::new(h.origin.x, h.origin.y + min_h, h.origin.z),
                    Vec3::new(h.origin.x + extent, h.origin.y + max_h, h.origin.z + extent),
                )
            }
            CollisionShape::Mesh(m) => m.bounds,
        }
    }

    /// Intersect the segment `from -> to` with the shape, returning the
    /// nearest hit.
    pub fn intersect_segment(&self, from: Vec3, to: Vec3) -> Option<SegmentHit> {
        match self {
            CollisionShape::Box(b) => {
                let aabb = Aabb::from_center_half_extents(b.center, b.half_extents);
                aabb.intersect_segment(from, to).map(|fraction| SegmentHit {
                    fraction,
                    point: from + (to - from) * fraction,
                })
            }
            CollisionShape::Heightfield(h) => h.intersect_segment(from, to),
            CollisionShape::Mesh(m) => {
                if m.bounds.intersect_segment(from, to).is_none() {
                    return None;
                }
                let ray = Ray::between(from, to);
                let mut best: Option<f32> = None;
                for tri in &m.triangles {
                    if let Some(t) = tri.intersect_ray(&ray) {
                        if t <= 1.0 && best.map_or(true, |b| t < b) {
                            best = Some(t);
                        }
                    }
                }
                best.map(|fraction| SegmentHit {
                    fraction,
                    point: ray.point_at(fraction),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_heightfield(resolution: usize, cell: f32, height: f32) -> HeightfieldShape {
        HeightfieldShape {
            origin: Vec3::zeros(),
            cell,
            resolution,
            heights: vec![height; resolution * resolution],
        }
    }

    #[test]
    fn test_box_segment_hit() {
        let shape = CollisionShape::Box(BoxShape {
            center: Vec3::zeros(),
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        });

        let hit = shape
            .intersect_segment(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0))
            .unwrap();

        assert_relative_eq!(hit.fraction, 0.4, epsilon = 1e-6);
        assert_relative_eq!(hit.point, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_heightfield_vertical_hit() {
        let shape = CollisionShape::Heightfield(flat_heightfield(5, 1.0, 2.0));

        let hit = shape
            .intersect_segment(Vec3::new(1.5, 10.0, 1.5), Vec3::new(1.5, -10.0, 1.5))
            .unwrap();

        assert_relative_eq!(hit.point.y, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_heightfield_miss_outside_footprint() {
        let shape = CollisionShape::Heightfield(flat_heightfield(5, 1.0, 0.0));

        let hit = shape.intersect_segment(Vec3::new(100.0, 10.0, 100.0), Vec3::new(100.0, -10.0, 100.0));

        assert!(hit.is_none());
    }

    #[test]
    fn test_heightfield_bounds_cover_heights() {
        let mut field = flat_heightfield(3, 2.0, 0.0);
        field.heights[4] = 7.0;
        let bounds = CollisionShape::Heightfield(field).bounds();

        assert_relative_eq!(bounds.max, Vec3::new(4.0, 7.0, 4.0));
        assert_relative_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_heightfield_is_harmless() {
        let shape = CollisionShape::Heightfield(HeightfieldShape {
            origin: Vec3::zeros(),
            cell: 1.0,
            resolution: 1,
            heights: vec![0.0],
        });

        assert!(shape.bounds().is_empty());
        assert!(shape
            .intersect_segment(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -10.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_mesh_nearest_triangle_wins() {
        let shape = CollisionShape::Mesh(MeshShape::new(vec![
            Triangle::new(
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                Vec3::new(-1.0, -1.0, 3.0),
                Vec3::new(1.0, -1.0, 3.0),
                Vec3::new(0.0, 1.0, 3.0),
            ),
        ]));

        let hit = shape
            .intersect_segment(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0))
            .unwrap();

        assert_relative_eq!(hit.point.z, 3.0, epsilon = 1e-5);
    }
}
