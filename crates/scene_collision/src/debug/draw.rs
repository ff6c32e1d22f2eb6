//! Debug line rendering of collision state
//!
//! Collects line segments for the renderer to draw on top of the viewport.
//! The collision system contributes wireframe boxes for every mirrored shape
//! and the most recent pick rays.

use bitflags::bitflags;

use crate::collision::{SceneCollisionSystem, WorldKind};
use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use crate::scene::SceneGraph;

bitflags! {
    /// What collision debug geometry to draw
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DebugDrawMode: u32 {
        /// Wireframe box around every mirrored shape
        const WIREFRAME = 1 << 0;
        /// The most recent object and landscape pick rays
        const RAYS = 1 << 1;
    }
}

/// RGBA color for debug lines
pub type Color = [f32; 4];

const OBJECT_COLOR: Color = [0.0, 1.0, 0.0, 1.0];
const LANDSCAPE_COLOR: Color = [0.6, 0.4, 0.1, 1.0];
const RAY_COLOR: Color = [1.0, 0.2, 0.2, 1.0];
const LAND_HIT_COLOR: Color = [1.0, 1.0, 0.2, 1.0];

/// Edge length of the marker box drawn at the last landscape hit
const LAND_HIT_MARKER_SIZE: f32 = 0.25;

/// One line segment queued for drawing
#[derive(Debug, Clone, Copy)]
pub struct DebugLine {
    /// Segment start in world space
    pub start: Vec3,
    /// Segment end in world space
    pub end: Vec3,
    /// Line color
    pub color: Color,
}

/// Accumulates debug lines for one frame
#[derive(Debug, Default)]
pub struct DebugDrawSystem {
    lines: Vec<DebugLine>,
}

impl DebugDrawSystem {
    /// Create an empty draw queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single line
    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.lines.push(DebugLine { start, end, color });
    }

    /// Queue the twelve edges of a box
    pub fn add_box(&mut self, aabb: &Aabb, color: Color) {
        if aabb.is_empty() {
            return;
        }
        let c = aabb.corners();
        let edges = [
            (0, 1), (1, 3), (3, 2), (2, 0), // bottom face
            (4, 5), (5, 7), (7, 6), (6, 4), // top face
            (0, 4), (1, 5), (2, 6), (3, 7), // verticals
        ];
        for (a, b) in edges {
            self.add_line(c[a], c[b], color);
        }
    }

    /// Lines queued so far
    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Drop all queued lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Queue debug geometry for the collision mirror
pub fn draw_collision_debug(
    system: &SceneCollisionSystem,
    scene: &SceneGraph,
    draw: &mut DebugDrawSystem,
    mode: DebugDrawMode,
) {
    if mode.contains(DebugDrawMode::WIREFRAME) {
        for record in system.tracked().iter() {
            if let Some(position) = record.key.world_position(scene) {
                let color = match record.world {
                    WorldKind::Objects => OBJECT_COLOR,
                    WorldKind::Landscape => LANDSCAPE_COLOR,
                };
                draw.add_box(&record.world_box(position), color);
            }
        }
    }
    if mode.contains(DebugDrawMode::RAYS) {
        for (from, to) in system.cached_rays() {
            draw.add_line(from, to, RAY_COLOR);
        }
        if let Some(point) = system.cached_land_hit() {
            draw.add_box(&Aabb::cube(point, LAND_HIT_MARKER_SIZE), LAND_HIT_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_has_twelve_edges() {
        let mut draw = DebugDrawSystem::new();
        draw.add_box(&Aabb::cube(Vec3::zeros(), 2.0), OBJECT_COLOR);

        assert_eq!(draw.lines().len(), 12);
    }

    #[test]
    fn test_empty_box_draws_nothing() {
        let mut draw = DebugDrawSystem::new();
        draw.add_box(&Aabb::empty(), OBJECT_COLOR);

        assert!(draw.lines().is_empty());
    }

    #[test]
    fn test_land_hit_draws_marker_box() {
        use crate::foundation::math::Transform;
        use crate::scene::{ComponentSet, LandscapeComponent};
        use crate::settings::CollisionSettings;

        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.landscape = Some(LandscapeComponent {
            heights: vec![0.0; 25],
            resolution: 5,
            size: 100.0,
        });
        let landscape = scene
            .add_entity(scene.root(), Transform::identity(), components)
            .unwrap();
        let mut system = SceneCollisionSystem::new(CollisionSettings::default());
        system.add_entity(&scene, landscape);
        system.process(&mut scene);
        system
            .land_ray_test(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -2.0, 0.0))
            .unwrap();

        let mut draw = DebugDrawSystem::new();
        draw_collision_debug(&system, &scene, &mut draw, DebugDrawMode::RAYS);

        // The cached land ray plus the twelve edges of the hit marker
        assert_eq!(draw.lines().len(), 13);
        assert!(draw
            .lines()
            .iter()
            .any(|line| line.color == LAND_HIT_COLOR));
    }

    #[test]
    fn test_clear_resets_queue() {
        let mut draw = DebugDrawSystem::new();
        draw.add_line(Vec3::zeros(), Vec3::x(), RAY_COLOR);
        draw.clear();

        assert!(draw.lines().is_empty());
    }
}
