//! Hierarchy enumeration and shape construction
//!
//! Deciding what shape an object gets is separated from building it:
//! [`enumerate_hierarchy`] walks an object's components and reports shape
//! specifications through a visitor, and [`build_shape`] turns a
//! specification into a world-space collision shape. The rules are ordered
//! and first-match-wins: an entity produces shapes for exactly one rule.

use thiserror::Error;

use crate::foundation::math::{Point3, Vec3};
use crate::physics::{BoxShape, CollisionShape, HeightfieldShape, MeshShape};
use crate::geometry::Triangle;
use crate::scene::{EntityId, RenderObjectKind, SceneGraph, Selectable};
use crate::settings::CollisionSettings;

/// Specification of the shape an object should get
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpec {
    /// World-space box
    Box {
        /// Box center in world space
        center: Vec3,
        /// Half extents along each axis
        half_extents: Vec3,
    },
    /// Heightfield built from the entity's landscape component
    Landscape {
        /// Entity carrying the landscape
        entity: EntityId,
    },
    /// Triangle mesh baked from the entity's render geometry
    RenderMesh {
        /// Entity carrying the render object
        entity: EntityId,
    },
}

/// Errors from building a shape out of a specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeBuildError {
    /// The landscape has no usable height samples
    #[error("landscape heightmap is empty")]
    EmptyHeightmap,

    /// The render object has no triangles
    #[error("render object has no geometry")]
    EmptyGeometry,

    /// The referenced scene object no longer exists
    #[error("referenced scene object is missing")]
    MissingObject,
}

fn cube_spec(center: Vec3, size: f32) -> ShapeSpec {
    let half = size * 0.5;
    ShapeSpec::Box {
        center,
        half_extents: Vec3::new(half, half, half),
    }
}

/// Enumerate the collision shapes an object contributes, reporting each
/// through `visit`. Rules are checked in order and the first matching one
/// wins:
///
/// 1. slot-hosted entities contribute nothing (their slot owner does)
/// 2. landscape entities get a heightfield
/// 3. particle effects fan out to a box per emitter instance plus a box for
///    the effect entity itself
/// 4. geo decals get a box sized to the decal volume
/// 5. billboards get a cube around the transformed geometry bounds
/// 6. sprite and vegetation render objects contribute nothing
/// 7. mesh render objects get their triangle geometry
/// 8. cameras and marker components get fixed-size debug boxes, as does any
///    entity nothing else matched
pub fn enumerate_hierarchy<F>(
    scene: &SceneGraph,
    settings: &CollisionSettings,
    object: Selectable,
    visit: &mut F,
) where
    F: FnMut(Selectable, ShapeSpec),
{
    let Selectable::Entity(entity) = object else {
        // Emitter instances picked directly get a particle-scale box
        if let Some(position) = object.world_position(scene) {
            visit(object, cube_spec(position, settings.particle_box_size()));
        }
        return;
    };

    let Some(components) = scene.components(entity) else {
        return;
    };
    if components.slot_hosted {
        return;
    }

    let position = scene.world_position(entity);

    if components.landscape.is_some() {
        visit(object, ShapeSpec::Landscape { entity });
        return;
    }

    if let Some(effect) = &components.particle_effect {
        let size = settings.particle_box_size();
        for &emitter in &effect.emitters {
            if let Some(emitter_position) = scene.emitter_world_position(emitter) {
                visit(Selectable::EmitterInstance(emitter), cube_spec(emitter_position, size));
            }
        }
        visit(object, cube_spec(position, size));
        return;
    }

    if let Some(decal) = &components.geo_decal {
        visit(
            object,
            ShapeSpec::Box {
                center: position,
                half_extents: decal.dimensions * 0.5,
            },
        );
        return;
    }

    if let Some(render_object) = &components.render_object {
        match render_object.kind {
            RenderObjectKind::Billboard => {
                let world_box = render_object
                    .bounding_box
                    .transformed(&scene.world_transform(entity).to_matrix());
                visit(object, cube_spec(world_box.center(), world_box.size().x));
            }
            RenderObjectKind::Sprite | RenderObjectKind::Vegetation => {}
            RenderObjectKind::Mesh => {
                visit(object, ShapeSpec::RenderMesh { entity });
            }
        }
        return;
    }

    if let Some(camera) = &components.camera {
        visit(object, cube_spec(camera.position, settings.marker_box_size()));
        return;
    }

    let size = if components.user_node {
        settings.user_box_size()
    } else if components.waypoint {
        settings.waypoint_box_size()
    } else {
        settings.marker_box_size()
    };
    visit(object, cube_spec(position, size));
}

/// Build a world-space collision shape from a specification
pub fn build_shape(scene: &SceneGraph, spec: &ShapeSpec) -> Result<CollisionShape, ShapeBuildError> {
    match spec {
        ShapeSpec::Box { center, half_extents } => Ok(CollisionShape::Box(BoxShape {
            center: *center,
            half_extents: *half_extents,
        })),

        ShapeSpec::Landscape { entity } => {
            let landscape = scene
                .components(*entity)
                .and_then(|c| c.landscape.as_ref())
                .ok_or(ShapeBuildError::MissingObject)?;
            if landscape.resolution < 2
                || landscape.heights.len() < landscape.resolution * landscape.resolution
            {
                return Err(ShapeBuildError::EmptyHeightmap);
            }
            let position = scene.world_position(*entity);
            let half = landscape.size * 0.5;
            Ok(CollisionShape::Heightfield(HeightfieldShape {
                origin: Vec3::new(position.x - half, position.y, position.z - half),
                cell: landscape.size / (landscape.resolution - 1) as f32,
                resolution: landscape.resolution,
                heights: landscape.heights.clone(),
            }))
        }

        ShapeSpec::RenderMesh { entity } => {
            let render_object = scene
                .components(*entity)
                .and_then(|c| c.render_object.as_ref())
                .ok_or(ShapeBuildError::MissingObject)?;
            if render_object.vertices.is_empty() || render_object.indices.len() < 3 {
                return Err(ShapeBuildError::EmptyGeometry);
            }
            let matrix = scene.world_transform(*entity).to_matrix();
            let world_vertex = |index: u32| -> Option<Vec3> {
                render_object
                    .vertices
                    .get(index as usize)
                    .map(|v| matrix.transform_point(&Point3::from(*v)).coords)
            };
            let mut triangles = Vec::with_capacity(render_object.indices.len() / 3);
            for face in render_object.indices.chunks_exact(3) {
                let (Some(a), Some(b), Some(c)) =
                    (world_vertex(face[0]), world_vertex(face[1]), world_vertex(face[2]))
                else {
                    return Err(ShapeBuildError::EmptyGeometry);
                };
                triangles.push(Triangle::new(a, b, c));
            }
            Ok(CollisionShape::Mesh(MeshShape::new(triangles)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::geometry::Aabb;
    use crate::scene::{
        CameraComponent, ComponentSet, GeoDecalComponent, LandscapeComponent,
        RenderObjectComponent,
    };
    use approx::assert_relative_eq;

    fn collect(scene: &SceneGraph, object: Selectable) -> Vec<(Selectable, ShapeSpec)> {
        let settings = CollisionSettings::default();
        let mut specs = Vec::new();
        enumerate_hierarchy(scene, &settings, object, &mut |key, spec| {
            specs.push((key, spec));
        });
        specs
    }

    fn spawn(scene: &mut SceneGraph, components: ComponentSet) -> EntityId {
        scene
            .add_entity(scene.root(), Transform::identity(), components)
            .unwrap()
    }

    #[test]
    fn test_slot_hosted_contributes_nothing() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.slot_hosted = true;
        components.light = true;
        let entity = spawn(&mut scene, components);

        assert!(collect(&scene, entity.into()).is_empty());
    }

    #[test]
    fn test_landscape_wins_over_render_object() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.landscape = Some(LandscapeComponent {
            heights: vec![0.0; 4],
            resolution: 2,
            size: 10.0,
        });
        components.render_object = Some(RenderObjectComponent::mesh(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            vec![0, 1, 2],
        ));
        let entity = spawn(&mut scene, components);

        let specs = collect(&scene, entity.into());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].1, ShapeSpec::Landscape { entity });
    }

    #[test]
    fn test_particle_effect_fans_out_to_emitters() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.particle_effect = Some(Default::default());
        let entity = spawn(&mut scene, components);
        let a = scene.add_emitter(entity, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let b = scene.add_emitter(entity, Vec3::new(2.0, 0.0, 0.0)).unwrap();

        let specs = collect(&scene, entity.into());

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].0, Selectable::EmitterInstance(a));
        assert_eq!(specs[1].0, Selectable::EmitterInstance(b));
        assert_eq!(specs[2].0, Selectable::Entity(entity));
    }

    #[test]
    fn test_geo_decal_box_uses_half_dimensions() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.geo_decal = Some(GeoDecalComponent {
            dimensions: Vec3::new(4.0, 6.0, 8.0),
        });
        let entity = spawn(&mut scene, components);

        let specs = collect(&scene, entity.into());
        assert_eq!(specs.len(), 1);
        match &specs[0].1 {
            ShapeSpec::Box { half_extents, .. } => {
                assert_relative_eq!(*half_extents, Vec3::new(2.0, 3.0, 4.0));
            }
            other => panic!("expected box spec, got {other:?}"),
        }
    }

    #[test]
    fn test_sprite_and_vegetation_contribute_nothing() {
        for kind in [RenderObjectKind::Sprite, RenderObjectKind::Vegetation] {
            let mut scene = SceneGraph::new();
            let mut components = ComponentSet::default();
            components.render_object = Some(RenderObjectComponent {
                kind,
                bounding_box: Aabb::cube(Vec3::zeros(), 1.0),
                vertices: Vec::new(),
                indices: Vec::new(),
            });
            let entity = spawn(&mut scene, components);

            assert!(collect(&scene, entity.into()).is_empty());
        }
    }

    #[test]
    fn test_billboard_cube_from_transformed_bounds() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.render_object = Some(RenderObjectComponent {
            kind: RenderObjectKind::Billboard,
            bounding_box: Aabb::cube(Vec3::new(0.0, 1.0, 0.0), 2.0),
            vertices: Vec::new(),
            indices: Vec::new(),
        });
        let entity = scene
            .add_entity(
                scene.root(),
                Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
                components,
            )
            .unwrap();

        let specs = collect(&scene, entity.into());
        assert_eq!(specs.len(), 1);
        match &specs[0].1 {
            ShapeSpec::Box { center, half_extents } => {
                assert_relative_eq!(*center, Vec3::new(10.0, 1.0, 0.0));
                // Cube edge equals the x extent of the bounds
                assert_relative_eq!(*half_extents, Vec3::new(1.0, 1.0, 1.0));
            }
            other => panic!("expected box spec, got {other:?}"),
        }
    }

    #[test]
    fn test_camera_box_at_camera_position() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.camera = Some(CameraComponent {
            position: Vec3::new(0.0, 50.0, 0.0),
        });
        let entity = spawn(&mut scene, components);

        let specs = collect(&scene, entity.into());
        assert_eq!(specs.len(), 1);
        match &specs[0].1 {
            ShapeSpec::Box { center, .. } => {
                assert_relative_eq!(*center, Vec3::new(0.0, 50.0, 0.0));
            }
            other => panic!("expected box spec, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_entity_gets_fallback_box() {
        let mut scene = SceneGraph::new();
        let entity = spawn(&mut scene, ComponentSet::default());

        let specs = collect(&scene, entity.into());
        assert_eq!(specs.len(), 1);
        assert!(matches!(specs[0].1, ShapeSpec::Box { .. }));
    }

    #[test]
    fn test_build_landscape_centers_footprint() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.landscape = Some(LandscapeComponent {
            heights: vec![0.0; 9],
            resolution: 3,
            size: 10.0,
        });
        let entity = scene
            .add_entity(
                scene.root(),
                Transform::from_position(Vec3::new(100.0, 5.0, 100.0)),
                components,
            )
            .unwrap();

        let shape = build_shape(&scene, &ShapeSpec::Landscape { entity }).unwrap();
        match shape {
            CollisionShape::Heightfield(field) => {
                assert_relative_eq!(field.origin, Vec3::new(95.0, 5.0, 95.0));
                assert_relative_eq!(field.cell, 5.0);
            }
            other => panic!("expected heightfield, got {other:?}"),
        }
    }

    #[test]
    fn test_build_empty_heightmap_fails() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.landscape = Some(LandscapeComponent {
            heights: Vec::new(),
            resolution: 0,
            size: 10.0,
        });
        let entity = spawn(&mut scene, components);

        assert_eq!(
            build_shape(&scene, &ShapeSpec::Landscape { entity }),
            Err(ShapeBuildError::EmptyHeightmap)
        );
    }

    #[test]
    fn test_build_mesh_bakes_world_transform() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.render_object = Some(RenderObjectComponent::mesh(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            vec![0, 1, 2],
        ));
        let entity = scene
            .add_entity(
                scene.root(),
                Transform::from_position(Vec3::new(0.0, 0.0, -5.0)),
                components,
            )
            .unwrap();

        let shape = build_shape(&scene, &ShapeSpec::RenderMesh { entity }).unwrap();
        match shape {
            CollisionShape::Mesh(mesh) => {
                assert_eq!(mesh.triangles.len(), 1);
                assert_relative_eq!(mesh.triangles[0].vertices[0], Vec3::new(0.0, 0.0, -5.0));
            }
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn test_build_mesh_without_geometry_fails() {
        let mut scene = SceneGraph::new();
        let mut components = ComponentSet::default();
        components.render_object = Some(RenderObjectComponent::mesh(Vec::new(), Vec::new()));
        let entity = spawn(&mut scene, components);

        assert_eq!(
            build_shape(&scene, &ShapeSpec::RenderMesh { entity }),
            Err(ShapeBuildError::EmptyGeometry)
        );
    }
}
