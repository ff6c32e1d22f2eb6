//! Components carried by scene entities
//!
//! Only the components the collision system inspects are modeled here. The
//! marker components (sound, light, text, wind, user node, waypoint) carry no
//! data the collision system reads beyond their presence.

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use crate::scene::graph::EmitterInstanceId;

/// Kind of render object an entity carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderObjectKind {
    /// Regular triangle mesh
    Mesh,
    /// Camera-facing billboard
    Billboard,
    /// Screen-space sprite, not part of the 3D scene
    Sprite,
    /// Instanced vegetation layer
    Vegetation,
}

/// Renderable geometry attached to an entity
#[derive(Debug, Clone)]
pub struct RenderObjectComponent {
    /// What the render object is
    pub kind: RenderObjectKind,
    /// Local-space bounding box of the geometry
    pub bounding_box: Aabb,
    /// Local-space vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangle list indexing into `vertices`
    pub indices: Vec<u32>,
}

impl RenderObjectComponent {
    /// Create a mesh render object from raw geometry, deriving its box
    pub fn mesh(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut bounding_box = Aabb::empty();
        for v in &vertices {
            bounding_box.expand_to_point(*v);
        }
        Self {
            kind: RenderObjectKind::Mesh,
            bounding_box,
            vertices,
            indices,
        }
    }
}

/// Heightmap terrain component
#[derive(Debug, Clone)]
pub struct LandscapeComponent {
    /// Height samples, row-major, `resolution * resolution` values
    pub heights: Vec<f32>,
    /// Samples along each edge of the heightmap
    pub resolution: usize,
    /// World-space edge length of the terrain
    pub size: f32,
}

/// Particle effect component owning emitter instances
#[derive(Debug, Clone, Default)]
pub struct ParticleEffectComponent {
    /// Emitter instances attached to this effect
    pub emitters: Vec<EmitterInstanceId>,
}

/// Projected decal that carves geometry out of what it covers
#[derive(Debug, Clone)]
pub struct GeoDecalComponent {
    /// Full extents of the decal projection volume
    pub dimensions: Vec3,
}

/// Scene camera component
#[derive(Debug, Clone)]
pub struct CameraComponent {
    /// World-space camera position
    pub position: Vec3,
}

/// The set of components an entity may carry
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    /// Terrain heightmap
    pub landscape: Option<LandscapeComponent>,
    /// Particle effect with emitter instances
    pub particle_effect: Option<ParticleEffectComponent>,
    /// Geometry-carving decal
    pub geo_decal: Option<GeoDecalComponent>,
    /// Renderable geometry
    pub render_object: Option<RenderObjectComponent>,
    /// Scene camera
    pub camera: Option<CameraComponent>,
    /// Sound source marker
    pub sound: bool,
    /// Light source marker
    pub light: bool,
    /// 3D text marker
    pub text: bool,
    /// Wind source marker
    pub wind: bool,
    /// Legacy user node marker
    pub user_node: bool,
    /// Path waypoint marker
    pub waypoint: bool,
    /// True when the entity was loaded into a slot of its parent
    pub slot_hosted: bool,
}
