//! Editor scene model: the entity graph, its components, and selectable objects.

pub mod camera;
pub mod components;
pub mod graph;
pub mod selectable;

pub use camera::EditorCamera;
pub use components::{
    CameraComponent, ComponentSet, GeoDecalComponent, LandscapeComponent, ParticleEffectComponent,
    RenderObjectComponent, RenderObjectKind,
};
pub use graph::{EmitterInstance, EmitterInstanceId, EntityId, SceneGraph};
pub use selectable::{Selectable, TransformType};

/// Scene-level notifications the collision system reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// A switch component changed the active render variant of an entity
    SwitchChanged(EntityId),
    /// A geo decal was rebuilt and its carved geometry changed
    GeoDecalChanged(EntityId),
}
