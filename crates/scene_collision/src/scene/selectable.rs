//! Selectable objects
//!
//! The editor selects more than entities: particle emitter instances are
//! picked and moved individually even though they live inside a particle
//! effect component. `Selectable` is the common identity both kinds share.

use crate::foundation::math::Vec3;
use crate::scene::graph::{EmitterInstanceId, EntityId, SceneGraph};

/// Transform operation the editor may apply to a selected object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformType {
    /// No transform in progress
    Disabled,
    /// Translation gizmo
    Translation,
    /// Rotation gizmo
    Rotation,
    /// Scale gizmo
    Scale,
}

/// Object the editor can select and query collision for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selectable {
    /// A scene entity
    Entity(EntityId),
    /// A particle emitter instance inside an effect
    EmitterInstance(EmitterInstanceId),
}

impl Selectable {
    /// The entity behind this object, if it is one
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Selectable::Entity(entity) => Some(*entity),
            Selectable::EmitterInstance(_) => None,
        }
    }

    /// True when the object still exists in the scene
    pub fn exists_in(&self, scene: &SceneGraph) -> bool {
        match self {
            Selectable::Entity(entity) => scene.contains(*entity),
            Selectable::EmitterInstance(emitter) => scene.emitter(*emitter).is_some(),
        }
    }

    /// World-space position of the object, or `None` when it no longer exists
    pub fn world_position(&self, scene: &SceneGraph) -> Option<Vec3> {
        match self {
            Selectable::Entity(entity) => {
                scene.contains(*entity).then(|| scene.world_position(*entity))
            }
            Selectable::EmitterInstance(emitter) => scene.emitter_world_position(*emitter),
        }
    }

    /// Whether the object supports a transform operation. Emitter instances
    /// can only be moved, entities support every gizmo.
    pub fn supports_transform(&self, transform_type: TransformType) -> bool {
        match self {
            Selectable::Entity(_) => true,
            Selectable::EmitterInstance(_) => {
                matches!(transform_type, TransformType::Disabled | TransformType::Translation)
            }
        }
    }
}

impl From<EntityId> for Selectable {
    fn from(entity: EntityId) -> Self {
        Selectable::Entity(entity)
    }
}

impl From<EmitterInstanceId> for Selectable {
    fn from(emitter: EmitterInstanceId) -> Self {
        Selectable::EmitterInstance(emitter)
    }
}
