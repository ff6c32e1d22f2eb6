//! Entity graph the collision system mirrors
//!
//! A thin hierarchy of entities with local transforms and component sets,
//! plus an arena of particle emitter instances that live alongside their
//! owning entities. Transform edits are recorded so a consumer can pull the
//! set of changed entities once per frame.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Transform, Vec3};
use crate::scene::components::ComponentSet;

new_key_type! {
    /// Stable handle to an entity in the scene graph
    pub struct EntityId;

    /// Stable handle to a particle emitter instance
    pub struct EmitterInstanceId;
}

/// Particle emitter instance owned by a particle effect component
#[derive(Debug, Clone)]
pub struct EmitterInstance {
    /// Entity whose particle effect owns this instance
    pub owner: EntityId,
    /// Spawn position local to the owning entity
    pub local_position: Vec3,
}

#[derive(Debug)]
struct EntityNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: Transform,
    components: ComponentSet,
}

/// Hierarchical scene of entities with local transforms
#[derive(Debug)]
pub struct SceneGraph {
    entities: SlotMap<EntityId, EntityNode>,
    emitters: SlotMap<EmitterInstanceId, EmitterInstance>,
    root: EntityId,
    transform_changes: Vec<EntityId>,
    parent_changes: Vec<EntityId>,
}

impl SceneGraph {
    /// Create a scene containing only the root entity
    pub fn new() -> Self {
        let mut entities = SlotMap::with_key();
        let root = entities.insert(EntityNode {
            parent: None,
            children: Vec::new(),
            local: Transform::identity(),
            components: ComponentSet::default(),
        });
        Self {
            entities,
            emitters: SlotMap::with_key(),
            root,
            transform_changes: Vec::new(),
            parent_changes: Vec::new(),
        }
    }

    /// Root entity of the scene
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// True when the entity still exists
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Add a child entity under `parent` with the given transform and components
    pub fn add_entity(
        &mut self,
        parent: EntityId,
        local: Transform,
        components: ComponentSet,
    ) -> Option<EntityId> {
        if !self.entities.contains_key(parent) {
            return None;
        }
        let id = self.entities.insert(EntityNode {
            parent: Some(parent),
            children: Vec::new(),
            local,
            components,
        });
        if let Some(node) = self.entities.get_mut(parent) {
            node.children.push(id);
        }
        Some(id)
    }

    /// Remove an entity and its whole subtree, including owned emitter instances
    pub fn remove_entity(&mut self, entity: EntityId) {
        if entity == self.root || !self.entities.contains_key(entity) {
            return;
        }
        let children: Vec<EntityId> = self.children(entity).to_vec();
        for child in children {
            self.remove_entity(child);
        }
        if let Some(node) = self.entities.remove(entity) {
            for emitter in node
                .components
                .particle_effect
                .map(|p| p.emitters)
                .unwrap_or_default()
            {
                self.emitters.remove(emitter);
            }
            if let Some(parent) = node.parent.and_then(|p| self.entities.get_mut(p)) {
                parent.children.retain(|&c| c != entity);
            }
        }
    }

    /// Parent of an entity, `None` for the root
    pub fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.entities.get(entity).and_then(|n| n.parent)
    }

    /// Children of an entity
    pub fn children(&self, entity: EntityId) -> &[EntityId] {
        self.entities
            .get(entity)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// Components of an entity
    pub fn components(&self, entity: EntityId) -> Option<&ComponentSet> {
        self.entities.get(entity).map(|n| &n.components)
    }

    /// Mutable components of an entity
    pub fn components_mut(&mut self, entity: EntityId) -> Option<&mut ComponentSet> {
        self.entities.get_mut(entity).map(|n| &mut n.components)
    }

    /// Local transform of an entity
    pub fn local_transform(&self, entity: EntityId) -> Option<&Transform> {
        self.entities.get(entity).map(|n| &n.local)
    }

    /// Set the local transform of an entity and record the change for
    /// `take_transform_changes`
    pub fn set_local_transform(&mut self, entity: EntityId, local: Transform) {
        if let Some(node) = self.entities.get_mut(entity) {
            node.local = local;
            self.transform_changes.push(entity);
        }
    }

    /// World transform of an entity, combining ancestors down from the root
    pub fn world_transform(&self, entity: EntityId) -> Transform {
        let Some(node) = self.entities.get(entity) else {
            return Transform::identity();
        };
        match node.parent {
            Some(parent) => self.world_transform(parent).combine(&node.local),
            None => node.local.clone(),
        }
    }

    /// World position of an entity
    pub fn world_position(&self, entity: EntityId) -> Vec3 {
        self.world_transform(entity).position
    }

    /// Move an entity under a different parent, keeping its local transform.
    /// The change is recorded for `take_parent_changes`. Fails when either
    /// entity is missing, the entity is the root, or the move would create a
    /// cycle.
    pub fn set_parent(&mut self, entity: EntityId, new_parent: EntityId) -> bool {
        if entity == self.root
            || !self.entities.contains_key(entity)
            || !self.entities.contains_key(new_parent)
        {
            return false;
        }
        let mut cursor = Some(new_parent);
        while let Some(current) = cursor {
            if current == entity {
                return false;
            }
            cursor = self.parent(current);
        }

        let old_parent = self.entities[entity].parent;
        if old_parent == Some(new_parent) {
            return true;
        }
        if let Some(parent) = old_parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.retain(|&c| c != entity);
        }
        if let Some(node) = self.entities.get_mut(new_parent) {
            node.children.push(entity);
        }
        if let Some(node) = self.entities.get_mut(entity) {
            node.parent = Some(new_parent);
        }
        self.parent_changes.push(entity);
        true
    }

    /// Drain the entities whose local transform changed since the last call.
    /// A changed parent moves every descendant, so callers refresh subtrees.
    pub fn take_transform_changes(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.transform_changes)
    }

    /// Drain the entities that were reparented since the last call
    pub fn take_parent_changes(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.parent_changes)
    }

    /// Register an emitter instance on the particle effect of `owner`
    pub fn add_emitter(&mut self, owner: EntityId, local_position: Vec3) -> Option<EmitterInstanceId> {
        if !self.entities.contains_key(owner) {
            return None;
        }
        let id = self.emitters.insert(EmitterInstance {
            owner,
            local_position,
        });
        let effect = self
            .entities
            .get_mut(owner)
            .and_then(|n| n.components.particle_effect.as_mut());
        match effect {
            Some(effect) => {
                effect.emitters.push(id);
                Some(id)
            }
            None => {
                self.emitters.remove(id);
                None
            }
        }
    }

    /// Detach an emitter instance from its owning effect
    pub fn remove_emitter(&mut self, emitter: EmitterInstanceId) {
        if let Some(instance) = self.emitters.remove(emitter) {
            if let Some(effect) = self
                .entities
                .get_mut(instance.owner)
                .and_then(|n| n.components.particle_effect.as_mut())
            {
                effect.emitters.retain(|&e| e != emitter);
            }
        }
    }

    /// Look up an emitter instance
    pub fn emitter(&self, emitter: EmitterInstanceId) -> Option<&EmitterInstance> {
        self.emitters.get(emitter)
    }

    /// World position of an emitter instance
    pub fn emitter_world_position(&self, emitter: EmitterInstanceId) -> Option<Vec3> {
        let instance = self.emitters.get(emitter)?;
        Some(
            self.world_transform(instance.owner)
                .transform_point(crate::foundation::math::Point3::from(instance.local_position))
                .coords,
        )
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
