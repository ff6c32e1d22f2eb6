//! Scene collision system
//!
//! Keeps two collision worlds in sync with the entity graph and answers the
//! editor's selection queries. Regular objects live in one world, landscape
//! terrain in another so ground snapping never collides with scene objects.
//!
//! Scene edits only mark objects pending; the mirror changes in [`process`],
//! which applies all removals before any additions once per frame. Ray query
//! results are cached per exact segment until the next `process` call.
//!
//! [`process`]: SceneCollisionSystem::process

use std::collections::HashSet;

use crate::collision::enumerate::{build_shape, enumerate_hierarchy, ShapeSpec};
use crate::collision::object::{CollisionObject, WorldKind};
use crate::collision::tracking::TrackingTable;
use crate::commands::CommandNotification;
use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::geometry::plane::PlaneRelation;
use crate::geometry::{Aabb, Frustum};
use crate::physics::CollisionWorld;
use crate::scene::{EditorCamera, EntityId, SceneEvent, SceneGraph, Selectable, TransformType};
use crate::settings::CollisionSettings;

/// Maximum length of one landscape ray segment. Long pick rays are walked in
/// steps so the heightfield test stays local to the ray.
const LAND_RAY_STEP: f32 = 5.0;

/// One object hit by a ray query
#[derive(Debug, Clone, Copy)]
pub struct SelectableHit {
    /// Object that was hit
    pub object: Selectable,
    /// Fraction along the query segment
    pub fraction: f32,
    /// World-space bounding box of the object
    pub bounding_box: Aabb,
}

#[derive(Debug)]
struct RayCache {
    from: Vec3,
    to: Vec3,
    hits: Vec<SelectableHit>,
}

#[derive(Debug)]
struct LandCache {
    from: Vec3,
    to: Vec3,
    hit: Option<Vec3>,
}

/// Collision mirror of the scene with selection and ground queries
#[derive(Debug)]
pub struct SceneCollisionSystem {
    enabled: bool,
    objects_world: CollisionWorld,
    land_world: CollisionWorld,
    tracked: TrackingTable,
    to_add: HashSet<Selectable>,
    to_remove: HashSet<Selectable>,
    current_landscape: Option<EntityId>,
    settings: CollisionSettings,
    ray_cache: Option<RayCache>,
    land_cache: Option<LandCache>,
    mouse_position: Vec2,
}

impl SceneCollisionSystem {
    /// Create a system with the given debug box settings
    pub fn new(settings: CollisionSettings) -> Self {
        Self {
            enabled: true,
            objects_world: CollisionWorld::new(),
            land_world: CollisionWorld::new(),
            tracked: TrackingTable::new(),
            to_add: HashSet::new(),
            to_remove: HashSet::new(),
            current_landscape: None,
            settings,
            ray_cache: None,
            land_cache: None,
            mouse_position: Vec2::zeros(),
        }
    }

    /// True when the system mirrors the scene
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the system. Enabling re-mirrors the whole scene.
    pub fn set_enabled(&mut self, enabled: bool, scene: &SceneGraph) {
        self.enabled = enabled;
        if enabled {
            self.add_entity(scene, scene.root());
        }
    }

    /// Entity currently acting as the landscape, if any
    pub fn current_landscape(&self) -> Option<EntityId> {
        self.current_landscape
    }

    /// Number of mirrored objects
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Record the cursor position used by the camera-based queries
    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Mark an entity and its subtree for mirroring
    pub fn add_entity(&mut self, scene: &SceneGraph, entity: EntityId) {
        self.mark_subtree(scene, entity, false, true);
    }

    /// Mark an entity and its subtree for removal from the mirror. Must be
    /// called while the subtree still exists in the scene; marking an
    /// already-unmirrored entity is a no-op.
    pub fn remove_entity(&mut self, scene: &SceneGraph, entity: EntityId) {
        self.mark_subtree(scene, entity, true, false);
    }

    /// Rebuild the mirror of one object (and, for entities, its subtree) on
    /// the next `process`
    pub fn update_collision_object(&mut self, scene: &SceneGraph, object: Selectable) {
        match object.as_entity() {
            Some(entity) => self.mark_subtree(scene, entity, true, true),
            None => {
                self.to_remove.insert(object);
                self.to_add.insert(object);
            }
        }
    }

    fn mark_subtree(&mut self, scene: &SceneGraph, entity: EntityId, remove: bool, add: bool) {
        if !scene.contains(entity) {
            return;
        }
        let key = Selectable::Entity(entity);
        if remove {
            self.to_remove.insert(key);
            if let Some(effect) = scene.components(entity).and_then(|c| c.particle_effect.as_ref()) {
                for &emitter in &effect.emitters {
                    self.to_remove.insert(Selectable::EmitterInstance(emitter));
                }
            }
            if self.current_landscape == Some(entity) {
                self.current_landscape = None;
            }
        }
        if add {
            self.to_add.insert(key);
            if scene.components(entity).is_some_and(|c| c.landscape.is_some()) {
                if let Some(previous) = self.current_landscape {
                    if previous != entity {
                        log::warn!("scene has multiple landscapes, the last one added wins");
                    }
                }
                self.current_landscape = Some(entity);
            }
        }
        for &child in scene.children(entity) {
            self.mark_subtree(scene, child, remove, add);
        }
    }

    /// Apply pending removals and additions and refresh moved objects. Ray
    /// caches from previous frames are dropped.
    pub fn process(&mut self, scene: &mut SceneGraph) {
        if !self.enabled {
            return;
        }
        let moved = scene.take_transform_changes();
        let reparented = scene.take_parent_changes();
        for entity in moved.into_iter().chain(reparented) {
            self.mark_subtree(scene, entity, true, true);
        }

        // All removals happen before any addition so a re-added object never
        // sees its stale shape.
        for key in std::mem::take(&mut self.to_remove) {
            self.destroy(key);
        }

        let pending: Vec<Selectable> = self.to_add.drain().collect();
        let mut specs: Vec<(Selectable, ShapeSpec)> = Vec::new();
        for key in pending {
            // Only objects that exist as entities or can at least be held
            // selected get mirrored
            if key.as_entity().is_none() && !key.supports_transform(TransformType::Disabled) {
                continue;
            }
            enumerate_hierarchy(scene, &self.settings, key, &mut |visit_key, spec| {
                specs.push((visit_key, spec));
            });
        }
        for (key, spec) in specs {
            self.install(scene, key, &spec);
        }

        self.ray_cache = None;
    }

    /// Drop the whole mirror, keeping settings. Used when the scene is about
    /// to be torn down.
    pub fn prepare_for_remove(&mut self) {
        self.tracked.clear();
        self.objects_world.clear();
        self.land_world.clear();
        self.to_add.clear();
        self.to_remove.clear();
        self.current_landscape = None;
        self.ray_cache = None;
        self.land_cache = None;
    }

    fn destroy(&mut self, key: Selectable) {
        if let Some(record) = self.tracked.remove(key) {
            match record.world {
                WorldKind::Objects => self.objects_world.remove(record.handle),
                WorldKind::Landscape => {
                    self.land_world.remove(record.handle);
                    self.land_cache = None;
                }
            }
        }
    }

    fn install(&mut self, scene: &SceneGraph, key: Selectable, spec: &ShapeSpec) {
        let shape = match build_shape(scene, spec) {
            Ok(shape) => shape,
            Err(err) => {
                log::warn!("skipping collision shape for {key:?}: {err}");
                return;
            }
        };
        // Replace, never duplicate
        self.destroy(key);

        let world = match spec {
            ShapeSpec::Landscape { .. } => WorldKind::Landscape,
            _ => WorldKind::Objects,
        };
        let bounds = shape.bounds();
        let handle = match world {
            WorldKind::Objects => self.objects_world.insert(shape),
            WorldKind::Landscape => {
                self.land_cache = None;
                self.land_world.insert(shape)
            }
        };
        let position = key.world_position(scene).unwrap_or_else(Vec3::zeros);
        self.tracked.insert(CollisionObject {
            key,
            handle,
            world,
            local_box: bounds.translated(-position),
        });
    }

    /// Intersect a segment with every mirrored object, nearest hit first.
    /// Repeating the exact same segment returns the cached result without
    /// touching the collision world.
    pub fn objects_ray_test(&mut self, scene: &SceneGraph, from: Vec3, to: Vec3) -> &[SelectableHit] {
        let cached = self
            .ray_cache
            .as_ref()
            .is_some_and(|c| c.from == from && c.to == to);
        if !cached {
            let mut raw = self.objects_world.ray_test_all(from, to);
            raw.sort_by(|a, b| a.hit.fraction.total_cmp(&b.hit.fraction));

            let mut hits = Vec::with_capacity(raw.len());
            for world_hit in raw {
                if let Some(object) = self.tracked.key_for(world_hit.handle) {
                    let bounding_box = self
                        .tracked
                        .get(object)
                        .zip(object.world_position(scene))
                        .map_or_else(Aabb::empty, |(record, position)| record.world_box(position));
                    hits.push(SelectableHit {
                        object,
                        fraction: world_hit.hit.fraction,
                        bounding_box,
                    });
                }
            }
            self.ray_cache = Some(RayCache { from, to, hits });
        }
        self.ray_cache.as_ref().map_or(&[][..], |c| c.hits.as_slice())
    }

    /// Ray test through the cursor from the editor camera
    pub fn objects_ray_test_from_camera(
        &mut self,
        scene: &SceneGraph,
        camera: &EditorCamera,
    ) -> &[SelectableHit] {
        let (from, to) = camera.pick_segment(self.mouse_position);
        self.objects_ray_test(scene, from, to)
    }

    /// Intersect a segment with the landscape, returning the hit point. The
    /// segment is walked in `LAND_RAY_STEP`-long pieces so the heightfield
    /// test stays local; the final partial piece is always tested. Repeated
    /// identical segments return the cached result.
    pub fn land_ray_test(&mut self, from: Vec3, to: Vec3) -> Option<Vec3> {
        if let Some(cache) = &self.land_cache {
            if cache.from == from && cache.to == to {
                return cache.hit;
            }
        }

        let mut result = None;
        let total = (to - from).norm();
        if total > f32::EPSILON {
            let direction = (to - from) / total;
            let mut start = from;
            let mut remaining = total;
            loop {
                let length = remaining.min(LAND_RAY_STEP);
                let end = start + direction * length;
                if let Some(hit) = self.land_world.ray_test_closest(start, end) {
                    result = Some(hit.hit.point);
                    break;
                }
                remaining -= length;
                if remaining <= f32::EPSILON {
                    break;
                }
                start = end;
            }
        }

        self.land_cache = Some(LandCache { from, to, hit: result });
        result
    }

    /// Landscape ray test through the cursor from the editor camera
    pub fn land_ray_test_from_camera(&mut self, camera: &EditorCamera) -> Option<Vec3> {
        let (from, to) = camera.pick_segment(self.mouse_position);
        self.land_ray_test(from, to)
    }

    /// Objects inside or intersecting the region bounded by the planes.
    /// Rebuilt from scratch on every call.
    pub fn clip_objects_to_planes(&self, scene: &SceneGraph, frustum: &Frustum) -> Vec<Selectable> {
        let mut result = Vec::new();
        for record in self.tracked.iter() {
            let Some(position) = record.key.world_position(scene) else {
                continue;
            };
            if record.classify_to_planes(position, frustum) == PlaneRelation::ContainsOrIntersects {
                result.push(record.key);
            }
        }
        result
    }

    /// Untransformed bounding box of an object united with its children's,
    /// recursively
    pub fn bounding_box(&self, scene: &SceneGraph, object: Selectable) -> Aabb {
        let mut result = self
            .tracked
            .get(object)
            .map_or_else(Aabb::empty, |record| record.local_box);
        if let Some(entity) = object.as_entity() {
            for &child in scene.children(entity) {
                result = result.union(&self.bounding_box(scene, child.into()));
            }
        }
        result
    }

    /// Bounding box of an object and its children with each child's local
    /// transform applied, the whole result transformed by `transform`
    pub fn transformed_bounding_box(
        &self,
        scene: &SceneGraph,
        object: Selectable,
        transform: &Mat4,
    ) -> Aabb {
        let mut result = self
            .tracked
            .get(object)
            .map_or_else(Aabb::empty, |record| record.local_box);
        if let Some(entity) = object.as_entity() {
            for &child in scene.children(entity) {
                let child_matrix = scene
                    .local_transform(child)
                    .map_or_else(Mat4::identity, crate::foundation::math::Transform::to_matrix);
                let child_box = self.transformed_bounding_box(scene, child.into(), &child_matrix);
                result = result.union(&child_box);
            }
        }
        result.transformed(transform)
    }

    /// React to a command from the undo/redo stack
    pub fn process_command(&mut self, scene: &SceneGraph, notification: CommandNotification) {
        match notification {
            CommandNotification::HeightmapModified | CommandNotification::HeightmapPathChanged => {
                if let Some(landscape) = self.current_landscape {
                    self.update_collision_object(scene, Selectable::Entity(landscape));
                }
            }
            CommandNotification::PlaneLodCreated(entity)
            | CommandNotification::LodDeleted(entity)
            | CommandNotification::RenderBatchDeleted(entity)
            | CommandNotification::ConvertedToBillboard(entity) => {
                self.update_collision_object(scene, Selectable::Entity(entity));
            }
            CommandNotification::Transformed(object) => {
                self.update_collision_object(scene, object);
            }
            CommandNotification::EmitterRemoved { instance, is_redo } => {
                let key = Selectable::EmitterInstance(instance);
                if is_redo {
                    self.to_remove.insert(key);
                } else {
                    self.to_add.insert(key);
                }
            }
        }
    }

    /// React to a scene event
    pub fn handle_scene_event(&mut self, scene: &SceneGraph, event: SceneEvent) {
        match event {
            SceneEvent::SwitchChanged(entity) | SceneEvent::GeoDecalChanged(entity) => {
                self.update_collision_object(scene, Selectable::Entity(entity));
            }
        }
    }

    pub(crate) fn tracked(&self) -> &TrackingTable {
        &self.tracked
    }

    pub(crate) fn objects_world(&self) -> &CollisionWorld {
        &self.objects_world
    }

    pub(crate) fn land_world(&self) -> &CollisionWorld {
        &self.land_world
    }

    pub(crate) fn cached_rays(&self) -> Vec<(Vec3, Vec3)> {
        let mut rays = Vec::new();
        if let Some(cache) = &self.ray_cache {
            rays.push((cache.from, cache.to));
        }
        if let Some(cache) = &self.land_cache {
            rays.push((cache.from, cache.to));
        }
        rays
    }

    pub(crate) fn cached_land_hit(&self) -> Option<Vec3> {
        self.land_cache.as_ref().and_then(|cache| cache.hit)
    }
}
