//! Collision and selection query system for a 3D scene editor
//!
//! Mirrors an editor scene into collision worlds and answers the queries
//! selection tooling needs: ray picks through the cursor, landscape hit
//! points for ground snapping, rectangle selection against plane sets, and
//! hierarchy bounding boxes.
//!
//! The mirror is incremental. Scene edits and editor commands mark objects
//! pending, and [`SceneCollisionSystem::process`] applies the changes once
//! per frame. Landscape terrain lives in its own collision world so ground
//! queries never hit scene objects.
//!
//! ```
//! use scene_collision::foundation::math::{Transform, Vec3};
//! use scene_collision::scene::{ComponentSet, SceneGraph};
//! use scene_collision::settings::CollisionSettings;
//! use scene_collision::SceneCollisionSystem;
//!
//! let mut scene = SceneGraph::new();
//! let entity = scene
//!     .add_entity(scene.root(), Transform::identity(), ComponentSet::default())
//!     .unwrap();
//!
//! let mut collision = SceneCollisionSystem::new(CollisionSettings::default());
//! collision.add_entity(&scene, entity);
//! collision.process(&mut scene);
//!
//! let hits = collision.objects_ray_test(
//!     &scene,
//!     Vec3::new(0.0, 0.0, 5.0),
//!     Vec3::new(0.0, 0.0, -5.0),
//! );
//! assert_eq!(hits.len(), 1);
//! ```

pub mod collision;
pub mod commands;
pub mod config;
pub mod debug;
pub mod foundation;
pub mod geometry;
pub mod physics;
pub mod scene;
pub mod settings;

pub use collision::{SceneCollisionSystem, SelectableHit};
pub use commands::CommandNotification;
pub use scene::{EditorCamera, SceneGraph, Selectable};
pub use settings::CollisionSettings;
