//! Collision mirror of the scene: per-object shape records, the hierarchy
//! enumerator that decides which shape each object gets, and the system that
//! keeps the mirror synchronized and answers queries.

pub mod enumerate;
pub mod object;
pub mod system;
pub mod tracking;

pub use enumerate::{build_shape, enumerate_hierarchy, ShapeBuildError, ShapeSpec};
pub use object::{CollisionObject, WorldKind};
pub use system::{SceneCollisionSystem, SelectableHit};
pub use tracking::TrackingTable;
