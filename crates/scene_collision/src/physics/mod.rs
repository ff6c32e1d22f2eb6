//! Collision shapes and the worlds that hold them.

pub mod shape;
pub mod world;

pub use shape::{BoxShape, CollisionShape, HeightfieldShape, MeshShape};
pub use world::{CollisionWorld, ShapeHandle, WorldRayHit};
