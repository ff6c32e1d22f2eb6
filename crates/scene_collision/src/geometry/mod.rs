//! Geometric primitives shared by the scene graph and the collision worlds.

pub mod aabb;
pub mod plane;
pub mod primitives;

pub use aabb::Aabb;
pub use plane::{Frustum, Plane};
pub use primitives::{Ray, SegmentHit, Triangle};
