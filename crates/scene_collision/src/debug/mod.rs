//! Debug visualization of the collision mirror.

pub mod draw;

pub use draw::{DebugDrawMode, DebugDrawSystem, DebugLine};
