//! Collision system settings
//!
//! Scale factors for the debug boxes built around entities without
//! geometry. Editable in the editor preferences and persisted with the rest
//! of the editor config.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Edge length of the unscaled debug collision box
pub const SIMPLE_COLLISION_BOX_SIZE: f32 = 1.0;

/// Scale factors applied to the debug collision boxes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Scale for generic marker boxes (sound, light, text, wind sources)
    pub debug_box_scale: f32,
    /// Scale for legacy user node boxes
    pub debug_box_user_scale: f32,
    /// Scale for path waypoint boxes
    pub debug_box_waypoint_scale: f32,
    /// Scale for particle effect and emitter boxes
    pub debug_box_particle_scale: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            debug_box_scale: 1.0,
            debug_box_user_scale: 1.0,
            debug_box_waypoint_scale: 1.0,
            debug_box_particle_scale: 1.0,
        }
    }
}

impl Config for CollisionSettings {}

impl CollisionSettings {
    /// Edge length of the generic marker box
    pub fn marker_box_size(&self) -> f32 {
        SIMPLE_COLLISION_BOX_SIZE * self.debug_box_scale
    }

    /// Edge length of the user node box
    pub fn user_box_size(&self) -> f32 {
        SIMPLE_COLLISION_BOX_SIZE * self.debug_box_user_scale
    }

    /// Edge length of the waypoint box
    pub fn waypoint_box_size(&self) -> f32 {
        SIMPLE_COLLISION_BOX_SIZE * self.debug_box_waypoint_scale
    }

    /// Edge length of the particle box
    pub fn particle_box_size(&self) -> f32 {
        SIMPLE_COLLISION_BOX_SIZE * self.debug_box_particle_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scales_are_unit() {
        let settings = CollisionSettings::default();

        assert_eq!(settings.marker_box_size(), SIMPLE_COLLISION_BOX_SIZE);
        assert_eq!(settings.particle_box_size(), SIMPLE_COLLISION_BOX_SIZE);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: CollisionSettings = toml::from_str("debug_box_scale = 2.5").unwrap();

        assert_eq!(settings.debug_box_scale, 2.5);
        assert_eq!(settings.debug_box_waypoint_scale, 1.0);
    }
}
