//! Editor viewport camera
//!
//! Converts cursor positions into world-space pick segments. The segment is
//! bounded so every downstream collision query works on finite segments
//! rather than infinite rays.

use crate::foundation::math::{Mat4, Point3, Vec2, Vec3};

/// Length of the pick segment cast from the camera through the cursor
pub const PICK_SEGMENT_LENGTH: f32 = 1000.0;

/// Perspective camera describing the editor viewport
#[derive(Debug, Clone)]
pub struct EditorCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl EditorCamera {
    /// Create a camera looking from `position` toward `target`
    pub fn new(position: Vec3, target: Vec3, viewport: Vec2) -> Self {
        Self {
            position,
            target,
            up: Vec3::y_axis().into_inner(),
            fov_y: std::f32::consts::FRAC_PI_3,
            viewport,
        }
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Unproject a cursor position into a world-space direction through the
    /// near plane.
    pub fn pick_direction(&self, cursor: Vec2) -> Vec3 {
        let aspect = self.viewport.x / self.viewport.y;
        let tan_half = (self.fov_y * 0.5).tan();

        // NDC with y flipped: cursor origin is the top-left corner
        let ndc_x = 2.0 * cursor.x / self.viewport.x - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / self.viewport.y;

        let (right, up, forward) = self.basis();
        (forward + right * (ndc_x * tan_half * aspect) + up * (ndc_y * tan_half)).normalize()
    }

    /// Pick segment from the camera through the cursor, `PICK_SEGMENT_LENGTH`
    /// units long.
    pub fn pick_segment(&self, cursor: Vec2) -> (Vec3, Vec3) {
        let direction = self.pick_direction(cursor);
        (self.position, self.position + direction * PICK_SEGMENT_LENGTH)
    }

    /// View matrix of the camera
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_pick_is_forward() {
        let camera = EditorCamera::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::zeros(),
            Vec2::new(800.0, 600.0),
        );

        let (from, to) = camera.pick_segment(Vec2::new(400.0, 300.0));

        assert_relative_eq!(from, camera.position);
        assert_relative_eq!(
            to,
            Vec3::new(0.0, 0.0, 10.0 - PICK_SEGMENT_LENGTH),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_upper_cursor_picks_upward() {
        let camera = EditorCamera::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::zeros(),
            Vec2::new(800.0, 600.0),
        );

        let dir = camera.pick_direction(Vec2::new(400.0, 0.0));

        assert!(dir.y > 0.0);
        assert!(dir.z < 0.0);
    }
}
