//! A perspective camera that always looks at the origin.
//!
//! The camera carries no rotation of its own: its orientation is derived from
//! its position and up vector, and orbiting rotates both of them about the
//! origin.

use glam::{Quat, Vec2, Vec3};

use crate::geometry::Ray;

/// Default distance from the origin.
pub const DEFAULT_DISTANCE: f32 = 8.0;

/// Default vertical field of view, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Up vector. Kept perpendicular to the view direction by [`Camera::orbit`].
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, DEFAULT_DISTANCE), Vec3::Y, 1.0)
    }
}

impl Camera {
    /// Creates a camera at `position` looking at the origin.
    ///
    /// `up` is projected to be perpendicular to the view direction.
    pub fn new(position: Vec3, up: Vec3, aspect: f32) -> Self {
        let forward = (-position).normalize_or_zero();
        let up = (up - forward * up.dot(forward)).normalize_or_zero();
        Self {
            position,
            up,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect,
        }
    }

    /// Unit vector from the camera toward the origin.
    pub fn forward(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }

    /// Unit vector pointing to the right of the view.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Unit vector pointing up in the view, perpendicular to `forward`.
    pub fn view_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn distance(&self) -> f32 {
        self.position.length()
    }

    fn half_extents(&self) -> Vec2 {
        let half_height = (self.fov_y / 2.0).tan();
        Vec2::new(half_height * self.aspect, half_height)
    }

    /// Casts a ray from the camera through a point in normalized device
    /// coordinates (`-1..=1` on both axes, y up).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let half = self.half_extents();
        let direction = self.forward()
            + self.right() * (ndc.x * half.x)
            + self.view_up() * (ndc.y * half.y);
        Ray::new(self.position, direction)
    }

    /// Projects a world-space point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let offset = point - self.position;
        let depth = offset.dot(self.forward());
        if depth <= f32::EPSILON {
            return None;
        }
        let half = self.half_extents();
        Some(Vec2::new(
            offset.dot(self.right()) / (depth * half.x),
            offset.dot(self.view_up()) / (depth * half.y),
        ))
    }

    /// Orbits the camera about the origin by a pointer delta in NDC.
    ///
    /// Vertical motion pitches about the camera's right axis and horizontal
    /// motion yaws about the world up axis. Pitch is applied first. Position
    /// and up vector are rotated together, so the distance to the origin is
    /// preserved and the view does not roll.
    pub fn orbit(&mut self, delta: Vec2, sensitivity: f32) {
        let pitch = Quat::from_axis_angle(self.right(), delta.y * sensitivity);
        let yaw = Quat::from_axis_angle(Vec3::Y, -delta.x * sensitivity);
        let combined = (yaw * pitch).normalize();

        self.position = combined * self.position;
        self.up = (combined * self.up).normalize_or_zero();
    }
}
