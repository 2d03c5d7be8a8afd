use glam::{Mat4, Vec3, Vec4};

use crate::state::CameraSettings;

/// Camera on the +Z axis looking at the origin, Y up.
/// Only the distance changes during a session.
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    /// Distance from the origin
    pub distance: f32,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewCamera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            distance: settings.initial_distance,
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), Vec3::ZERO, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to screen coords inside `rect`
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = aspect_of(rect);
        let p = self.view_projection(aspect) * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }
}

/// Width over height, guarded against a collapsed rectangle
pub fn aspect_of(rect: egui::Rect) -> f32 {
    if rect.height() > 0.0 {
        rect.width() / rect.height()
    } else {
        1.0
    }
}
