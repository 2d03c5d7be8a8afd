//! Wireframe rendering for the viewport
//!
//! Used when no GL context is available: the outline is projected on the CPU
//! and drawn with egui's painter.

use egui::{Color32, Rect, Stroke, Ui};

use super::camera::ViewCamera;
use crate::state::ViewerState;

/// Paint the solid's outline using egui's painter
pub fn paint_viewport(ui: &Ui, rect: Rect, camera: &ViewCamera, state: &ViewerState) {
    let painter = ui.painter_at(rect);

    let bg = &state.settings.viewport.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    let c = &state.settings.viewport.outline_color;
    let stroke = Stroke::new(1.0, Color32::from_rgb(c[0], c[1], c[2]));

    let model = state.model_matrix();
    for (start, end) in state.solid.outline.segments() {
        let a = camera.project(model.transform_point3(start), rect);
        let b = camera.project(model.transform_point3(end), rect);
        if let (Some(a), Some(b)) = (a, b) {
            painter.line_segment([a, b], stroke);
        }
    }
}
