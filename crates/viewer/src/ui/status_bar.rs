use egui::Ui;
use shared::InteractionMode;

use crate::gaze::LandmarkSource;
use crate::state::{ViewPose, ViewerState};

pub fn show(
    ui: &mut Ui,
    state: &ViewerState,
    pose: ViewPose,
    feed: Option<&LandmarkSource>,
    renderer: &str,
) {
    ui.horizontal(|ui| {
        let mode = state.controller.mode();
        ui.weak(format!("Mode: {mode}"));

        ui.separator();
        ui.weak(format!(
            "Pitch {:.1}°  Yaw {:.1}°",
            pose.pitch.to_degrees(),
            pose.yaw.to_degrees()
        ));

        ui.separator();
        ui.weak(format!("Distance {:.2}", pose.distance));

        if mode == InteractionMode::Gaze {
            ui.separator();
            let gaze = state.controller.latest_gaze();
            if state.has_gaze_feed() {
                let from = feed.map(|source| format!(" from {source}")).unwrap_or_default();
                ui.weak(format!("Gaze ({:+.2}, {:+.2}){from}", gaze.x, gaze.y));
            } else {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), "No landmark feed");
            }
        } else if state.controller.is_dragging() {
            ui.separator();
            ui.weak("Dragging");
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("frustum-viewer v{} · {renderer}", env!("CARGO_PKG_VERSION")));
        });
    });
}
