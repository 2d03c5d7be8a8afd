use egui::Ui;

use crate::state::ViewerState;

/// Scale slider with a one-decimal readout
pub fn show(ui: &mut Ui, state: &mut ViewerState) {
    let range = state.settings.scale.min..=state.settings.scale.max;
    let mut value = state.scale();

    ui.horizontal(|ui| {
        ui.label("Scale");
        let slider = egui::Slider::new(&mut value, range)
            .show_value(false)
            .step_by(0.1);
        if ui.add(slider).changed() {
            state.set_scale(value);
        }
        ui.monospace(state.scale_label());
    });
}
