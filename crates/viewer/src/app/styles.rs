//! Application style configuration

use eframe::egui;

/// Dark theme; the viewport fills the window so the panels stay thin
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();
    for widget in [
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(3);
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.slider_width = 180.0;

    style.visuals.panel_fill = egui::Color32::from_rgb(18, 18, 20);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(0, 150, 90);

    ctx.set_style(style);
}
