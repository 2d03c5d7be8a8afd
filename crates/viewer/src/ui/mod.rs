pub mod scale_panel;
pub mod status_bar;
