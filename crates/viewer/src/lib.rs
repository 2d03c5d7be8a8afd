// Library half of the viewer: geometry, interaction, gaze input and the
// headless harness. The eframe binary adds the window, panels and GL drawing.

pub mod build;
pub mod fixtures;
pub mod gaze;
pub mod harness;
pub mod state;
pub mod textures;
pub mod validation;

/// CPU-side buffers and outline extraction used by `build`.
/// Camera and GL code live in the binary.
pub mod viewport {
    pub mod edge;
    pub mod mesh;
}
