pub mod interaction;
pub mod settings;

use glam::{EulerRot, Mat4, Vec3};

use crate::build::{assemble_solid, AssembledSolid};
use crate::gaze::GazeReceiver;

pub use interaction::{
    CameraState, InteractionController, OrientationState, ViewPose, REFERENCE_FPS, REFERENCE_FRAME,
};
pub use settings::{
    CameraSettings, ConfigError, DetectorSettings, InteractionSettings, ScaleSettings,
    SolidSettings, TextureSettings, ViewerSettings, ViewportSettings,
};

/// One viewing session: the solid, its interaction state and the slider value.
/// Owned by the render loop; input handlers and the gaze feed reach the
/// controller through it.
pub struct ViewerState {
    pub settings: ViewerSettings,
    pub solid: AssembledSolid,
    pub controller: InteractionController,
    scale: f32,
    gaze: Option<GazeReceiver>,
    frames: u64,
}

impl ViewerState {
    pub fn new(settings: ViewerSettings) -> Self {
        let solid = assemble_solid(
            &settings.solid.params,
            &settings.solid.uv_rotations,
            settings.viewport.outline_rgba(),
        );
        let controller = InteractionController::new(&settings.interaction, &settings.camera);
        let scale = settings.scale.clamp(settings.scale.initial);
        Self {
            settings,
            solid,
            controller,
            scale,
            gaze: None,
            frames: 0,
        }
    }

    /// Read gaze samples from a feed on every frame from now on
    pub fn attach_gaze(&mut self, receiver: GazeReceiver) {
        self.gaze = Some(receiver);
    }

    pub fn has_gaze_feed(&self) -> bool {
        self.gaze.is_some()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the uniform scale, clamped to the slider range. Non-finite values are ignored.
    pub fn set_scale(&mut self, value: f32) {
        if value.is_finite() {
            self.scale = self.settings.scale.clamp(value);
        }
    }

    /// Slider readout, one decimal place
    pub fn scale_label(&self) -> String {
        format!("{:.1}", self.scale)
    }

    /// Advance one rendered frame: pick up the latest gaze, then tick the controller
    pub fn frame(&mut self, dt: f32) -> ViewPose {
        if let Some(receiver) = &mut self.gaze {
            let gaze = *receiver.borrow_and_update();
            self.controller.on_gaze_update(gaze);
        }
        self.frames += 1;
        self.controller.tick(dt)
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Object transform: pitch about X, then yaw about Y, then uniform scale.
    /// The outline shares it.
    pub fn model_matrix(&self) -> Mat4 {
        let o = &self.controller.orientation;
        Mat4::from_euler(EulerRot::XYZ, o.pitch, o.yaw, 0.0) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaze::gaze_channel;
    use approx::assert_relative_eq;
    use shared::{GazeVector, InteractionMode};

    #[test]
    fn test_scale_clamped_to_slider() {
        let mut state = ViewerState::default();
        state.set_scale(10.0);
        assert_eq!(state.scale(), 3.0);
        state.set_scale(0.0);
        assert_eq!(state.scale(), 0.1);
        state.set_scale(f32::NAN);
        assert_eq!(state.scale(), 0.1);
        state.set_scale(1.26);
        assert_eq!(state.scale_label(), "1.3");
    }

    #[test]
    fn test_frame_reads_latest_gaze() {
        let mut settings = ViewerSettings::default();
        settings.interaction.mode = InteractionMode::Gaze;
        let mut state = ViewerState::new(settings);

        let (publisher, rx) = gaze_channel();
        state.attach_gaze(rx);
        publisher.publish(GazeVector::new(0.4, 0.2));
        publisher.publish(GazeVector::new(0.2, -0.1));

        let pose = state.frame(REFERENCE_FRAME);
        assert_relative_eq!(pose.pitch, 0.1, epsilon = 1e-6);
        assert_relative_eq!(pose.yaw, -0.1, epsilon = 1e-6);
        assert_eq!(state.frame_count(), 1);
    }

    #[test]
    fn test_model_matrix_scales_uniformly() {
        let mut state = ViewerState::default();
        state.set_scale(2.0);
        let p = state.model_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
    }
}
