//! Interaction controller
//!
//! Turns pointer drags, wheel notches and gaze samples into a smoothed
//! orientation and a clamped camera distance. The controller is a continuous
//! control loop: input handlers only move targets, `tick` advances the state
//! once per rendered frame.

use glam::Vec2;
use shared::{GazeVector, InteractionMode};

use super::settings::{clamp_between, CameraSettings, InteractionSettings};

/// Display refresh rate the per-frame constants are expressed in
pub const REFERENCE_FPS: f32 = 60.0;

/// Duration of one reference frame
pub const REFERENCE_FRAME: f32 = 1.0 / REFERENCE_FPS;

/// Upper bound on reference frames advanced by a single tick (a stalled
/// window must not spin the solid by a quarter second worth of frames)
const MAX_STEPS_PER_TICK: f32 = 15.0;

/// Current and target orientation (radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationState {
    pub pitch: f32,
    pub yaw: f32,
    pub target_pitch: f32,
    pub target_yaw: f32,
}

impl OrientationState {
    /// Move the current orientation toward the target by `alpha` of the gap
    pub fn smooth(&mut self, alpha: f32) {
        self.pitch += (self.target_pitch - self.pitch) * alpha;
        self.yaw += (self.target_yaw - self.yaw) * alpha;
    }

    pub fn is_settled(&self) -> bool {
        self.pitch == self.target_pitch && self.yaw == self.target_yaw
    }

    /// Place both current and target orientation at an absolute value
    fn snap(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.target_pitch = pitch;
        self.target_yaw = yaw;
    }
}

/// Radial camera distance with its limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub distance: f32,
    pub min: f32,
    pub max: f32,
}

impl CameraState {
    /// Limits given in the wrong order are swapped
    pub fn new(distance: f32, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            distance: clamp_between(distance, min, max),
            min,
            max,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(
            settings.initial_distance,
            settings.min_distance,
            settings.max_distance,
        )
    }

    /// Multiply the distance by `factor`, then clamp to `[min, max]`
    pub fn zoom(&mut self, factor: f32) {
        self.distance = clamp_between(self.distance * factor, self.min, self.max);
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

/// What the render loop applies each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
}

/// Orientation and zoom driven by pointer, wheel and gaze input
#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    settings: InteractionSettings,
    pub orientation: OrientationState,
    pub camera: CameraState,
    dragging: bool,
    last_pointer: Vec2,
    latest_gaze: GazeVector,
}

impl InteractionController {
    pub fn new(settings: &InteractionSettings, camera: &CameraSettings) -> Self {
        Self {
            mode: settings.mode,
            settings: settings.clone(),
            orientation: OrientationState::default(),
            camera: CameraState::from_settings(camera),
            dragging: false,
            last_pointer: Vec2::ZERO,
            latest_gaze: GazeVector::ORIGIN,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch input mode. Orientation carries over; a drag in progress ends.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            tracing::info!("Interaction mode: {} -> {}", self.mode, mode);
            self.mode = mode;
            self.dragging = false;
        }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn latest_gaze(&self) -> GazeVector {
        self.latest_gaze
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = Vec2::new(x, y);
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        let pos = Vec2::new(x, y);
        let delta = pos - self.last_pointer;
        self.orientation.target_yaw += delta.x * self.settings.rotate_sensitivity;
        self.orientation.target_pitch += delta.y * self.settings.rotate_sensitivity;
        self.last_pointer = pos;
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Positive `delta_y` zooms out, negative zooms in; zero is ignored.
    pub fn on_wheel(&mut self, delta_y: f32) {
        let factor = if delta_y > 0.0 {
            self.settings.zoom_step
        } else if delta_y < 0.0 {
            2.0 - self.settings.zoom_step
        } else {
            return;
        };
        self.camera.zoom(factor);
    }

    /// Store the latest gaze sample. Ignored outside gaze mode.
    pub fn on_gaze_update(&mut self, gaze: GazeVector) {
        if self.mode == InteractionMode::Gaze {
            self.latest_gaze = gaze;
        }
    }

    /// Advance one rendered frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> ViewPose {
        let steps = if dt.is_finite() {
            (dt * REFERENCE_FPS).clamp(0.0, MAX_STEPS_PER_TICK)
        } else {
            0.0
        };

        match self.mode {
            InteractionMode::Pointer => {
                let alpha = 1.0 - (1.0 - self.settings.smoothing).powf(steps);
                self.orientation.smooth(alpha);

                if !self.dragging {
                    let spin = self.settings.auto_rotate_speed * steps;
                    self.orientation.yaw += spin;
                    self.orientation.target_yaw += spin;
                }
            }
            InteractionMode::Gaze => {
                let gaze = self.latest_gaze;
                self.orientation.snap(-gaze.y, -(gaze.x / 2.0));
            }
        }

        self.pose()
    }

    pub fn pose(&self) -> ViewPose {
        ViewPose {
            pitch: self.orientation.pitch,
            yaw: self.orientation.yaw,
            distance: self.camera.distance,
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&InteractionSettings::default(), &CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn still() -> InteractionController {
        let settings = InteractionSettings {
            auto_rotate_speed: 0.0,
            ..InteractionSettings::default()
        };
        InteractionController::new(&settings, &CameraSettings::default())
    }

    #[test]
    fn test_drag_accumulates_targets() {
        let mut ctl = still();
        ctl.on_pointer_down(100.0, 100.0);
        ctl.on_pointer_move(110.0, 95.0);
        ctl.on_pointer_move(130.0, 95.0);
        assert_relative_eq!(ctl.orientation.target_yaw, 0.3, epsilon = 1e-6);
        assert_relative_eq!(ctl.orientation.target_pitch, -0.05, epsilon = 1e-6);
        ctl.on_pointer_up();
        ctl.on_pointer_move(500.0, 500.0);
        assert_relative_eq!(ctl.orientation.target_yaw, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut ctl = still();
        ctl.on_pointer_move(10.0, 10.0);
        assert_eq!(ctl.orientation, OrientationState::default());
    }

    #[test]
    fn test_one_tick_smoothing() {
        let mut ctl = still();
        ctl.orientation.target_yaw = 1.0;
        let pose = ctl.tick(REFERENCE_FRAME);
        assert_relative_eq!(pose.yaw, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_long_frame_equals_many_short_frames() {
        let mut a = still();
        let mut b = still();
        a.orientation.target_pitch = 1.0;
        b.orientation.target_pitch = 1.0;
        a.tick(REFERENCE_FRAME * 4.0);
        for _ in 0..4 {
            b.tick(REFERENCE_FRAME);
        }
        assert_relative_eq!(a.orientation.pitch, b.orientation.pitch, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_dt_does_nothing() {
        let mut ctl = InteractionController::default();
        ctl.orientation.target_yaw = 1.0;
        ctl.tick(f32::NAN);
        ctl.tick(-1.0);
        assert_eq!(ctl.orientation.yaw, 0.0);
    }

    #[test]
    fn test_auto_rotate_only_when_idle() {
        let mut ctl = InteractionController::default();
        ctl.tick(REFERENCE_FRAME);
        assert_relative_eq!(ctl.orientation.yaw, 0.005, epsilon = 1e-6);
        assert_relative_eq!(ctl.orientation.target_yaw, 0.005, epsilon = 1e-6);

        ctl.on_pointer_down(0.0, 0.0);
        let before = ctl.orientation.yaw;
        ctl.tick(REFERENCE_FRAME);
        assert_relative_eq!(ctl.orientation.yaw, before, epsilon = 1e-6);
    }

    #[test]
    fn test_wheel_direction() {
        let mut ctl = still();
        ctl.on_wheel(1.0);
        assert_relative_eq!(ctl.camera.distance, 8.8, epsilon = 1e-5);
        ctl.on_wheel(-1.0);
        assert_relative_eq!(ctl.camera.distance, 7.92, epsilon = 1e-5);
        ctl.on_wheel(0.0);
        assert_relative_eq!(ctl.camera.distance, 7.92, epsilon = 1e-5);
    }

    #[test]
    fn test_gaze_mode_maps_absolutely() {
        let mut ctl = InteractionController::default();
        ctl.set_mode(InteractionMode::Gaze);
        ctl.on_gaze_update(GazeVector::new(0.2, -0.1));
        let pose = ctl.tick(REFERENCE_FRAME);
        assert_relative_eq!(pose.pitch, 0.1, epsilon = 1e-6);
        assert_relative_eq!(pose.yaw, -0.1, epsilon = 1e-6);
        assert!(ctl.orientation.is_settled());
    }

    #[test]
    fn test_gaze_ignored_in_pointer_mode() {
        let mut ctl = still();
        ctl.on_gaze_update(GazeVector::new(0.4, 0.4));
        assert_eq!(ctl.latest_gaze(), GazeVector::ORIGIN);
    }

    #[test]
    fn test_mode_switch_ends_drag() {
        let mut ctl = still();
        ctl.on_pointer_down(0.0, 0.0);
        ctl.set_mode(InteractionMode::Gaze);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_camera_state_clamps_initial() {
        let camera = CameraState::new(50.0, 2.0, 20.0);
        assert_eq!(camera.distance, 20.0);
    }

    #[test]
    fn test_camera_state_swaps_inverted_limits() {
        let mut camera = CameraState::new(5.0, 30.0, 20.0);
        assert_eq!((camera.min, camera.max), (20.0, 30.0));
        assert_eq!(camera.distance, 20.0);
        camera.zoom(10.0);
        assert_eq!(camera.distance, 30.0);
    }
}
