//! Headless session harness.
//!
//! Drives a `ViewerState` frame by frame without a window: pointer drags,
//! wheel notches and detector frames go in, poses and mesh checks come out.

use shared::{FaceSlot, GazeVector, InteractionMode, LandmarkFrame};

use crate::gaze::{gaze_channel, GazeAdapter, GazePublisher};
use crate::state::{ViewPose, ViewerSettings, ViewerState, REFERENCE_FRAME};
use crate::validation::{MeshValidator, OutlineValidator};
use crate::viewport::mesh::MeshData;

/// Headless session: viewer state plus an in-process gaze channel
pub struct SessionHarness {
    pub state: ViewerState,
    adapter: GazeAdapter,
    publisher: GazePublisher,
    last_pose: ViewPose,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self::with_settings(ViewerSettings::default())
    }

    pub fn with_settings(settings: ViewerSettings) -> Self {
        let adapter = GazeAdapter::new(&settings.detector);
        let mut state = ViewerState::new(settings);
        let (publisher, receiver) = gaze_channel();
        state.attach_gaze(receiver);
        let last_pose = state.controller.pose();
        Self {
            state,
            adapter,
            publisher,
            last_pose,
        }
    }

    /// Session in pointer mode with the idle spin switched off
    pub fn still() -> Self {
        let mut settings = ViewerSettings::default();
        settings.interaction.auto_rotate_speed = 0.0;
        Self::with_settings(settings)
    }

    /// Session in gaze mode
    pub fn gaze() -> Self {
        let mut settings = ViewerSettings::default();
        settings.interaction.mode = InteractionMode::Gaze;
        Self::with_settings(settings)
    }

    // ── Input ─────────────────────────────────────────────────

    /// Press at `from`, move to `to` in `steps` even increments, release
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32), steps: usize) {
        let steps = steps.max(1);
        let ctl = &mut self.state.controller;
        ctl.on_pointer_down(from.0, from.1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            ctl.on_pointer_move(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
        ctl.on_pointer_up();
    }

    /// Apply `count` wheel notches of `delta_y` each
    pub fn wheel(&mut self, delta_y: f32, count: usize) {
        for _ in 0..count {
            self.state.controller.on_wheel(delta_y);
        }
    }

    /// Publish a gaze sample as the feed would
    pub fn publish_gaze(&self, gaze: GazeVector) {
        self.publisher.publish(gaze);
    }

    /// Pass a detector frame through the adapter. Returns whether it produced
    /// a gaze update.
    pub fn detector_frame(&self, frame: &LandmarkFrame) -> bool {
        match self.adapter.on_frame(frame) {
            Some(gaze) => {
                self.publisher.publish(gaze);
                true
            }
            None => false,
        }
    }

    pub fn set_scale(&mut self, value: f32) {
        self.state.set_scale(value);
    }

    // ── Frames ────────────────────────────────────────────────

    /// Run `count` frames at the reference rate and return the final pose
    pub fn run_frames(&mut self, count: usize) -> ViewPose {
        for _ in 0..count {
            self.last_pose = self.state.frame(REFERENCE_FRAME);
        }
        self.last_pose
    }

    /// Run a single frame of arbitrary length
    pub fn frame(&mut self, dt: f32) -> ViewPose {
        self.last_pose = self.state.frame(dt);
        self.last_pose
    }

    pub fn pose(&self) -> ViewPose {
        self.last_pose
    }

    // ── Meshes ────────────────────────────────────────────────

    pub fn face_mesh(&self, slot: FaceSlot) -> MeshData {
        self.state.solid.face(slot).mesh()
    }

    pub fn face_meshes(&self) -> Vec<MeshData> {
        self.state.solid.faces.iter().map(|f| f.mesh()).collect()
    }

    pub fn outline_segment_count(&self) -> usize {
        self.state.solid.outline.segment_count()
    }

    /// Validation errors across all face meshes and the outline, prefixed
    /// with the face name. Empty when everything is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for face in &self.state.solid.faces {
            let mesh = face.mesh();
            for e in MeshValidator::new(&mesh).validate_all() {
                errors.push(format!("{}: {e}", face.slot.label()));
            }
        }

        let outline = OutlineValidator::new(&self.state.solid.outline);
        if !outline.is_stride_valid() {
            errors.push("outline: vertex buffer is not whole segments".to_string());
        }
        if !outline.endpoints_within(&self.state.solid.vertices, 1e-5) {
            errors.push("outline: endpoint off the solid's corners".to_string());
        }
        if !outline.is_deduplicated(1e-5) {
            errors.push("outline: duplicate segments".to_string());
        }
        errors
    }
}

impl Default for SessionHarness {
    fn default() -> Self {
        Self::new()
    }
}
