//! Integration tests driving a headless session through `SessionHarness`.

use approx::assert_relative_eq;
use glam::Vec3;
use shared::{FaceSlot, UvRotation};

use frustum_viewer_lib::fixtures::*;
use frustum_viewer_lib::harness::SessionHarness;
use frustum_viewer_lib::state::{ViewerSettings, REFERENCE_FRAME};

#[test]
fn test_default_session_is_consistent() {
    let session = SessionHarness::new();
    let errors = session.validate();
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
    assert_eq!(session.face_meshes().len(), 6);
    assert_eq!(session.outline_segment_count(), 12);
}

#[test]
fn test_rotated_uv_session_is_consistent() {
    let mut settings = ViewerSettings::default();
    settings.solid.uv_rotations = [
        UvRotation::Deg0,
        UvRotation::Deg90,
        UvRotation::Deg180,
        UvRotation::Deg270,
        UvRotation::Deg90,
        UvRotation::Deg180,
    ];
    let session = SessionHarness::with_settings(settings);
    assert!(session.validate().is_empty());
    assert_eq!(session.face_mesh(FaceSlot::Right).uv(0), [0.0, 1.0]);
}

#[test]
fn test_cube_session() {
    let mut settings = ViewerSettings::default();
    settings.solid.params = cube_params(3.0);
    let session = SessionHarness::with_settings(settings);
    assert!(session.validate().is_empty());
}

#[test]
fn test_drag_rotates_after_smoothing() {
    let mut session = SessionHarness::still();
    session.drag((100.0, 100.0), (200.0, 100.0), 10);

    let first = session.run_frames(1);
    assert_relative_eq!(first.yaw, 0.1, epsilon = 1e-4);

    let settled = session.run_frames(300);
    assert_relative_eq!(settled.yaw, 1.0, epsilon = 1e-4);
    assert_relative_eq!(settled.pitch, 0.0);
}

#[test]
fn test_idle_spin() {
    let mut session = SessionHarness::new();
    let pose = session.run_frames(60);
    assert_relative_eq!(pose.yaw, 0.3, epsilon = 1e-4);
}

#[test]
fn test_slow_frames_spin_like_fast_ones() {
    let mut fast = SessionHarness::new();
    let mut slow = SessionHarness::new();
    fast.run_frames(4);
    let slow_pose = slow.frame(REFERENCE_FRAME * 4.0);
    assert_relative_eq!(slow_pose.yaw, fast.pose().yaw, epsilon = 1e-5);
}

#[test]
fn test_wheel_zoom_clamped() {
    let mut session = SessionHarness::still();
    session.wheel(1.0, 100);
    assert_eq!(session.run_frames(1).distance, 20.0);
    session.wheel(-1.0, 100);
    assert_eq!(session.run_frames(1).distance, 2.0);
}

#[test]
fn test_scale_applies_to_model() {
    let mut session = SessionHarness::still();
    session.set_scale(2.5);
    assert_eq!(session.state.scale_label(), "2.5");

    let model = session.state.model_matrix();
    let corner = model.transform_point3(session.state.solid.vertices[0]);
    assert!(corner.abs_diff_eq(Vec3::new(-7.5, -7.5, -5.0), 1e-5));

    session.set_scale(99.0);
    assert_eq!(session.state.scale(), 3.0);
}

#[test]
fn test_pitch_rotates_about_x() {
    let mut session = SessionHarness::still();
    session.state.controller.orientation.pitch = std::f32::consts::FRAC_PI_2;
    session.state.controller.orientation.target_pitch = std::f32::consts::FRAC_PI_2;
    session.run_frames(1);

    let top_center = session.state.model_matrix().transform_point3(Vec3::new(0.0, 0.0, 2.0));
    assert!(top_center.abs_diff_eq(Vec3::new(0.0, -2.0, 0.0), 1e-5));
}

#[test]
fn test_unvalidated_inverted_ranges_do_not_panic() {
    let settings: ViewerSettings = serde_json::from_str(
        r#"{ "camera": { "min_distance": 30.0, "max_distance": 20.0 },
             "scale": { "min": 3.0, "max": 0.1 } }"#,
    )
    .unwrap();
    assert!(settings.validate().is_err());

    let mut session = SessionHarness::with_settings(settings);
    session.wheel(-1.0, 50);
    let pose = session.run_frames(1);
    assert!((20.0..=30.0).contains(&pose.distance));

    session.set_scale(99.0);
    assert_eq!(session.state.scale(), 3.0);
}
