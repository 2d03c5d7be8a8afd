//! Factory functions for creating test data.
//!
//! Solid parameters, unit quads and detector output with eye centers placed
//! at chosen image coordinates.

use glam::Vec3;
use shared::{FaceLandmarks, Landmark, LandmarkFrame, SolidParams, UvRotation, FACE_COUNT};

use crate::build::{assemble_solid, AssembledSolid};
use crate::gaze::{LEFT_EYE, MIN_LANDMARKS, RIGHT_EYE};

// ── Solid factories ─────────────────────────────────────────────

/// The demo solid: top edge 0.6, bottom edge 6, height 4.
pub fn demo_params() -> SolidParams {
    SolidParams::new(0.6, 6.0, 4.0)
}

/// A cube: equal top and bottom edges.
pub fn cube_params(edge: f32) -> SolidParams {
    SolidParams::new(edge, edge, edge)
}

/// No UV rotation on any face.
pub fn no_rotations() -> [UvRotation; FACE_COUNT] {
    [UvRotation::Deg0; FACE_COUNT]
}

/// Assemble a solid with default UVs and a white outline.
pub fn solid(params: SolidParams) -> AssembledSolid {
    assemble_solid(&params, &no_rotations(), [1.0; 4])
}

/// Counter-clockwise unit square in the XY plane.
pub fn unit_square() -> [Vec3; 4] {
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]
}

// ── Landmark factories ──────────────────────────────────────────

/// A full landmark set, every point at the image center except the two eyes.
pub fn landmarks_with_eyes(left: (f32, f32), right: (f32, f32)) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); MIN_LANDMARKS];
    landmarks[LEFT_EYE] = Landmark::new(left.0, left.1, 0.0);
    landmarks[RIGHT_EYE] = Landmark::new(right.0, right.1, 0.0);
    landmarks
}

/// One detected face with a confident score.
pub fn face_with_eyes(left: (f32, f32), right: (f32, f32)) -> FaceLandmarks {
    FaceLandmarks {
        score: Some(0.95),
        landmarks: landmarks_with_eyes(left, right),
    }
}

/// A detector frame holding a single face.
pub fn frame_with_eyes(left: (f32, f32), right: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame {
        faces: vec![face_with_eyes(left, right)],
    }
}

/// A frame with nobody in view.
pub fn empty_frame() -> LandmarkFrame {
    LandmarkFrame::default()
}

/// `frame_with_eyes` serialized as one JSON line (no trailing newline).
pub fn frame_line(left: (f32, f32), right: (f32, f32)) -> String {
    serde_json::to_string(&frame_with_eyes(left, right)).unwrap_or_default()
}
