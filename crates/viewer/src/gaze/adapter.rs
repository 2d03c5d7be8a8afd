use shared::{FaceLandmarks, GazeVector, Landmark, LandmarkFrame};

use crate::state::DetectorSettings;

/// Landmark index of the left eye center
pub const LEFT_EYE: usize = 468;
/// Landmark index of the right eye center
pub const RIGHT_EYE: usize = 473;
/// Landmarks a face must carry for both eye centers to be present
pub const MIN_LANDMARKS: usize = 474;

/// Offset of one eye from the frame center, with the mirrored camera image
/// flipped back horizontally
pub fn eye_offset(eye: &Landmark) -> GazeVector {
    GazeVector::new((1.0 - eye.x) - 0.5, eye.y - 0.5)
}

/// Gaze vector of one face: the average of both eye offsets.
/// `None` when the face has too few landmarks.
pub fn on_landmarks(landmarks: &[Landmark]) -> Option<GazeVector> {
    if landmarks.len() < MIN_LANDMARKS {
        return None;
    }
    let left = eye_offset(&landmarks[LEFT_EYE]);
    let right = eye_offset(&landmarks[RIGHT_EYE]);
    Some(left.midpoint(&right))
}

/// Filters detector output down to the face that drives the gaze
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeAdapter {
    pub max_faces: usize,
    pub min_detection_confidence: f32,
}

impl GazeAdapter {
    pub fn new(settings: &DetectorSettings) -> Self {
        Self {
            max_faces: settings.max_faces,
            min_detection_confidence: settings.min_detection_confidence,
        }
    }

    fn accepts(&self, face: &FaceLandmarks) -> bool {
        face.score
            .map_or(true, |score| score >= self.min_detection_confidence)
    }

    /// Gaze vector for one frame. A frame without an accepted face yields
    /// `None` and the previous gaze stays in effect.
    pub fn on_frame(&self, frame: &LandmarkFrame) -> Option<GazeVector> {
        frame
            .faces
            .iter()
            .take(self.max_faces)
            .find(|face| self.accepts(face))
            .and_then(|face| on_landmarks(&face.landmarks))
    }
}

impl Default for GazeAdapter {
    fn default() -> Self {
        Self::new(&DetectorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_eye_offsets() {
        let left = eye_offset(&Landmark::new(0.3, 0.4, 0.0));
        let right = eye_offset(&Landmark::new(0.7, 0.4, 0.0));
        assert_relative_eq!(left.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(left.y, -0.1, epsilon = 1e-6);
        assert_relative_eq!(right.x, -0.2, epsilon = 1e-6);
        assert_relative_eq!(right.y, -0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_centered_eyes_give_origin() {
        let landmarks = fixtures::landmarks_with_eyes((0.5, 0.5), (0.5, 0.5));
        let gaze = on_landmarks(&landmarks).unwrap();
        assert_relative_eq!(gaze.x, 0.0);
        assert_relative_eq!(gaze.y, 0.0);
    }

    #[test]
    fn test_too_few_landmarks() {
        let landmarks = vec![Landmark::default(); MIN_LANDMARKS - 1];
        assert_eq!(on_landmarks(&landmarks), None);
    }

    #[test]
    fn test_empty_frame_gives_no_update() {
        let adapter = GazeAdapter::default();
        assert_eq!(adapter.on_frame(&LandmarkFrame::default()), None);
    }

    #[test]
    fn test_low_confidence_face_skipped() {
        let adapter = GazeAdapter {
            max_faces: 2,
            min_detection_confidence: 0.5,
        };
        let mut frame = LandmarkFrame::default();
        let mut weak = fixtures::face_with_eyes((0.1, 0.1), (0.1, 0.1));
        weak.score = Some(0.2);
        let strong = fixtures::face_with_eyes((0.3, 0.4), (0.7, 0.4));
        frame.faces = vec![weak, strong];

        let gaze = adapter.on_frame(&frame).unwrap();
        assert_relative_eq!(gaze.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(gaze.y, -0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_max_faces_limits_search() {
        let adapter = GazeAdapter::default();
        let mut weak = fixtures::face_with_eyes((0.1, 0.1), (0.1, 0.1));
        weak.score = Some(0.1);
        let strong = fixtures::face_with_eyes((0.3, 0.4), (0.7, 0.4));
        let frame = LandmarkFrame {
            faces: vec![weak, strong],
        };
        assert_eq!(adapter.on_frame(&frame), None);
    }
}
