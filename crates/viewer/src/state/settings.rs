//! Viewer settings
//!
//! Every tunable of the viewer lives here: solid dimensions, interaction
//! constants, camera limits, slider range, texture sources and the landmark
//! detector thresholds. Settings are JSON on disk and validated before the
//! window opens.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{FaceSlot, InteractionMode, SolidParams, UvRotation, FACE_COUNT};
use thiserror::Error;

/// Errors raised while loading, saving or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Solid dimensions and per-face UV orientation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidSettings {
    #[serde(flatten)]
    pub params: SolidParams,
    /// UV rotation per face slot, in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub uv_rotations: [UvRotation; FACE_COUNT],
}

impl Default for SolidSettings {
    fn default() -> Self {
        Self {
            params: SolidParams::default(),
            uv_rotations: [UvRotation::Deg0; FACE_COUNT],
        }
    }
}

/// Interaction constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub mode: InteractionMode,
    /// Exponential smoothing factor per reference frame, in (0, 1]
    pub smoothing: f32,
    /// Radians of rotation per pixel of pointer drag
    pub rotate_sensitivity: f32,
    /// Distance multiplier per wheel notch away from the viewer; notches
    /// toward the viewer use `2 - zoom_step`
    pub zoom_step: f32,
    /// Idle yaw increment per reference frame (pointer mode only)
    pub auto_rotate_speed: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Pointer,
            smoothing: 0.1,
            rotate_sensitivity: 0.01,
            zoom_step: 1.1,
            auto_rotate_speed: 0.005,
        }
    }
}

/// Camera placement and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub initial_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_distance: 8.0,
            min_distance: 2.0,
            max_distance: 20.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Scale slider range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub min: f32,
    pub max: f32,
    pub initial: f32,
}

impl ScaleSettings {
    /// Clamp to the slider range. Never panics, even on a range that
    /// `validate` would reject.
    pub fn clamp(&self, value: f32) -> f32 {
        clamp_between(value, self.min, self.max)
    }
}

/// `value` limited to the interval spanned by `a` and `b`, in either order.
/// Unlike `f32::clamp` it never panics, NaN bounds included.
pub(crate) fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value.max(lo).min(hi)
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            initial: 1.0,
        }
    }
}

/// Image sources, one per face slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextureSettings {
    #[serde(default)]
    pub paths: [Option<PathBuf>; FACE_COUNT],
}

impl TextureSettings {
    pub fn path(&self, slot: FaceSlot) -> Option<&Path> {
        self.paths[slot.index()].as_deref()
    }

    /// Configured (slot, path) pairs
    pub fn sources(&self) -> impl Iterator<Item = (FaceSlot, &Path)> + '_ {
        FaceSlot::ALL
            .iter()
            .filter_map(move |slot| self.path(*slot).map(|p| (*slot, p)))
    }
}

/// Filtering applied to landmark frames from the external detector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    /// Faces considered per frame; only the first accepted face drives the gaze
    pub max_faces: usize,
    /// Faces reporting a lower score are ignored
    pub min_detection_confidence: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            max_faces: 1,
            min_detection_confidence: 0.5,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Color of untextured faces RGB
    pub base_color: [u8; 3],
    /// Outline color RGB
    pub outline_color: [u8; 3],
}

impl ViewportSettings {
    pub fn outline_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.outline_color.map(|c| f32::from(c) / 255.0);
        [r, g, b, 1.0]
    }
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0, 0, 0],
            base_color: [0, 255, 136],
            outline_color: [255, 255, 255],
        }
    }
}

/// All viewer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub solid: SolidSettings,
    pub interaction: InteractionSettings,
    pub camera: CameraSettings,
    pub scale: ScaleSettings,
    pub textures: TextureSettings,
    pub detector: DetectorSettings,
    pub viewport: ViewportSettings,
}

impl ViewerSettings {
    /// Default settings location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "frustum", "frustum-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from an explicit file; the file must exist and parse
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from the default location, or defaults if no file exists there
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save settings to file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject settings the viewer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.solid.params;
        for (field, value) in [
            ("solid.top_edge", p.top_edge),
            ("solid.bottom_edge", p.bottom_edge),
            ("solid.height", p.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let i = &self.interaction;
        if !(i.smoothing > 0.0 && i.smoothing <= 1.0) {
            return Err(invalid(
                "interaction.smoothing",
                format!("must be in (0, 1], got {}", i.smoothing),
            ));
        }
        if !(i.zoom_step > 1.0 && i.zoom_step < 2.0) {
            return Err(invalid(
                "interaction.zoom_step",
                format!("must be in (1, 2), got {}", i.zoom_step),
            ));
        }
        if !i.rotate_sensitivity.is_finite() || !i.auto_rotate_speed.is_finite() {
            return Err(invalid("interaction", "sensitivity and auto-rotate speed must be finite"));
        }

        let c = &self.camera;
        if !(c.min_distance > 0.0 && c.min_distance < c.max_distance) {
            return Err(invalid(
                "camera.min_distance",
                format!(
                    "must be positive and below max_distance ({} >= {})",
                    c.min_distance, c.max_distance
                ),
            ));
        }
        if !(c.min_distance..=c.max_distance).contains(&c.initial_distance) {
            return Err(invalid(
                "camera.initial_distance",
                format!(
                    "{} is outside [{}, {}]",
                    c.initial_distance, c.min_distance, c.max_distance
                ),
            ));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", format!("got {}", c.fov_degrees)));
        }
        if !(c.near > 0.0 && c.near < c.far) {
            return Err(invalid("camera.near", format!("must be in (0, far), got {}", c.near)));
        }

        let s = &self.scale;
        if !(s.min > 0.0 && s.min < s.max) {
            return Err(invalid(
                "scale.min",
                format!("slider range [{}, {}] is empty or not positive", s.min, s.max),
            ));
        }
        if !(s.min..=s.max).contains(&s.initial) {
            return Err(invalid(
                "scale.initial",
                format!("{} is outside [{}, {}]", s.initial, s.min, s.max),
            ));
        }

        let d = &self.detector;
        if d.max_faces == 0 {
            return Err(invalid("detector.max_faces", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&d.min_detection_confidence) {
            return Err(invalid(
                "detector.min_detection_confidence",
                format!("must be in [0, 1], got {}", d.min_detection_confidence),
            ));
        }

        Ok(())
    }
}
