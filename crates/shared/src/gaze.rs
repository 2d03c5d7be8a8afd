use serde::{Deserialize, Serialize};

/// Смещение взгляда относительно центра кадра, каждая ось в [-0.5, 0.5]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazeVector {
    pub x: f32,
    pub y: f32,
}

impl GazeVector {
    pub const ORIGIN: GazeVector = GazeVector { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Среднее двух векторов
    pub fn midpoint(&self, other: &GazeVector) -> GazeVector {
        GazeVector {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
}

/// Точка лица в нормализованных координатах изображения [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Точки одного найденного лица
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Уверенность детектора, если он её сообщает
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub landmarks: Vec<Landmark>,
}

/// Результат детектора для одного видеокадра
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub faces: Vec<FaceLandmarks>,
}

impl LandmarkFrame {
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
