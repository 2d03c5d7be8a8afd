use serde::{Deserialize, Serialize};

mod gaze;

pub use gaze::{FaceLandmarks, GazeVector, Landmark, LandmarkFrame};

/// Количество граней усечённой пирамиды
pub const FACE_COUNT: usize = 6;

/// Параметры усечённой пирамиды (длины рёбер и высота)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidParams {
    /// Длина ребра верхней грани
    pub top_edge: f32,
    /// Длина ребра нижней грани
    pub bottom_edge: f32,
    /// Высота по оси Z
    pub height: f32,
}

impl SolidParams {
    pub fn new(top_edge: f32, bottom_edge: f32, height: f32) -> Self {
        Self {
            top_edge,
            bottom_edge,
            height,
        }
    }

    /// Верх уже основания (ожидаемая, но не обязательная форма)
    pub fn is_tapered(&self) -> bool {
        self.top_edge < self.bottom_edge
    }
}

impl Default for SolidParams {
    fn default() -> Self {
        Self {
            top_edge: 0.6,
            bottom_edge: 6.0,
            height: 4.0,
        }
    }
}

/// Поворот UV-развёртки грани (кратный 90°)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum UvRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl UvRotation {
    /// Неизвестные значения сводятся к 0°
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees {
            90 => UvRotation::Deg90,
            180 => UvRotation::Deg180,
            270 => UvRotation::Deg270,
            _ => UvRotation::Deg0,
        }
    }

    pub fn degrees(&self) -> i32 {
        i32::from(self.quarter_turns()) * 90
    }

    /// Число четвертей оборота против часовой стрелки
    pub fn quarter_turns(&self) -> u8 {
        match self {
            UvRotation::Deg0 => 0,
            UvRotation::Deg90 => 1,
            UvRotation::Deg180 => 2,
            UvRotation::Deg270 => 3,
        }
    }

    /// Композиция двух поворотов
    pub fn then(self, other: UvRotation) -> UvRotation {
        let turns = (self.quarter_turns() + other.quarter_turns()) % 4;
        UvRotation::from_degrees(i32::from(turns) * 90)
    }

    /// Повернуть UV-координату вокруг центра текстуры
    pub fn rotate_uv(&self, uv: [f32; 2]) -> [f32; 2] {
        let [u, v] = uv;
        match self {
            UvRotation::Deg0 => [u, v],
            UvRotation::Deg90 => [1.0 - v, u],
            UvRotation::Deg180 => [1.0 - u, 1.0 - v],
            UvRotation::Deg270 => [v, 1.0 - u],
        }
    }

    pub fn all() -> &'static [UvRotation] {
        &[
            UvRotation::Deg0,
            UvRotation::Deg90,
            UvRotation::Deg180,
            UvRotation::Deg270,
        ]
    }
}

impl From<i32> for UvRotation {
    fn from(degrees: i32) -> Self {
        UvRotation::from_degrees(degrees)
    }
}

impl From<UvRotation> for i32 {
    fn from(rotation: UvRotation) -> Self {
        rotation.degrees()
    }
}

/// Слот материала/текстуры грани
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSlot {
    Bottom,
    Top,
    Front,
    Right,
    Back,
    Left,
}

impl FaceSlot {
    pub const ALL: [FaceSlot; FACE_COUNT] = [
        FaceSlot::Bottom,
        FaceSlot::Top,
        FaceSlot::Front,
        FaceSlot::Right,
        FaceSlot::Back,
        FaceSlot::Left,
    ];

    /// Индекс слота (0–5)
    pub fn index(&self) -> usize {
        match self {
            FaceSlot::Bottom => 0,
            FaceSlot::Top => 1,
            FaceSlot::Front => 2,
            FaceSlot::Right => 3,
            FaceSlot::Back => 4,
            FaceSlot::Left => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            FaceSlot::Bottom => "bottom",
            FaceSlot::Top => "top",
            FaceSlot::Front => "front",
            FaceSlot::Right => "right",
            FaceSlot::Back => "back",
            FaceSlot::Left => "left",
        }
    }
}

/// Источник ориентации объекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Вращение мышью, колесо для зума, автоповорот в простое
    #[default]
    Pointer,
    /// Ориентация следует за положением глаз
    Gaze,
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionMode::Pointer => write!(f, "pointer"),
            InteractionMode::Gaze => write!(f, "gaze"),
        }
    }
}

impl std::str::FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pointer" | "mouse" => Ok(InteractionMode::Pointer),
            "gaze" | "tracking" => Ok(InteractionMode::Gaze),
            other => Err(format!("unknown interaction mode '{other}' (expected pointer or gaze)")),
        }
    }
}
