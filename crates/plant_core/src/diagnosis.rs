//! Diagnosis records returned by the analysis routine.

use serde::{Deserialize, Serialize};

/// Scale of the normalized bounding-box coordinate space.
pub const BOX_SCALE: i64 = 1000;

/// Box used when neither the result nor the table provides one.
pub const FALLBACK_BOX: BoundingBox = BoundingBox {
    x1: 250,
    y1: 200,
    x2: 750,
    y2: 700,
};

/// Overall health verdict of a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Healthy,
    Diseased,
    Stressed,
    /// Any label the table uses that is not one of the three above.
    Unknown(String),
}

impl HealthStatus {
    pub fn label(&self) -> &str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Diseased => "Diseased",
            HealthStatus::Stressed => "Stressed",
            HealthStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Healthy" => HealthStatus::Healthy,
            "Diseased" => HealthStatus::Diseased,
            "Stressed" => HealthStatus::Stressed,
            _ => HealthStatus::Unknown(raw),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        status.label().to_string()
    }
}

/// Severity reported by the table. Parsing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
    Unrecognized,
}

impl Severity {
    /// Case-insensitive but otherwise exact; anything unexpected, padded
    /// strings included, is `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "none" => Severity::None,
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Unrecognized,
        }
    }

    /// Position on the 0-100 severity bar.
    pub fn percent(self) -> u8 {
        match self {
            Severity::None | Severity::Unrecognized => 0,
            Severity::Mild => 33,
            Severity::Moderate => 66,
            Severity::Severe => 100,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        Severity::parse(&raw)
    }
}

/// Rectangle in the 0-1000 coordinate space, independent of frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// Bounding box mapped onto a concrete frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl BoundingBox {
    /// Linear scaling against the frame size, truncating toward zero.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let sx = |v: i32| (v as i64 * width as i64 / BOX_SCALE) as i32;
        let sy = |v: i32| (v as i64 * height as i64 / BOX_SCALE) as i32;
        PixelRect {
            left: sx(self.x1),
            top: sy(self.y1),
            right: sx(self.x2),
            bottom: sy(self.y2),
        }
    }
}

/// Fixed-shape record describing the health of the selected plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub status: HealthStatus,
    pub disease: String,
    pub plant: String,
    #[serde(rename = "type", default = "not_available")]
    pub disease_type: String,
    pub confidence: String,
    pub severity: Severity,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub discoloration: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub preventive: Vec<String>,
    #[serde(default, rename = "bbox")]
    pub bounding_box: Option<BoundingBox>,
}

fn not_available() -> String {
    "N/A".to_string()
}
