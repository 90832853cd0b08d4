//! View model for the results column. Every update replaces the whole view.

use crate::diagnosis::{DiagnosisResult, HealthStatus};
use crate::scan::ScanController;

pub const WAITING_STATUS: &str = "HEALTH STATUS: WAITING FOR PLANT";
pub const WAITING_LINE: &str = "• Waiting for plant detection...";
pub const NO_DATA_LINE: &str = "• No data available";
const NOT_AVAILABLE: &str = "N/A";

/// Banner colors, `#rrggbb` as RGB triples.
pub mod palette {
    pub const PRIMARY: [u8; 3] = [0x10, 0xb9, 0x81];
    pub const DARK: [u8; 3] = [0x04, 0x78, 0x57];
    pub const RED: [u8; 3] = [0xef, 0x44, 0x44];
    pub const YELLOW: [u8; 3] = [0xf5, 0x9e, 0x0b];
    pub const SCAN: [u8; 3] = [0x3b, 0x82, 0xf6];
    pub const WAITING: [u8; 3] = [0x6b, 0x72, 0x80];
    pub const BORDER: [u8; 3] = [0xd1, 0xd5, 0xdb];
    pub const BACKGROUND: [u8; 3] = [0xf0, 0xfd, 0xf4];
}

/// Everything the results column displays.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub status_text: String,
    pub banner: [u8; 3],
    pub plant: String,
    pub disease: String,
    pub disease_type: String,
    pub confidence: String,
    /// 0-100.
    pub severity: u8,
    pub cause: Vec<String>,
    pub discoloration: Vec<String>,
    pub symptoms: Vec<String>,
    pub recommendations: Vec<String>,
    pub preventive: Vec<String>,
}

impl PanelView {
    /// The single canonical empty rendering.
    pub fn waiting() -> Self {
        let waiting = || vec![WAITING_LINE.to_string()];
        Self {
            status_text: WAITING_STATUS.to_string(),
            banner: palette::WAITING,
            plant: NOT_AVAILABLE.to_string(),
            disease: NOT_AVAILABLE.to_string(),
            disease_type: NOT_AVAILABLE.to_string(),
            confidence: "0.00%".to_string(),
            severity: 0,
            cause: waiting(),
            discoloration: waiting(),
            symptoms: waiting(),
            recommendations: waiting(),
            preventive: waiting(),
        }
    }

    /// Waiting view with the banner switched to the scanning state.
    pub fn scanning() -> Self {
        Self {
            status_text: "SCANNING...".to_string(),
            banner: palette::SCAN,
            ..Self::waiting()
        }
    }

    pub fn from_diagnosis(result: &DiagnosisResult) -> Self {
        let (banner, status_text) = status_banner(&result.status);
        let cause = vec![
            result
                .cause
                .clone()
                .unwrap_or_else(|| "• No information available".to_string()),
        ];
        Self {
            status_text,
            banner,
            plant: result.plant.clone(),
            disease: result.disease.clone(),
            disease_type: result.disease_type.clone(),
            confidence: result.confidence.clone(),
            severity: result.severity.percent(),
            cause,
            discoloration: bullets(&result.discoloration),
            symptoms: bullets(&result.symptoms),
            recommendations: bullets(&result.recommendations),
            preventive: bullets(&result.preventive),
        }
    }

    /// View for the controller's current state.
    pub fn for_controller(controller: &ScanController) -> Self {
        if controller.is_scanning() {
            return Self::scanning();
        }
        controller
            .diagnosis()
            .map(Self::from_diagnosis)
            .unwrap_or_else(Self::waiting)
    }
}

fn status_banner(status: &HealthStatus) -> ([u8; 3], String) {
    let upper = status.label().to_uppercase();
    match status {
        HealthStatus::Healthy => (palette::PRIMARY, format!("HEALTH STATUS: {upper} 🥬")),
        HealthStatus::Diseased => (palette::RED, format!("HEALTH STATUS: {upper} 🥀")),
        HealthStatus::Stressed => (palette::YELLOW, format!("HEALTH STATUS: {upper} ⚠️")),
        HealthStatus::Unknown(_) => (palette::WAITING, "HEALTH STATUS: UNKNOWN".to_string()),
    }
}

/// Bulleted lines; an empty list shows a single "no data" line.
fn bullets(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec![NO_DATA_LINE.to_string()];
    }
    items.iter().map(|item| format!("• {item}")).collect()
}
