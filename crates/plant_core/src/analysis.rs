//! Table-driven diagnosis. There is no model: a frame's leaf color score picks
//! between the healthy entry and the first disease entry of the selected plant.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::diagnosis::{BoundingBox, DiagnosisResult};
use crate::error::{AnalysisError, ConfigError};
use crate::source::Frame;

const BUILTIN_TABLE: &str = include_str!("../assets/disease_table.toml");

/// Produces a diagnosis for a frame of the given plant type.
pub trait Analyzer {
    /// `Ok(None)` means the routine had nothing to report for this plant.
    fn analyze(&self, frame: &Frame, plant: &str) -> Result<Option<DiagnosisResult>, AnalysisError>;

    /// Default box for a `"<plant> <condition>"` key.
    fn default_box(&self, _key: &str) -> Option<BoundingBox> {
        None
    }

    /// Selectable plant species, in display order.
    fn plant_types(&self) -> &[String];
}

/// Static lookup of canned diagnoses keyed by `"<plant> <condition>"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiseaseTable {
    #[serde(default)]
    pub plants: Vec<String>,
    #[serde(default)]
    pub entries: BTreeMap<String, DiagnosisResult>,
}

impl DiseaseTable {
    pub fn builtin() -> Result<Self, ConfigError> {
        toml::from_str(BUILTIN_TABLE).map_err(ConfigError::BuiltinTable)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<&DiagnosisResult> {
        self.entries.get(key)
    }

    pub fn healthy_key(plant: &str) -> String {
        format!("{plant} healthy")
    }

    /// First non-healthy entry of `plant` in key order.
    pub fn first_condition(&self, plant: &str) -> Option<&DiagnosisResult> {
        let prefix = format!("{plant} ");
        let healthy = Self::healthy_key(plant);
        self.entries
            .iter()
            .find(|(key, _)| key.starts_with(&prefix) && **key != healthy)
            .map(|(_, entry)| entry)
    }
}

/// Share of pixels whose green channel beats both red and blue.
pub fn leaf_green_ratio(frame: &Frame) -> f32 {
    let total = frame.width() as usize * frame.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let green = frame
        .pixels()
        .filter(|p| {
            let [r, g, b] = p.0;
            g > r && g > b
        })
        .count();
    green as f32 / total as f32
}

/// [`Analyzer`] backed by a [`DiseaseTable`].
pub struct LookupAnalyzer {
    table: DiseaseTable,
    healthy_green_ratio: f32,
}

impl LookupAnalyzer {
    pub fn new(table: DiseaseTable, healthy_green_ratio: f32) -> Self {
        Self {
            table,
            healthy_green_ratio,
        }
    }
}

impl Analyzer for LookupAnalyzer {
    fn analyze(&self, frame: &Frame, plant: &str) -> Result<Option<DiagnosisResult>, AnalysisError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(AnalysisError::EmptyFrame);
        }
        if !self.table.plants.iter().any(|p| p == plant) {
            tracing::debug!("No table entries for plant `{plant}`");
            return Ok(None);
        }
        let ratio = leaf_green_ratio(frame);
        tracing::debug!("Leaf color score for {plant}: {ratio:.3}");
        let entry = if ratio >= self.healthy_green_ratio {
            self.table.get(&DiseaseTable::healthy_key(plant))
        } else {
            self.table.first_condition(plant)
        };
        Ok(entry.cloned())
    }

    fn default_box(&self, key: &str) -> Option<BoundingBox> {
        self.table.get(key).and_then(|e| e.bounding_box)
    }

    fn plant_types(&self) -> &[String] {
        &self.table.plants
    }
}
