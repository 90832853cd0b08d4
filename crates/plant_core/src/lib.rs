//! Core of the plant disease detector: frame acquisition, the held/live scan
//! state machine, table-driven diagnosis, overlays and the results view model.
//! Nothing here touches a window, so all of it is testable headless.

pub mod analysis;
pub mod config;
pub mod diagnosis;
pub mod display;
pub mod error;
pub mod overlay;
pub mod panel;
pub mod scan;
pub mod source;
pub mod text;

pub use analysis::{Analyzer, DiseaseTable, LookupAnalyzer};
pub use config::AppConfig;
pub use diagnosis::{BoundingBox, DiagnosisResult, HealthStatus, PixelRect, Severity};
pub use display::DisplayLoop;
pub use error::{AnalysisError, CaptureError, ConfigError, RenderError};
pub use panel::PanelView;
pub use scan::{AnalysisOutcome, ScanController, ScanEvent, ScanMode, ScanPhase};
pub use source::{Camera, Frame, FrameSource};
