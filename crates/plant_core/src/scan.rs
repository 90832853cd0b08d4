//! Live / held state machine around the synchronous diagnosis call.

use crate::analysis::{Analyzer, DiseaseTable};
use crate::diagnosis::{BoundingBox, DiagnosisResult, FALLBACK_BOX};
use crate::error::AnalysisError;
use crate::source::{Frame, FrameSource};

/// What the display loop is showing.
#[derive(Debug, Default)]
pub enum ScanMode {
    /// Fresh camera frames every tick.
    #[default]
    Live,
    /// Frozen after a scan request.
    Held(Hold),
}

/// State while held. A diagnosis only exists alongside the frame it was made from.
#[derive(Debug)]
pub enum Hold {
    /// Scan was requested before any frame had been captured.
    Empty,
    Frozen {
        frame: Frame,
        diagnosis: Option<DiagnosisResult>,
        bbox: Option<BoundingBox>,
    },
}

/// Coarse phase, mostly for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Live,
    HeldIdle,
    HeldScanning,
}

/// Result of a diagnosis attempt made while entering the held state.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Diagnosed,
    NothingFound,
    Failed(AnalysisError),
    /// No frame to analyze or no plant selected.
    NotRequested,
}

#[derive(Debug)]
pub enum ScanEvent {
    /// Scanning needs a camera; the state did not change.
    CameraUnavailable,
    Held(AnalysisOutcome),
    Resumed,
}

#[derive(Debug, Default)]
pub struct ScanController {
    mode: ScanMode,
    scanning: bool,
}

impl ScanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &ScanMode {
        &self.mode
    }

    pub fn is_live(&self) -> bool {
        matches!(self.mode, ScanMode::Live)
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn phase(&self) -> ScanPhase {
        match (&self.mode, self.scanning) {
            (ScanMode::Live, _) => ScanPhase::Live,
            (ScanMode::Held(_), false) => ScanPhase::HeldIdle,
            (ScanMode::Held(_), true) => ScanPhase::HeldScanning,
        }
    }

    pub fn frozen_frame(&self) -> Option<&Frame> {
        match &self.mode {
            ScanMode::Held(Hold::Frozen { frame, .. }) => Some(frame),
            _ => None,
        }
    }

    pub fn diagnosis(&self) -> Option<&DiagnosisResult> {
        match &self.mode {
            ScanMode::Held(Hold::Frozen { diagnosis, .. }) => diagnosis.as_ref(),
            _ => None,
        }
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        match &self.mode {
            ScanMode::Held(Hold::Frozen { bbox, .. }) => *bbox,
            _ => None,
        }
    }

    /// The scan/resume button.
    pub fn toggle(
        &mut self,
        source: &FrameSource,
        analyzer: &dyn Analyzer,
        plant: Option<&str>,
    ) -> ScanEvent {
        if !source.camera_available() {
            tracing::info!("Scan requested without a camera");
            return ScanEvent::CameraUnavailable;
        }
        if self.is_live() {
            ScanEvent::Held(self.hold(source.last_good().cloned(), analyzer, plant))
        } else {
            self.resume();
            ScanEvent::Resumed
        }
    }

    /// Freezes on `frame` and runs one diagnosis if a plant is selected.
    pub fn hold(
        &mut self,
        frame: Option<Frame>,
        analyzer: &dyn Analyzer,
        plant: Option<&str>,
    ) -> AnalysisOutcome {
        tracing::info!("Manual scan triggered, video held");
        let Some(frame) = frame else {
            self.mode = ScanMode::Held(Hold::Empty);
            return AnalysisOutcome::NotRequested;
        };
        self.mode = ScanMode::Held(Hold::Frozen {
            frame,
            diagnosis: None,
            bbox: None,
        });
        match plant.filter(|p| !p.is_empty()) {
            Some(plant) => self.run_analysis(analyzer, plant),
            None => AnalysisOutcome::NotRequested,
        }
    }

    /// Back to live frames; drops the frozen frame and any diagnosis.
    pub fn resume(&mut self) {
        self.mode = ScanMode::Live;
        self.scanning = false;
        tracing::info!("Resuming live feed");
    }

    fn run_analysis(&mut self, analyzer: &dyn Analyzer, plant: &str) -> AnalysisOutcome {
        let ScanMode::Held(Hold::Frozen { frame, .. }) = &self.mode else {
            return AnalysisOutcome::NotRequested;
        };
        self.scanning = true;
        let result = analyzer.analyze(frame, plant);
        self.scanning = false;

        let ScanMode::Held(Hold::Frozen { diagnosis, bbox, .. }) = &mut self.mode else {
            return AnalysisOutcome::NotRequested;
        };
        match result {
            Ok(Some(found)) => {
                tracing::info!(
                    "Diagnosis for {plant}: {} ({}, {})",
                    found.status.label(),
                    found.disease,
                    found.confidence
                );
                *bbox = Some(found.bounding_box.unwrap_or(FALLBACK_BOX));
                *diagnosis = Some(found);
                AnalysisOutcome::Diagnosed
            }
            Ok(None) => {
                tracing::info!("No diagnosis for {plant}");
                *diagnosis = None;
                *bbox = Some(
                    analyzer
                        .default_box(&DiseaseTable::healthy_key(plant))
                        .unwrap_or(FALLBACK_BOX),
                );
                AnalysisOutcome::NothingFound
            }
            Err(e) => {
                tracing::warn!("Analysis error for {plant}: {e}");
                AnalysisOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DiseaseTable, LookupAnalyzer};
    use crate::diagnosis::HealthStatus;
    use crate::source::testing::FakeCamera;
    use image::{Rgb, RgbImage};

    struct Failing;

    impl Analyzer for Failing {
        fn analyze(&self, _: &Frame, _: &str) -> Result<Option<DiagnosisResult>, AnalysisError> {
            Err(AnalysisError::Backend("boom".into()))
        }

        fn plant_types(&self) -> &[String] {
            &[]
        }
    }

    fn lookup() -> LookupAnalyzer {
        LookupAnalyzer::new(DiseaseTable::builtin().unwrap(), 0.35)
    }

    fn brown() -> Frame {
        RgbImage::from_pixel(8, 8, Rgb([120, 80, 40]))
    }

    #[test]
    fn starts_live() {
        let c = ScanController::new();
        assert_eq!(c.phase(), ScanPhase::Live);
        assert!(c.diagnosis().is_none());
        assert!(c.frozen_frame().is_none());
    }

    #[test]
    fn hold_runs_one_diagnosis() {
        let mut c = ScanController::new();
        let outcome = c.hold(Some(brown()), &lookup(), Some("Tomato"));
        assert!(matches!(outcome, AnalysisOutcome::Diagnosed));
        assert_eq!(c.phase(), ScanPhase::HeldIdle);
        let d = c.diagnosis().unwrap();
        assert_eq!(d.status, HealthStatus::Diseased);
        assert_eq!(c.bbox(), d.bounding_box);
    }

    #[test]
    fn hold_without_frame_is_empty_and_waiting() {
        let mut c = ScanController::new();
        let outcome = c.hold(None, &lookup(), Some("Tomato"));
        assert!(matches!(outcome, AnalysisOutcome::NotRequested));
        assert!(matches!(c.mode(), ScanMode::Held(Hold::Empty)));
        assert!(c.diagnosis().is_none());
        assert!(!c.is_scanning());
    }

    #[test]
    fn hold_without_plant_skips_analysis() {
        let mut c = ScanController::new();
        let outcome = c.hold(Some(brown()), &lookup(), Some(""));
        assert!(matches!(outcome, AnalysisOutcome::NotRequested));
        assert!(c.frozen_frame().is_some());
        assert!(c.diagnosis().is_none());
    }

    #[test]
    fn failed_analysis_clears_scanning_flag() {
        let mut c = ScanController::new();
        let outcome = c.hold(Some(brown()), &Failing, Some("Tomato"));
        assert!(matches!(outcome, AnalysisOutcome::Failed(_)));
        assert!(!c.is_scanning());
        assert_eq!(c.phase(), ScanPhase::HeldIdle);
        assert!(c.diagnosis().is_none());
    }

    #[test]
    fn nothing_found_sets_fallback_box_without_diagnosis() {
        let mut c = ScanController::new();
        let outcome = c.hold(Some(brown()), &lookup(), Some("Cactus"));
        assert!(matches!(outcome, AnalysisOutcome::NothingFound));
        assert!(!c.is_scanning());
        assert!(c.diagnosis().is_none());
        assert_eq!(c.bbox(), Some(FALLBACK_BOX));
    }

    #[test]
    fn resume_clears_everything() {
        let mut c = ScanController::new();
        c.hold(Some(brown()), &lookup(), Some("Tomato"));
        c.resume();
        assert!(c.is_live());
        assert!(c.diagnosis().is_none());
        assert!(c.bbox().is_none());
        assert!(c.frozen_frame().is_none());
    }

    #[test]
    fn toggle_without_camera_is_refused() {
        let source = FrameSource::new(None, (64, 48));
        let mut c = ScanController::new();
        let event = c.toggle(&source, &lookup(), Some("Tomato"));
        assert!(matches!(event, ScanEvent::CameraUnavailable));
        assert!(c.is_live());
    }

    #[test]
    fn toggle_freezes_last_capture_then_resumes() {
        let cam = FakeCamera::new((8, 8)).push_solid([120, 80, 40]);
        let mut source = FrameSource::new(Some(Box::new(cam)), (64, 48));
        let captured = source.next_frame();
        let mut c = ScanController::new();

        let event = c.toggle(&source, &lookup(), Some("Tomato"));
        assert!(matches!(event, ScanEvent::Held(AnalysisOutcome::Diagnosed)));
        assert_eq!(c.frozen_frame(), Some(&captured));

        let event = c.toggle(&source, &lookup(), Some("Tomato"));
        assert!(matches!(event, ScanEvent::Resumed));
        assert!(c.is_live());
    }
}
