use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use image::{Rgb, RgbImage};
use plant_core::panel::palette;
use plant_core::source::placeholder_frame;
use plant_core::{
    AnalysisError, AnalysisOutcome, Analyzer, BoundingBox, Camera, CaptureError, DiagnosisResult,
    DisplayLoop, Frame, FrameSource, HealthStatus, PanelView, ScanController, ScanEvent, Severity,
};

struct SolidCamera {
    size: (u32, u32),
    color: [u8; 3],
    released: Rc<Cell<u32>>,
}

impl Camera for SolidCamera {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        Ok(RgbImage::from_pixel(self.size.0, self.size.1, Rgb(self.color)))
    }

    fn resolution(&self) -> (u32, u32) {
        self.size
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Always answers with a moderate Tomato disease, counting calls.
struct CannedAnalyzer {
    calls: Cell<u32>,
    plants: Vec<String>,
}

impl CannedAnalyzer {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            plants: vec!["Tomato".into()],
        }
    }
}

impl Analyzer for CannedAnalyzer {
    fn analyze(&self, _: &Frame, plant: &str) -> Result<Option<DiagnosisResult>, AnalysisError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Some(DiagnosisResult {
            status: HealthStatus::Diseased,
            disease: "Septoria Leaf Spot".into(),
            plant: plant.into(),
            disease_type: "Fungal".into(),
            confidence: "87.00%".into(),
            severity: Severity::parse("moderate"),
            cause: Some("Septoria lycopersici".into()),
            discoloration: vec!["Grey centers".into()],
            symptoms: vec!["Small round spots".into()],
            recommendations: vec!["Remove lower leaves".into()],
            preventive: vec!["Avoid wetting foliage".into()],
            bounding_box: Some(BoundingBox::from([100, 100, 900, 900])),
        }))
    }

    fn plant_types(&self) -> &[String] {
        &self.plants
    }
}

struct NothingAnalyzer;

impl Analyzer for NothingAnalyzer {
    fn analyze(&self, _: &Frame, _: &str) -> Result<Option<DiagnosisResult>, AnalysisError> {
        Ok(None)
    }

    fn plant_types(&self) -> &[String] {
        &[]
    }
}

fn camera(released: &Rc<Cell<u32>>) -> Box<dyn Camera> {
    Box::new(SolidCamera {
        size: (160, 120),
        color: [90, 60, 30],
        released: released.clone(),
    })
}

#[test]
fn camera_unavailable_renders_placeholder_every_tick() {
    let display = DisplayLoop::new(Duration::from_millis(15));
    let mut source = FrameSource::new(None, (640, 480));
    let mut controller = ScanController::new();
    let analyzer = CannedAnalyzer::new();

    for tick in 0..10 {
        if tick == 5 {
            let event = controller.toggle(&source, &analyzer, Some("Tomato"));
            assert!(matches!(event, ScanEvent::CameraUnavailable));
        }
        let frame = display.next_frame(&mut source, &controller, tick as f64 * 0.015);
        assert_eq!(frame, placeholder_frame(640, 480));
        assert!(!source.camera_available());
    }
    assert_eq!(analyzer.calls.get(), 0);
}

#[test]
fn tomato_scan_reports_moderate_disease() {
    let released = Rc::new(Cell::new(0));
    let display = DisplayLoop::new(Duration::from_millis(15));
    let mut source = FrameSource::new(Some(camera(&released)), (640, 480));
    let mut controller = ScanController::new();
    let analyzer = CannedAnalyzer::new();

    display.next_frame(&mut source, &controller, 0.0);
    let event = controller.toggle(&source, &analyzer, Some("Tomato"));
    assert!(matches!(event, ScanEvent::Held(AnalysisOutcome::Diagnosed)));
    assert_eq!(analyzer.calls.get(), 1);

    let view = PanelView::for_controller(&controller);
    assert_eq!(view.status_text, "HEALTH STATUS: DISEASED 🥀");
    assert_eq!(view.banner, palette::RED);
    assert_eq!(view.severity, 66);
    assert_eq!(view.plant, "Tomato");

    // held ticks never trigger another diagnosis
    for tick in 0..5 {
        display.next_frame(&mut source, &controller, tick as f64);
    }
    assert_eq!(analyzer.calls.get(), 1);
}

#[test]
fn resume_returns_to_canonical_waiting() {
    let released = Rc::new(Cell::new(0));
    let display = DisplayLoop::new(Duration::from_millis(15));
    let mut source = FrameSource::new(Some(camera(&released)), (640, 480));
    let mut controller = ScanController::new();
    let analyzer = CannedAnalyzer::new();

    display.next_frame(&mut source, &controller, 0.0);
    controller.toggle(&source, &analyzer, Some("Tomato"));
    let event = controller.toggle(&source, &analyzer, Some("Tomato"));
    assert!(matches!(event, ScanEvent::Resumed));

    let view = PanelView::for_controller(&controller);
    assert_eq!(view.status_text, "HEALTH STATUS: WAITING FOR PLANT");
    assert_eq!(view.severity, 0);
    assert_eq!(view, PanelView::waiting());
    assert!(controller.bbox().is_none());

    let frame = display.next_frame(&mut source, &controller, 1.0);
    assert_eq!(frame.get_pixel(0, 0).0, [90, 60, 30]);
}

#[test]
fn empty_result_leaves_no_busy_state() {
    let released = Rc::new(Cell::new(0));
    let display = DisplayLoop::new(Duration::from_millis(15));
    let mut source = FrameSource::new(Some(camera(&released)), (640, 480));
    let mut controller = ScanController::new();

    display.next_frame(&mut source, &controller, 0.0);
    let event = controller.toggle(&source, &NothingAnalyzer, Some("Tomato"));
    assert!(matches!(event, ScanEvent::Held(AnalysisOutcome::NothingFound)));
    assert!(!controller.is_scanning());
    assert_eq!(PanelView::for_controller(&controller), PanelView::waiting());

    // fallback box alone draws nothing
    let frame = display.next_frame(&mut source, &controller, 0.0);
    assert!(frame.pixels().all(|p| p.0 == [90, 60, 30]));
}

#[test]
fn camera_is_released_once_on_shutdown() {
    let released = Rc::new(Cell::new(0));
    let mut source = FrameSource::new(Some(camera(&released)), (640, 480));
    source.next_frame();
    source.release();
    drop(source);
    assert_eq!(released.get(), 1);
}
