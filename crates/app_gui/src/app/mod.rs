//! Main window: video column on the left, results column on the right.

mod results;

use chrono::{DateTime, Local};
use eframe::{App, Frame, egui};
use plant_core::display::wall_clock_seconds;
use plant_core::panel::palette;
use plant_core::{
    AnalysisOutcome, Analyzer, AppConfig, DisplayLoop, FrameSource, LookupAnalyzer, PanelView,
    ScanController, ScanEvent,
};
use rfd::{MessageDialog, MessageLevel};
use std::time::Duration;

pub(crate) fn rgb(c: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

/// Owns the camera; it is released on Quit or when the app is dropped at window close.
pub struct UiApp {
    source: FrameSource,
    analyzer: LookupAnalyzer,
    controller: ScanController,
    display: DisplayLoop,
    selected_plant: Option<String>,
    texture: Option<egui::TextureHandle>,
    panel: PanelView,
    last_scan: Option<DateTime<Local>>,
    status: String,
}

impl UiApp {
    pub fn new(config: &AppConfig, source: FrameSource, analyzer: LookupAnalyzer) -> Self {
        let selected_plant = analyzer.plant_types().first().cloned();
        Self {
            source,
            analyzer,
            controller: ScanController::new(),
            display: DisplayLoop::new(Duration::from_millis(config.tick_interval_ms)),
            selected_plant,
            texture: None,
            panel: PanelView::waiting(),
            last_scan: None,
            status: String::new(),
        }
    }

    fn toggle_scan(&mut self) {
        let plant = self.selected_plant.clone();
        let event = self
            .controller
            .toggle(&self.source, &self.analyzer, plant.as_deref());
        match event {
            ScanEvent::CameraUnavailable => {
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Error")
                    .set_description("Camera not available for scanning.")
                    .show();
            }
            ScanEvent::Held(outcome) => {
                self.status = match outcome {
                    AnalysisOutcome::Diagnosed => {
                        self.last_scan = Some(Local::now());
                        "Video held, diagnosis ready".to_string()
                    }
                    AnalysisOutcome::NothingFound => "Video held, no diagnosis".to_string(),
                    AnalysisOutcome::Failed(e) => format!("Analysis error: {e}"),
                    AnalysisOutcome::NotRequested => "Video held".to_string(),
                };
            }
            ScanEvent::Resumed => {
                self.status.clear();
            }
        }
        self.panel = PanelView::for_controller(&self.controller);
    }

    fn quit(&mut self, ctx: &egui::Context) {
        tracing::info!("Quit requested");
        self.source.release();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Live Camera Feed")
                    .size(20.0)
                    .strong()
                    .color(rgb(palette::DARK)),
            );
            if !self.status.is_empty() {
                ui.label(&self.status);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (text, fill) = if self.controller.is_live() {
                    ("Scan/Hold 📸", palette::PRIMARY)
                } else {
                    ("Resume Live Feed ▶️", palette::YELLOW)
                };
                let scan = egui::Button::new(
                    egui::RichText::new(text).strong().color(egui::Color32::WHITE),
                )
                .fill(rgb(fill));
                if ui.add(scan).clicked() {
                    self.toggle_scan();
                }

                let quit = egui::Button::new(
                    egui::RichText::new("Quit App 🛑").strong().color(egui::Color32::WHITE),
                )
                .fill(rgb(palette::RED));
                if ui.add(quit).clicked() {
                    self.quit(ui.ctx());
                }

                self.render_plant_selector(ui);
                ui.label(
                    egui::RichText::new("Plant Species:")
                        .strong()
                        .color(rgb(palette::DARK)),
                );
            });
        });
    }

    fn render_plant_selector(&mut self, ui: &mut egui::Ui) {
        let plants = self.analyzer.plant_types();
        if plants.is_empty() {
            ui.label(egui::RichText::new("No Plant Types Found").color(rgb(palette::RED)));
            return;
        }
        let mut selected = self.selected_plant.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("plant-select")
            .selected_text(selected.as_str())
            .width(140.0)
            .show_ui(ui, |ui| {
                for plant in plants {
                    ui.selectable_value(&mut selected, plant.clone(), plant.as_str());
                }
            });
        if self.selected_plant.as_deref() != Some(selected.as_str()) {
            tracing::debug!("Plant type selected: {selected}");
            self.selected_plant = Some(selected);
        }
    }

    /// One display-loop tick: next frame, overlays, fit, upload, paint.
    fn render_video(&mut self, ui: &mut egui::Ui) {
        let area = ui.available_rect_before_wrap();
        ui.painter().rect_filled(area, 0.0, egui::Color32::BLACK);

        let frame = self
            .display
            .next_frame(&mut self.source, &self.controller, wall_clock_seconds());
        let scaled = match self.display.fit(&frame, (area.width(), area.height())) {
            Ok(scaled) => scaled,
            Err(e) => {
                tracing::debug!("Skipping blit: {e}");
                return;
            }
        };

        let size = [scaled.width() as usize, scaled.height() as usize];
        let image = egui::ColorImage::from_rgb(size, scaled.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ui.ctx().load_texture(
                    "camera_frame",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        let Some(texture) = &self.texture else {
            return;
        };

        let rect = egui::Rect::from_center_size(
            area.center(),
            egui::vec2(size[0] as f32, size[1] as f32),
        );
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // next tick is scheduled before any rendering can bail out
        ctx.request_repaint_after(self.display.interval());

        egui::SidePanel::right("results")
            .exact_width(500.0)
            .resizable(false)
            .show(ctx, |ui| self.render_results_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(rgb(palette::BACKGROUND)).inner_margin(egui::Margin::same(10)))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::WHITE)
                    .stroke(egui::Stroke::new(2.0, rgb(palette::BORDER)))
                    .inner_margin(egui::Margin::same(15))
                    .show(ui, |ui| {
                        ui.set_min_size(ui.available_size());
                        self.render_controls(ui);
                        ui.add_space(10.0);
                        self.render_video(ui);
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(palette::RED, (0xef, 0x44, 0x44))]
    #[case(palette::WAITING, (0x6b, 0x72, 0x80))]
    fn palette_converts_to_egui(#[case] c: [u8; 3], #[case] expected: (u8, u8, u8)) {
        assert_eq!(rgb(c), egui::Color32::from_rgb(expected.0, expected.1, expected.2));
    }
}
