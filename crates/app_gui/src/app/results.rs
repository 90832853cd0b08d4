//! Results column: status banner, info rows, severity bar and text sections.

use super::{UiApp, rgb};
use eframe::egui;
use plant_core::panel::palette;

const PURPLE: [u8; 3] = [0x93, 0x33, 0xea];

impl UiApp {
    /// Renders the diagnosis view held in `self.panel`.
    pub(super) fn render_results_panel(&self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(rgb(palette::PRIMARY))
            .inner_margin(egui::Margin::same(15))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("CNN Classification Results")
                            .size(20.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                });
            });

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add_space(12.0);
                self.render_status_banner(ui);
                ui.add_space(10.0);
                self.render_info_rows(ui);
                ui.add_space(10.0);
                self.render_severity(ui);

                let view = &self.panel;
                let sections: [(&str, &[String], [u8; 3], [u8; 3]); 5] = [
                    ("Cause & Explanation", &view.cause, PURPLE, [0xf3, 0xe8, 0xff]),
                    (
                        "Discoloration Pattern",
                        &view.discoloration,
                        palette::PRIMARY,
                        [0xe0, 0xf2, 0xfe],
                    ),
                    ("Symptoms Detected", &view.symptoms, palette::RED, [0xfe, 0xe2, 0xe2]),
                    (
                        "Treatment Recommendations",
                        &view.recommendations,
                        palette::PRIMARY,
                        [0xdc, 0xfc, 0xe7],
                    ),
                    ("Preventive Measures", &view.preventive, palette::YELLOW, [0xfe, 0xf3, 0xc7]),
                ];
                for (title, lines, title_color, title_bg) in sections {
                    ui.add_space(10.0);
                    text_section(ui, title, lines, title_color, title_bg);
                }
                ui.add_space(12.0);
            });
    }

    fn render_status_banner(&self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(rgb(self.panel.banner))
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.panel.status_text)
                            .size(17.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    if let Some(at) = self.last_scan
                        && self.controller.diagnosis().is_some()
                    {
                        ui.label(
                            egui::RichText::new(format!("Scanned at {}", at.format("%H:%M:%S")))
                                .small()
                                .color(egui::Color32::WHITE),
                        );
                    }
                });
            });
    }

    fn render_info_rows(&self, ui: &mut egui::Ui) {
        let view = &self.panel;
        card(ui, |ui| {
            egui::Grid::new("diagnosis-info")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .striped(false)
                .show(ui, |ui| {
                    let rows = [
                        ("Plant Type:", view.plant.as_str(), palette::PRIMARY),
                        ("Disease Detected:", view.disease.as_str(), palette::PRIMARY),
                        ("Type:", view.disease_type.as_str(), palette::YELLOW),
                        ("Confidence:", view.confidence.as_str(), [0, 0, 0]),
                    ];
                    for (label, value, color) in rows {
                        ui.label(label);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(value).strong().color(rgb(color)));
                        });
                        ui.end_row();
                    }
                });
        });
    }

    fn render_severity(&self, ui: &mut egui::Ui) {
        let severity = self.panel.severity;
        card(ui, |ui| {
            ui.label(egui::RichText::new("Severity Level (Simulated)").strong());
            ui.add_space(5.0);
            ui.add(
                egui::ProgressBar::new(f32::from(severity) / 100.0)
                    .text(format!("{severity}%"))
                    .desired_width(ui.available_width()),
            );
        });
    }
}

fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(1.0, rgb(palette::BORDER)))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            add_contents(ui);
        });
}

fn text_section(ui: &mut egui::Ui, title: &str, lines: &[String], title_color: [u8; 3], title_bg: [u8; 3]) {
    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, rgb(palette::BORDER)))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            egui::Frame::new()
                .fill(rgb(title_bg))
                .inner_margin(egui::Margin::symmetric(10, 4))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new(title).strong().color(rgb(title_color)));
                });
            egui::Frame::new()
                .inner_margin(egui::Margin::symmetric(10, 5))
                .show(ui, |ui| {
                    for line in lines {
                        ui.label(line);
                    }
                });
        });
}
