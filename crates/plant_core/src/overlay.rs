//! Drawing on top of a frame copy: the pulsing scan banner and the result box.

use image::Rgb;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::diagnosis::{BoundingBox, DiagnosisResult, HealthStatus};
use crate::source::Frame;
use crate::text::{draw_text, text_size};

pub const SCANNING_TEXT: &str = "SCANNING...";
const SCANNING_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;
const BOX_THICKNESS: i32 = 3;
const BACKING_ALPHA: f32 = 0.4;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Intensity of the animated channel: `(sin(10 t) + 1) * 127.5`, truncated.
pub fn pulse(seconds: f64) -> u8 {
    (((seconds * 10.0).sin() + 1.0) * 127.5) as u8
}

pub fn status_color(status: &HealthStatus) -> Rgb<u8> {
    match status {
        HealthStatus::Healthy => Rgb([0, 255, 0]),
        HealthStatus::Diseased => Rgb([255, 0, 0]),
        HealthStatus::Stressed => Rgb([255, 255, 0]),
        HealthStatus::Unknown(_) => WHITE,
    }
}

pub fn box_label(status: &HealthStatus, disease: &str) -> String {
    format!("{} - {}", status.label().to_uppercase(), disease)
}

/// Dims a rectangle by blending `alpha` of black over the frame.
fn darken_rect(frame: &mut Frame, rect: Rect, alpha: f32) {
    let keep = 1.0 - alpha.clamp(0.0, 1.0);
    let (fw, fh) = (frame.width() as i32, frame.height() as i32);
    let x0 = rect.left().max(0);
    let y0 = rect.top().max(0);
    let x1 = (rect.right() + 1).min(fw);
    let y1 = (rect.bottom() + 1).min(fh);
    for y in y0..y1 {
        for x in x0..x1 {
            let px = frame.get_pixel_mut(x as u32, y as u32);
            *px = Rgb(px.0.map(|c| (c as f32 * keep).round() as u8));
        }
    }
}

/// Filled rectangle that tolerates degenerate sizes.
fn fill_rect(frame: &mut Frame, left: i32, top: i32, right: i32, bottom: i32, color: Rgb<u8>) {
    let w = right - left;
    let h = bottom - top;
    if w <= 0 || h <= 0 {
        return;
    }
    draw_filled_rect_mut(frame, Rect::at(left, top).of_size(w as u32, h as u32), color);
}

/// Centered "SCANNING..." over a dimmed backing strip.
pub fn draw_scanning_indicator(frame: &mut Frame, seconds: f64) {
    let (w, h) = (frame.width() as i32, frame.height() as i32);
    let (tw, th) = text_size(SCANNING_TEXT, SCANNING_SCALE);
    let (tw, th) = (tw as i32, th as i32);
    let text_x = (w - tw) / 2;
    let baseline = (h + th) / 2;

    let backing_w = (tw + 40).max(1) as u32;
    let backing_h = (th + 20).max(1) as u32;
    darken_rect(
        frame,
        Rect::at(text_x - 20, baseline - th - 10).of_size(backing_w, backing_h),
        BACKING_ALPHA,
    );

    let color = Rgb([0, pulse(seconds), 255]);
    draw_text(frame, text_x, baseline - th, SCANNING_TEXT, color, SCANNING_SCALE);
}

/// Outline plus a filled label strip above the box's top-left corner.
pub fn draw_bounding_box(frame: &mut Frame, bbox: BoundingBox, status: &HealthStatus, disease: &str) {
    let rect = bbox.to_pixels(frame.width(), frame.height());
    let color = status_color(status);

    for offset in -(BOX_THICKNESS / 2)..=(BOX_THICKNESS / 2) {
        let w = rect.width() + 1 - 2 * offset;
        let h = rect.height() + 1 - 2 * offset;
        if w <= 0 || h <= 0 {
            continue;
        }
        draw_hollow_rect_mut(
            frame,
            Rect::at(rect.left + offset, rect.top + offset).of_size(w as u32, h as u32),
            color,
        );
    }

    let label = box_label(status, disease);
    let (lw, lh) = text_size(&label, LABEL_SCALE);
    let (lw, lh) = (lw as i32, lh as i32);
    fill_rect(frame, rect.left, rect.top - lh - 20, rect.left + lw + 10, rect.top, color);
    draw_text(frame, rect.left + 5, rect.top - 10 - lh, &label, WHITE, LABEL_SCALE);
}

/// Both overlays in their fixed order: the box is drawn last so it stays visible.
pub fn apply_overlays(
    frame: &mut Frame,
    scanning: bool,
    bbox: Option<BoundingBox>,
    diagnosis: Option<&DiagnosisResult>,
    seconds: f64,
) {
    if scanning {
        draw_scanning_indicator(frame, seconds);
    }
    if let (Some(bbox), Some(result)) = (bbox, diagnosis) {
        draw_bounding_box(frame, bbox, &result.status, &result.disease);
    }
}
