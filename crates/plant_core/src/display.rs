//! One refresh of the video surface: pick a frame, decorate it, fit it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

use crate::error::RenderError;
use crate::overlay::apply_overlays;
use crate::scan::ScanController;
use crate::source::{Frame, FrameSource};

/// Seconds since the Unix epoch, the clock the scan pulse runs on.
pub fn wall_clock_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Largest size with the frame's aspect ratio that fits the surface.
pub fn fit_to_surface(frame: (u32, u32), surface: (f32, f32)) -> Result<(u32, u32), RenderError> {
    let (sw, sh) = surface;
    if sw <= 1.0 || sh <= 1.0 {
        return Err(RenderError::SurfaceNotReady {
            width: sw,
            height: sh,
        });
    }
    let (fw, fh) = (frame.0 as f64, frame.1 as f64);
    if fw <= 0.0 || fh <= 0.0 {
        return Err(RenderError::EmptyTarget {
            width: 0,
            height: 0,
        });
    }
    let ratio = (sw as f64 / fw).min(sh as f64 / fh);
    let w = (fw * ratio) as i64;
    let h = (fh * ratio) as i64;
    if w <= 0 || h <= 0 {
        return Err(RenderError::EmptyTarget {
            width: w,
            height: h,
        });
    }
    Ok((w as u32, h as u32))
}

/// Per-tick frame pipeline, driven by the UI timer.
pub struct DisplayLoop {
    interval: Duration,
    resizer: Resizer,
}

impl DisplayLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            resizer: Resizer::new(),
        }
    }

    /// Delay until the next tick. The caller reschedules regardless of errors.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frame for this tick with overlays applied.
    ///
    /// Live: a fresh frame from `source` (its last good capture is the candidate
    /// for the next hold). Held: the frozen frame, or the placeholder if the hold
    /// started before any capture. Overlays are skipped without a camera.
    pub fn next_frame(&self, source: &mut FrameSource, controller: &ScanController, seconds: f64) -> Frame {
        let mut frame = if controller.is_live() {
            source.next_frame()
        } else {
            controller
                .frozen_frame()
                .cloned()
                .unwrap_or_else(|| source.placeholder())
        };
        if source.camera_available() {
            apply_overlays(
                &mut frame,
                controller.is_scanning(),
                controller.bbox(),
                controller.diagnosis(),
                seconds,
            );
        }
        frame
    }

    /// Scales `frame` to fit `surface`, Lanczos filtered.
    pub fn fit(&mut self, frame: &Frame, surface: (f32, f32)) -> Result<Frame, RenderError> {
        let (w, h) = fit_to_surface(frame.dimensions(), surface)?;
        if (w, h) == frame.dimensions() {
            return Ok(frame.clone());
        }
        let src = ImageRef::new(frame.width(), frame.height(), frame.as_raw(), PixelType::U8x3)
            .map_err(|e| RenderError::Resize(e.to_string()))?;
        let mut dst = Image::new(w, h, PixelType::U8x3);
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
        self.resizer
            .resize(&src, &mut dst, &options)
            .map_err(|e| RenderError::Resize(e.to_string()))?;
        RgbImage::from_raw(w, h, dst.into_vec())
            .ok_or_else(|| RenderError::Resize("resized buffer has wrong length".into()))
    }
}
