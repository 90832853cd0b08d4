//! Frame acquisition: a camera when one is present, a placeholder otherwise.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::error::CaptureError;
use crate::text::{self, GLYPH_SIZE};

/// One RGB video frame.
pub type Frame = RgbImage;

const PLACEHOLDER_BG: Rgb<u8> = Rgb([40, 40, 40]);
const PLACEHOLDER_BORDER: Rgb<u8> = Rgb([100, 100, 100]);
const PLACEHOLDER_TEXT: Rgb<u8> = Rgb([150, 150, 150]);
const PLACEHOLDER_LINES: [&str; 6] = [
    "CAMERA UNAVAILABLE",
    "",
    "Please check:",
    "- Camera is connected",
    "- No other app is using it",
    "- Camera permissions enabled",
];

/// A capture device. Implementations own the OS handle.
pub trait Camera {
    fn capture(&mut self) -> Result<Frame, CaptureError>;
    fn resolution(&self) -> (u32, u32);
    /// Releases the device handle. Called at most once by [`FrameSource`].
    fn release(&mut self);
}

/// Synthetic frame shown when there is no usable camera image.
pub fn placeholder_frame(width: u32, height: u32) -> Frame {
    let mut frame = RgbImage::from_pixel(width, height, PLACEHOLDER_BG);
    // 3 px border inset 50 px from each edge; rings that no longer fit are skipped
    let (fw, fh) = (width as i64, height as i64);
    for inset in 0..3i64 {
        let w = fw - 100 + 2 - 2 * inset;
        let h = fh - 100 + 2 - 2 * inset;
        if w <= 0 || h <= 0 {
            continue;
        }
        let x = (49 + inset) as i32;
        draw_hollow_rect_mut(
            &mut frame,
            Rect::at(x, x).of_size(w as u32, h as u32),
            PLACEHOLDER_BORDER,
        );
    }

    let mut baseline = height as i32 / 2 - 60;
    let scale = 2;
    for line in PLACEHOLDER_LINES {
        if !line.is_empty() {
            let top = baseline - (GLYPH_SIZE * scale) as i32;
            text::draw_text(&mut frame, 70, top, line, PLACEHOLDER_TEXT, scale);
        }
        baseline += 30;
    }
    frame
}

/// Supplies one frame per tick and remembers the last good capture.
pub struct FrameSource {
    camera: Option<Box<dyn Camera>>,
    last_good: Option<Frame>,
    width: u32,
    height: u32,
    released: bool,
}

impl FrameSource {
    /// `placeholder_size` is only used when `camera` is `None`.
    pub fn new(camera: Option<Box<dyn Camera>>, placeholder_size: (u32, u32)) -> Self {
        let (width, height) = camera
            .as_ref()
            .map(|c| c.resolution())
            .unwrap_or(placeholder_size);
        Self {
            camera,
            last_good: None,
            width,
            height,
            released: false,
        }
    }

    pub fn camera_available(&self) -> bool {
        self.camera.is_some()
    }

    pub fn placeholder(&self) -> Frame {
        placeholder_frame(self.width, self.height)
    }

    /// Most recent successful capture, if any.
    pub fn last_good(&self) -> Option<&Frame> {
        self.last_good.as_ref()
    }

    /// Next frame to show. Never fails: capture errors fall back to the last
    /// good frame, then to the placeholder.
    pub fn next_frame(&mut self) -> Frame {
        self.try_next_frame().unwrap_or_else(|| {
            self.last_good
                .clone()
                .unwrap_or_else(|| self.placeholder())
        })
    }

    /// Fresh capture only; `None` when there is no camera or the capture failed.
    pub fn try_next_frame(&mut self) -> Option<Frame> {
        let camera = self.camera.as_mut()?;
        match camera.capture() {
            Ok(frame) => {
                self.last_good = Some(frame.clone());
                Some(frame)
            }
            Err(e) => {
                tracing::warn!("Frame capture failed: {e}");
                None
            }
        }
    }

    /// Releases the camera handle. Later calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(mut camera) = self.camera.take() {
            camera.release();
            tracing::info!("Camera released");
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Scripted camera for tests.
    pub struct FakeCamera {
        pub frames: VecDeque<Result<Frame, CaptureError>>,
        pub size: (u32, u32),
        pub releases: Rc<Cell<u32>>,
    }

    impl FakeCamera {
        pub fn new(size: (u32, u32)) -> Self {
            Self {
                frames: VecDeque::new(),
                size,
                releases: Rc::new(Cell::new(0)),
            }
        }

        pub fn push_solid(mut self, color: [u8; 3]) -> Self {
            let (w, h) = self.size;
            self.frames.push_back(Ok(RgbImage::from_pixel(w, h, Rgb(color))));
            self
        }

        pub fn push_error(mut self) -> Self {
            self.frames.push_back(Err(CaptureError::NoFrame));
            self
        }
    }

    impl Camera for FakeCamera {
        fn capture(&mut self) -> Result<Frame, CaptureError> {
            self.frames.pop_front().unwrap_or(Err(CaptureError::NoFrame))
        }

        fn resolution(&self) -> (u32, u32) {
            self.size
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }
}
