//! Webcam access through nokhwa.

use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use plant_core::{AppConfig, Camera, CaptureError, Frame};

pub struct NokhwaCamera {
    device: nokhwa::Camera,
    resolution: (u32, u32),
}

impl NokhwaCamera {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let wanted = CameraFormat::new(
            Resolution::new(config.requested_width, config.requested_height),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted));
        let mut device = nokhwa::Camera::new(CameraIndex::Index(config.camera_index), requested)
            .with_context(|| format!("cannot open camera {}", config.camera_index))?;
        device.open_stream().context("cannot start camera stream")?;
        let res = device.resolution();
        Ok(Self {
            device,
            resolution: (res.width(), res.height()),
        })
    }
}

impl Camera for NokhwaCamera {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let buffer = self
            .device
            .frame()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        let raw = decoded.into_raw();
        let len = raw.len();
        RgbImage::from_raw(width, height, raw).ok_or(CaptureError::BadBuffer { width, height, len })
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn release(&mut self) {
        if let Err(e) = self.device.stop_stream() {
            tracing::warn!("Stopping camera stream failed: {e}");
        }
    }
}

/// Opens the configured camera; `None` when it is missing or busy.
pub fn open_camera(config: &AppConfig) -> Option<Box<dyn Camera>> {
    match NokhwaCamera::open(config) {
        Ok(camera) => {
            let (w, h) = camera.resolution;
            tracing::info!("Camera opened: {w}x{h}");
            Some(Box::new(camera))
        }
        Err(e) => {
            tracing::warn!("Camera not available: {e:#}");
            None
        }
    }
}
