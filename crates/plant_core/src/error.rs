use std::path::PathBuf;

use thiserror::Error;

/// Failure while pulling a frame from the camera.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera returned no frame")]
    NoFrame,
    #[error("camera frame has invalid size {width}x{height} ({len} bytes)")]
    BadBuffer { width: u32, height: u32, len: usize },
    #[error("camera backend: {0}")]
    Backend(String),
}

/// Failure inside the diagnosis routine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("frame is empty")]
    EmptyFrame,
    #[error("analysis backend: {0}")]
    Backend(String),
}

/// Failure while preparing a frame for display.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface not laid out yet ({width}x{height})")]
    SurfaceNotReady { width: f32, height: f32 },
    #[error("target size {width}x{height} is not positive")]
    EmptyTarget { width: i64, height: i64 },
    #[error("resize failed: {0}")]
    Resize(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid built-in disease table: {0}")]
    BuiltinTable(#[source] toml::de::Error),
}
