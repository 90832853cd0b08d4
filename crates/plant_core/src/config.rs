use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "PLANT_DOCTOR_CONFIG";

/// Runtime settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera_index: u32,
    pub requested_width: u32,
    pub requested_height: u32,
    /// Size of the placeholder frame when no camera could be opened.
    pub placeholder_width: u32,
    pub placeholder_height: u32,
    /// Refresh cadence of the display loop.
    pub tick_interval_ms: u64,
    /// Minimum share of green-dominant pixels for a "healthy" lookup.
    pub healthy_green_ratio: f32,
    /// Optional replacement for the built-in disease table.
    pub disease_table: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            requested_width: 1280,
            requested_height: 720,
            placeholder_width: 640,
            placeholder_height: 480,
            tick_interval_ms: 15,
            healthy_green_ratio: 0.35,
            disease_table: None,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist; the per-user file is optional.
    pub fn resolve(explicit: Option<&Path>, user_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }
        let candidates: Vec<PathBuf> = user_file.map(Path::to_path_buf).into_iter().collect();
        Self::load_first(&candidates)
    }

    /// Loads the first file that exists among `candidates`, else defaults.
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        for path in candidates {
            if path.is_file() {
                tracing::info!("Loading config from {}", path.display());
                return Self::from_file(path);
            }
        }
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "camera_index = 2\ntick_interval_ms = 40\n")?;

        let cfg = AppConfig::from_file(&path)?;
        assert_eq!(cfg.camera_index, 2);
        assert_eq!(cfg.tick_interval_ms, 40);
        assert_eq!(cfg.placeholder_width, 640);
        assert!(cfg.disease_table.is_none());
        Ok(())
    }

    #[test]
    fn load_first_skips_missing_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("nope.toml");
        let present = dir.path().join("present.toml");
        fs::write(&present, "requested_width = 800\n")?;

        let cfg = AppConfig::load_first(&[missing, present])?;
        assert_eq!(cfg.requested_width, 800);
        Ok(())
    }

    #[test]
    fn load_first_without_files_is_default() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::load_first(&[dir.path().join("absent.toml")])?;
        assert_eq!(cfg, AppConfig::default());
        Ok(())
    }

    #[test]
    fn missing_explicit_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let user = dir.path().join("config.toml");
        fs::write(&user, "camera_index = 3\n")?;
        let err = AppConfig::resolve(Some(&dir.path().join("gone.toml")), Some(&user)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        Ok(())
    }

    #[test]
    fn explicit_file_wins_over_user_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let explicit = dir.path().join("explicit.toml");
        let user = dir.path().join("config.toml");
        fs::write(&explicit, "camera_index = 1\n")?;
        fs::write(&user, "camera_index = 3\n")?;
        assert_eq!(AppConfig::resolve(Some(&explicit), Some(&user))?.camera_index, 1);
        Ok(())
    }

    #[test]
    fn absent_user_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::resolve(None, Some(&dir.path().join("config.toml")))?;
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(AppConfig::resolve(None, None)?, AppConfig::default());
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.toml");
        fs::write(&path, "camera_index = \"zero\"")?;
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }
}
