mod app;
mod camera;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::UiApp;
use directories_next::ProjectDirs;
use eframe::{NativeOptions, egui};
use plant_core::config::CONFIG_ENV;
use plant_core::{AppConfig, DiseaseTable, FrameSource, LookupAnalyzer};
use tracing_subscriber::EnvFilter;

const WINDOW_TITLE: &str = "🌿 Plant Disease Detector (CNN)";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!(
        "Plant Disease Detector {} starting",
        env!("PLANT_DOCTOR_VERSION")
    );

    if let Err(e) = run() {
        tracing::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
    tracing::info!("Application closed");
}

fn run() -> Result<()> {
    let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = AppConfig::resolve(explicit.as_deref(), user_config_file().as_deref())
        .context("loading config")?;
    let table = match &config.disease_table {
        Some(path) => DiseaseTable::from_file(path)
            .with_context(|| format!("loading disease table {}", path.display()))?,
        None => DiseaseTable::builtin()?,
    };
    if table.plants.is_empty() {
        tracing::warn!("Disease table lists no plant types");
    }
    let analyzer = LookupAnalyzer::new(table, config.healthy_green_ratio);
    let source = FrameSource::new(
        camera::open_camera(&config),
        (config.placeholder_width, config.placeholder_height),
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 850.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(
                &config, source, analyzer,
            )))
        }),
    )
    .map_err(|e| anyhow!("UI stopped with error: {e}"))
}

/// `config.toml` in the per-user config dir, when the platform has one.
fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("org", "PlantDoctor", "PlantDoctor").map(|dirs| dirs.config_dir().join("config.toml"))
}
