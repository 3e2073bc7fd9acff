mod app;
mod camera;
mod config;
mod luminance;
mod raster;
mod recorder;
mod scene;
mod session;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use algol_engine::device::GpuInit;
use algol_engine::logging::{init_logging, LoggingConfig};
use algol_engine::render::ShaderTemplate;
use algol_engine::window::{Runtime, RuntimeConfig};

use crate::app::AlgolApp;
use crate::config::StudioConfig;

fn main() -> Result<()> {
    let config = StudioConfig::load();
    init_logging(LoggingConfig {
        env_filter: config.as_ref().ok().and_then(|c| c.log_filter.clone()),
        ..LoggingConfig::default()
    });
    let config = config?;

    let shader = ShaderTemplate::load(&config.shader_path)
        .context("the scene shader is required")?;

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(config.width as f64, config.height as f64),
        resizable: true,
    };

    // The compute shader writes display-ready 8-bit values; keep the surface linear.
    let gpu = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    log::info!(
        "presets from {}, events to {}, luminance to {}",
        config.presets_dir.display(),
        config.event_log_path.display(),
        config.csv_path.display()
    );

    let app = AlgolApp::new(config, shader)?;
    Runtime::run(runtime, gpu, app)
}
