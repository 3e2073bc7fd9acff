use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "ALGOL_CONFIG";

/// Studio settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub title: String,
    /// Window size in logical pixels. Also the scene extent in world units:
    /// the camera focuses on its center.
    pub width: u32,
    pub height: u32,

    pub presets_dir: PathBuf,
    pub shader_path: PathBuf,
    pub event_log_path: PathBuf,
    pub csv_path: PathBuf,

    pub background: [f32; 3],
    pub focal_length: f32,

    /// Preset slot loaded at startup. Falls back to the built-in scene when
    /// unset or when the file cannot be loaded.
    pub initial_preset: Option<u8>,

    /// `env_logger` filter; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        Self {
            title: "Algol".to_string(),
            width: 1280,
            height: 720,
            presets_dir: crate_dir.join("presets"),
            shader_path: crate_dir.join("shaders").join("scene.wgsl"),
            event_log_path: PathBuf::from("algol.log"),
            csv_path: PathBuf::from("luminance.csv"),
            background: [0.05, 0.05, 0.15],
            focal_length: 1000.0,
            initial_preset: Some(1),
            log_filter: None,
        }
    }
}

impl StudioConfig {
    /// Reads the file named by [`CONFIG_ENV`], or returns defaults when the
    /// variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.width > 0 && self.height > 0, "window size must be non-zero");
        anyhow::ensure!(
            self.focal_length.is_finite() && self.focal_length > 1.0,
            "focal_length must be greater than 1"
        );
        if let Some(slot) = self.initial_preset {
            anyhow::ensure!((1..=9).contains(&slot), "initial_preset must be 1..=9, got {slot}");
        }
        Ok(())
    }

    /// Background as a clear color for the surface pass.
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.background;
        wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(StudioConfig::from_json_str("{}").unwrap(), StudioConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let cfg = StudioConfig::from_json_str(
            r#"{ "width": 800, "csv_path": "out/lum.csv", "initial_preset": null }"#,
        )
        .unwrap();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.csv_path, PathBuf::from("out/lum.csv"));
        assert_eq!(cfg.initial_preset, None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(StudioConfig::from_json_str(r#"{ "width": 0 }"#).is_err());
        assert!(StudioConfig::from_json_str(r#"{ "focal_length": 0.5 }"#).is_err());
        assert!(StudioConfig::from_json_str(r#"{ "initial_preset": 12 }"#).is_err());
    }

    #[test]
    fn default_paths_point_into_crate() {
        let cfg = StudioConfig::default();
        assert!(cfg.shader_path.ends_with("shaders/scene.wgsl"));
        assert!(cfg.presets_dir.ends_with("presets"));
    }
}
