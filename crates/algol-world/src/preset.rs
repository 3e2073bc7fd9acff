//! JSON scene presets.
//!
//! ```json
//! {
//!   "stars": [
//!     { "radius": 200, "center": [640, 360, 0], "color": [1.0, 0.9, 0.6] }
//!   ],
//!   "planets": [
//!     { "radius": 40, "center": [640, 360, 0], "axes_lengths": [900, 0, 500],
//!       "velocities": [0.8, 0, 0.8] }
//!   ]
//! }
//! ```
//!
//! Both arrays are optional. Inside an object only `radius` is required;
//! vectors default to zero and `color` defaults to white.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Construction parameters of one star or planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectParams {
    pub radius: f32,
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default)]
    pub axes_lengths: [f32; 3],
    #[serde(default)]
    pub velocities: [f32; 3],
    #[serde(default)]
    pub phase: [f32; 3],
    #[serde(default = "white")]
    pub color: [f32; 3],
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl ObjectParams {
    /// White, motionless object.
    pub fn at(radius: f32, center: [f32; 3]) -> Self {
        Self {
            radius,
            center,
            axes_lengths: [0.0; 3],
            velocities: [0.0; 3],
            phase: [0.0; 3],
            color: white(),
        }
    }
}

/// A complete scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub stars: Vec<ObjectParams>,
    #[serde(default)]
    pub planets: Vec<ObjectParams>,
}

impl Preset {
    pub fn from_json_str(src: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(src)
    }

    /// Reads and parses a preset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| WorldError::PresetIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&src).map_err(|source| WorldError::PresetFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn object_count(&self) -> usize {
        self.stars.len() + self.planets.len()
    }
}

/// Directory of numbered presets: slot `N` lives in `presetN.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetLibrary {
    dir: PathBuf,
}

impl PresetLibrary {
    /// Hotkeys reach slots `1..=9`.
    pub const SLOTS: std::ops::RangeInclusive<u8> = 1..=9;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name of a slot, e.g. `preset3.json`.
    pub fn file_name(slot: u8) -> String {
        format!("preset{slot}.json")
    }

    pub fn path_for(&self, slot: u8) -> PathBuf {
        self.dir.join(Self::file_name(slot))
    }

    /// Loads the preset in `slot`.
    pub fn load(&self, slot: u8) -> Result<Preset, WorldError> {
        Preset::load(self.path_for(slot))
    }
}
