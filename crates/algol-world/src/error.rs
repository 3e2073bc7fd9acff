use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the scene model.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A dynamically typed value was handed to the world but does not describe
    /// a star or a planet.
    #[error("{0} is not a WorldObject")]
    NotAWorldObject(String),

    #[error("failed to read preset {}", path.display())]
    PresetIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed preset {}", path.display())]
    PresetFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WorldError {
    /// True when the preset file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorldError::PresetIo { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
