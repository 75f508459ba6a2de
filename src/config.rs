//! Startup configuration
//!
//! All tunables live in one [`Config`], read once from an optional JSON file,
//! adjusted by command-line flags, validated, and then left untouched for the
//! rest of the process.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::gesture::GestureConfig;
use crate::vision::CaptureConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub gesture: GestureConfig,
    pub capture: CaptureConfig,
}

impl Config {
    /// Load a config file. Sections and fields left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.gesture.validate()?;
        self.capture.validate()?;
        Ok(())
    }

    /// Whether a hand tracker is configured
    pub fn gesture_control_enabled(&self) -> bool {
        self.capture.tracker_program.is_some()
    }
}
