//! Error types for gesture_snake

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the camera / hand-tracker side of the pipeline
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("IO error talking to hand tracker: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hand tracker protocol error: {0}")]
    Protocol(String),
}

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A landmark set that cannot be used as a hand
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}
