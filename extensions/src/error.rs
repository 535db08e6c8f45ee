//! Error types for the extensions system

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtensionError>;

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid extension entry #{index} ({entry}): {reason}")]
    InvalidExtensionEntry {
        index: usize,
        entry: String,
        reason: String,
    },

    #[error("Invalid extension package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Extension configured more than once: {0}")]
    DuplicateExtension(String),

    #[error("No factory registered for extension: {0}")]
    ExtensionNotRegistered(String),

    #[error("Extension {package} failed during {stage}: {reason}")]
    LifecycleFailed {
        package: String,
        stage: &'static str,
        reason: String,
    },

    #[error("Unknown build target {0:?}; expected \"node\" or \"web\"")]
    UnknownTarget(String),

    #[error("Settings file error at {path}: {reason}")]
    SettingsError { path: PathBuf, reason: String },
}
