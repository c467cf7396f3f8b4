//! Error types for configuration and asset loading.
//!
//! Nothing on the per-tick path returns an error; these cover start-up only.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while resolving one image.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image {path:?} could not be read: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {name} has zero size ({width}x{height})")]
    Degenerate { name: String, width: u32, height: u32 },
}

/// Top-level error for building a run.
#[derive(Debug, Error)]
pub enum AquariumError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("could not write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("could not encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}
