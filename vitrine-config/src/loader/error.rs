use super::super::validation::ConfigGuardRailError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid URL for {key}: '{value}'")]
    InvalidUrl {
        key: String,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' for {key}; expected http or https")]
    UnsupportedScheme { key: String, scheme: String },
    #[error("invalid duration for {key}: '{value}'")]
    InvalidDuration {
        key: String,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid number for {key}: '{value}'")]
    InvalidNumber {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
