//! Shared configuration library for Vitrine.
//!
//! Resolves where the profile service lives, where its image assets are
//! served from, and the local limits applied before anything is sent.
//! Values are layered: compiled defaults, an optional TOML file, a `.env`
//! file, then the process environment.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoader, EnvSource, error::ConfigLoadError};
pub use models::{ApiConfig, AssetConfig, ClientConfig, ConfigMetadata};
pub use validation::ConfigGuardRailError;
