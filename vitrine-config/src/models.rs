use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_REQUEST_TIMEOUT,
};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub assets: AssetConfig,
    pub metadata: ConfigMetadata,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = default_api_url();
        Self {
            api: ApiConfig {
                base_url: base_url.clone(),
                token: None,
                timeout: DEFAULT_REQUEST_TIMEOUT,
            },
            assets: AssetConfig {
                origin: base_url,
                max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
                preview_dir: None,
            },
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    /// Base every service route is joined onto. Always ends with `/`.
    pub base_url: Url,
    /// Bearer token attached to every request when present.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Origin that opaque image paths are resolved against.
    pub origin: Url,
    /// Largest accepted image selection, inclusive.
    pub max_image_bytes: u64,
    /// Directory for local preview files; a private temp dir when unset.
    pub preview_dir: Option<PathBuf>,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_file: Option<PathBuf>,
    pub env_file_loaded: bool,
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL should parse")
}
