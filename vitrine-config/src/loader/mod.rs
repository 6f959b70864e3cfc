pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, env};
use crate::models::{ClientConfig, ConfigMetadata};
use crate::util::{non_blank, normalize_base_url};
use crate::validation::enforce_guard_rails;
use error::ConfigLoadError;

/// Where environment-style overrides are read from.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The running process environment.
    #[default]
    Process,
    /// A fixed set of variables, used by tests and embedding hosts.
    Map(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(key).ok(),
            EnvSource::Map(map) => map.get(key).cloned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api: FileApi,
    assets: FileAssets,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileApi {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileAssets {
    origin: Option<String>,
    max_image_bytes: Option<u64>,
    preview_dir: Option<PathBuf>,
}

/// Layered configuration loader.
///
/// Precedence, lowest to highest: compiled defaults, TOML file, `.env`
/// file, environment source. A missing `.env` or default config file is
/// not an error; an explicitly requested config file must exist.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    search_default_path: bool,
    env_file: Option<PathBuf>,
    env: EnvSource,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            search_default_path: true,
            env_file: Some(PathBuf::from(".env")),
            env: EnvSource::Process,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_env_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_file = path;
        self
    }

    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Skip `<config_dir>/vitrine/config.toml` discovery.
    pub fn without_default_path(mut self) -> Self {
        self.search_default_path = false;
        self
    }

    pub fn load(&self) -> Result<ClientConfig, ConfigLoadError> {
        let dotenv = match self.env_file.as_deref() {
            Some(path) => load_env_map(path)?,
            None => None,
        };
        let env_file_loaded = dotenv.is_some();
        let dotenv = dotenv.unwrap_or_default();

        let lookup = |key: &str| {
            non_blank(self.env.get(key).or_else(|| dotenv.get(key).cloned()))
        };

        let config_path = self
            .config_path
            .clone()
            .or_else(|| lookup(env::CONFIG_PATH).map(PathBuf::from))
            .or_else(|| self.default_config_path());

        let file = match config_path.as_deref() {
            Some(path) => read_config_file(path)?,
            None => FileConfig::default(),
        };

        let mut config = ClientConfig::default();

        if let Some((key, raw)) =
            pick(lookup(env::API_URL), env::API_URL, file.api.base_url, "api.base_url")
        {
            config.api.base_url = normalize_base_url(&key, &raw)?;
        }

        config.assets.origin = match pick(
            lookup(env::ASSET_ORIGIN),
            env::ASSET_ORIGIN,
            file.assets.origin,
            "assets.origin",
        ) {
            Some((key, raw)) => normalize_base_url(&key, &raw)?,
            None => config.api.base_url.clone(),
        };

        config.api.token = lookup(env::API_TOKEN).or(non_blank(file.api.token));

        if let Some((key, raw)) = pick(
            lookup(env::REQUEST_TIMEOUT),
            env::REQUEST_TIMEOUT,
            file.api.timeout,
            "api.timeout",
        ) {
            config.api.timeout = humantime::parse_duration(&raw).map_err(
                |source| ConfigLoadError::InvalidDuration {
                    key,
                    value: raw.clone(),
                    source,
                },
            )?;
        }

        if let Some(raw) = lookup(env::MAX_IMAGE_BYTES) {
            config.assets.max_image_bytes = raw.parse().map_err(|source| {
                ConfigLoadError::InvalidNumber {
                    key: env::MAX_IMAGE_BYTES.to_string(),
                    value: raw.clone(),
                    source,
                }
            })?;
        } else if let Some(bytes) = file.assets.max_image_bytes {
            config.assets.max_image_bytes = bytes;
        }

        config.assets.preview_dir = lookup(env::PREVIEW_DIR)
            .map(PathBuf::from)
            .or(file.assets.preview_dir);

        config.metadata = ConfigMetadata {
            config_file: config_path,
            env_file_loaded,
        };

        enforce_guard_rails(&config)?;
        tracing::debug!(
            api = %config.api.base_url,
            assets = %config.assets.origin,
            "configuration loaded"
        );
        Ok(config)
    }

    fn default_config_path(&self) -> Option<PathBuf> {
        if !self.search_default_path {
            return None;
        }
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}

fn pick(
    env_value: Option<String>,
    env_key: &str,
    file_value: Option<String>,
    file_key: &str,
) -> Option<(String, String)> {
    env_value
        .map(|value| (env_key.to_string(), value))
        .or_else(|| {
            non_blank(file_value).map(|value| (file_key.to_string(), value))
        })
}

fn read_config_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn load_env_map(
    path: &Path,
) -> Result<Option<HashMap<String, String>>, ConfigLoadError> {
    if !path.exists() {
        return Ok(None);
    }

    let mut map = HashMap::new();
    for entry in dotenvy::from_path_iter(path)? {
        let (key, value) = entry?;
        map.insert(key, value);
    }
    Ok(Some(map))
}
