use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 800 * 1024;

pub const CONFIG_DIR_NAME: &str = "vitrine";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub mod env {
    pub const CONFIG_PATH: &str = "VITRINE_CONFIG";
    pub const API_URL: &str = "VITRINE_API_URL";
    pub const ASSET_ORIGIN: &str = "VITRINE_ASSET_ORIGIN";
    pub const API_TOKEN: &str = "VITRINE_API_TOKEN";
    pub const REQUEST_TIMEOUT: &str = "VITRINE_REQUEST_TIMEOUT";
    pub const MAX_IMAGE_BYTES: &str = "VITRINE_MAX_IMAGE_BYTES";
    pub const PREVIEW_DIR: &str = "VITRINE_PREVIEW_DIR";
}
