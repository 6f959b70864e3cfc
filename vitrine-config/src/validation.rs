use thiserror::Error;

use crate::models::ClientConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("image size limit must be greater than zero")]
    ZeroImageLimit,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Reject configurations that would make every request or selection fail.
pub fn enforce_guard_rails(
    config: &ClientConfig,
) -> Result<(), ConfigGuardRailError> {
    if config.assets.max_image_bytes == 0 {
        return Err(ConfigGuardRailError::ZeroImageLimit);
    }
    if config.api.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout);
    }
    Ok(())
}
