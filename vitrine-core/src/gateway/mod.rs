//! Remote profile service contract.

mod http;
pub mod routes;
mod urls;

use async_trait::async_trait;
use thiserror::Error;
use vitrine_model::RemoteProfile;

use crate::assets::SelectedImage;

pub use http::HttpProfileGateway;
pub use urls::resolve_asset_url;

/// Failure below the level of a single gateway operation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request could not be completed")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint URL")]
    Url(#[from] url::ParseError),
    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("response body could not be decoded")]
    Decode(#[source] serde_json::Error),
    #[error("server rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
#[error("failed to fetch profile")]
pub struct FetchError(#[from] pub TransportError);

#[derive(Debug, Error)]
#[error("failed to upload image")]
pub struct UploadError(#[from] pub TransportError);

#[derive(Debug, Error)]
#[error("failed to persist profile")]
pub struct PersistError(#[from] pub TransportError);

/// The three remote operations the editor depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn fetch_profile(&self) -> Result<RemoteProfile, FetchError>;

    /// Upload an image, returning the server-owned path or URL for it.
    async fn upload_image(
        &self,
        image: &SelectedImage,
    ) -> Result<String, UploadError>;

    async fn persist_profile(
        &self,
        profile: &RemoteProfile,
    ) -> Result<(), PersistError>;
}
