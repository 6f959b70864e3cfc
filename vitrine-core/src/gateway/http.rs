use std::fmt;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;
use vitrine_config::ApiConfig;
use vitrine_model::RemoteProfile;
use vitrine_model::wire::{
    FetchProfileResponse, PersistProfileRequest, UploadImageResponse,
};

use super::{
    FetchError, PersistError, ProfileGateway, TransportError, UploadError,
    routes,
};
use crate::assets::SelectedImage;

/// [`ProfileGateway`] backed by the profile service's JSON API.
#[derive(Clone)]
pub struct HttpProfileGateway {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for HttpProfileGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProfileGateway")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl HttpProfileGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!(base_url = %config.base_url, "creating profile gateway");
        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.token.clone(),
        ))
    }

    /// Use an already configured client. `base_url` should end in `/` so
    /// that routes are joined beneath it.
    pub fn with_client(
        client: Client,
        base_url: Url,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(route)?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = self.authorize(builder).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(TransportError::Status { status, body });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(TransportError::Decode)
}

#[async_trait]
impl ProfileGateway for HttpProfileGateway {
    async fn fetch_profile(&self) -> Result<RemoteProfile, FetchError> {
        let url = self.endpoint(routes::FETCH_PROFILE)?;
        debug!(%url, "fetching profile");

        let body: FetchProfileResponse =
            self.send_json(self.client.get(url)).await?;
        match body.profile {
            Some(profile) if body.status => Ok(profile.into()),
            Some(_) => Err(TransportError::Rejected(
                "profile lookup reported status=false".to_string(),
            )
            .into()),
            None => Err(TransportError::Rejected(
                "profile lookup returned no profile".to_string(),
            )
            .into()),
        }
    }

    async fn upload_image(
        &self,
        image: &SelectedImage,
    ) -> Result<String, UploadError> {
        let url = self.endpoint(routes::UPLOAD_IMAGE)?;
        debug!(%url, file = image.file_name(), size = image.size(), "uploading image");

        let file = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime())
            .map_err(TransportError::Request)?;
        let form = Form::new()
            .text("type", routes::UPLOAD_KIND_PROFILE)
            .part("file", file);

        let body: UploadImageResponse =
            self.send_json(self.client.post(url).multipart(form)).await?;
        if body.download_url.trim().is_empty() {
            return Err(TransportError::Rejected(
                "upload response carried no downloadUrl".to_string(),
            )
            .into());
        }
        Ok(body.download_url)
    }

    async fn persist_profile(
        &self,
        profile: &RemoteProfile,
    ) -> Result<(), PersistError> {
        let url = self.endpoint(routes::PERSIST_PROFILE)?;
        debug!(%url, "persisting profile");

        let request = PersistProfileRequest::from(profile);
        let response = self
            .authorize(self.client.post(url).json(&request))
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body }.into());
        }
        Ok(())
    }
}
