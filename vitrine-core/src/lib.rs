//! Client-side profile editing core.
//!
//! A [`ProfileStateHolder`] keeps the working draft, field errors, save
//! status and the pending image selection. [`SaveOrchestrator::save`]
//! validates the draft, uploads a newly selected image, persists the
//! profile through a [`ProfileGateway`], and publishes the stored result
//! to a [`SharedProfileStore`].
#![allow(missing_docs)]

pub mod assets;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod state;
pub mod sync;
pub mod telemetry;
pub mod validation;

pub use assets::{
    AssetError, ImageAsset, ImageAssetManager, InMemoryPreviewStore,
    PreviewHandle, PreviewStore, SelectedImage, TempDirPreviewStore,
};
pub use error::SaveError;
pub use gateway::{
    FetchError, HttpProfileGateway, PersistError, ProfileGateway,
    TransportError, UploadError, resolve_asset_url,
};
pub use orchestrator::{ImageOutcome, SaveOrchestrator, SaveReport};
pub use state::{DisplayedImage, ProfileStateHolder};
pub use sync::{ProfilePublisher, SharedProfileStore};
pub use validation::{validate, validate_field};

pub use vitrine_config as config;
pub use vitrine_model as model;
