//! In-memory editor state shared with the presentation layer.
//!
//! All mutation goes through [`ProfileStateHolder`]. The lock is only held
//! for the duration of a synchronous update and never across an await, so
//! edits and reads stay available while a load or save is in flight.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;
use vitrine_model::{
    FailureKind, Notice, ProfileDraft, ProfileField, RemoteProfile,
    SaveStatus, ValidationErrors,
};

use crate::assets::{
    AssetError, ImageAsset, ImageAssetManager, ImageUpload, SelectedImage,
};
use crate::error::SaveError;
use crate::gateway::{FetchError, ProfileGateway, resolve_asset_url};
use crate::validation::validate;

/// What the presentation layer should render for the profile picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayedImage {
    /// Stored image, resolved against the asset origin.
    Remote(Url),
    /// Local preview of a pending selection.
    Preview(Url),
    None,
}

/// Everything a save needs, captured at validation time.
#[derive(Debug)]
pub(crate) struct SaveTicket {
    pub draft: ProfileDraft,
    pub upload: Option<ImageUpload>,
    pub fallback_image: Option<String>,
}

#[derive(Debug)]
struct EditorState {
    draft: ProfileDraft,
    errors: ValidationErrors,
    status: SaveStatus,
    notice: Option<Notice>,
    remote: Option<RemoteProfile>,
    assets: ImageAssetManager,
}

impl EditorState {
    fn note_selection_error(
        &mut self,
        outcome: Result<(), AssetError>,
    ) -> Result<(), AssetError> {
        if let Err(AssetError::FileTooLarge { .. }) = &outcome {
            let limit_bytes = self.assets.max_bytes();
            self.notice = Some(Notice::FileTooLarge { limit_bytes });
        }
        outcome
    }
}

/// Cloneable handle to the editor state.
#[derive(Clone)]
pub struct ProfileStateHolder {
    state: Arc<Mutex<EditorState>>,
    gateway: Arc<dyn ProfileGateway>,
    asset_origin: Url,
}

impl fmt::Debug for ProfileStateHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStateHolder")
            .field("status", &self.status())
            .field("asset_origin", &self.asset_origin.as_str())
            .finish()
    }
}

impl ProfileStateHolder {
    pub fn new(
        gateway: Arc<dyn ProfileGateway>,
        assets: ImageAssetManager,
        asset_origin: Url,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(EditorState {
                draft: ProfileDraft::default(),
                errors: ValidationErrors::new(),
                status: SaveStatus::Idle,
                notice: None,
                remote: None,
                assets,
            })),
            gateway,
            asset_origin,
        }
    }

    /// Populate the draft from the server.
    ///
    /// A failed fetch is logged and leaves the draft as it was. Loading is
    /// skipped while a save is in flight.
    pub async fn load(&self) -> Result<(), FetchError> {
        {
            let mut state = self.state.lock();
            if state.status.is_busy() {
                debug!(status = %state.status, "load skipped, editor busy");
                return Ok(());
            }
            state.status = SaveStatus::LoadingProfile;
        }

        let fetched = self.gateway.fetch_profile().await;

        let mut state = self.state.lock();
        state.status = SaveStatus::Idle;
        match fetched {
            Ok(profile) => {
                state.draft = ProfileDraft::from_remote(&profile);
                state.assets.set_remote(profile.image.clone());
                state.errors = ValidationErrors::new();
                state.remote = Some(profile);
                debug!("profile loaded");
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, cause = %error.0, "profile fetch failed");
                Err(error)
            }
        }
    }

    /// Replace one field of the draft. No validation or I/O happens here.
    pub fn edit(&self, field: ProfileField, value: impl Into<String>) {
        self.state.lock().draft.set(field, value);
    }

    pub fn current_draft(&self) -> ProfileDraft {
        self.state.lock().draft.clone()
    }

    pub fn current_errors(&self) -> ValidationErrors {
        self.state.lock().errors.clone()
    }

    pub fn status(&self) -> SaveStatus {
        self.state.lock().status
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state.lock().notice.clone()
    }

    pub fn clear_notice(&self) {
        self.state.lock().notice = None;
    }

    /// Last profile known to be stored on the server.
    pub fn remote(&self) -> Option<RemoteProfile> {
        self.state.lock().remote.clone()
    }

    /// Select a local image as the pending profile picture.
    ///
    /// An oversized file raises [`Notice::FileTooLarge`] and changes nothing
    /// else.
    pub fn select_image(&self, image: SelectedImage) -> Result<(), AssetError> {
        let mut state = self.state.lock();
        let outcome = state.assets.select(image).map(|_| ());
        state.note_selection_error(outcome)
    }

    /// Read `path` and select it, raising the same notice as
    /// [`select_image`](Self::select_image) when the file is over the limit.
    pub fn select_image_file(&self, path: &Path) -> Result<(), AssetError> {
        let max_bytes = self.state.lock().assets.max_bytes();
        match SelectedImage::open(path, max_bytes) {
            Ok(image) => self.select_image(image),
            Err(error) => self.state.lock().note_selection_error(Err(error)),
        }
    }

    pub fn displayed_image(&self) -> DisplayedImage {
        let state = self.state.lock();
        match state.assets.current() {
            ImageAsset::Pending(pending) => {
                DisplayedImage::Preview(pending.preview().clone())
            }
            ImageAsset::Remote(Some(path)) => {
                resolve_asset_url(&self.asset_origin, path)
                    .map_or(DisplayedImage::None, DisplayedImage::Remote)
            }
            ImageAsset::Remote(None) => DisplayedImage::None,
        }
    }

    /// The editing surface is closing; give back any pending preview.
    pub fn dismiss(&self) {
        let mut state = self.state.lock();
        state.assets.release_pending();
        state.notice = None;
    }

    /// Validate and, when clean, move into the saving state.
    pub(crate) fn begin_save(&self) -> Result<SaveTicket, SaveError> {
        let mut state = self.state.lock();
        if !state.status.accepts_save() {
            return Err(SaveError::Busy);
        }

        state.status = SaveStatus::Validating;
        let errors = validate(&state.draft);
        if !errors.is_empty() {
            state.errors = errors.clone();
            state.notice = Some(Notice::CorrectErrors);
            state.status = SaveStatus::Idle;
            return Err(SaveError::Validation(errors));
        }

        state.errors = ValidationErrors::new();
        state.notice = None;
        state.status = SaveStatus::Saving;
        Ok(SaveTicket {
            draft: state.draft.clone(),
            upload: state.assets.resolve_for_upload(),
            fallback_image: state.assets.remote().map(str::to_owned),
        })
    }

    pub(crate) fn mark_persisting(&self) {
        self.state.lock().status = SaveStatus::Persisting;
    }

    /// Record a stored profile. `selection` names the preview that was
    /// pending when the save started. It is released unless a newer
    /// selection replaced it mid-save.
    pub(crate) fn complete_save(
        &self,
        saved: &RemoteProfile,
        selection: Option<Uuid>,
    ) {
        let mut state = self.state.lock();
        state.assets.set_remote(saved.image.clone());
        if let Some(id) = selection {
            state.assets.release_if_current(id);
        }
        state.remote = Some(saved.clone());
        state.status = SaveStatus::Done;
    }

    pub(crate) fn fail_save(&self) {
        let mut state = self.state.lock();
        state.status = SaveStatus::Failed(FailureKind::Persist);
        state.notice = Some(Notice::SaveFailed);
    }
}
