//! Image selection and preview lifecycle.
//!
//! The manager remembers the last known remote image path and, at most, one
//! pending local selection. A pending selection owns a [`PreviewHandle`]
//! that is returned to the [`PreviewStore`] when the selection is replaced,
//! dismissed, uploaded, or when the manager is dropped.

mod file;
mod preview;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

pub use file::SelectedImage;
pub use preview::{
    InMemoryPreviewStore, PreviewHandle, PreviewStore, TempDirPreviewStore,
};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("'{file_name}' is not an image")]
    NotAnImage { file_name: String },
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create image preview")]
    Preview(#[source] std::io::Error),
    #[error("preview location {0} cannot be expressed as a URL")]
    PreviewPath(PathBuf),
}

/// A selection that has not been uploaded yet.
#[derive(Debug)]
pub struct PendingImage {
    image: SelectedImage,
    handle: PreviewHandle,
}

impl PendingImage {
    pub fn id(&self) -> Uuid {
        self.handle.id()
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    pub fn preview(&self) -> &Url {
        self.handle.location()
    }
}

/// The image the editor currently represents.
#[derive(Debug, Clone, Copy)]
pub enum ImageAsset<'a> {
    /// The stored image path, if the profile has one.
    Remote(Option<&'a str>),
    Pending(&'a PendingImage),
}

/// What the save flow needs from a pending selection.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub preview_id: Uuid,
    pub image: SelectedImage,
}

#[derive(Debug)]
pub struct ImageAssetManager {
    store: Arc<dyn PreviewStore>,
    max_bytes: u64,
    remote: Option<String>,
    pending: Option<PendingImage>,
}

impl ImageAssetManager {
    pub fn new(store: Arc<dyn PreviewStore>, max_bytes: u64) -> Self {
        Self {
            store,
            max_bytes,
            remote: None,
            pending: None,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn current(&self) -> ImageAsset<'_> {
        match &self.pending {
            Some(pending) => ImageAsset::Pending(pending),
            None => ImageAsset::Remote(self.remote.as_deref()),
        }
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingImage> {
        self.pending.as_ref()
    }

    pub fn set_remote(&mut self, path: Option<String>) {
        self.remote = path.filter(|p| !p.trim().is_empty());
    }

    /// Make `image` the pending selection.
    ///
    /// Files larger than the limit are rejected and leave the manager
    /// untouched. A file exactly at the limit is accepted. The previous
    /// selection is only released once the new preview exists.
    pub fn select(
        &mut self,
        image: SelectedImage,
    ) -> Result<&PendingImage, AssetError> {
        if image.size() > self.max_bytes {
            return Err(AssetError::FileTooLarge {
                size: image.size(),
                limit: self.max_bytes,
            });
        }

        let handle = self.store.acquire(&image)?;
        self.release_pending();
        debug!(id = %handle.id(), file = image.file_name(), "image selected");
        Ok(self.pending.insert(PendingImage { image, handle }))
    }

    /// Drop the pending selection, if any. Returns whether one was released.
    pub fn release_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.store.release(pending.handle);
                true
            }
            None => false,
        }
    }

    /// Release the pending selection only if it is still the one identified
    /// by `id`.
    pub fn release_if_current(&mut self, id: Uuid) -> bool {
        if self.pending.as_ref().is_some_and(|p| p.id() == id) {
            self.release_pending()
        } else {
            false
        }
    }

    /// The bytes to upload, or `None` when there is no pending selection.
    pub fn resolve_for_upload(&self) -> Option<ImageUpload> {
        self.pending.as_ref().map(|pending| ImageUpload {
            preview_id: pending.id(),
            image: pending.image.clone(),
        })
    }
}

impl Drop for ImageAssetManager {
    fn drop(&mut self) {
        self.release_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 800 * 1024;

    fn sized(size: usize) -> SelectedImage {
        SelectedImage::new("me.png", "image/png", vec![0u8; size]).unwrap()
    }

    fn manager() -> (Arc<InMemoryPreviewStore>, ImageAssetManager) {
        let store = Arc::new(InMemoryPreviewStore::new());
        let manager = ImageAssetManager::new(store.clone(), LIMIT);
        (store, manager)
    }

    #[test]
    fn boundary_size_is_accepted_and_one_byte_more_is_not() {
        let (store, mut manager) = manager();

        manager.select(sized(LIMIT as usize)).unwrap();
        assert_eq!(store.live_count(), 1);

        let err = manager.select(sized(LIMIT as usize + 1)).unwrap_err();
        assert!(matches!(
            err,
            AssetError::FileTooLarge { size, limit: LIMIT } if size == LIMIT + 1
        ));
        assert_eq!(store.live_count(), 1);
        assert!(matches!(manager.current(), ImageAsset::Pending(_)));
    }

    #[test]
    fn rejected_selection_keeps_remote() {
        let (store, mut manager) = manager();
        manager.set_remote(Some("/img/a.png".into()));

        assert!(manager.select(sized(LIMIT as usize + 1)).is_err());
        assert!(matches!(manager.current(), ImageAsset::Remote(Some("/img/a.png"))));
        assert!(store.acquired().is_empty());
    }

    #[test]
    fn reselecting_releases_the_superseded_preview_once() {
        let (store, mut manager) = manager();

        let first = manager.select(sized(10)).unwrap().id();
        let second = manager.select(sized(20)).unwrap().id();

        assert_eq!(store.released(), vec![first]);
        assert!(store.is_live(second));
        assert_eq!(manager.resolve_for_upload().unwrap().image.size(), 20);
    }

    #[test]
    fn release_if_current_ignores_stale_ids() {
        let (store, mut manager) = manager();
        let first = manager.select(sized(10)).unwrap().id();
        let second = manager.select(sized(10)).unwrap().id();

        assert!(!manager.release_if_current(first));
        assert!(manager.release_if_current(second));
        assert_eq!(store.released(), vec![first, second]);
        assert!(manager.resolve_for_upload().is_none());
    }

    #[test]
    fn drop_releases_pending_preview() {
        let (store, mut manager) = manager();
        let id = manager.select(sized(10)).unwrap().id();
        drop(manager);
        assert_eq!(store.released(), vec![id]);
        assert_eq!(store.live_count(), 0);
    }

    /// Hands out one preview, then fails every later acquisition.
    #[derive(Debug, Default)]
    struct OneShotStore {
        inner: InMemoryPreviewStore,
        used: std::sync::atomic::AtomicBool,
    }

    impl PreviewStore for OneShotStore {
        fn acquire(
            &self,
            image: &SelectedImage,
        ) -> Result<PreviewHandle, AssetError> {
            if self.used.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return Err(AssetError::Preview(std::io::Error::other("disk full")));
            }
            self.inner.acquire(image)
        }

        fn release(&self, handle: PreviewHandle) {
            self.inner.release(handle);
        }
    }

    #[test]
    fn failed_acquire_keeps_previous_selection() {
        let store = Arc::new(OneShotStore::default());
        let mut manager = ImageAssetManager::new(store.clone(), LIMIT);
        let first = manager.select(sized(10)).unwrap().id();

        let err = manager.select(sized(20)).unwrap_err();

        assert!(matches!(err, AssetError::Preview(_)));
        assert_eq!(manager.pending().map(PendingImage::id), Some(first));
        assert!(store.inner.released().is_empty());
        assert!(store.inner.is_live(first));
    }

    #[test]
    fn blank_remote_paths_are_treated_as_absent() {
        let (_store, mut manager) = manager();
        manager.set_remote(Some("  ".into()));
        assert!(manager.remote().is_none());
    }
}
