use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::TempDir;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::{AssetError, SelectedImage};

/// A live, displayable reference to a not-yet-uploaded image.
///
/// Handles cannot be cloned. Giving one back to its [`PreviewStore`]
/// consumes it, so each handle is released at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: Uuid,
    location: Url,
}

impl PreviewHandle {
    pub fn new(id: Uuid, location: Url) -> Self {
        Self { id, location }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Where a presentation layer can load the preview from.
    pub fn location(&self) -> &Url {
        &self.location
    }
}

/// Produces and reclaims preview handles.
pub trait PreviewStore: Send + Sync + fmt::Debug {
    fn acquire(&self, image: &SelectedImage) -> Result<PreviewHandle, AssetError>;

    fn release(&self, handle: PreviewHandle);
}

/// Writes previews as files into a private temporary directory.
///
/// The directory and anything still in it are removed when the store is
/// dropped.
#[derive(Debug)]
pub struct TempDirPreviewStore {
    dir: TempDir,
}

impl TempDirPreviewStore {
    pub fn new() -> Result<Self, AssetError> {
        let dir = tempfile::Builder::new()
            .prefix("vitrine-preview-")
            .tempdir()
            .map_err(AssetError::Preview)?;
        Ok(Self { dir })
    }

    /// Create the temporary directory under `parent` instead of the
    /// system default.
    pub fn in_dir(parent: &Path) -> Result<Self, AssetError> {
        std::fs::create_dir_all(parent).map_err(|source| AssetError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        let dir = tempfile::Builder::new()
            .prefix("vitrine-preview-")
            .tempdir_in(parent)
            .map_err(AssetError::Preview)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file_for(&self, id: Uuid, extension: &str) -> PathBuf {
        self.dir.path().join(format!("{id}.{extension}"))
    }
}

impl PreviewStore for TempDirPreviewStore {
    fn acquire(&self, image: &SelectedImage) -> Result<PreviewHandle, AssetError> {
        let id = Uuid::new_v4();
        let path = self.file_for(id, image.extension());
        std::fs::write(&path, image.bytes()).map_err(AssetError::Preview)?;

        let location = Url::from_file_path(&path)
            .map_err(|_| AssetError::PreviewPath(path.clone()))?;
        debug!(%id, path = %path.display(), "preview written");
        Ok(PreviewHandle::new(id, location))
    }

    fn release(&self, handle: PreviewHandle) {
        let Ok(path) = handle.location.to_file_path() else {
            warn!(id = %handle.id, "preview handle is not a file location");
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(id = %handle.id, "preview released"),
            Err(error) => {
                warn!(id = %handle.id, %error, "failed to remove preview file")
            }
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    live: HashSet<Uuid>,
    acquired: Vec<Uuid>,
    released: Vec<Uuid>,
}

/// Keeps previews as opaque `memory:` locations and records every
/// acquisition and release.
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    ledger: Mutex<Ledger>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.ledger.lock().live.len()
    }

    pub fn is_live(&self, id: Uuid) -> bool {
        self.ledger.lock().live.contains(&id)
    }

    pub fn acquired(&self) -> Vec<Uuid> {
        self.ledger.lock().acquired.clone()
    }

    pub fn released(&self) -> Vec<Uuid> {
        self.ledger.lock().released.clone()
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn acquire(&self, _image: &SelectedImage) -> Result<PreviewHandle, AssetError> {
        let id = Uuid::new_v4();
        let location = Url::parse(&format!("memory:preview/{id}"))
            .map_err(|_| AssetError::PreviewPath(PathBuf::from(id.to_string())))?;

        let mut ledger = self.ledger.lock();
        ledger.live.insert(id);
        ledger.acquired.push(id);
        Ok(PreviewHandle::new(id, location))
    }

    fn release(&self, handle: PreviewHandle) {
        let mut ledger = self.ledger.lock();
        if !ledger.live.remove(&handle.id) {
            warn!(id = %handle.id, "released a preview this store does not own");
        }
        ledger.released.push(handle.id);
    }
}
