use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;

use super::AssetError;

/// A locally chosen image file, held in memory until it is uploaded.
#[derive(Clone)]
pub struct SelectedImage {
    file_name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl SelectedImage {
    /// Wrap bytes with an explicit MIME type. Only `image/*` is accepted.
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, AssetError> {
        let file_name = file_name.into();
        let mime = mime.into();
        if !mime.starts_with("image/") {
            return Err(AssetError::NotAnImage { file_name });
        }
        Ok(Self {
            file_name,
            mime,
            bytes: bytes.into(),
        })
    }

    /// Wrap bytes, deriving the MIME type from the file extension or,
    /// failing that, from the leading magic bytes.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, AssetError> {
        let file_name = file_name.into();
        let bytes = bytes.into();
        let format = ImageFormat::from_path(&file_name)
            .or_else(|_| image::guess_format(&bytes))
            .map_err(|_| AssetError::NotAnImage {
                file_name: file_name.clone(),
            })?;
        Self::new(file_name, format.to_mime_type(), bytes)
    }

    /// Read an image from disk.
    ///
    /// The size is checked from file metadata first, so an oversized file
    /// is rejected without being read.
    pub fn open(path: &Path, max_bytes: u64) -> Result<Self, AssetError> {
        let io_err = |source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > max_bytes {
            return Err(AssetError::FileTooLarge {
                size,
                limit: max_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(io_err)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self::from_bytes(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Preferred file extension for this image's format.
    pub fn extension(&self) -> &'static str {
        ImageFormat::from_mime_type(&self.mime)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("img")
    }
}
