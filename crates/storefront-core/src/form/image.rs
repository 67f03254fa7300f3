// ── Product images ──
//
// A form's image is either the product's existing remote URL or a local
// file staged for upload. Staged files are previewed through handles
// registered in a `PreviewRegistry`; dropping a handle releases it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dashmap::DashMap;
use tracing::trace;

use crate::error::{CoreError, FormField, ValidationErrors};

/// File extensions the image picker accepts.
pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg"];

fn unsupported(path: &Path) -> CoreError {
    CoreError::Validation(ValidationErrors::single(
        FormField::Image,
        format!(
            "Unsupported image type for {}; expected one of: {}",
            path.display(),
            ACCEPTED_IMAGE_EXTENSIONS.join(", ")
        ),
    ))
}

fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// A local image file awaiting upload.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedImage {
    path: PathBuf,
    media_type: &'static str,
    bytes: Arc<[u8]>,
}

impl StagedImage {
    /// Stage already-read bytes. The media type comes from `path`'s
    /// extension, which must be one of [`ACCEPTED_IMAGE_EXTENSIONS`].
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, CoreError> {
        let path = path.into();
        let media_type = media_type_for(&path).ok_or_else(|| unsupported(&path))?;
        Ok(Self {
            path,
            media_type,
            bytes: bytes.into(),
        })
    }

    /// Read and stage the file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        // Check the extension before touching the file.
        if media_type_for(path).is_none() {
            return Err(unsupported(path));
        }
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            CoreError::Validation(ValidationErrors::single(
                FormField::Image,
                format!("Cannot read {}: {e}", path.display()),
            ))
        })?;
        Self::from_bytes(path, bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URI carrying the file as base64.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for StagedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedImage")
            .field("path", &self.path)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The image a form will submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// The product's existing image.
    Remote(String),
    Staged(StagedImage),
}

impl ImageRef {
    /// The string sent to the API for this image.
    pub fn to_submission(&self) -> String {
        match self {
            ImageRef::Remote(url) => url.clone(),
            ImageRef::Staged(image) => image.to_data_uri(),
        }
    }
}

// ── Previews ─────────────────────────────────────────────────────────

/// Tracks live preview handles for staged images.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<DashMap<u64, PathBuf>>,
    next_id: Arc<AtomicU64>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `image`.
    pub fn open(&self, image: &StagedImage) -> PreviewHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.insert(id, image.path().to_path_buf());
        trace!(id, path = %image.path().display(), "preview opened");
        PreviewHandle {
            id,
            live: Arc::clone(&self.live),
        }
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// A revocable preview of a staged image. Released on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    live: Arc<DashMap<u64, PathBuf>>,
}

impl PreviewHandle {
    /// Local reference for display, e.g. `preview:3`.
    pub fn uri(&self) -> String {
        format!("preview:{}", self.id)
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.live.get(&self.id).map(|entry| entry.value().clone())
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.live.remove(&self.id);
        trace!(id = self.id, "preview released");
    }
}

/// What a form displays as its image preview.
#[derive(Debug)]
pub enum ImagePreview {
    Remote(String),
    Local(PreviewHandle),
}

impl ImagePreview {
    pub fn location(&self) -> String {
        match self {
            ImagePreview::Remote(url) => url.clone(),
            ImagePreview::Local(handle) => handle
                .path()
                .map_or_else(|| handle.uri(), |p| p.display().to_string()),
        }
    }
}
