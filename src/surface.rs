//! The host surface the controller drives
//!
//! A surface owns everything the user sees and touches: the URL field, the
//! export size selector, the preview container, the theme toggle and the
//! download mechanism. [`crate::output::DirectorySurface`] is the filesystem
//! implementation used by the CLI.

use crate::blob::SVG_MIME;
use crate::error::Result;
use crate::theme::ThemeIndicator;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Host-side inputs and outputs of the preview controller
pub trait Surface {
    /// Overwrite the URL input field.
    fn set_url_input(&mut self, value: &str);

    /// Raw value of the export size selector, if one is set.
    fn size_selection(&self) -> Option<String>;

    /// Container the preview is mounted into.
    fn preview_container(&self) -> PreviewSlot;

    /// Reflect the current theme on the toggle control and preview outline.
    fn show_theme(&mut self, indicator: ThemeIndicator);

    /// Show a blocking notice to the user.
    fn notify(&mut self, message: &str);

    /// Save the resource behind a transient download link.
    fn trigger_download(&mut self, link: &DownloadLink<'_>) -> Result<()>;
}

/// Mount point holding the markup of the mounted preview
#[derive(Debug, Clone, Default)]
pub struct PreviewSlot {
    markup: Arc<Mutex<Option<String>>>,
}

impl PreviewSlot {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the container contents.
    pub fn replace(&self, markup: String) {
        *self.lock() = Some(markup);
    }

    /// Empty the container.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Current contents, if anything is mounted
    pub fn markup(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.markup.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Transient anchor used to hand a download to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLink<'a> {
    /// Object URL of the content
    pub href: &'a str,
    /// Suggested file name
    pub filename: &'static str,
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Memory(Bytes),
    Path(PathBuf),
}

impl SelectedFile {
    /// A file whose contents are already in memory
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// A file on disk; the content type is declared from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            content_type: content_type_for(path).to_string(),
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// File name without directories
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Read the full file contents.
    pub async fn read_bytes(&self) -> Result<Bytes> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }
}

/// Content type a browser would declare for a file name.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
        .as_str()
    {
        "svg" => SVG_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("logo.SVG")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(
            content_type_for(Path::new("logo")),
            "application/octet-stream"
        );
    }

    #[test]
    fn preview_slot_is_shared_between_clones() {
        let slot = PreviewSlot::new();
        let mounted = slot.clone();
        mounted.replace("<svg/>".to_string());
        assert_eq!(slot.markup().as_deref(), Some("<svg/>"));
        slot.clear();
        assert!(mounted.markup().is_none());
    }

    #[tokio::test]
    async fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.svg");
        std::fs::write(&path, b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        let file = SelectedFile::from_path(&path);
        assert_eq!(file.name(), "mark.svg");
        assert_eq!(file.content_type(), SVG_MIME);
        assert!(file.read_bytes().await.unwrap().starts_with(b"<svg"));
    }
}
