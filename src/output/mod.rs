//! Filesystem-backed surface used by the command-line host

use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::surface::{DownloadLink, PreviewSlot, Surface};
use crate::theme::ThemeIndicator;
use std::path::{Path, PathBuf};

/// Surface that saves downloads into a directory and keeps everything else
/// in memory
#[derive(Debug)]
pub struct DirectorySurface {
    output_dir: PathBuf,
    blobs: BlobStore,
    url_input: String,
    size_selection: Option<String>,
    preview: PreviewSlot,
    indicator: Option<ThemeIndicator>,
    notices: Vec<String>,
    saved: Vec<PathBuf>,
}

impl DirectorySurface {
    /// Create a surface saving into `output_dir`, resolving download links
    /// through `blobs`.
    pub fn new(output_dir: impl Into<PathBuf>, blobs: BlobStore) -> Self {
        Self {
            output_dir: output_dir.into(),
            blobs,
            url_input: String::new(),
            size_selection: None,
            preview: PreviewSlot::new(),
            indicator: None,
            notices: Vec::new(),
            saved: Vec::new(),
        }
    }

    /// Set the export size selector value.
    pub fn select_size(&mut self, value: Option<String>) {
        self.size_selection = value;
    }

    /// Current URL field contents
    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    /// Last theme state shown
    pub fn indicator(&self) -> Option<ThemeIndicator> {
        self.indicator
    }

    /// Notices shown so far
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Paths written so far
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Directory downloads land in
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the mounted preview markup to `path`.
    pub fn write_preview(&self, path: &Path) -> Result<()> {
        let markup = self
            .preview
            .markup()
            .ok_or_else(|| Error::Other("Nothing is mounted in the preview".to_string()))?;
        std::fs::write(path, markup).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write preview {}: {e}", path.display()),
            ))
        })
    }
}

impl Surface for DirectorySurface {
    fn set_url_input(&mut self, value: &str) {
        self.url_input = value.to_string();
    }

    fn size_selection(&self) -> Option<String> {
        self.size_selection.clone()
    }

    fn preview_container(&self) -> PreviewSlot {
        self.preview.clone()
    }

    fn show_theme(&mut self, indicator: ThemeIndicator) {
        tracing::debug!(
            pressed = indicator.pressed,
            label = indicator.label,
            mode = indicator.mode,
            "Theme toggle updated"
        );
        self.indicator = Some(indicator);
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
        self.notices.push(message.to_string());
    }

    fn trigger_download(&mut self, link: &DownloadLink<'_>) -> Result<()> {
        let blob = self
            .blobs
            .resolve(link.href)
            .ok_or_else(|| Error::Download(format!("{} does not resolve", link.href)))?;

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::Download(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let path = self.output_dir.join(link.filename);
        std::fs::write(&path, blob.bytes())
            .map_err(|e| Error::Download(format!("Failed to write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), bytes = blob.len(), "Saved download");
        self.saved.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{Blob, PNG_MIME};

    #[test]
    fn download_writes_resolved_blob() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let mut surface = DirectorySurface::new(dir.path().join("out"), blobs.clone());

        let url = blobs.create_object_url(Blob::new(&b"\x89PNG"[..], PNG_MIME));
        surface
            .trigger_download(&DownloadLink {
                href: url.as_str(),
                filename: "qr.png",
            })
            .unwrap();

        let written = std::fs::read(dir.path().join("out").join("qr.png")).unwrap();
        assert_eq!(written, b"\x89PNG");
        assert_eq!(surface.saved().len(), 1);
    }

    #[test]
    fn revoked_link_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let mut surface = DirectorySurface::new(dir.path(), blobs);

        let result = surface.trigger_download(&DownloadLink {
            href: "blob:qrforge/missing",
            filename: "qr.svg",
        });
        assert!(matches!(result, Err(Error::Download(_))));
        assert!(surface.saved().is_empty());
    }
}
