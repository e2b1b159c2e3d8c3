//! QR preview controller
//!
//! The controller owns the theme, the encoded value, the logo asset and the
//! mounted preview instance, and turns surface events into re-renders or
//! downloads. Every handler takes `&mut self`, so two handlers never run
//! against the same controller at once.

use crate::blob::{Blob, BlobStore, ObjectUrl, SVG_MIME};
use crate::error::{Error, Result};
use crate::qr::{
    BackgroundOptions, CornerDotType, CornerSquareType, CornersDotOptions, CornersSquareOptions,
    DotType, DotsOptions, DrawType, ErrorCorrectionLevel, ExportFormat, ImageOptions, QrOptions,
    RenderEngine, StyleOptions,
};
use crate::surface::{DownloadLink, SelectedFile, Surface};
use crate::theme::Theme;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Value encoded while the URL field is empty
pub const FALLBACK_URL: &str = "https://shocky.in";

/// Side of the on-screen preview in logical units
pub const PREVIEW_SIZE: u32 = 360;

/// Export side used when the size selector is unset or unparseable
pub const DEFAULT_EXPORT_SIZE: u32 = 400;

/// Largest export side accepted from the size selector
pub const MAX_EXPORT_SIZE: u32 = 8192;

/// Notice shown when a non-SVG logo is selected
pub const INVALID_LOGO_NOTICE: &str = "Please select an SVG file.";

/// Summary of a completed download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    /// Requested format
    pub format: ExportFormat,
    /// File name handed to the surface
    pub filename: &'static str,
    /// Side of the square rendering
    pub size: u32,
    /// Encoded length in bytes
    pub bytes: usize,
}

/// Coordinates one surface and one render engine
pub struct PreviewController<E: RenderEngine, S: Surface> {
    engine: E,
    surface: S,
    blobs: BlobStore,
    default_export_size: u32,
    theme: Theme,
    encoded_value: String,
    logo: Option<ObjectUrl>,
    preview: Option<E::Handle>,
}

impl<E: RenderEngine, S: Surface> PreviewController<E, S> {
    /// Create an unmounted controller. `blobs` must be the store the engine
    /// resolves logo references through.
    pub fn new(engine: E, surface: S, blobs: BlobStore) -> Self {
        Self {
            engine,
            surface,
            blobs,
            default_export_size: DEFAULT_EXPORT_SIZE,
            theme: Theme::default(),
            encoded_value: FALLBACK_URL.to_string(),
            logo: None,
            preview: None,
        }
    }

    /// Override the export size used when the selector holds no usable value.
    pub fn with_default_export_size(mut self, size: u32) -> Self {
        self.default_export_size = size.clamp(1, MAX_EXPORT_SIZE);
        self
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Value currently encoded in the preview
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }

    /// Object URL of the active logo, if any
    pub fn logo_url(&self) -> Option<&str> {
        self.logo.as_ref().map(ObjectUrl::as_str)
    }

    /// Live preview instance, once mounted
    pub fn preview(&self) -> Option<&E::Handle> {
        self.preview.as_ref()
    }

    /// The surface driven by this controller
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, e.g. to change the size selector.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Fill the URL field with the fallback, mount the preview and apply the
    /// dark theme.
    pub fn initialize(&mut self) -> Result<()> {
        self.surface.set_url_input(FALLBACK_URL);
        self.encoded_value = FALLBACK_URL.to_string();

        let container = self.surface.preview_container();
        container.clear();
        let mut handle = self.engine.build(&self.style_options(PREVIEW_SIZE))?;
        self.engine.mount(&mut handle, &container)?;
        self.preview = Some(handle);
        info!(size = PREVIEW_SIZE, value = %self.encoded_value, "Mounted QR preview");

        self.set_theme(Theme::Dark)
    }

    /// Switch to the other theme and re-render the preview.
    pub fn toggle_theme(&mut self) -> Result<()> {
        self.set_theme(self.theme.toggled())
    }

    fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.surface.show_theme(theme.indicator());
        debug!(%theme, "Theme applied");
        self.render_preview()
    }

    /// Re-encode the preview with new input text. Empty text encodes the
    /// fallback URL.
    pub fn on_url_changed(&mut self, text: &str) -> Result<()> {
        self.encoded_value = if text.is_empty() {
            FALLBACK_URL.to_string()
        } else {
            text.to_string()
        };
        self.render_preview()
    }

    /// Accept an SVG logo, replace any previous one and re-render.
    ///
    /// Files not declaring `image/svg+xml` raise a single notice on the
    /// surface and leave every piece of state untouched. A logo that fails
    /// to render is discarded and the previous one is kept.
    pub async fn on_logo_selected(&mut self, file: SelectedFile) -> Result<()> {
        if file.content_type() != SVG_MIME {
            warn!(
                name = file.name(),
                content_type = file.content_type(),
                "Rejected logo"
            );
            self.surface.notify(INVALID_LOGO_NOTICE);
            return Err(Error::InvalidLogoFormat {
                content_type: file.content_type().to_string(),
            });
        }

        let bytes = file.read_bytes().await?;
        let url = self.blobs.create_object_url(Blob::new(bytes, SVG_MIME));

        // The candidate must render before it replaces the current logo.
        // On failure `url` drops here and the previous logo stays live.
        if let Some(handle) = self.preview.as_mut() {
            let options = Self::options_for(self.theme, &self.encoded_value, Some(url.as_str()));
            if let Err(err) = self.engine.restyle(handle, &options) {
                warn!(name = file.name(), error = %err, "Logo could not be rendered");
                return Err(err);
            }
        }
        info!(name = file.name(), %url, "Logo selected");

        // Dropping the previous guard revokes its URL.
        self.logo = Some(url);
        Ok(())
    }

    /// Render the current state at `PREVIEW_SIZE` into the mounted preview.
    fn render_preview(&mut self) -> Result<()> {
        let options = self.style_options(PREVIEW_SIZE);
        let Some(handle) = self.preview.as_mut() else {
            return Ok(());
        };
        self.engine.restyle(handle, &options)?;
        debug!(value = %options.data, "Preview re-rendered");
        Ok(())
    }

    /// Render the current state at the selected export size and hand the
    /// result to the surface as `qr.png` or `qr.svg`.
    ///
    /// Returns `None` when nothing has been mounted yet.
    pub async fn export(&mut self, format: ExportFormat) -> Result<Option<ExportReceipt>> {
        if self.preview.is_none() {
            return Ok(None);
        }

        let size = parse_export_size(
            self.surface.size_selection().as_deref(),
            self.default_export_size,
        );
        let handle = self.engine.build(&self.style_options(size))?;
        let bytes = self.engine.encode_bytes(&handle, format).await?;
        drop(handle);

        let len = bytes.len();
        let url = self.blobs.create_object_url(Blob::new(bytes, format.mime()));
        let link = DownloadLink {
            href: url.as_str(),
            filename: format.filename(),
        };
        self.surface.trigger_download(&link)?;
        info!(%format, size, bytes = len, filename = link.filename, "Export delivered");

        Ok(Some(ExportReceipt {
            format,
            filename: format.filename(),
            size,
            bytes: len,
        }))
    }

    /// Full styling configuration for the current state at `size`×`size`.
    pub fn style_options(&self, size: u32) -> StyleOptions {
        Self::options_for(self.theme, &self.encoded_value, self.logo_url()).with_size(size)
    }

    /// Preview-sized options for an explicit theme, value and logo.
    fn options_for(theme: Theme, value: &str, logo: Option<&str>) -> StyleOptions {
        let palette = theme.palette();
        StyleOptions {
            width: PREVIEW_SIZE,
            height: PREVIEW_SIZE,
            draw_type: DrawType::Svg,
            data: value.to_string(),
            image: logo.map(str::to_string),
            image_options: ImageOptions {
                hide_background_dots: true,
                image_size: 0.32,
                margin: 8,
                cross_origin: "anonymous".to_string(),
            },
            qr_options: QrOptions {
                error_correction_level: ErrorCorrectionLevel::H,
                margin: 0,
            },
            background_options: BackgroundOptions {
                color: "transparent".to_string(),
            },
            dots_options: DotsOptions {
                color: palette.dots.to_string(),
                kind: DotType::Dots,
            },
            corners_square_options: CornersSquareOptions {
                color: palette.corners.to_string(),
                kind: CornerSquareType::ExtraRounded,
            },
            corners_dot_options: CornersDotOptions {
                color: palette.corners.to_string(),
                kind: CornerDotType::Dot,
            },
        }
    }
}

/// Interpret the export size selector, falling back to `default` when the
/// value is missing, not a number, zero, or above [`MAX_EXPORT_SIZE`].
pub fn parse_export_size(selection: Option<&str>, default: u32) -> u32 {
    selection
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|size| (1..=MAX_EXPORT_SIZE).contains(size))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_size_parsing() {
        assert_eq!(parse_export_size(Some("512"), 400), 512);
        assert_eq!(parse_export_size(Some(" 256 "), 400), 256);
        assert_eq!(parse_export_size(None, 400), 400);
        assert_eq!(parse_export_size(Some(""), 400), 400);
        assert_eq!(parse_export_size(Some("large"), 400), 400);
        assert_eq!(parse_export_size(Some("0"), 400), 400);
        assert_eq!(parse_export_size(Some("-5"), 400), 400);
        assert_eq!(parse_export_size(Some("100000"), 400), 400);
    }
}
