//! Bundled render engine producing styled SVG and PNG output

use super::svg::{EmbeddedLogo, render_document};
use super::{ExportFormat, RenderEngine, StyleOptions};
use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::surface::PreviewSlot;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::io::Cursor;

/// Render engine backed by `qrcode` and `resvg`
///
/// Logo references in [`StyleOptions::image`] are resolved through the
/// engine's [`BlobStore`], the same way a browser resolves `blob:` URLs.
#[derive(Debug, Clone)]
pub struct StyledEngine {
    blobs: BlobStore,
}

/// Render instance of a [`StyledEngine`]
#[derive(Debug)]
pub struct StyledHandle {
    options: StyleOptions,
    document: String,
    mount: Option<PreviewSlot>,
}

impl StyledHandle {
    /// Options the instance currently renders
    pub fn options(&self) -> &StyleOptions {
        &self.options
    }

    /// Current SVG markup
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl StyledEngine {
    /// Create an engine resolving logos through `blobs`
    pub fn new(blobs: BlobStore) -> Self {
        Self { blobs }
    }

    fn render(&self, options: &StyleOptions) -> Result<String> {
        let logo = match options.image.as_deref() {
            Some(url) => Some(self.load_logo(url)?),
            None => None,
        };
        render_document(options, logo.as_ref())
    }

    fn load_logo(&self, url: &str) -> Result<EmbeddedLogo> {
        let blob = self
            .blobs
            .resolve(url)
            .ok_or_else(|| Error::LogoUnavailable(format!("{url} is not a live object URL")))?;

        let tree = usvg::Tree::from_data(blob.bytes(), &usvg::Options::default())?;
        let size = tree.size();
        let aspect = f64::from(size.height()) / f64::from(size.width());

        Ok(EmbeddedLogo {
            data_uri: format!("data:{};base64,{}", blob.mime(), STANDARD.encode(blob.bytes())),
            aspect,
        })
    }
}

#[async_trait]
impl RenderEngine for StyledEngine {
    type Handle = StyledHandle;

    fn build(&self, options: &StyleOptions) -> Result<StyledHandle> {
        let document = self.render(options)?;
        tracing::debug!(
            width = options.width,
            height = options.height,
            bytes = document.len(),
            "Built QR render instance"
        );
        Ok(StyledHandle {
            options: options.clone(),
            document,
            mount: None,
        })
    }

    fn mount(&self, handle: &mut StyledHandle, target: &PreviewSlot) -> Result<()> {
        target.replace(handle.document.clone());
        handle.mount = Some(target.clone());
        Ok(())
    }

    fn restyle(&self, handle: &mut StyledHandle, options: &StyleOptions) -> Result<()> {
        let options = StyleOptions {
            width: handle.options.width,
            height: handle.options.height,
            ..options.clone()
        };
        handle.document = self.render(&options)?;
        handle.options = options;

        if let Some(slot) = &handle.mount {
            slot.replace(handle.document.clone());
        }
        Ok(())
    }

    async fn encode_bytes(&self, handle: &StyledHandle, format: ExportFormat) -> Result<Bytes> {
        match format {
            ExportFormat::Vector => Ok(Bytes::from(handle.document.clone())),
            ExportFormat::Raster => {
                let document = handle.document.clone();
                let (width, height) = (handle.options.width, handle.options.height);
                tokio::task::spawn_blocking(move || rasterize(&document, width, height))
                    .await
                    .map_err(|e| Error::Other(format!("Rasterization task failed: {e}")))?
            }
        }
    }
}

/// Rasterize an SVG document into PNG bytes.
fn rasterize(document: &str, width: u32, height: u32) -> Result<Bytes> {
    let tree = usvg::Tree::from_str(document, &usvg::Options::default())?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("Cannot allocate a {width}x{height} pixmap")))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| Error::Image("Pixel buffer does not match dimensions".to_string()))?;

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(Bytes::from(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{Blob, SVG_MIME};
    use crate::qr::{
        BackgroundOptions, CornerDotType, CornerSquareType, CornersDotOptions,
        CornersSquareOptions, DotType, DotsOptions, DrawType, ImageOptions, QrOptions,
    };

    const LOGO: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="red"/></svg>"#;

    fn options(data: &str, size: u32) -> StyleOptions {
        StyleOptions {
            width: size,
            height: size,
            draw_type: DrawType::Svg,
            data: data.to_string(),
            image: None,
            image_options: ImageOptions::default(),
            qr_options: QrOptions::default(),
            background_options: BackgroundOptions::default(),
            dots_options: DotsOptions {
                color: "#ffffff".to_string(),
                kind: DotType::Dots,
            },
            corners_square_options: CornersSquareOptions {
                color: "#F37338".to_string(),
                kind: CornerSquareType::ExtraRounded,
            },
            corners_dot_options: CornersDotOptions {
                color: "#F37338".to_string(),
                kind: CornerDotType::Dot,
            },
        }
    }

    #[test]
    fn restyle_keeps_dimensions_and_refreshes_mount() {
        let engine = StyledEngine::new(BlobStore::new());
        let slot = PreviewSlot::new();
        let mut handle = engine.build(&options("first", 360)).unwrap();
        engine.mount(&mut handle, &slot).unwrap();
        let before = slot.markup().unwrap();

        engine.restyle(&mut handle, &options("second", 512)).unwrap();

        assert_eq!((handle.options().width, handle.options().height), (360, 360));
        assert_eq!(handle.options().data, "second");
        let after = slot.markup().unwrap();
        assert_ne!(before, after);
        assert!(after.contains(r#"width="360""#));
    }

    #[test]
    fn logo_is_embedded_as_data_uri() {
        let blobs = BlobStore::new();
        let url = blobs.create_object_url(Blob::new(LOGO, SVG_MIME));
        let engine = StyledEngine::new(blobs);

        let mut opts = options("https://shocky.in", 360);
        opts.image = Some(url.as_str().to_string());
        let handle = engine.build(&opts).unwrap();

        assert!(handle.document().contains("data:image/svg+xml;base64,"));
        assert!(!handle.document().contains("blob:"));
    }

    #[test]
    fn revoked_logo_is_unavailable() {
        let blobs = BlobStore::new();
        let url = blobs.create_object_url(Blob::new(LOGO, SVG_MIME));
        let key = url.as_str().to_string();
        drop(url);

        let engine = StyledEngine::new(blobs);
        let mut opts = options("https://shocky.in", 360);
        opts.image = Some(key);
        assert!(matches!(engine.build(&opts), Err(Error::LogoUnavailable(_))));
    }

    #[tokio::test]
    async fn raster_output_is_png_of_requested_size() {
        let engine = StyledEngine::new(BlobStore::new());
        let handle = engine.build(&options("https://example.com", 256)).unwrap();

        let png = engine.encode_bytes(&handle, ExportFormat::Raster).await.unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (256, 256));

        // Transparent background outside the module grid.
        let rgba = decoded.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
    }

    #[tokio::test]
    async fn vector_output_is_current_document() {
        let engine = StyledEngine::new(BlobStore::new());
        let handle = engine.build(&options("https://example.com", 400)).unwrap();

        let svg = engine.encode_bytes(&handle, ExportFormat::Vector).await.unwrap();
        assert_eq!(svg.as_ref(), handle.document().as_bytes());
    }
}
