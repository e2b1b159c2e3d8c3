//! qrforge - themed QR code generator with SVG logo embedding
//!
//! This library renders styled QR codes (circular dots, rounded finder
//! patterns, light/dark palettes) with an optional SVG logo composited at the
//! centre, and exports them as PNG or SVG at any square size.
//!
//! # Features
//!
//! - **Preview controller**: one object owning theme, encoded value, logo and
//!   the live preview, driven by input events
//! - **Pluggable rendering**: the controller only sees the [`RenderEngine`] trait
//! - **Bundled engine**: `qrcode` for the symbol, `resvg` for rasterization
//! - **Scoped resources**: object URLs are revoked as soon as their owner drops
//!
//! # Example
//!
//! ```no_run
//! use qrforge::{BlobStore, DirectorySurface, ExportFormat, PreviewController, StyledEngine};
//!
//! #[tokio::main]
//! async fn main() -> qrforge::Result<()> {
//!     let blobs = BlobStore::new();
//!     let engine = StyledEngine::new(blobs.clone());
//!     let surface = DirectorySurface::new("out", blobs.clone());
//!
//!     let mut controller = PreviewController::new(engine, surface, blobs);
//!     controller.initialize()?;
//!     controller.on_url_changed("https://example.com")?;
//!     controller.export(ExportFormat::Raster).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod blob;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;
pub mod surface;
pub mod theme;

// Re-exports for convenience
pub use error::{Error, Result};

pub use blob::{Blob, BlobStore, ObjectUrl};
pub use config::{ExportOptions, LogRotation, LoggingOptions, QrforgeConfig};
pub use controller::{ExportReceipt, FALLBACK_URL, PREVIEW_SIZE, PreviewController};
pub use output::DirectorySurface;
pub use qr::{ExportFormat, RenderEngine, StyleOptions, StyledEngine, StyledHandle};
pub use surface::{DownloadLink, PreviewSlot, SelectedFile, Surface};
pub use theme::{Palette, Theme, ThemeIndicator};
