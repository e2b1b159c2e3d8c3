//! Render the default URL in both themes and save PNG + SVG for each
//!
//! Usage: cargo run --example render_themes

use qrforge::{BlobStore, DirectorySurface, ExportFormat, PreviewController, StyledEngine, Theme};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    for theme in [Theme::Dark, Theme::Light] {
        let blobs = BlobStore::new();
        let engine = StyledEngine::new(blobs.clone());
        let surface = DirectorySurface::new(format!("qr_{theme}"), blobs.clone());

        let mut controller = PreviewController::new(engine, surface, blobs);
        controller.initialize()?;
        if controller.theme() != theme {
            controller.toggle_theme()?;
        }

        for format in [ExportFormat::Raster, ExportFormat::Vector] {
            if let Some(receipt) = controller.export(format).await? {
                println!(
                    "✓ {theme}: qr_{theme}/{} ({} bytes)",
                    receipt.filename, receipt.bytes
                );
            }
        }
    }

    Ok(())
}
