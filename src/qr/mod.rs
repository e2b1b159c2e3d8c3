//! Styled QR code rendering
//!
//! The controller talks to renderers only through [`RenderEngine`], so any
//! QR library able to build, mount, restyle and encode a symbol can back it.
//! [`StyledEngine`] is the bundled implementation: `qrcode` for the module
//! matrix, hand-written SVG for the styling, and `resvg` for rasterization.

mod layout;
mod options;
mod styled;
mod svg;

pub use options::{
    BackgroundOptions, CornerDotType, CornerSquareType, CornersDotOptions, CornersSquareOptions,
    DotType, DotsOptions, DrawType, ErrorCorrectionLevel, ImageOptions, QrOptions, StyleOptions,
};
pub use styled::{StyledEngine, StyledHandle};

use crate::blob::{PNG_MIME, SVG_MIME};
use crate::error::Result;
use crate::surface::PreviewSlot;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering capability the preview controller is written against
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Live render instance
    type Handle: Send + Sync;

    /// Create a render instance from a full configuration.
    fn build(&self, options: &StyleOptions) -> Result<Self::Handle>;

    /// Attach an instance to a container and draw into it.
    fn mount(&self, handle: &mut Self::Handle, target: &PreviewSlot) -> Result<()>;

    /// Update style and data in place. Dimensions fixed at build time are kept.
    fn restyle(&self, handle: &mut Self::Handle, options: &StyleOptions) -> Result<()>;

    /// Encode the instance's current rendering in the requested format.
    async fn encode_bytes(&self, handle: &Self::Handle, format: ExportFormat) -> Result<Bytes>;
}

/// Download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image
    Raster,
    /// SVG document
    Vector,
}

impl ExportFormat {
    /// Fixed download file name
    pub fn filename(self) -> &'static str {
        match self {
            Self::Raster => "qr.png",
            Self::Vector => "qr.svg",
        }
    }

    /// MIME type of the encoded bytes
    pub fn mime(self) -> &'static str {
        match self {
            Self::Raster => PNG_MIME,
            Self::Vector => SVG_MIME,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raster => "png",
            Self::Vector => "svg",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "png" | "raster" => Ok(Self::Raster),
            "svg" | "vector" => Ok(Self::Vector),
            other => Err(format!(
                "Unsupported export format '{other}', expected 'png' or 'svg'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_fixed() {
        assert_eq!(ExportFormat::Raster.filename(), "qr.png");
        assert_eq!(ExportFormat::Vector.filename(), "qr.svg");
    }

    #[test]
    fn parses_format_aliases() {
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Raster));
        assert_eq!("vector".parse::<ExportFormat>(), Ok(ExportFormat::Vector));
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
