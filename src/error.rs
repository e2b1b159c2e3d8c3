//! Error types for qrforge operations

use thiserror::Error;

/// Result type alias using qrforge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Selected logo file does not declare an SVG content type
    #[error("Invalid logo format '{content_type}': expected image/svg+xml")]
    InvalidLogoFormat {
        /// The content type the file declared
        content_type: String,
    },

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// SVG parsing or rasterization failed
    #[error("SVG error: {0}")]
    Svg(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// A logo reference could not be resolved at render time
    #[error("Logo unavailable: {0}")]
    LogoUnavailable(String),

    /// Download could not be delivered by the surface
    #[error("Download failed: {0}")]
    Download(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

// Implement From conversions for common error types

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}

impl From<resvg::usvg::Error> for Error {
    fn from(e: resvg::usvg::Error) -> Self {
        Error::Svg(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_logo_format_names_declared_type() {
        let err = Error::InvalidLogoFormat {
            content_type: "image/png".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid logo format 'image/png': expected image/svg+xml"
        );
    }
}
