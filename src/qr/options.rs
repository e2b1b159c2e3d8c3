//! Styling configuration handed to a render engine

use serde::{Deserialize, Serialize};

/// Full styling configuration for one rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    /// Output width in logical units
    pub width: u32,
    /// Output height in logical units
    pub height: u32,
    /// Native drawing type of the engine
    #[serde(rename = "type")]
    pub draw_type: DrawType,
    /// Text to encode
    pub data: String,
    /// Object URL of the logo to composite, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Logo placement
    pub image_options: ImageOptions,
    /// Symbol encoding parameters
    pub qr_options: QrOptions,
    /// Background fill
    pub background_options: BackgroundOptions,
    /// Data module style
    pub dots_options: DotsOptions,
    /// Finder-pattern ring style
    pub corners_square_options: CornersSquareOptions,
    /// Finder-pattern centre style
    pub corners_dot_options: CornersDotOptions,
}

impl StyleOptions {
    /// Same styling at a different square size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.width = size;
        self.height = size;
        self
    }
}

/// Native drawing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawType {
    /// Vector drawing
    #[default]
    Svg,
}

/// Logo overlay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    /// Suppress data modules beneath the logo
    pub hide_background_dots: bool,
    /// Fraction of the symbol's module area the logo may cover
    pub image_size: f64,
    /// Inset between the cleared area and the logo, in logical units
    pub margin: u32,
    /// Cross-origin mode used when fetching the logo
    pub cross_origin: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: 0.32,
            margin: 8,
            cross_origin: "anonymous".to_string(),
        }
    }
}

/// Error-correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    #[default]
    H,
}

impl From<ErrorCorrectionLevel> for qrcode::EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::L => qrcode::EcLevel::L,
            ErrorCorrectionLevel::M => qrcode::EcLevel::M,
            ErrorCorrectionLevel::Q => qrcode::EcLevel::Q,
            ErrorCorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Symbol encoding parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    /// Error-correction level
    pub error_correction_level: ErrorCorrectionLevel,
    /// Quiet zone around the whole symbol, in logical units
    pub margin: u32,
}

/// Background fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    /// CSS colour, or `transparent` for none
    pub color: String,
}

impl BackgroundOptions {
    /// Whether no background should be painted
    pub fn is_transparent(&self) -> bool {
        self.color.eq_ignore_ascii_case("transparent")
    }
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            color: "transparent".to_string(),
        }
    }
}

/// Shape of individual data modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    /// Discrete circles
    #[default]
    Dots,
    /// Plain squares
    Square,
}

/// Data module style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotsOptions {
    /// Fill colour
    pub color: String,
    /// Module shape
    #[serde(rename = "type")]
    pub kind: DotType,
}

/// Shape of the finder-pattern ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    /// Ring with generously rounded corners
    #[default]
    ExtraRounded,
    /// Square ring
    Square,
}

/// Finder-pattern ring style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    /// Fill colour
    pub color: String,
    /// Ring shape
    #[serde(rename = "type")]
    pub kind: CornerSquareType,
}

/// Shape of the finder-pattern centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    /// Circle
    #[default]
    Dot,
    /// Square
    Square,
}

/// Finder-pattern centre style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornersDotOptions {
    /// Fill colour
    pub color: String,
    /// Centre shape
    #[serde(rename = "type")]
    pub kind: CornerDotType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StyleOptions {
        StyleOptions {
            width: 360,
            height: 360,
            draw_type: DrawType::Svg,
            data: "https://shocky.in".to_string(),
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
    fn serializes_engine_option_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], json!("svg"));
        assert_eq!(value["qrOptions"]["errorCorrectionLevel"], json!("H"));
        assert_eq!(value["qrOptions"]["margin"], json!(0));
        assert_eq!(value["imageOptions"]["imageSize"], json!(0.32));
        assert_eq!(value["imageOptions"]["hideBackgroundDots"], json!(true));
        assert_eq!(value["dotsOptions"]["type"], json!("dots"));
        assert_eq!(value["cornersSquareOptions"]["type"], json!("extra-rounded"));
        assert_eq!(value["cornersDotOptions"]["type"], json!("dot"));
        assert_eq!(value["backgroundOptions"]["color"], json!("transparent"));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn with_size_keeps_styling() {
        let resized = sample().with_size(512);
        assert_eq!((resized.width, resized.height), (512, 512));
        assert_eq!(resized.data, "https://shocky.in");
    }
}
