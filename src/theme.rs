//! Light/dark QR themes and their fixed palettes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Colour theme applied to the rendered symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark modules on a light page
    Light,
    /// Light modules on a dark page
    #[default]
    Dark,
}

/// Dot and corner colours for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Colour of the data modules
    pub dots: &'static str,
    /// Colour of the finder-pattern squares and their centre dots
    pub corners: &'static str,
}

const LIGHT_PALETTE: Palette = Palette {
    dots: "#141413",
    corners: "#cf4500",
};

const DARK_PALETTE: Palette = Palette {
    dots: "#ffffff",
    corners: "#F37338",
};

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Fixed palette for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => LIGHT_PALETTE,
            Self::Dark => DARK_PALETTE,
        }
    }

    /// Lowercase identifier used for the outline mode attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Toggle control state for this theme.
    ///
    /// The label names the theme a click would switch to, so it reads as an
    /// action rather than a state.
    pub fn indicator(self) -> ThemeIndicator {
        let pressed = self == Self::Light;
        ThemeIndicator {
            pressed,
            label: if pressed { "Dark QR" } else { "Light QR" },
            mode: self.as_str(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!(
                "Unsupported theme '{other}', expected 'light' or 'dark'"
            )),
        }
    }
}

/// Visual state of the theme toggle and preview outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeIndicator {
    /// Toggle pressed state (`true` while the light theme is active)
    pub pressed: bool,
    /// Toggle label
    pub label: &'static str,
    /// Outline mode attribute value
    pub mode: &'static str,
}
