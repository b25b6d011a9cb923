//! Time bar configuration and its option vocabularies

use crate::{DurationTemplate, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Smallest font size accepted, in pixels
pub const MIN_FONT_SIZE: u32 = 5;

/// Placement of the time bar assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Location {
    #[default]
    UpperRight,
    LowerRight,
    LowerLeft,
    UpperLeft,
    /// Top-left corner of the current selection
    AtSelection,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::UpperRight,
        Location::LowerRight,
        Location::LowerLeft,
        Location::UpperLeft,
        Location::AtSelection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Location::UpperRight => "Upper Right",
            Location::LowerRight => "Lower Right",
            Location::LowerLeft => "Lower Left",
            Location::UpperLeft => "Upper Left",
            Location::AtSelection => "At Selection",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Location::UpperRight => "upper-right",
            Location::LowerRight => "lower-right",
            Location::LowerLeft => "lower-left",
            Location::UpperLeft => "upper-left",
            Location::AtSelection => "at-selection",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Location::ALL
            .into_iter()
            .find(|l| l.label() == s || l.token() == s)
            .ok_or_else(|| Error::UnknownOption {
                kind: "location",
                value: s.to_string(),
            })
    }
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Palette offered for the bar, text and background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NamedColor {
    Black,
    Blue,
    LightGray,
    Gray,
    DarkGray,
    Green,
    Red,
    White,
    Yellow,
}

impl NamedColor {
    pub const ALL: [NamedColor; 9] = [
        NamedColor::Black,
        NamedColor::Blue,
        NamedColor::LightGray,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Green,
        NamedColor::Red,
        NamedColor::White,
        NamedColor::Yellow,
    ];

    pub fn rgb(self) -> Rgb {
        match self {
            NamedColor::Black => Rgb(0, 0, 0),
            NamedColor::Blue => Rgb(0, 0, 255),
            NamedColor::LightGray => Rgb(192, 192, 192),
            NamedColor::Gray => Rgb(128, 128, 128),
            NamedColor::DarkGray => Rgb(64, 64, 64),
            NamedColor::Green => Rgb(0, 255, 0),
            NamedColor::Red => Rgb(255, 0, 0),
            NamedColor::White => Rgb(255, 255, 255),
            NamedColor::Yellow => Rgb(255, 255, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NamedColor::Black => "Black",
            NamedColor::Blue => "Blue",
            NamedColor::LightGray => "Light Gray",
            NamedColor::Gray => "Gray",
            NamedColor::DarkGray => "Dark Gray",
            NamedColor::Green => "Green",
            NamedColor::Red => "Red",
            NamedColor::White => "White",
            NamedColor::Yellow => "Yellow",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::Blue => "blue",
            NamedColor::LightGray => "light-gray",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark-gray",
            NamedColor::Green => "green",
            NamedColor::Red => "red",
            NamedColor::White => "white",
            NamedColor::Yellow => "yellow",
        }
    }

    /// Parses a color where "none" means no color at all
    pub fn parse_optional(s: &str) -> Result<Option<Self>> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NamedColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NamedColor::ALL
            .into_iter()
            .find(|c| c.label() == s || c.token() == s)
            .ok_or_else(|| Error::UnknownOption {
                kind: "color",
                value: s.to_string(),
            })
    }
}

/// Typeface family of the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFamily {
    SansSerif,
    Serif,
}

impl FontFamily {
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::SansSerif => "SansSerif",
            FontFamily::Serif => "Serif",
        }
    }
}

/// Font handed to the text measurement and rendering services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSpec {
    pub family: FontFamily,
    pub size_px: u32,
    pub bold: bool,
    pub italic: bool,
}

/// Time bar configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Configuration {
    /// Bar thickness in pixels
    pub bar_thickness: u32,
    /// Label font size in pixels, never below [`MIN_FONT_SIZE`]
    pub font_size: u32,
    /// Bar and text color; `None` suppresses the bar
    pub bar_color: Option<NamedColor>,
    /// Background plate color; `None` draws no plate
    pub background_color: Option<NamedColor>,
    pub location: Location,
    pub duration_template: DurationTemplate,
    /// Append d/h/m/s unit letters to the label
    pub show_units: bool,
    pub bold_text: bool,
    pub serif_font: bool,
    pub hide_bar: bool,
    /// Draw as a removable overlay instead of into the pixels
    pub use_overlay: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bar_thickness: 4,
            font_size: 14,
            bar_color: Some(NamedColor::White),
            background_color: None,
            location: Location::UpperRight,
            duration_template: DurationTemplate::DaysToMillis,
            show_units: true,
            bold_text: true,
            serif_font: false,
            hide_bar: false,
            use_overlay: true,
        }
    }
}

impl Configuration {
    /// Returns the configuration with out-of-range values clamped
    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.max(MIN_FONT_SIZE);
        self
    }

    /// Sets the font size, clamped to [`MIN_FONT_SIZE`]
    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.max(MIN_FONT_SIZE);
    }

    /// Font size actually used for layout
    pub fn font_size_px(&self) -> u32 {
        self.font_size.max(MIN_FONT_SIZE)
    }

    /// Bar thickness contributing to the box, zero when the bar is hidden
    pub fn effective_bar_thickness(&self) -> u32 {
        if self.hide_bar {
            0
        } else {
            self.bar_thickness
        }
    }

    pub fn font(&self) -> FontSpec {
        FontSpec {
            family: if self.serif_font {
                FontFamily::Serif
            } else {
                FontFamily::SansSerif
            },
            size_px: self.font_size_px(),
            bold: self.bold_text,
            italic: false,
        }
    }

    /// Text is drawn in the bar color, or white when the bar has none
    pub fn text_color(&self) -> NamedColor {
        self.bar_color.unwrap_or(NamedColor::White)
    }

    pub fn has_background(&self) -> bool {
        self.background_color.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.bar_thickness, 4);
        assert_eq!(config.font_size, 14);
        assert_eq!(config.location, Location::UpperRight);
        assert_eq!(config.duration_template, DurationTemplate::DaysToMillis);
        assert!(config.show_units);
        assert!(config.bold_text);
        assert!(!config.serif_font);
        assert!(!config.has_background());
    }

    #[test]
    fn test_font_size_clamp() {
        let mut config = Configuration::default();
        config.set_font_size(2);
        assert_eq!(config.font_size, MIN_FONT_SIZE);

        config.font_size = 0;
        assert_eq!(config.font_size_px(), MIN_FONT_SIZE);
        assert_eq!(config.normalized().font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_font_spec() {
        let config = Configuration {
            serif_font: true,
            bold_text: false,
            font_size: 20,
            ..Configuration::default()
        };
        let font = config.font();
        assert_eq!(font.family, FontFamily::Serif);
        assert_eq!(font.family.name(), "Serif");
        assert_eq!(font.size_px, 20);
        assert!(!font.bold);
        assert!(!font.italic);
    }

    #[test]
    fn test_text_color_falls_back_to_white() {
        let config = Configuration {
            bar_color: None,
            ..Configuration::default()
        };
        assert_eq!(config.text_color(), NamedColor::White);
        assert_eq!(config.text_color().rgb().to_string(), "#FFFFFF");
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("Lower Left".parse::<Location>().unwrap(), Location::LowerLeft);
        assert_eq!("at-selection".parse::<Location>().unwrap(), Location::AtSelection);
        assert!("middle".parse::<Location>().is_err());

        assert_eq!("light-gray".parse::<NamedColor>().unwrap(), NamedColor::LightGray);
        assert_eq!(NamedColor::parse_optional("None").unwrap(), None);
        assert_eq!(
            NamedColor::parse_optional("Dark Gray").unwrap(),
            Some(NamedColor::DarkGray)
        );
        assert!(matches!(
            NamedColor::parse_optional("purple"),
            Err(Error::UnknownOption { kind: "color", .. })
        ));
    }
}
