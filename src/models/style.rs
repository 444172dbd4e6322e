// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text overlay styling.
//!
//! This module defines the font, color, size and decoration settings for
//! the overlay text, together with the shadow/outline treatment rules that
//! the preview and the export must both follow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_FONT_SIZE: f32 = 10.0;
pub const MAX_FONT_SIZE: f32 = 100.0;
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Drop shadow offset in preview pixels (both axes).
pub const SHADOW_OFFSET: f32 = 2.0;
/// Drop shadow blur radius in preview pixels.
pub const SHADOW_BLUR: f32 = 4.0;
/// Drop shadow opacity, applied to black.
pub const SHADOW_ALPHA: f32 = 0.7;
/// Outline offset in the preview (one pixel per diagonal).
pub const OUTLINE_OFFSET: f32 = 1.0;
/// Outline stroke width in preview pixels for the export.
pub const OUTLINE_STROKE_WIDTH: f32 = 2.0;

/// Fonts offered for the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontChoice {
    Poppins,
    Arial,
    Georgia,
    SourceCodePro,
}

impl FontChoice {
    pub const ALL: [FontChoice; 4] = [
        FontChoice::Poppins,
        FontChoice::Arial,
        FontChoice::Georgia,
        FontChoice::SourceCodePro,
    ];

    /// Family name used for system font lookup and as the egui family key.
    pub fn family_name(self) -> &'static str {
        match self {
            FontChoice::Poppins => "Poppins",
            FontChoice::Arial => "Arial",
            FontChoice::Georgia => "Georgia",
            FontChoice::SourceCodePro => "Source Code Pro",
        }
    }

    pub fn is_monospace(self) -> bool {
        matches!(self, FontChoice::SourceCodePro)
    }

    pub fn is_serif(self) -> bool {
        matches!(self, FontChoice::Georgia)
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family_name())
    }
}

/// Horizontal alignment of the text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// An opaque sRGB color parsed from a `#RRGGBB` (or `#RGB`) string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor { r: 255, g: 255, b: 255 };
    pub const BLACK: HexColor = HexColor { r: 0, g: 0, b: 0 };

    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Outline color for text of this color: black for white text,
    /// white for everything else.
    pub fn outline_color(self) -> HexColor {
        if self == HexColor::WHITE {
            HexColor::BLACK
        } else {
            HexColor::WHITE
        }
    }
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(pub String);

impl FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(err()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| err());
        Ok(HexColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Visual treatment applied around the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTreatment {
    Plain,
    Shadow,
    Outline(HexColor),
}

/// Complete styling of the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontChoice,
    pub color: HexColor,
    pub size: f32,
    pub shadow: bool,
    pub outline: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontChoice::Poppins,
            color: HexColor::WHITE,
            size: DEFAULT_FONT_SIZE,
            shadow: true,
            outline: false,
            align: TextAlign::Center,
        }
    }
}

impl TextStyle {
    /// Outline wins over shadow when both are enabled.
    pub fn treatment(&self) -> TextTreatment {
        if self.outline {
            TextTreatment::Outline(self.color.outline_color())
        } else if self.shadow {
            TextTreatment::Shadow
        } else {
            TextTreatment::Plain
        }
    }
}

/// Clamp a requested font size into the supported range.
pub fn clamp_font_size(size: f32) -> f32 {
    if size.is_nan() {
        return DEFAULT_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
