// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export framing options.
//!
//! The aspect ratio fixes both the preview container shape and the export
//! canvas shape; the fit mode decides whether the photo is cropped to cover
//! the frame or letterboxed inside it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output aspect ratios supported by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait,
    #[serde(rename = "1.91:1")]
    Landscape,
    #[serde(rename = "9:16")]
    Story,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Story,
    ];

    /// The `(W, H)` pair of the ratio.
    pub fn parts(self) -> (f64, f64) {
        match self {
            AspectRatio::Square => (1.0, 1.0),
            AspectRatio::Portrait => (4.0, 5.0),
            AspectRatio::Landscape => (1.91, 1.0),
            AspectRatio::Story => (9.0, 16.0),
        }
    }

    /// Width divided by height.
    pub fn value(self) -> f64 {
        let (w, h) = self.parts();
        w / h
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Portrait => "Portrait (4:5)",
            AspectRatio::Landscape => "Landscape (1.91:1)",
            AspectRatio::Story => "Story/Reel (9:16)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "4:5",
            AspectRatio::Landscape => "1.91:1",
            AspectRatio::Story => "9:16",
        };
        f.write_str(s)
    }
}

/// How the photo is framed inside the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Crop to cover the whole frame; pannable.
    #[default]
    Fill,
    /// Scale to fit entirely inside the frame; letterboxed.
    Fit,
}

impl FitMode {
    pub fn label(self) -> &'static str {
        match self {
            FitMode::Fill => "FILL (crop to frame)",
            FitMode::Fit => "FIT (show whole image)",
        }
    }
}

/// Export framing chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub aspect_ratio: AspectRatio,
    pub fit_mode: FitMode,
}

/// Pixel dimensions of the export canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl ExportConfig {
    /// Canvas size for a fixed export width; height follows the ratio and
    /// truncates to whole pixels.
    pub fn canvas_size(&self, export_width: u32) -> CanvasSize {
        let (w, h) = self.aspect_ratio.parts();
        CanvasSize {
            width: export_width,
            height: (export_width as f64 * (h / w)) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_sizes_at_1080() {
        let size = |aspect_ratio| {
            ExportConfig {
                aspect_ratio,
                fit_mode: FitMode::Fill,
            }
            .canvas_size(1080)
        };
        assert_eq!(size(AspectRatio::Square), CanvasSize { width: 1080, height: 1080 });
        assert_eq!(size(AspectRatio::Portrait), CanvasSize { width: 1080, height: 1350 });
        assert_eq!(size(AspectRatio::Landscape), CanvasSize { width: 1080, height: 565 });
        assert_eq!(size(AspectRatio::Story), CanvasSize { width: 1080, height: 1920 });
    }

    #[test]
    fn test_aspect_ratio_serde_names() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"1.91:1\"");
        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::Story);
        assert_eq!(AspectRatio::Portrait.to_string(), "4:5");
    }
}
