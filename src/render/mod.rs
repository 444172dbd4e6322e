// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering of the post: live preview layout and raster export.
//!
//! Both paths read the same geometry and style and share font faces and
//! text layout, but draw with different primitives (egui shapes vs. CPU
//! pixel compositing).

pub mod export;
pub mod fonts;
pub mod preview;
pub mod text;

use crate::models::overlay::TextOverlayBox;
use crate::util::geometry::percent_to_pixel;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The text box in a space of the given pixel size.
    pub fn from_text_box(text_box: &TextOverlayBox, width: f64, height: f64) -> Self {
        Self {
            x: percent_to_pixel(text_box.x, width) as f32,
            y: percent_to_pixel(text_box.y, height) as f32,
            width: percent_to_pixel(text_box.width, width) as f32,
            height: percent_to_pixel(text_box.height, height) as f32,
        }
    }
}
