// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts pointer movement into percentage-space updates of
//! the text box and the pan offset, and converts between percentage space
//! and pixel coordinates. Every function returns a value that satisfies the
//! geometry invariants; nothing here needs validating after the fact.

use crate::models::overlay::{
    clamp_or_min, ImageOffset, ResizeHandle, TextOverlayBox, MAX_PERCENT, MIN_BOX_SIZE,
};

/// Convert a pixel delta into percent of a container dimension.
///
/// A zero (or negative) dimension yields a zero delta.
pub fn pixel_delta_to_percent(delta_px: f64, dimension_px: f64) -> f64 {
    if dimension_px <= 0.0 || !dimension_px.is_finite() || !delta_px.is_finite() {
        return 0.0;
    }
    delta_px / dimension_px * 100.0
}

/// Convert a percentage-space coordinate to pixels along a dimension.
pub fn percent_to_pixel(percent: f64, dimension_px: f64) -> f64 {
    percent / 100.0 * dimension_px
}

/// Convert a pixel coordinate to percentage space along a dimension.
pub fn pixel_to_percent(pixel: f64, dimension_px: f64) -> f64 {
    pixel_delta_to_percent(pixel, dimension_px)
}

/// Translate the box, keeping it inside the container.
pub fn apply_drag(text_box: TextOverlayBox, dx: f64, dy: f64) -> TextOverlayBox {
    let b = text_box.clamped();
    TextOverlayBox {
        x: clamp_or_min(b.x + dx, 0.0, MAX_PERCENT - b.width),
        y: clamp_or_min(b.y + dy, 0.0, MAX_PERCENT - b.height),
        width: b.width,
        height: b.height,
    }
}

/// Resize the box by dragging one of its handles.
///
/// East/south edges grow with a positive delta. West/north edges move with
/// the delta, and the box origin follows so the opposite edge stays put.
/// Sizes never drop below `MIN_BOX_SIZE` and never reach past the container.
pub fn apply_resize(
    text_box: TextOverlayBox,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
) -> TextOverlayBox {
    let b = text_box.clamped();
    let mut out = b;

    if handle.moves_east() {
        out.width = clamp_or_min(b.width + dx, MIN_BOX_SIZE, MAX_PERCENT - b.x);
    } else if handle.moves_west() {
        let right = b.right();
        out.width = clamp_or_min(b.width - dx, MIN_BOX_SIZE, right);
        out.x = right - out.width;
    }

    if handle.moves_south() {
        out.height = clamp_or_min(b.height + dy, MIN_BOX_SIZE, MAX_PERCENT - b.y);
    } else if handle.moves_north() {
        let bottom = b.bottom();
        out.height = clamp_or_min(b.height - dy, MIN_BOX_SIZE, bottom);
        out.y = bottom - out.height;
    }

    out
}

/// Pan the background. The offset moves against the pointer because the
/// pointer drags the image, not the viewport.
pub fn apply_pan(offset: ImageOffset, dx: f64, dy: f64) -> ImageOffset {
    ImageOffset::new(offset.x - dx, offset.y - dy)
}
