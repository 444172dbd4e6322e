// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay geometry data structures.
//!
//! This module defines the text overlay box and the background pan offset.
//! Both live in percentage space: 0.0 to 100.0 relative to the preview
//! container, so they are independent of the on-screen or export resolution.

use serde::{Deserialize, Serialize};

/// Smallest width/height a text box may shrink to, in percent.
pub const MIN_BOX_SIZE: f64 = 10.0;

/// Upper bound of percentage space.
pub const MAX_PERCENT: f64 = 100.0;

/// The user-manipulated bounding region for overlay text.
///
/// Invariant: `x >= 0`, `y >= 0`, `x + width <= 100`, `y + height <= 100`
/// and both sizes lie in `[MIN_BOX_SIZE, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextOverlayBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for TextOverlayBox {
    fn default() -> Self {
        Self {
            x: 25.0,
            y: 40.0,
            width: 50.0,
            height: 20.0,
        }
    }
}

impl TextOverlayBox {
    /// Create a box, clamping it into the valid region.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }.clamped()
    }

    /// Return a copy that satisfies the box invariant.
    pub fn clamped(self) -> Self {
        let width = clamp_or_min(self.width, MIN_BOX_SIZE, MAX_PERCENT);
        let height = clamp_or_min(self.height, MIN_BOX_SIZE, MAX_PERCENT);
        Self {
            x: clamp_or_min(self.x, 0.0, MAX_PERCENT - width),
            y: clamp_or_min(self.y, 0.0, MAX_PERCENT - height),
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center of the box in percentage space.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check the box invariant within a small floating tolerance.
    pub fn is_valid(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= MAX_PERCENT + EPS
            && self.bottom() <= MAX_PERCENT + EPS
            && self.width >= MIN_BOX_SIZE - EPS
            && self.height >= MIN_BOX_SIZE - EPS
    }
}

/// Pan position of the background image in fill mode.
///
/// Each axis anchors where the crop window sits inside the source image:
/// 0 shows the left/top edge, 100 the right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOffset {
    pub x: f64,
    pub y: f64,
}

impl Default for ImageOffset {
    fn default() -> Self {
        Self::CENTER
    }
}

impl ImageOffset {
    pub const CENTER: ImageOffset = ImageOffset { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_or_min(x, 0.0, MAX_PERCENT),
            y: clamp_or_min(y, 0.0, MAX_PERCENT),
        }
    }
}

/// Corner or edge handle used to resize the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ResizeHandle {
    /// The four handles drawn on the text box.
    pub const CORNERS: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
    ];

    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Position of the handle on the box, as fractions of its width/height.
    pub fn anchor(self) -> (f64, f64) {
        let fx = if self.moves_west() {
            0.0
        } else if self.moves_east() {
            1.0
        } else {
            0.5
        };
        let fy = if self.moves_north() {
            0.0
        } else if self.moves_south() {
            1.0
        } else {
            0.5
        };
        (fx, fy)
    }
}

/// Geometry state mutated by gestures and read by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayGeometry {
    pub text_box: TextOverlayBox,
    pub offset: ImageOffset,
}

/// `f64::clamp` panics when `min > max`; fall back to `min` instead, and
/// treat NaN as `min` as well.
pub(crate) fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || max < min {
        return min;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_or_min_handles_inverted_range_and_nan() {
        assert_eq!(clamp_or_min(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_or_min(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_or_min(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp_or_min(5.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp_or_min(f64::NAN, 2.0, 10.0), 2.0);
    }

    #[test]
    fn test_default_box_is_valid() {
        assert!(TextOverlayBox::default().is_valid());
    }

    #[test]
    fn test_clamped_pulls_box_inside() {
        let b = TextOverlayBox::new(95.0, -5.0, 200.0, 2.0);
        assert_eq!(b.width, 100.0);
        assert_eq!(b.height, MIN_BOX_SIZE);
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 0.0);
        assert!(b.is_valid());
    }

    #[test]
    fn test_clamped_handles_nan() {
        let b = TextOverlayBox::new(f64::NAN, 10.0, 30.0, f64::NAN);
        assert!(b.is_valid());
    }

    #[test]
    fn test_offset_clamps_axes() {
        let o = ImageOffset::new(-10.0, 140.0);
        assert_eq!(o, ImageOffset { x: 0.0, y: 100.0 });
    }

    #[test]
    fn test_handle_anchors() {
        assert_eq!(ResizeHandle::NorthWest.anchor(), (0.0, 0.0));
        assert_eq!(ResizeHandle::SouthEast.anchor(), (1.0, 1.0));
        assert_eq!(ResizeHandle::North.anchor(), (0.5, 0.0));
        assert_eq!(ResizeHandle::West.anchor(), (0.0, 0.5));
    }
}
