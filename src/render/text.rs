// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay text layout shared by the preview and the export.
//!
//! Line breaking always happens at preview scale, using the metrics of the
//! resolved font face. The export then places the same lines at export
//! scale, so both renderers agree on where lines break even though they
//! rasterize glyphs with different primitives.

use super::PixelRect;
use crate::models::style::TextAlign;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;
/// Padding between the text box border and the text, in preview pixels.
pub const BOX_PADDING: f32 = 8.0;

/// One laid-out line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Horizontal anchor: left edge, center, or right edge depending on the
    /// alignment.
    pub anchor_x: f32,
    /// Vertical center of the line.
    pub center_y: f32,
    pub width: f32,
}

impl PlacedLine {
    /// X coordinate where the line's first glyph starts.
    pub fn left(&self, align: TextAlign) -> f32 {
        match align {
            TextAlign::Left => self.anchor_x,
            TextAlign::Center => self.anchor_x - self.width / 2.0,
            TextAlign::Right => self.anchor_x - self.width,
        }
    }
}

/// Text block laid out inside a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    pub font_px: f32,
    pub line_height: f32,
    pub align: TextAlign,
}

/// Advance width of a single line of text.
pub fn measure(font: &FontArc, px: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut width = 0.0;
    let mut previous = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let glyph = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, glyph);
        }
        width += scaled.h_advance(glyph);
        previous = Some(glyph);
    }
    width
}

/// Break text into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words wrap greedily on whitespace; a word
/// wider than the whole line is split between characters.
pub fn wrap_lines(font: &FontArc, px: f32, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure(font, px, &candidate) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measure(font, px, word) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(font, px, word, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(font: &FontArc, px: f32, word: &str, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && measure(font, px, &current) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    pieces.push(current);
    pieces
}

/// Lay out `text` inside `text_box`.
///
/// `text_box` is in the target space (preview or export pixels) and
/// `scale` is target pixels per preview pixel. Wrapping uses the preview
/// font size and box width, so a layout at any scale has the same lines.
pub fn layout_text(
    font: &FontArc,
    text: &str,
    font_size: f32,
    align: TextAlign,
    text_box: PixelRect,
    scale: f32,
) -> TextLayout {
    let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
    let preview_inner_width = (text_box.width / scale - 2.0 * BOX_PADDING).max(0.0);
    let wrapped = wrap_lines(font, font_size, text, preview_inner_width);

    let font_px = font_size * scale;
    let line_height = font_px * LINE_HEIGHT;
    let padding = BOX_PADDING * scale;
    let anchor_x = match align {
        TextAlign::Left => text_box.x + padding,
        TextAlign::Center => text_box.x + text_box.width / 2.0,
        TextAlign::Right => text_box.x + text_box.width - padding,
    };
    let block_height = line_height * wrapped.len() as f32;
    let top = text_box.y + text_box.height / 2.0 - block_height / 2.0;

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| PlacedLine {
            width: measure(font, font_px, &text),
            anchor_x,
            center_y: top + line_height * (i as f32 + 0.5),
            text,
        })
        .collect();

    TextLayout {
        lines,
        font_px,
        line_height,
        align,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::FontChoice;
    use crate::render::fonts::FontBook;

    fn font() -> FontArc {
        FontBook::builtin()
            .face(FontChoice::Poppins)
            .map(|face| face.font.clone())
            .expect("bundled font")
    }

    #[test]
    fn test_measure_scales_linearly() {
        let font = font();
        let small = measure(&font, 20.0, "Hello world");
        let large = measure(&font, 40.0, "Hello world");
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 0.5);
    }

    #[test]
    fn test_wrap_respects_width_and_newlines() {
        let font = font();
        let width = ["Hello", "there", "friend"]
            .iter()
            .map(|word| measure(&font, 20.0, word))
            .fold(0.0, f32::max);
        let lines = wrap_lines(&font, 20.0, "Hello there\nfriend", width + 1.0);
        assert_eq!(lines, vec!["Hello", "there", "friend"]);
    }

    #[test]
    fn test_wrap_keeps_short_text_on_one_line() {
        let font = font();
        let lines = wrap_lines(&font, 20.0, "Your Text Here", 10_000.0);
        assert_eq!(lines, vec!["Your Text Here"]);
    }

    #[test]
    fn test_long_word_is_broken() {
        let font = font();
        let limit = measure(&font, 20.0, "abcd");
        let lines = wrap_lines(&font, 20.0, "abcdefghijkl", limit + 0.5);
        assert!(lines.len() >= 2);
        assert_eq!(lines.concat(), "abcdefghijkl");
        for line in &lines {
            assert!(measure(&font, 20.0, line) <= limit + 0.5);
        }
    }

    #[test]
    fn test_layout_centers_block_in_box() {
        let font = font();
        let text_box = PixelRect::new(100.0, 80.0, 200.0, 40.0);
        let layout = layout_text(&font, "Hi", 20.0, TextAlign::Center, text_box, 1.0);
        assert_eq!(layout.lines.len(), 1);
        let line = &layout.lines[0];
        assert!((line.anchor_x - 200.0).abs() < 1e-4);
        assert!((line.center_y - 100.0).abs() < 1e-4);
        assert!((line.left(TextAlign::Center) - (200.0 - line.width / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_scaled_layout_keeps_line_breaks() {
        let font = font();
        let text = "A longer overlay caption that will need to wrap";
        let preview_box = PixelRect::new(50.0, 40.0, 180.0, 60.0);
        let preview = layout_text(&font, text, 24.0, TextAlign::Left, preview_box, 1.0);

        let scale = 2.7;
        let export_box = PixelRect::new(50.0 * scale, 40.0 * scale, 180.0 * scale, 60.0 * scale);
        let export = layout_text(&font, text, 24.0, TextAlign::Left, export_box, scale);

        let preview_lines: Vec<_> = preview.lines.iter().map(|l| l.text.as_str()).collect();
        let export_lines: Vec<_> = export.lines.iter().map(|l| l.text.as_str()).collect();
        assert!(preview_lines.len() > 1);
        assert_eq!(preview_lines, export_lines);
        assert!((export.font_px - 24.0 * scale).abs() < 1e-4);
        for (p, e) in preview.lines.iter().zip(&export.lines) {
            assert!((e.anchor_x - p.anchor_x * scale).abs() < 1e-3);
            assert!((e.center_y - p.center_y * scale).abs() < 1e-3);
        }
    }

    #[test]
    fn test_alignment_anchors() {
        let font = font();
        let text_box = PixelRect::new(0.0, 0.0, 100.0, 50.0);
        let left = layout_text(&font, "x", 12.0, TextAlign::Left, text_box, 1.0);
        let right = layout_text(&font, "x", 12.0, TextAlign::Right, text_box, 1.0);
        assert_eq!(left.lines[0].anchor_x, BOX_PADDING);
        assert_eq!(right.lines[0].anchor_x, 100.0 - BOX_PADDING);
    }
}
