// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Post draft state management.
//!
//! This module holds the form-level state of the post being edited: the
//! image description and caption, generated hashtags, the overlay text and
//! its style, and the export framing. Fields are read freely but only
//! changed through setters, which validate and normalize input.

use super::export_config::{AspectRatio, ExportConfig, FitMode};
use super::style::{clamp_font_size, FontChoice, HexColor, TextAlign, TextStyle};

pub const DEFAULT_OVERLAY_TEXT: &str = "Your Text Here";

/// Everything the user configures about a post apart from the photo and
/// the overlay geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    description: String,
    caption: String,
    hashtags: Vec<String>,
    overlay_text: String,
    style: TextStyle,
    export: ExportConfig,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            caption: String::new(),
            hashtags: Vec::new(),
            overlay_text: DEFAULT_OVERLAY_TEXT.to_string(),
            style: TextStyle::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn overlay_text(&self) -> &str {
        &self.overlay_text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Whether there is any visible overlay text to draw.
    pub fn has_overlay_text(&self) -> bool {
        !self.overlay_text.trim().is_empty()
    }

    /// Hashtags joined for the clipboard, or `None` when there are none.
    pub fn hashtags_for_clipboard(&self) -> Option<String> {
        if self.hashtags.is_empty() {
            None
        } else {
            Some(self.hashtags.join(" "))
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Replace the hashtags, trimming blanks and making sure each starts
    /// with a single `#`.
    pub fn set_hashtags<I, S>(&mut self, hashtags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hashtags = hashtags
            .into_iter()
            .filter_map(|tag| {
                let tag = tag.as_ref().trim().trim_start_matches('#');
                if tag.is_empty() {
                    None
                } else {
                    Some(format!("#{tag}"))
                }
            })
            .collect();
    }

    pub fn set_overlay_text(&mut self, text: impl Into<String>) {
        self.overlay_text = text.into();
    }

    pub fn set_font(&mut self, font: FontChoice) {
        self.style.font = font;
    }

    pub fn set_color(&mut self, color: HexColor) {
        self.style.color = color;
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: f32) {
        self.style.size = clamp_font_size(size);
    }

    pub fn set_shadow(&mut self, shadow: bool) {
        self.style.shadow = shadow;
    }

    pub fn set_outline(&mut self, outline: bool) {
        self.style.outline = outline;
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.style.align = align;
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.export.aspect_ratio = aspect_ratio;
    }

    pub fn set_fit_mode(&mut self, fit_mode: FitMode) {
        self.export.fit_mode = fit_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_editor_form() {
        let draft = PostDraft::new();
        assert_eq!(draft.overlay_text(), "Your Text Here");
        assert_eq!(draft.style().size, 32.0);
        assert!(draft.style().shadow);
        assert!(!draft.style().outline);
        assert_eq!(draft.export().aspect_ratio, AspectRatio::Square);
        assert_eq!(draft.export().fit_mode, FitMode::Fill);
    }

    #[test]
    fn test_font_size_setter_clamps() {
        let mut draft = PostDraft::new();
        draft.set_font_size(500.0);
        assert_eq!(draft.style().size, 100.0);
        draft.set_font_size(1.0);
        assert_eq!(draft.style().size, 10.0);
    }

    #[test]
    fn test_hashtags_are_normalized() {
        let mut draft = PostDraft::new();
        draft.set_hashtags(["#sunset", "beach", "  ", "##travel "]);
        assert_eq!(draft.hashtags(), ["#sunset", "#beach", "#travel"]);
        assert_eq!(
            draft.hashtags_for_clipboard().as_deref(),
            Some("#sunset #beach #travel")
        );
    }

    #[test]
    fn test_clipboard_empty_without_hashtags() {
        assert_eq!(PostDraft::new().hashtags_for_clipboard(), None);
    }

    #[test]
    fn test_whitespace_text_is_not_drawn() {
        let mut draft = PostDraft::new();
        draft.set_overlay_text("   \n ");
        assert!(!draft.has_overlay_text());
    }
}
