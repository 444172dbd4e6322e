// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live preview layout.
//!
//! Maps the geometry, style and export framing to screen rectangles: the
//! preview container, where the photo goes and which part of it is visible,
//! the text box with its handles, and the laid-out text with its shadow or
//! outline layers. Painting happens in `ui::canvas`; this module only
//! computes positions so it can be tested without a window.

use super::fonts::FontBook;
use super::text::{layout_text, TextLayout};
use super::PixelRect;
use crate::models::export_config::{AspectRatio, FitMode};
use crate::models::overlay::{ImageOffset, OverlayGeometry, ResizeHandle};
use crate::models::post::PostDraft;
use crate::models::style::{
    HexColor, TextTreatment, OUTLINE_OFFSET, SHADOW_ALPHA, SHADOW_BLUR, SHADOW_OFFSET,
};
use egui::{Color32, Pos2, Rect, Vec2};

/// Where the photo is drawn and which part of the texture is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub rect: Rect,
    pub uv: Rect,
}

/// An extra copy of the text drawn under the glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayer {
    pub offset: Vec2,
    pub color: Color32,
}

/// Everything the canvas needs to paint one frame.
#[derive(Debug, Clone)]
pub struct PreviewLayout {
    pub container: Rect,
    pub image: Option<ImagePlacement>,
    pub text_box: Rect,
    pub handles: Vec<(ResizeHandle, Pos2)>,
    pub text: Option<TextLayout>,
    pub text_color: Color32,
    pub layers: Vec<TextLayer>,
}

/// Largest rectangle of the given ratio that fits `available`, centered.
pub fn container_rect(available: Rect, ratio: AspectRatio) -> Rect {
    let target = ratio.value() as f32;
    let available_aspect = available.width() / available.height().max(f32::EPSILON);
    let size = if available_aspect > target {
        Vec2::new(available.height() * target, available.height())
    } else {
        Vec2::new(available.width(), available.width() / target)
    };
    Rect::from_center_size(available.center(), size)
}

/// Place the photo in the container.
///
/// Fill covers the container and shows the window of the texture selected by
/// the pan offset; fit shows the whole texture letterboxed in the center.
pub fn image_placement(
    container: Rect,
    image_width: u32,
    image_height: u32,
    fit_mode: FitMode,
    offset: ImageOffset,
) -> ImagePlacement {
    let full_uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    if image_width == 0 || image_height == 0 || container.width() <= 0.0 || container.height() <= 0.0 {
        return ImagePlacement {
            rect: container,
            uv: full_uv,
        };
    }

    let iw = image_width as f32;
    let ih = image_height as f32;
    match fit_mode {
        FitMode::Fill => {
            let scale = (container.width() / iw).max(container.height() / ih);
            let visible_u = (container.width() / (iw * scale)).min(1.0);
            let visible_v = (container.height() / (ih * scale)).min(1.0);
            let u0 = (1.0 - visible_u) * (offset.x as f32 / 100.0);
            let v0 = (1.0 - visible_v) * (offset.y as f32 / 100.0);
            ImagePlacement {
                rect: container,
                uv: Rect::from_min_size(Pos2::new(u0, v0), Vec2::new(visible_u, visible_v)),
            }
        }
        FitMode::Fit => {
            let scale = (container.width() / iw).min(container.height() / ih);
            ImagePlacement {
                rect: Rect::from_center_size(container.center(), Vec2::new(iw * scale, ih * scale)),
                uv: full_uv,
            }
        }
    }
}

/// Extra text layers for a treatment: four one-pixel diagonal copies for
/// the outline, or a soft offset stack for the drop shadow.
pub fn text_layers(treatment: TextTreatment) -> Vec<TextLayer> {
    match treatment {
        TextTreatment::Plain => Vec::new(),
        TextTreatment::Outline(color) => {
            let color = to_color32(color);
            [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
                .into_iter()
                .map(|(x, y)| TextLayer {
                    offset: Vec2::new(x, y) * OUTLINE_OFFSET,
                    color,
                })
                .collect()
        }
        TextTreatment::Shadow => {
            // Approximate the blur with a core copy and four spread copies.
            let spread = SHADOW_BLUR / 4.0;
            let core = Vec2::splat(SHADOW_OFFSET);
            let mut layers = vec![TextLayer {
                offset: core,
                color: shadow_color(SHADOW_ALPHA * 0.5),
            }];
            for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
                layers.push(TextLayer {
                    offset: core + Vec2::new(x, y) * spread,
                    color: shadow_color(SHADOW_ALPHA * 0.125),
                });
            }
            layers
        }
    }
}

pub fn to_color32(color: HexColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

fn shadow_color(alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(0, 0, 0, (alpha * 255.0).round() as u8)
}

/// Compute the full preview layout for `available` screen space.
pub fn layout(
    available: Rect,
    image_size: Option<(u32, u32)>,
    geometry: &OverlayGeometry,
    draft: &PostDraft,
    fonts: &FontBook,
) -> PreviewLayout {
    let export = draft.export();
    let container = container_rect(available, export.aspect_ratio);
    let image = image_size.map(|(w, h)| image_placement(container, w, h, export.fit_mode, geometry.offset));

    let box_px = PixelRect::from_text_box(
        &geometry.text_box,
        container.width() as f64,
        container.height() as f64,
    );
    let text_box = Rect::from_min_size(
        container.min + Vec2::new(box_px.x, box_px.y),
        Vec2::new(box_px.width, box_px.height),
    );
    let handles = ResizeHandle::CORNERS
        .into_iter()
        .map(|handle| {
            let (fx, fy) = handle.anchor();
            let pos = text_box.min + Vec2::new(fx as f32 * text_box.width(), fy as f32 * text_box.height());
            (handle, pos)
        })
        .collect();

    let style = draft.style();
    let text = match (image, fonts.face(style.font)) {
        (Some(_), Some(face)) if draft.has_overlay_text() => {
            let screen_box = PixelRect::new(text_box.min.x, text_box.min.y, text_box.width(), text_box.height());
            Some(layout_text(&face.font, draft.overlay_text(), style.size, style.align, screen_box, 1.0))
        }
        _ => None,
    };

    PreviewLayout {
        container,
        image,
        text_box,
        handles,
        text,
        text_color: to_color32(style.color),
        layers: text_layers(style.treatment()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::export_config::ExportConfig;
    use crate::render::export::source_and_destination;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_container_keeps_ratio_and_centers() {
        let available = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(800.0, 400.0));
        let square = container_rect(available, AspectRatio::Square);
        assert!(approx(square.width(), 400.0));
        assert!(approx(square.height(), 400.0));
        assert!(approx(square.center().x, available.center().x));

        let story = container_rect(available, AspectRatio::Story);
        assert!(approx(story.height(), 400.0));
        assert!(approx(story.width(), 225.0));

        let tall = Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 900.0));
        let landscape = container_rect(tall, AspectRatio::Landscape);
        assert!(approx(landscape.width(), 300.0));
        assert!(approx(landscape.height(), 300.0 / 1.91));
    }

    #[test]
    fn test_fill_uv_follows_offset() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 400.0));
        let centered = image_placement(container, 2000, 1000, FitMode::Fill, ImageOffset::CENTER);
        assert_eq!(centered.rect, container);
        assert!(approx(centered.uv.width(), 0.5));
        assert!(approx(centered.uv.min.x, 0.25));
        assert!(approx(centered.uv.height(), 1.0));

        let left = image_placement(container, 2000, 1000, FitMode::Fill, ImageOffset::new(0.0, 50.0));
        assert!(approx(left.uv.min.x, 0.0));
        let right = image_placement(container, 2000, 1000, FitMode::Fill, ImageOffset::new(100.0, 50.0));
        assert!(approx(right.uv.max.x, 1.0));
    }

    #[test]
    fn test_fit_letterboxes_center() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 400.0));
        let placed = image_placement(container, 2000, 1000, FitMode::Fit, ImageOffset::new(0.0, 0.0));
        assert!(approx(placed.rect.width(), 400.0));
        assert!(approx(placed.rect.height(), 200.0));
        assert!(approx(placed.rect.min.y, 100.0));
        assert_eq!(placed.uv, Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn test_preview_crop_matches_export_crop() {
        let canvas = ExportConfig::default().canvas_size(1080);
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(500.0, 500.0));
        for (w, h, offset) in [
            (2000, 1000, ImageOffset::new(30.0, 50.0)),
            (900, 1600, ImageOffset::new(50.0, 80.0)),
        ] {
            let preview = image_placement(container, w, h, FitMode::Fill, offset);
            let export = source_and_destination(FitMode::Fill, w, h, canvas, offset);
            assert!((preview.uv.min.x as f64 * w as f64 - export.source.x).abs() < 0.5);
            assert!((preview.uv.min.y as f64 * h as f64 - export.source.y).abs() < 0.5);
            assert!((preview.uv.width() as f64 * w as f64 - export.source.width).abs() < 0.5);
            assert!((preview.uv.height() as f64 * h as f64 - export.source.height).abs() < 0.5);
        }
    }

    #[test]
    fn test_layers_per_treatment() {
        assert!(text_layers(TextTreatment::Plain).is_empty());
        let outline = text_layers(TextTreatment::Outline(HexColor::BLACK));
        assert_eq!(outline.len(), 4);
        assert!(outline.iter().all(|l| l.color == Color32::BLACK));
        assert!(outline.iter().all(|l| l.offset.x.abs() == 1.0 && l.offset.y.abs() == 1.0));
        let shadow = text_layers(TextTreatment::Shadow);
        assert_eq!(shadow[0].offset, Vec2::splat(SHADOW_OFFSET));
    }

    #[test]
    fn test_layout_places_box_and_handles() {
        let fonts = FontBook::builtin();
        let mut draft = PostDraft::new();
        // Small enough for "Your Text Here" to fit the 184px inner width.
        draft.set_font_size(16.0);
        let geometry = OverlayGeometry::default();
        let available = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(400.0, 400.0));

        let without_image = layout(available, None, &geometry, &draft, &fonts);
        assert!(without_image.text.is_none());
        assert!(without_image.image.is_none());

        let preview = layout(available, Some((800, 600)), &geometry, &draft, &fonts);
        assert!(approx(preview.text_box.min.x, 100.0));
        assert!(approx(preview.text_box.min.y, 160.0));
        assert!(approx(preview.text_box.width(), 200.0));
        assert!(approx(preview.text_box.height(), 80.0));
        assert_eq!(preview.handles.len(), 4);
        let se = preview
            .handles
            .iter()
            .find(|(h, _)| *h == ResizeHandle::SouthEast)
            .map(|(_, p)| *p)
            .unwrap();
        assert!(approx(se.x, 300.0) && approx(se.y, 240.0));

        let text = preview.text.expect("text laid out");
        assert_eq!(text.lines[0].text, "Your Text Here");
        assert!(approx(text.lines[0].anchor_x, 200.0));
        assert!(approx(text.lines[0].center_y, 200.0));
        assert_eq!(preview.layers.len(), 5);
    }

    #[test]
    fn test_layout_wrapped_block_stays_centered() {
        let fonts = FontBook::builtin();
        let mut draft = PostDraft::new();
        draft.set_font_size(40.0);
        let geometry = OverlayGeometry::default();
        let available = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(400.0, 400.0));

        let preview = layout(available, Some((800, 600)), &geometry, &draft, &fonts);
        let text = preview.text.expect("text laid out");
        assert!(text.lines.len() > 1);
        let joined: Vec<&str> = text.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined.join(" "), "Your Text Here");

        let first = text.lines[0].center_y;
        let last = text.lines[text.lines.len() - 1].center_y;
        assert!(approx((first + last) / 2.0, preview.text_box.center().y));
        for pair in text.lines.windows(2) {
            assert!(approx(pair[1].center_y - pair[0].center_y, text.line_height));
        }
    }
}
