// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster export of the composed post.
//!
//! Draws the photo onto a fixed-width canvas of the export aspect ratio
//! (cropped to cover, or letterboxed), then the overlay text with its
//! outline or drop shadow, and encodes the result as JPEG. Geometry is
//! authored in preview percentages, so font size and effect widths are
//! scaled by `canvas width / preview container width`.

use super::text::{layout_text, TextLayout};
use super::PixelRect;
use crate::config::ExportSettings;
use crate::io::media;
use crate::models::export_config::{CanvasSize, ExportConfig, FitMode};
use crate::models::image_asset::ImageAsset;
use crate::models::overlay::{ImageOffset, OverlayGeometry};
use crate::models::style::{
    HexColor, TextStyle, TextTreatment, OUTLINE_STROKE_WIDTH, SHADOW_ALPHA, SHADOW_BLUR,
    SHADOW_OFFSET,
};
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage, RgbImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("rendering unavailable: {0}")]
    CanvasUnavailable(String),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Rectangle in pixels with fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Which part of the source image is drawn where on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub source: Region,
    pub dest: Region,
}

/// Snapshot of everything needed to render one export.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub image: ImageAsset,
    pub geometry: OverlayGeometry,
    pub style: TextStyle,
    pub text: String,
    pub export: ExportConfig,
    /// Width of the preview container the geometry was authored in.
    pub preview_width: f64,
    pub font: Option<FontArc>,
    pub settings: ExportSettings,
}

/// An encoded export ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Compute the source crop and canvas destination for the photo.
pub fn source_and_destination(
    fit_mode: FitMode,
    image_width: u32,
    image_height: u32,
    canvas: CanvasSize,
    offset: ImageOffset,
) -> Placement {
    let iw = image_width as f64;
    let ih = image_height as f64;
    let cw = canvas.width as f64;
    let ch = canvas.height as f64;
    let full_canvas = Region {
        x: 0.0,
        y: 0.0,
        width: cw,
        height: ch,
    };

    match fit_mode {
        FitMode::Fill => {
            let canvas_aspect = canvas.aspect();
            let source = if iw / ih > canvas_aspect {
                let width = ih * canvas_aspect;
                Region {
                    x: (iw - width) * (offset.x / 100.0),
                    y: 0.0,
                    width,
                    height: ih,
                }
            } else {
                let height = iw / canvas_aspect;
                Region {
                    x: 0.0,
                    y: (ih - height) * (offset.y / 100.0),
                    width: iw,
                    height,
                }
            };
            Placement {
                source,
                dest: full_canvas,
            }
        }
        FitMode::Fit => {
            let scale = (cw / iw).min(ch / ih);
            let width = iw * scale;
            let height = ih * scale;
            Placement {
                source: Region {
                    x: 0.0,
                    y: 0.0,
                    width: iw,
                    height: ih,
                },
                dest: Region {
                    x: (cw - width) / 2.0,
                    y: (ch - height) / 2.0,
                    width,
                    height,
                },
            }
        }
    }
}

/// Render and encode an export job.
pub fn export(job: &ExportJob) -> Result<ExportedImage, ExportError> {
    let canvas = render(job)?;
    let bytes = encode_jpeg(&canvas, job.settings.jpeg_quality)?;
    log::info!(
        "Exported {}x{} image ({} bytes)",
        canvas.width(),
        canvas.height(),
        bytes.len()
    );
    Ok(ExportedImage {
        file_name: job.settings.file_name.clone(),
        bytes,
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// Compose the export canvas.
pub fn render(job: &ExportJob) -> Result<RgbImage, ExportError> {
    let size = job.export.canvas_size(job.settings.width);
    if size.width == 0 || size.height == 0 {
        return Err(ExportError::CanvasUnavailable(format!(
            "canvas size {}x{}",
            size.width, size.height
        )));
    }

    let source = media::decode_oriented(&job.image.bytes)
        .map_err(ExportError::Decode)?
        .to_rgba8();
    if source.width() == 0 || source.height() == 0 {
        return Err(ExportError::CanvasUnavailable("empty source image".into()));
    }

    let [r, g, b] = job.settings.background.rgb();
    let mut canvas = RgbaImage::from_pixel(size.width, size.height, Rgba([r, g, b, 255]));
    let placement = source_and_destination(
        job.export.fit_mode,
        source.width(),
        source.height(),
        size,
        job.geometry.offset,
    );
    draw_image(&mut canvas, &source, &placement);

    if !job.text.trim().is_empty() {
        let font = job.font.as_ref().ok_or_else(|| {
            ExportError::CanvasUnavailable(format!("no font face for {}", job.style.font))
        })?;
        let scale = if job.preview_width > 0.0 && job.preview_width.is_finite() {
            (size.width as f64 / job.preview_width) as f32
        } else {
            1.0
        };
        let text_box = PixelRect::from_text_box(
            &job.geometry.text_box,
            size.width as f64,
            size.height as f64,
        );
        let layout = layout_text(font, &job.text, job.style.size, job.style.align, text_box, scale);
        draw_text(&mut canvas, font, &layout, &job.style, scale);
    }

    Ok(image::DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Encode as baseline JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(image).map_err(ExportError::Encode)?;
    Ok(bytes)
}

fn draw_image(canvas: &mut RgbaImage, source: &RgbaImage, placement: &Placement) {
    let src = placement.source;
    let sx = (src.x.floor().max(0.0) as u32).min(source.width() - 1);
    let sy = (src.y.floor().max(0.0) as u32).min(source.height() - 1);
    let sw = (src.width.round().max(1.0) as u32).min(source.width() - sx);
    let sh = (src.height.round().max(1.0) as u32).min(source.height() - sy);

    let dst = placement.dest;
    let dw = dst.width.round().max(1.0) as u32;
    let dh = dst.height.round().max(1.0) as u32;

    let cropped = imageops::crop_imm(source, sx, sy, sw, sh).to_image();
    let resized = imageops::resize(&cropped, dw, dh, FilterType::Triangle);
    imageops::overlay(canvas, &resized, dst.x.round() as i64, dst.y.round() as i64);
}

fn draw_text(canvas: &mut RgbaImage, font: &FontArc, layout: &TextLayout, style: &TextStyle, scale: f32) {
    let mask = glyph_mask(canvas.width(), canvas.height(), font, layout);

    match style.treatment() {
        TextTreatment::Plain => {}
        TextTreatment::Outline(color) => {
            let radius = (OUTLINE_STROKE_WIDTH / 2.0 * scale).round().max(1.0) as u32;
            let stroke = dilate(&mask, radius);
            blend_mask(canvas, &stroke, color, 1.0, 0, 0);
        }
        TextTreatment::Shadow => {
            let shift = (SHADOW_OFFSET * scale).round() as i64;
            let sigma = SHADOW_BLUR / 2.0 * scale;
            let shadow = if sigma > 0.0 {
                imageops::blur(&mask, sigma)
            } else {
                mask.clone()
            };
            blend_mask(canvas, &shadow, HexColor::BLACK, SHADOW_ALPHA, shift, shift);
        }
    }
    blend_mask(canvas, &mask, style.color, 1.0, 0, 0);
}

/// Glyph coverage for every line of the layout.
fn glyph_mask(width: u32, height: u32, font: &FontArc, layout: &TextLayout) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let px = PxScale::from(layout.font_px);
    let scaled = font.as_scaled(px);
    let middle = (scaled.ascent() + scaled.descent()) / 2.0;

    for line in &layout.lines {
        let baseline = line.center_y + middle;
        let mut cursor_x = line.left(layout.align);
        let mut previous = None;
        for ch in line.text.chars() {
            if ch.is_control() {
                continue;
            }
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                cursor_x += scaled.kern(prev, glyph_id);
            }
            let glyph = glyph_id.with_scale_and_position(px, point(cursor_x, baseline));
            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                        return;
                    }
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let pixel = mask.get_pixel_mut(x as u32, y as u32);
                    pixel.0[0] = pixel.0[0].max(value);
                });
            }
            cursor_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }
    }
    mask
}

/// Grow the mask by `radius` pixels (square max filter, two passes).
fn dilate(mask: &GrayImage, radius: u32) -> GrayImage {
    let (width, height) = mask.dimensions();
    let r = radius as i64;
    let mut horizontal = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let lo = (x as i64 - r).max(0) as u32;
            let hi = (x as i64 + r).min(width as i64 - 1) as u32;
            let value = (lo..=hi).map(|sx| mask.get_pixel(sx, y).0[0]).max().unwrap_or(0);
            horizontal.put_pixel(x, y, Luma([value]));
        }
    }
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        let lo = (y as i64 - r).max(0) as u32;
        let hi = (y as i64 + r).min(height as i64 - 1) as u32;
        for x in 0..width {
            let value = (lo..=hi).map(|sy| horizontal.get_pixel(x, sy).0[0]).max().unwrap_or(0);
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

/// Paint `color` through the mask, shifted by (dx, dy).
fn blend_mask(canvas: &mut RgbaImage, mask: &GrayImage, color: HexColor, opacity: f32, dx: i64, dy: i64) {
    let (width, height) = canvas.dimensions();
    let src = color.rgb();
    for (mx, my, coverage) in mask.enumerate_pixels() {
        if coverage.0[0] == 0 {
            continue;
        }
        let x = mx as i64 + dx;
        let y = my as i64 + dy;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            continue;
        }
        let alpha = coverage.0[0] as f32 / 255.0 * opacity;
        let pixel = canvas.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            let dst = pixel.0[channel] as f32;
            pixel.0[channel] = (dst + (src[channel] as f32 - dst) * alpha).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::export_config::AspectRatio;
    use crate::models::style::FontChoice;
    use crate::render::fonts::FontBook;
    use std::io::Cursor;
    use std::sync::Arc;

    fn png_asset(width: u32, height: u32, color: [u8; 4]) -> ImageAsset {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageAsset {
            file_name: "test.png".into(),
            mime_type: "image/png".into(),
            bytes: Arc::from(bytes),
            width,
            height,
        }
    }

    fn job(image: ImageAsset, export: ExportConfig, text: &str) -> ExportJob {
        let font = FontBook::builtin()
            .face(FontChoice::Poppins)
            .map(|face| face.font.clone());
        ExportJob {
            image,
            geometry: OverlayGeometry::default(),
            style: TextStyle {
                size: 16.0,
                ..TextStyle::default()
            },
            text: text.into(),
            export,
            preview_width: 100.0,
            font,
            settings: ExportSettings {
                width: 200,
                ..ExportSettings::default()
            },
        }
    }

    fn square_fill() -> ExportConfig {
        ExportConfig {
            aspect_ratio: AspectRatio::Square,
            fit_mode: FitMode::Fill,
        }
    }

    #[test]
    fn test_fill_crop_for_wide_image() {
        let canvas = CanvasSize {
            width: 1080,
            height: 1080,
        };
        let placement = source_and_destination(FitMode::Fill, 2000, 1000, canvas, ImageOffset::new(30.0, 50.0));
        assert!((placement.source.height - 1000.0).abs() < 1e-9);
        assert!((placement.source.width - 1000.0).abs() < 1e-9);
        assert!((placement.source.x - 300.0).abs() < 1e-9);
        assert_eq!(placement.source.y, 0.0);
        assert_eq!(placement.dest.width, 1080.0);
        assert_eq!(placement.dest.height, 1080.0);
    }

    #[test]
    fn test_fill_crop_for_tall_image() {
        let canvas = CanvasSize {
            width: 1080,
            height: 565,
        };
        let placement = source_and_destination(FitMode::Fill, 1000, 1000, canvas, ImageOffset::new(50.0, 100.0));
        let expected_height = 1000.0 / (1080.0 / 565.0);
        assert_eq!(placement.source.width, 1000.0);
        assert!((placement.source.height - expected_height).abs() < 1e-9);
        assert!((placement.source.y - (1000.0 - expected_height)).abs() < 1e-9);
    }

    #[test]
    fn test_fit_centers_with_letterbox() {
        let canvas = CanvasSize {
            width: 1080,
            height: 1080,
        };
        let placement = source_and_destination(FitMode::Fit, 2000, 1000, canvas, ImageOffset::new(0.0, 0.0));
        assert_eq!(placement.source.width, 2000.0);
        assert!((placement.dest.width - 1080.0).abs() < 1e-9);
        assert!((placement.dest.height - 540.0).abs() < 1e-9);
        assert!((placement.dest.y - 270.0).abs() < 1e-9);
        assert_eq!(placement.dest.x, 0.0);
    }

    #[test]
    fn test_render_canvas_size_follows_ratio() {
        let image = png_asset(40, 40, [10, 200, 30, 255]);
        let config = ExportConfig {
            aspect_ratio: AspectRatio::Story,
            fit_mode: FitMode::Fill,
        };
        let canvas = render(&job(image, config, "")).unwrap();
        assert_eq!(canvas.dimensions(), (200, 355));
        assert_eq!(canvas.get_pixel(5, 5).0, [10, 200, 30]);
    }

    #[test]
    fn test_fit_leaves_background_bars() {
        let image = png_asset(80, 40, [250, 250, 250, 255]);
        let config = ExportConfig {
            aspect_ratio: AspectRatio::Square,
            fit_mode: FitMode::Fit,
        };
        let canvas = render(&job(image, config, "")).unwrap();
        assert_eq!(canvas.get_pixel(100, 5).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(100, 100).0, [250, 250, 250]);
        assert_eq!(canvas.get_pixel(100, 195).0, [0, 0, 0]);
    }

    #[test]
    fn test_rotated_photo_exports_upright() {
        // Stored 80x40, tagged Rotate90: letterboxed as a 40x80 portrait.
        let bytes = media::jpeg_with_orientation(80, 40, [250, 250, 250], 6);
        let image = ImageAsset {
            file_name: "phone.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: Arc::from(bytes),
            width: 40,
            height: 80,
        };
        let config = ExportConfig {
            aspect_ratio: AspectRatio::Square,
            fit_mode: FitMode::Fit,
        };
        let canvas = render(&job(image, config, "")).unwrap();
        assert!(canvas.get_pixel(100, 5).0[0] > 200);
        assert!(canvas.get_pixel(100, 195).0[0] > 200);
        assert_eq!(canvas.get_pixel(5, 100).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(195, 100).0, [0, 0, 0]);
    }

    #[test]
    fn test_text_is_drawn_inside_box() {
        let image = png_asset(50, 50, [0, 0, 0, 255]);
        let canvas = render(&job(image, square_fill(), "Hello")).unwrap();
        // Default box spans 25..75% x 40..60% of the canvas.
        let bright_inside = (50..150)
            .flat_map(|x| (80..120).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y).0[0] > 128)
            .count();
        assert!(bright_inside > 0);
        let bright_top = (0..200)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y).0[0] > 0)
            .count();
        assert_eq!(bright_top, 0);
    }

    #[test]
    fn test_outline_draws_contrasting_stroke() {
        let image = png_asset(50, 50, [255, 255, 255, 255]);
        let mut job = job(image, square_fill(), "Hello");
        job.style.outline = true;
        let canvas = render(&job).unwrap();
        let dark = canvas.pixels().filter(|p| p.0[0] < 64).count();
        assert!(dark > 0);

        job.style.outline = false;
        job.style.shadow = false;
        let plain = render(&job).unwrap();
        assert!(plain.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_shadow_darkens_below_text() {
        let image = png_asset(50, 50, [255, 255, 255, 255]);
        let mut job = job(image, square_fill(), "Hello");
        job.style.shadow = true;
        job.style.outline = false;
        let canvas = render(&job).unwrap();
        assert!(canvas.pixels().any(|p| p.0[0] < 250));
    }

    #[test]
    fn test_missing_font_with_text_is_unavailable() {
        let image = png_asset(10, 10, [0, 0, 0, 255]);
        let mut job = job(image, square_fill(), "Hi");
        job.font = None;
        assert!(matches!(render(&job), Err(ExportError::CanvasUnavailable(_))));
        job.text = "   ".into();
        assert!(render(&job).is_ok());
    }

    #[test]
    fn test_undecodable_image_fails() {
        let mut image = png_asset(10, 10, [0, 0, 0, 255]);
        image.bytes = Arc::from(vec![1u8, 2, 3, 4]);
        let job = job(image, square_fill(), "");
        assert!(matches!(export(&job), Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_export_produces_jpeg() {
        let image = png_asset(30, 20, [120, 40, 200, 255]);
        let exported = export(&job(image, square_fill(), "Hi")).unwrap();
        assert_eq!(exported.file_name, "postcraft-image.jpg");
        assert_eq!((exported.width, exported.height), (200, 200));
        assert_eq!(&exported.bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!(decoded.width(), 200);
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(2, 2, Luma([255]));
        let grown = dilate(&mask, 1);
        assert_eq!(grown.get_pixel(1, 1).0[0], 255);
        assert_eq!(grown.get_pixel(3, 3).0[0], 255);
        assert_eq!(grown.get_pixel(0, 0).0[0], 0);
    }
}
