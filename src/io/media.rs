// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo loading and export output.
//!
//! Loading keeps the original encoded bytes (sent to the inference service
//! and re-decoded by the export) alongside RGBA pixels for the display
//! texture. Both decodes apply the EXIF orientation, and the display copy
//! is shrunk to fit the GPU's texture limit.

use crate::models::image_asset::ImageAsset;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Extensions offered by the open dialog.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "gif"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// A decoded photo ready for display.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Full-size photo; width and height are after orientation.
    pub asset: ImageAsset,
    /// `[width, height]` of the display copy.
    pub display_size: [usize; 2],
    /// RGBA8 display copy, row-major.
    pub pixels: Vec<u8>,
}

/// Load a photo from disk. The display copy fits within `max_side` pixels.
pub fn load_image(path: &Path, max_side: u32) -> Result<LoadedImage, MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    decode_image(file_name, bytes, max_side)
}

/// Decode an encoded image held in memory.
pub fn decode_image(file_name: String, bytes: Vec<u8>, max_side: u32) -> Result<LoadedImage, MediaError> {
    let format = image::guess_format(&bytes)?;
    let decoded = decode_oriented(&bytes)?;
    let (width, height) = (decoded.width(), decoded.height());
    let (display_width, display_height) = display_size(width, height, max_side);
    let display = if (display_width, display_height) == (width, height) {
        decoded.to_rgba8()
    } else {
        log::debug!("Display copy {width}x{height} -> {display_width}x{display_height}");
        decoded
            .resize_exact(display_width, display_height, FilterType::Triangle)
            .to_rgba8()
    };
    Ok(LoadedImage {
        asset: ImageAsset {
            file_name,
            mime_type: format.to_mime_type().to_string(),
            bytes: Arc::from(bytes),
            width,
            height,
        },
        display_size: [display_width as usize, display_height as usize],
        pixels: display.into_raw(),
    })
}

/// Decode `bytes` and apply the EXIF orientation, if any.
pub fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()?;
    // An unreadable EXIF block leaves the pixels as stored.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Scale `width x height` down so neither side exceeds `max_side`, keeping
/// the aspect ratio. Sizes already inside the limit are returned as is.
pub fn display_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max_side == 0 || longest <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (fit(width), fit(height))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), MediaError> {
    std::fs::write(path, bytes).map_err(|source| MediaError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Encode a solid JPEG carrying an EXIF orientation tag (1..=8).
#[cfg(test)]
pub(crate) fn jpeg_with_orientation(width: u32, height: u32, rgb: [u8; 3], orientation: u16) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    // Big-endian TIFF header, one IFD entry: 0x0112 Orientation, SHORT x1.
    let mut app1 = b"Exif\0\0MM\0\x2a\0\0\0\x08".to_vec();
    app1.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    app1.extend_from_slice(&orientation.to_be_bytes());
    app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}
