// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The uploaded photo.

use base64::Engine;
use std::sync::Arc;

/// An uploaded photo: the original encoded payload plus its natural size.
///
/// The encoded bytes are shared so that background work (inference calls,
/// export) can hold them without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl ImageAsset {
    /// Width divided by height of the natural image.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Encode the payload as a `data:<mime>;base64,<...>` URI.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}
