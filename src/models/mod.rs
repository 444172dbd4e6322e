// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for the post editor.

pub mod export_config;
pub mod image_asset;
pub mod overlay;
pub mod post;
pub mod style;
