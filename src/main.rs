// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PostCraft - Social media post editor
//!
//! A cross-platform desktop application for composing photo posts with a
//! styled text overlay, AI-assisted captions and hashtags, and JPEG export.

mod app;
mod config;
mod error;
mod interaction;
mod io;
mod models;
mod render;
mod services;
mod ui;
mod util;

use anyhow::Result;
use app::PostCraftApp;
use config::AppConfig;
use render::fonts::FontBook;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load()?;
    log::info!(
        "Inference service at {}, identity service at {}",
        config.inference.base_url,
        config.identity.base_url
    );
    let fonts = FontBook::load(&config.fonts);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("PostCraft"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "PostCraft",
        options,
        Box::new(|cc| {
            fonts.install(&cc.egui_ctx);
            Ok(Box::new(PostCraftApp::new(config, fonts)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
