// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Font resolution shared by the preview and the export.
//!
//! Each [`FontChoice`] is resolved once at startup to concrete font bytes:
//! a system face with the requested family name if one is installed, else a
//! system face of the matching generic family, else one of the faces egui
//! ships with. The same bytes are registered with egui for the preview and
//! wrapped for glyph rasterization in the export, so both measure text
//! identically.

use crate::config::FontConfig;
use crate::models::style::FontChoice;
use ab_glyph::{FontArc, FontVec};
use fontdb::{Database, Family, Query};
use std::collections::HashMap;

const BUNDLED_PROPORTIONAL: &str = "Ubuntu-Light";
const BUNDLED_MONOSPACE: &str = "Hack";

/// Where a resolved face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceSource {
    /// Installed font, by PostScript name.
    System(String),
    /// A face bundled with egui, by its egui key.
    Bundled(&'static str),
}

/// A resolved font face.
#[derive(Clone)]
pub struct FontFace {
    pub source: FaceSource,
    pub bytes: Vec<u8>,
    pub index: u32,
    pub font: FontArc,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    fn from_bytes(source: FaceSource, bytes: Vec<u8>, index: u32) -> Option<Self> {
        let font = FontVec::try_from_vec_and_index(bytes.clone(), index).ok()?;
        Some(Self {
            source,
            bytes,
            index,
            font: FontArc::new(font),
        })
    }
}

/// Faces for every font choice.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    faces: HashMap<FontChoice, FontFace>,
}

impl FontBook {
    /// Resolve all font choices against the system fonts and the optional
    /// fonts directory from the configuration.
    pub fn load(config: &FontConfig) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        if let Some(dir) = &config.dir {
            db.load_fonts_dir(dir);
            log::info!("Loaded fonts from {}", dir.display());
        }

        let mut faces = HashMap::new();
        for choice in FontChoice::ALL {
            let face = query_face(&db, Family::Name(choice.family_name()))
                .or_else(|| query_face(&db, generic_family(choice)))
                .or_else(|| bundled_face(choice));
            match face {
                Some(face) => {
                    log::info!("Font {} resolved to {:?}", choice, face.source);
                    faces.insert(choice, face);
                }
                None => log::error!("No usable font face for {}", choice),
            }
        }
        Self { faces }
    }

    /// Only the faces bundled with egui; no system lookup.
    pub fn builtin() -> Self {
        let faces = FontChoice::ALL
            .into_iter()
            .filter_map(|choice| bundled_face(choice).map(|face| (choice, face)))
            .collect();
        Self { faces }
    }

    pub fn face(&self, choice: FontChoice) -> Option<&FontFace> {
        self.faces.get(&choice)
    }

    /// The egui family used to draw a font choice in the preview.
    pub fn egui_family(choice: FontChoice) -> egui::FontFamily {
        egui::FontFamily::Name(choice.family_name().into())
    }

    /// Register every resolved face with egui under its family name.
    ///
    /// Missing faces still get a family (backed by the default proportional
    /// chain) so the preview never asks egui for an unknown family.
    pub fn install(&self, ctx: &egui::Context) {
        let mut definitions = egui::FontDefinitions::default();
        let fallback = definitions
            .families
            .get(&egui::FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();

        for choice in FontChoice::ALL {
            let mut chain = Vec::new();
            if let Some(face) = self.faces.get(&choice) {
                let key = format!("postcraft-{}", choice.family_name());
                let mut data = egui::FontData::from_owned(face.bytes.clone());
                data.index = face.index;
                definitions.font_data.insert(key.clone(), data);
                chain.push(key);
            }
            chain.extend(fallback.iter().cloned());
            definitions.families.insert(Self::egui_family(choice), chain);
        }
        ctx.set_fonts(definitions);
    }
}

fn generic_family(choice: FontChoice) -> Family<'static> {
    if choice.is_monospace() {
        Family::Monospace
    } else if choice.is_serif() {
        Family::Serif
    } else {
        Family::SansSerif
    }
}

fn query_face(db: &Database, family: Family<'_>) -> Option<FontFace> {
    let id = db.query(&Query {
        families: &[family],
        ..Default::default()
    })?;
    let name = db.face(id)?.post_script_name.clone();
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    FontFace::from_bytes(FaceSource::System(name), bytes, index)
}

fn bundled_face(choice: FontChoice) -> Option<FontFace> {
    let key = if choice.is_monospace() {
        BUNDLED_MONOSPACE
    } else {
        BUNDLED_PROPORTIONAL
    };
    let definitions = egui::FontDefinitions::default();
    let data = definitions.font_data.get(key)?;
    FontFace::from_bytes(FaceSource::Bundled(key), data.font.to_vec(), data.index)
}
