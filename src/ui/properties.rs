// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Post properties panel.
//!
//! Edits the draft in place through its setters and reports the commands
//! that need the application (AI requests, clipboard) as actions.

use crate::models::export_config::{AspectRatio, FitMode};
use crate::models::post::PostDraft;
use crate::models::style::{FontChoice, HexColor, TextAlign, MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Busy flags and facts the panel shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelState {
    pub image_loaded: bool,
    pub caption_busy: bool,
    pub hashtags_busy: bool,
    pub contrast_busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertiesAction {
    GenerateCaption,
    GenerateHashtags,
    AdjustContrast,
    CopyCaption,
    CopyHashtags,
}

/// Display the panel. Returns the commands clicked this frame.
pub fn show(ui: &mut egui::Ui, draft: &mut PostDraft, state: PanelState) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();
    egui::ScrollArea::vertical().show(ui, |ui| {
        ai_section(ui, draft, state, &mut actions);
        ui.add_space(8.0);
        text_section(ui, draft, state, &mut actions);
        ui.add_space(8.0);
        export_section(ui, draft);
    });
    actions
}

fn ai_section(ui: &mut egui::Ui, draft: &mut PostDraft, state: PanelState, actions: &mut Vec<PropertiesAction>) {
    ui.heading("AI Assist");
    ui.separator();

    ui.label("Image description");
    let mut description = draft.description().to_string();
    let edit = egui::TextEdit::multiline(&mut description)
        .hint_text("e.g. a dog catching a frisbee on the beach")
        .desired_rows(2)
        .desired_width(f32::INFINITY);
    if ui.add(edit).changed() {
        draft.set_description(description);
    }

    busy_button(ui, "✨ Generate Caption", true, state.caption_busy, || {
        actions.push(PropertiesAction::GenerateCaption)
    });

    let mut caption = draft.caption().to_string();
    let edit = egui::TextEdit::multiline(&mut caption)
        .hint_text("Your caption will appear here")
        .desired_rows(3)
        .desired_width(f32::INFINITY);
    if ui.add(edit).changed() {
        draft.set_caption(caption);
    }
    if !draft.caption().is_empty() && ui.small_button("📋 Copy caption").clicked() {
        actions.push(PropertiesAction::CopyCaption);
    }

    ui.add_space(6.0);
    busy_button(ui, "# Generate Hashtags", state.image_loaded, state.hashtags_busy, || {
        actions.push(PropertiesAction::GenerateHashtags)
    });
    if !draft.hashtags().is_empty() {
        ui.horizontal_wrapped(|ui| {
            for tag in draft.hashtags() {
                ui.label(egui::RichText::new(tag).monospace());
            }
        });
        if ui.small_button("📋 Copy hashtags").clicked() {
            actions.push(PropertiesAction::CopyHashtags);
        }
    }
}

fn text_section(ui: &mut egui::Ui, draft: &mut PostDraft, state: PanelState, actions: &mut Vec<PropertiesAction>) {
    ui.heading("Text Overlay");
    ui.separator();

    let mut text = draft.overlay_text().to_string();
    let edit = egui::TextEdit::multiline(&mut text)
        .hint_text("Overlay text")
        .desired_rows(2)
        .desired_width(f32::INFINITY);
    if ui.add(edit).changed() {
        draft.set_overlay_text(text);
    }

    let style = *draft.style();
    egui::Grid::new("text_style_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Font");
            let mut font = style.font;
            egui::ComboBox::from_id_source("overlay_font")
                .selected_text(font.to_string())
                .show_ui(ui, |ui| {
                    for choice in FontChoice::ALL {
                        ui.selectable_value(&mut font, choice, choice.to_string());
                    }
                });
            if font != style.font {
                draft.set_font(font);
            }
            ui.end_row();

            ui.label("Color");
            ui.horizontal(|ui| {
                let mut rgb = style.color.rgb();
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    draft.set_color(HexColor {
                        r: rgb[0],
                        g: rgb[1],
                        b: rgb[2],
                    });
                }
                ui.label(egui::RichText::new(draft.style().color.to_string()).monospace());
                let enabled = state.image_loaded && !state.contrast_busy;
                let button = ui
                    .add_enabled(enabled, egui::Button::new("🎨"))
                    .on_hover_text("Suggest a color that contrasts with the photo");
                if button.clicked() {
                    actions.push(PropertiesAction::AdjustContrast);
                }
                if state.contrast_busy {
                    ui.spinner();
                }
            });
            ui.end_row();

            ui.label("Size");
            let mut size = style.size;
            let slider = egui::Slider::new(&mut size, MIN_FONT_SIZE..=MAX_FONT_SIZE)
                .step_by(1.0)
                .suffix(" px");
            if ui.add(slider).changed() {
                draft.set_font_size(size);
            }
            ui.end_row();

            ui.label("Effects");
            ui.horizontal(|ui| {
                let mut shadow = style.shadow;
                if ui.checkbox(&mut shadow, "Shadow").changed() {
                    draft.set_shadow(shadow);
                }
                let mut outline = style.outline;
                if ui.checkbox(&mut outline, "Outline").changed() {
                    draft.set_outline(outline);
                }
            });
            ui.end_row();

            ui.label("Align");
            ui.horizontal(|ui| {
                for (align, label) in [
                    (TextAlign::Left, "⬅ Left"),
                    (TextAlign::Center, "↔ Center"),
                    (TextAlign::Right, "➡ Right"),
                ] {
                    if ui.selectable_label(style.align == align, label).clicked() {
                        draft.set_align(align);
                    }
                }
            });
            ui.end_row();
        });
    if style.outline && style.shadow {
        ui.label(egui::RichText::new("Outline replaces the shadow while enabled.").weak().small());
    }
}

fn export_section(ui: &mut egui::Ui, draft: &mut PostDraft) {
    ui.heading("Export");
    ui.separator();

    let export = *draft.export();
    ui.label("Aspect ratio");
    ui.horizontal_wrapped(|ui| {
        for ratio in AspectRatio::ALL {
            if ui.selectable_label(export.aspect_ratio == ratio, ratio.label()).clicked() {
                draft.set_aspect_ratio(ratio);
            }
        }
    });

    ui.label("Fit mode");
    ui.horizontal(|ui| {
        for mode in [FitMode::Fill, FitMode::Fit] {
            if ui.radio(export.fit_mode == mode, mode.label()).clicked() {
                draft.set_fit_mode(mode);
            }
        }
    });
    if export.fit_mode == FitMode::Fill {
        ui.label(egui::RichText::new("Drag the photo to choose the crop.").weak().small());
    }
}

fn busy_button(ui: &mut egui::Ui, label: &str, enabled: bool, busy: bool, on_click: impl FnOnce()) {
    ui.horizontal(|ui| {
        let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width() - 28.0, 0.0));
        if ui.add_enabled(enabled && !busy, button).clicked() {
            on_click();
        }
        if busy {
            ui.spinner();
        }
    });
}
