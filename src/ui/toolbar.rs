// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the image and export commands.

/// What the toolbar needs to know about the editor.
pub struct ToolbarState<'a> {
    pub image_name: Option<&'a str>,
    pub loading_image: bool,
    pub exporting: bool,
    pub user_email: Option<&'a str>,
}

pub enum ToolbarAction {
    None,
    OpenImage,
    Export,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, state: &ToolbarState<'_>) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let open = ui.add_enabled(!state.loading_image, egui::Button::new("🖼 Open Image"));
        if open.clicked() {
            action = ToolbarAction::OpenImage;
        }

        let can_export = state.image_name.is_some() && !state.exporting;
        ui.add_enabled_ui(can_export, |ui| {
            if ui.button("⬇ Export").clicked() {
                action = ToolbarAction::Export;
            }
        });
        if state.exporting {
            ui.spinner();
            ui.label(egui::RichText::new("Exporting...").weak());
        }

        ui.separator();

        let hint = match state.image_name {
            Some(name) => format!("{name}  ·  drag the box to move, corners to resize, background to pan"),
            None => "Open a photo to start crafting your post".to_string(),
        };
        ui.label(egui::RichText::new(hint).italics().weak());

        if let Some(email) = state.user_email {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(email).weak());
            });
        }
    });
    action
}
