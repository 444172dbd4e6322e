// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Administrator dashboard: review and approve accounts.

use crate::services::identity::{ApprovalStatus, Role, UserRecord};

pub enum AdminAction {
    None,
    Refresh,
    SetStatus { uid: String, status: ApprovalStatus },
    BackToEditor,
}

pub fn show(ui: &mut egui::Ui, users: &[UserRecord], busy: bool) -> AdminAction {
    let mut action = AdminAction::None;

    ui.horizontal(|ui| {
        ui.heading("User Management");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Back to editor").clicked() {
                action = AdminAction::BackToEditor;
            }
            if ui.add_enabled(!busy, egui::Button::new("⟳ Refresh")).clicked() {
                action = AdminAction::Refresh;
            }
            if busy {
                ui.spinner();
            }
        });
    });
    ui.separator();

    if users.is_empty() {
        ui.label(egui::RichText::new("No users found.").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("users_grid")
            .num_columns(5)
            .striped(true)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                for header in ["Email", "Role", "Status", "Registered", "Actions"] {
                    ui.label(egui::RichText::new(header).strong());
                }
                ui.end_row();

                for user in users {
                    ui.label(&user.email);
                    ui.label(match user.role {
                        Role::Admin => "admin",
                        Role::User => "user",
                    });
                    ui.label(status_text(user.approval_status));
                    ui.label(user.created_at.get(..10).unwrap_or(&user.created_at));
                    ui.horizontal(|ui| {
                        if user.approval_status == ApprovalStatus::Pending {
                            if ui.add_enabled(!busy, egui::Button::new("Approve")).clicked() {
                                action = AdminAction::SetStatus {
                                    uid: user.uid.clone(),
                                    status: ApprovalStatus::Approved,
                                };
                            }
                            if ui.add_enabled(!busy, egui::Button::new("Deny")).clicked() {
                                action = AdminAction::SetStatus {
                                    uid: user.uid.clone(),
                                    status: ApprovalStatus::Denied,
                                };
                            }
                        }
                    });
                    ui.end_row();
                }
            });
    });
    action
}

fn status_text(status: ApprovalStatus) -> egui::RichText {
    let color = match status {
        ApprovalStatus::Pending => egui::Color32::from_rgb(220, 180, 60),
        ApprovalStatus::Approved => egui::Color32::from_rgb(90, 190, 110),
        ApprovalStatus::Denied => egui::Color32::from_rgb(220, 90, 90),
    };
    egui::RichText::new(status.label()).color(color)
}
