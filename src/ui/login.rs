// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sign-in, registration and account status screens.

use crate::services::access::Route;

/// Credentials being typed on the sign-in or register screen.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub enum LoginAction {
    None,
    SignIn { email: String, password: String },
    Register { email: String, password: String },
    Navigate(Route),
}

/// Display the sign-in (`Route::SignIn`) or register screen.
pub fn show(ui: &mut egui::Ui, form: &mut LoginForm, route: Route, busy: bool) -> LoginAction {
    let registering = route == Route::Register;
    let mut action = LoginAction::None;

    centered_card(ui, |ui| {
        ui.heading(if registering { "Create an account" } else { "Welcome to PostCraft" });
        ui.label(
            egui::RichText::new(if registering {
                "New accounts need an administrator's approval."
            } else {
                "Sign in to continue."
            })
            .weak(),
        );
        ui.add_space(12.0);

        ui.label("Email");
        ui.add(egui::TextEdit::singleline(&mut form.email).hint_text("you@example.com"));
        ui.label("Password");
        let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
        let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let label = if registering { "Register" } else { "Sign In" };
            let clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
            if busy {
                ui.spinner();
            }
            if (clicked || submitted) && !busy {
                let email = form.email.trim().to_string();
                let password = form.password.clone();
                action = if registering {
                    LoginAction::Register { email, password }
                } else {
                    LoginAction::SignIn { email, password }
                };
            }
        });

        ui.add_space(8.0);
        let (prompt, link, target) = if registering {
            ("Already have an account?", "Sign in", Route::SignIn)
        } else {
            ("No account yet?", "Register", Route::Register)
        };
        ui.horizontal(|ui| {
            ui.label(prompt);
            if ui.link(link).clicked() {
                action = LoginAction::Navigate(target);
            }
        });
    });
    action
}

pub enum StatusAction {
    None,
    CheckAgain,
    SignOut,
}

/// Display the awaiting-approval or denied screen.
pub fn show_status(ui: &mut egui::Ui, route: Route, email: &str, busy: bool) -> StatusAction {
    let mut action = StatusAction::None;
    centered_card(ui, |ui| {
        if route == Route::Denied {
            ui.heading("Access denied");
            ui.label("An administrator has declined access for this account.");
        } else {
            ui.heading("Awaiting approval");
            ui.label("Your account has been created and is waiting for an administrator to approve it.");
        }
        ui.add_space(6.0);
        ui.label(egui::RichText::new(email).weak());
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("⟳ Check again")).clicked() {
                action = StatusAction::CheckAgain;
            }
            if busy {
                ui.spinner();
            }
            if ui.button("Sign out").clicked() {
                action = StatusAction::SignOut;
            }
        });
    });
    action
}

fn centered_card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() / 2.0 - 140.0).max(20.0));
        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(20.0))
            .show(ui, |ui| {
                ui.set_max_width(340.0);
                ui.vertical(add_contents);
            });
    });
}
