// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The application owns the editor state on the UI thread. Photo decoding,
//! AI requests, identity calls and export run through the task runner and
//! their outcomes are applied at the start of each frame.

use crate::config::AppConfig;
use crate::error::{EditorError, Operation};
use crate::interaction::InteractionController;
use crate::io::media::{self, LoadedImage, MediaError, IMAGE_EXTENSIONS};
use crate::models::image_asset::ImageAsset;
use crate::models::overlay::{ImageOffset, OverlayGeometry};
use crate::models::post::PostDraft;
use crate::models::style::HexColor;
use crate::render::export::{self, ExportError, ExportJob, ExportedImage};
use crate::render::fonts::FontBook;
use crate::services::access::{guard, refresh_session, Route};
use crate::services::identity::{
    ApprovalStatus, HttpIdentityClient, IdentityService, Session, UserRecord,
};
use crate::services::inference::{HttpInferenceClient, InferenceService};
use crate::services::lazy::LazyClient;
use crate::services::tasks::{TaskKind, TaskRunner};
use crate::services::ServiceError;
use crate::ui::{admin, canvas, login, notices::NoticeStack, properties, toolbar};
use std::sync::Arc;

/// Result of a background task.
enum TaskOutcome {
    ImageLoaded(Result<LoadedImage, MediaError>),
    Caption(Result<String, ServiceError>),
    Hashtags(Result<Vec<String>, ServiceError>),
    TextColor(Result<HexColor, ServiceError>),
    Exported(Result<ExportedImage, ExportError>),
    SignedIn(Result<Session, ServiceError>),
    Registered(Result<UserRecord, ServiceError>),
    AccountRefreshed(Result<UserRecord, ServiceError>),
    Users(Result<Vec<UserRecord>, ServiceError>),
    StatusUpdated(Result<(), ServiceError>),
}

/// Main application state.
pub struct PostCraftApp {
    config: AppConfig,
    fonts: FontBook,
    inference: Arc<LazyClient<HttpInferenceClient>>,
    identity: Arc<LazyClient<HttpIdentityClient>>,

    route: Route,
    session: Option<Session>,
    login_form: login::LoginForm,
    users: Vec<UserRecord>,

    draft: PostDraft,
    geometry: OverlayGeometry,
    controller: InteractionController,
    image: Option<ImageAsset>,
    image_texture: Option<egui::TextureHandle>,
    /// Width of the preview container in the last frame.
    preview_width: f32,
    /// Largest texture side the renderer accepts.
    max_texture_side: usize,

    tasks: TaskRunner<TaskOutcome>,
    notices: NoticeStack,
}

impl PostCraftApp {
    pub fn new(config: AppConfig, fonts: FontBook) -> Self {
        let inference_config = config.inference.clone();
        let identity_config = config.identity.clone();
        Self {
            inference: Arc::new(LazyClient::new(move || HttpInferenceClient::new(&inference_config))),
            identity: Arc::new(LazyClient::new(move || HttpIdentityClient::new(&identity_config))),
            config,
            fonts,
            route: Route::SignIn,
            session: None,
            login_form: login::LoginForm::default(),
            users: Vec::new(),
            draft: PostDraft::new(),
            geometry: OverlayGeometry::default(),
            controller: InteractionController::new(),
            image: None,
            image_texture: None,
            preview_width: 0.0,
            max_texture_side: 2048,
            tasks: TaskRunner::new(),
            notices: NoticeStack::default(),
        }
    }

    fn report(&mut self, error: EditorError) {
        match &error {
            EditorError::NoImage => log::info!("{error}"),
            EditorError::Service { source, .. } => log::warn!("{error}: {source}"),
            EditorError::Export(e) => log::error!("Export failed: {e}"),
            EditorError::Media(e) => log::error!("Image load failed: {e}"),
        }
        self.notices.error(error.notice(), error.detail());
    }

    fn navigate(&mut self, route: Route) {
        self.route = guard(route, self.session.as_ref());
        if self.route == Route::Admin {
            self.refresh_users();
        }
    }

    // ---------------------------------------------------------------------
    // Photo
    // ---------------------------------------------------------------------

    fn pick_image(&mut self) {
        if self.tasks.is_busy(TaskKind::LoadImage) {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            let max_side = u32::try_from(self.max_texture_side).unwrap_or(u32::MAX);
            self.tasks.spawn(TaskKind::LoadImage, move || {
                TaskOutcome::ImageLoaded(media::load_image(&path, max_side))
            });
        }
    }

    fn apply_loaded_image(&mut self, ctx: &egui::Context, loaded: LoadedImage) {
        // A gesture against the old image must not continue on the new one.
        self.controller.end();

        let asset = loaded.asset;
        let color_image = egui::ColorImage::from_rgba_unmultiplied(loaded.display_size, &loaded.pixels);
        self.image_texture = Some(ctx.load_texture("photo", color_image, egui::TextureOptions::LINEAR));
        self.geometry.offset = ImageOffset::CENTER;
        log::info!("Loaded image: {} ({}x{})", asset.file_name, asset.width, asset.height);
        self.image = Some(asset);
    }

    // ---------------------------------------------------------------------
    // AI assist
    // ---------------------------------------------------------------------

    fn generate_caption(&mut self) {
        let description = self.draft.description().to_string();
        let client = Arc::clone(&self.inference);
        self.tasks.spawn(TaskKind::Caption, move || {
            TaskOutcome::Caption(client.get_or_init().and_then(|c| c.generate_caption(&description)))
        });
    }

    fn generate_hashtags(&mut self) {
        let Some(image) = self.image.clone() else {
            self.report(EditorError::NoImage);
            return;
        };
        let description = self.draft.description().to_string();
        let client = Arc::clone(&self.inference);
        self.tasks.spawn(TaskKind::Hashtags, move || {
            let result = client
                .get_or_init()
                .and_then(|c| c.generate_hashtags(&image.data_uri(), &description));
            TaskOutcome::Hashtags(result)
        });
    }

    fn adjust_contrast(&mut self) {
        let Some(image) = self.image.clone() else {
            self.report(EditorError::NoImage);
            return;
        };
        let color = self.draft.style().color;
        let client = Arc::clone(&self.inference);
        self.tasks.spawn(TaskKind::Contrast, move || {
            let result = client
                .get_or_init()
                .and_then(|c| c.suggest_text_color(&image.data_uri(), color));
            TaskOutcome::TextColor(result)
        });
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    fn start_export(&mut self) {
        let Some(image) = self.image.clone() else {
            self.report(EditorError::NoImage);
            return;
        };
        let style = *self.draft.style();
        let job = ExportJob {
            image,
            geometry: self.geometry,
            style,
            text: self.draft.overlay_text().to_string(),
            export: *self.draft.export(),
            preview_width: self.preview_width as f64,
            font: self.fonts.face(style.font).map(|face| face.font.clone()),
            settings: self.config.export.clone(),
        };
        self.tasks
            .spawn(TaskKind::Export, move || TaskOutcome::Exported(export::export(&job)));
    }

    fn save_export(&mut self, exported: ExportedImage) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JPEG", &["jpg", "jpeg"])
            .set_file_name(&exported.file_name)
            .save_file()
        else {
            log::info!("Export discarded");
            return;
        };
        match media::write_file(&path, &exported.bytes) {
            Ok(()) => {
                log::info!("Exported image to {}", path.display());
                self.notices.info("Image exported");
            }
            Err(e) => self.report(EditorError::Media(e)),
        }
    }

    // ---------------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------------

    fn sign_in(&mut self, email: String, password: String) {
        let client = Arc::clone(&self.identity);
        self.tasks.spawn(TaskKind::Auth, move || {
            let result = client.get_or_init().and_then(|c| {
                let token = c.sign_in(&email, &password)?;
                let user = c.current_user(&token)?;
                Ok(Session { token, user })
            });
            TaskOutcome::SignedIn(result)
        });
    }

    fn register(&mut self, email: String, password: String) {
        let client = Arc::clone(&self.identity);
        self.tasks.spawn(TaskKind::Auth, move || {
            TaskOutcome::Registered(client.get_or_init().and_then(|c| c.register(&email, &password)))
        });
    }

    fn check_account(&mut self) {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            return;
        };
        let client = Arc::clone(&self.identity);
        self.tasks.spawn(TaskKind::Auth, move || {
            TaskOutcome::AccountRefreshed(client.get_or_init().and_then(|c| c.current_user(&token)))
        });
    }

    fn sign_out(&mut self) {
        self.controller.end();
        if let Some(session) = self.session.take() {
            log::info!("Signing out {}", session.user.email);
            let client = Arc::clone(&self.identity);
            // Remote sign-out is best effort; the local session is gone already.
            std::thread::spawn(move || {
                if let Err(e) = client.get_or_init().and_then(|c| c.sign_out(&session.token)) {
                    log::warn!("Remote sign-out failed: {e}");
                }
            });
        }
        self.users.clear();
        self.login_form.password.clear();
        self.navigate(Route::SignIn);
    }

    fn refresh_users(&mut self) {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            return;
        };
        let client = Arc::clone(&self.identity);
        self.tasks.spawn(TaskKind::Users, move || {
            TaskOutcome::Users(client.get_or_init().and_then(|c| c.list_users(&token)))
        });
    }

    fn set_user_status(&mut self, uid: String, status: ApprovalStatus) {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            return;
        };
        let client = Arc::clone(&self.identity);
        self.tasks.spawn(TaskKind::Users, move || {
            TaskOutcome::StatusUpdated(client.get_or_init().and_then(|c| c.set_approval(&token, &uid, status)))
        });
    }

    // ---------------------------------------------------------------------
    // Task outcomes
    // ---------------------------------------------------------------------

    fn apply_outcomes(&mut self, ctx: &egui::Context) {
        for (kind, outcome) in self.tasks.poll() {
            log::debug!("{kind:?} finished");
            match outcome {
                TaskOutcome::ImageLoaded(Ok(loaded)) => self.apply_loaded_image(ctx, loaded),
                TaskOutcome::ImageLoaded(Err(e)) => self.report(EditorError::Media(e)),
                TaskOutcome::Caption(Ok(caption)) => self.draft.set_caption(caption),
                TaskOutcome::Caption(Err(e)) => self.report(EditorError::service(Operation::Caption, e)),
                TaskOutcome::Hashtags(Ok(tags)) => self.draft.set_hashtags(tags),
                TaskOutcome::Hashtags(Err(e)) => self.report(EditorError::service(Operation::Hashtags, e)),
                TaskOutcome::TextColor(Ok(color)) => {
                    self.draft.set_color(color);
                    self.notices.info(format!("Text color set to {color}"));
                }
                TaskOutcome::TextColor(Err(e)) => self.report(EditorError::service(Operation::TextColor, e)),
                TaskOutcome::Exported(Ok(exported)) => self.save_export(exported),
                TaskOutcome::Exported(Err(e)) => self.report(EditorError::Export(e)),
                TaskOutcome::SignedIn(Ok(session)) => {
                    log::info!("Signed in as {}", session.user.email);
                    self.login_form.password.clear();
                    self.session = Some(session);
                    self.navigate(Route::Editor);
                }
                TaskOutcome::SignedIn(Err(e)) => self.report(EditorError::service(Operation::SignIn, e)),
                TaskOutcome::Registered(Ok(user)) => {
                    log::info!("Registered {}", user.email);
                    self.notices.info("Account created. You can now sign in.");
                    self.login_form.password.clear();
                    self.navigate(Route::SignIn);
                }
                TaskOutcome::Registered(Err(e)) => self.report(EditorError::service(Operation::Register, e)),
                TaskOutcome::AccountRefreshed(Ok(user)) => {
                    let Some(session) = self.session.as_mut() else {
                        continue;
                    };
                    let route = refresh_session(session, user, self.route);
                    log::info!("Account status for {}: {}", session.user.email, session.user.approval_status.label());
                    if route == self.route {
                        self.notices.info(format!("Account is still {}.", session.user.approval_status.label()));
                    }
                    self.navigate(route);
                }
                TaskOutcome::AccountRefreshed(Err(e)) => {
                    let expired = e.is_unauthorized();
                    self.report(EditorError::service(Operation::RefreshAccount, e));
                    if expired {
                        self.sign_out();
                    }
                }
                TaskOutcome::Users(Ok(users)) => self.users = users,
                TaskOutcome::Users(Err(e)) => {
                    let expired = e.is_unauthorized();
                    self.report(EditorError::service(Operation::LoadUsers, e));
                    if expired {
                        self.sign_out();
                    }
                }
                TaskOutcome::StatusUpdated(Ok(())) => {
                    self.notices.info("User status updated");
                    self.refresh_users();
                }
                TaskOutcome::StatusUpdated(Err(e)) => self.report(EditorError::service(Operation::UpdateUser, e)),
            }
        }
    }

    // ---------------------------------------------------------------------
    // Screens
    // ---------------------------------------------------------------------

    fn show_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.pick_image();
                        ui.close_menu();
                    }
                    let can_export = self.image.is_some() && !self.tasks.is_busy(TaskKind::Export);
                    if ui.add_enabled(can_export, egui::Button::new("Export Image...")).clicked() {
                        self.start_export();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Account", |ui| {
                    let is_admin = guard(Route::Admin, self.session.as_ref()) == Route::Admin;
                    if is_admin {
                        let label = if self.route == Route::Admin { "Editor" } else { "User Management" };
                        if ui.button(label).clicked() {
                            let target = if self.route == Route::Admin { Route::Editor } else { Route::Admin };
                            self.navigate(target);
                            ui.close_menu();
                        }
                        ui.separator();
                    }
                    if ui.button("Sign Out").clicked() {
                        self.sign_out();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        let toolbar_state = toolbar::ToolbarState {
            image_name: self.image.as_ref().map(|i| i.file_name.as_str()),
            loading_image: self.tasks.is_busy(TaskKind::LoadImage),
            exporting: self.tasks.is_busy(TaskKind::Export),
            user_email: self.session.as_ref().map(|s| s.user.email.as_str()),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &toolbar_state))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::OpenImage => self.pick_image(),
            toolbar::ToolbarAction::Export => self.start_export(),
            toolbar::ToolbarAction::None => {}
        }

        let panel_state = properties::PanelState {
            image_loaded: self.image.is_some(),
            caption_busy: self.tasks.is_busy(TaskKind::Caption),
            hashtags_busy: self.tasks.is_busy(TaskKind::Hashtags),
            contrast_busy: self.tasks.is_busy(TaskKind::Contrast),
        };
        let actions = egui::SidePanel::right("properties")
            .default_width(300.0)
            .show(ctx, |ui| properties::show(ui, &mut self.draft, panel_state))
            .inner;
        for action in actions {
            match action {
                properties::PropertiesAction::GenerateCaption => self.generate_caption(),
                properties::PropertiesAction::GenerateHashtags => self.generate_hashtags(),
                properties::PropertiesAction::AdjustContrast => self.adjust_contrast(),
                properties::PropertiesAction::CopyCaption => {
                    let caption = self.draft.caption().to_string();
                    ctx.output_mut(|o| o.copied_text = caption);
                    self.notices.info("Caption copied");
                }
                properties::PropertiesAction::CopyHashtags => {
                    if let Some(tags) = self.draft.hashtags_for_clipboard() {
                        ctx.output_mut(|o| o.copied_text = tags);
                        self.notices.info("Hashtags copied");
                    }
                }
            }
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && !self.controller.is_idle() {
            log::debug!("Gesture cancelled");
            self.controller.end();
        }

        let loading = self
            .tasks
            .is_busy(TaskKind::LoadImage)
            .then_some("Loading image...");
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let input = canvas::CanvasInput {
                    texture: self.image_texture.as_ref(),
                    image_size: self.image.as_ref().map(|i| (i.width, i.height)),
                    draft: &self.draft,
                    fonts: &self.fonts,
                    loading,
                };
                canvas::show(
                    ui,
                    input,
                    &mut self.geometry,
                    &mut self.controller,
                    &mut self.preview_width,
                )
            })
            .inner;
        match canvas_action {
            canvas::CanvasAction::OpenImage => self.pick_image(),
            canvas::CanvasAction::GeometryChanged | canvas::CanvasAction::None => {}
        }
    }

    fn show_admin(&mut self, ctx: &egui::Context) {
        let busy = self.tasks.is_busy(TaskKind::Users);
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| admin::show(ui, &self.users, busy))
            .inner;
        match action {
            admin::AdminAction::Refresh => self.refresh_users(),
            admin::AdminAction::SetStatus { uid, status } => self.set_user_status(uid, status),
            admin::AdminAction::BackToEditor => self.navigate(Route::Editor),
            admin::AdminAction::None => {}
        }
    }

    fn show_login(&mut self, ctx: &egui::Context) {
        let busy = self.tasks.is_busy(TaskKind::Auth);
        let route = self.route;
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| login::show(ui, &mut self.login_form, route, busy))
            .inner;
        match action {
            login::LoginAction::SignIn { email, password } => self.sign_in(email, password),
            login::LoginAction::Register { email, password } => self.register(email, password),
            login::LoginAction::Navigate(route) => self.navigate(route),
            login::LoginAction::None => {}
        }
    }

    fn show_status(&mut self, ctx: &egui::Context) {
        let route = self.route;
        let email = self
            .session
            .as_ref()
            .map(|s| s.user.email.clone())
            .unwrap_or_default();
        let busy = self.tasks.is_busy(TaskKind::Auth);
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| login::show_status(ui, route, &email, busy))
            .inner;
        match action {
            login::StatusAction::CheckAgain => self.check_account(),
            login::StatusAction::SignOut => self.sign_out(),
            login::StatusAction::None => {}
        }
    }
}

impl eframe::App for PostCraftApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.max_texture_side = ctx.input(|i| i.max_texture_side);
        self.apply_outcomes(ctx);
        self.route = guard(self.route, self.session.as_ref());

        // Keep polling while background work is running.
        if self.tasks.any_busy() {
            ctx.request_repaint();
        }

        match self.route {
            Route::SignIn | Route::Register => self.show_login(ctx),
            Route::Pending | Route::Denied => self.show_status(ctx),
            Route::Editor => {
                self.show_menu(ctx);
                self.show_editor(ctx);
            }
            Route::Admin => {
                self.show_menu(ctx);
                self.show_admin(ctx);
            }
        }

        self.notices.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.end();
        log::info!("Shutting down");
    }
}
