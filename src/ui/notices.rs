// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notices shown in the bottom-right corner.

use std::time::{Duration, Instant};

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: Option<String>,
    created: Instant,
}

#[derive(Debug, Default)]
pub struct NoticeStack {
    notices: Vec<Notice>,
}

impl NoticeStack {
    pub fn info(&mut self, title: impl Into<String>) {
        self.push(NoticeKind::Info, title.into(), None);
    }

    pub fn error(&mut self, title: impl Into<String>, detail: Option<String>) {
        self.push(NoticeKind::Error, title.into(), detail);
    }

    fn push(&mut self, kind: NoticeKind, title: String, detail: Option<String>) {
        self.notices.push(Notice {
            kind,
            title,
            detail,
            created: Instant::now(),
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Drop notices older than their lifetime.
    pub fn prune(&mut self, now: Instant) {
        self.notices
            .retain(|n| now.saturating_duration_since(n.created) < NOTICE_LIFETIME);
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.notices.is_empty() {
            return;
        }
        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (index, notice) in self.notices.iter().enumerate() {
                    let fill = match notice.kind {
                        NoticeKind::Info => egui::Color32::from_rgb(40, 60, 45),
                        NoticeKind::Error => egui::Color32::from_rgb(110, 30, 30),
                    };
                    egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(&notice.title).strong().color(egui::Color32::WHITE));
                            if ui.small_button("✖").clicked() {
                                dismissed = Some(index);
                            }
                        });
                        if let Some(detail) = &notice.detail {
                            ui.label(egui::RichText::new(detail).small().color(egui::Color32::from_gray(220)));
                        }
                    });
                    ui.add_space(4.0);
                }
            });
        if let Some(index) = dismissed {
            self.notices.remove(index);
        }
        // Keep repainting so notices expire without input.
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}
