// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live preview canvas.
//!
//! Paints the photo, text box and overlay text from the preview layout, and
//! feeds the window's pointer and touch events to the interaction
//! controller in arrival order.

use crate::interaction::{
    hit_test, ContainerSize, Gesture, GestureContext, HitTarget, InteractionController,
    PointerEvent, PointerPos, PointerSource,
};
use crate::models::export_config::FitMode;
use crate::models::overlay::{OverlayGeometry, ResizeHandle};
use crate::models::post::PostDraft;
use crate::render::fonts::FontBook;
use crate::render::preview::{self, PreviewLayout};
use egui::{Color32, CursorIcon, Event, Pos2, Rect, Stroke, TouchPhase};

const HANDLE_RADIUS: f32 = 6.0;

/// Result of one canvas frame.
pub enum CanvasAction {
    None,
    OpenImage,
    /// The geometry changed this frame.
    GeometryChanged,
}

/// Everything the canvas reads.
pub struct CanvasInput<'a> {
    pub texture: Option<&'a egui::TextureHandle>,
    pub image_size: Option<(u32, u32)>,
    pub draft: &'a PostDraft,
    pub fonts: &'a FontBook,
    pub loading: Option<&'a str>,
}

/// Display the preview and handle gestures. `preview_width` receives the
/// width of the preview container, which the export needs for scaling.
pub fn show(
    ui: &mut egui::Ui,
    input: CanvasInput<'_>,
    geometry: &mut OverlayGeometry,
    controller: &mut InteractionController,
    preview_width: &mut f32,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    let available = ui.available_rect_before_wrap().shrink(8.0);
    let layout = preview::layout(available, input.image_size, geometry, input.draft, input.fonts);
    *preview_width = layout.container.width();

    ui.allocate_rect(layout.container, egui::Sense::click_and_drag());
    let painter = ui.painter_at(layout.container);
    painter.rect_filled(layout.container, 8.0, Color32::from_gray(40));

    match (input.texture, layout.image) {
        (Some(texture), Some(image)) => {
            painter.image(texture.id(), image.rect, image.uv, Color32::WHITE);
            draw_text(&painter, &layout, input.draft);
            draw_box(&painter, &layout, controller.active());

            let container = ContainerSize {
                width: layout.container.width() as f64,
                height: layout.container.height() as f64,
            };
            let context = GestureContext {
                image_loaded: true,
                fit_mode: input.draft.export().fit_mode,
            };
            let mut changed = false;
            for event in pointer_events(ui, &layout, geometry, context) {
                changed |= controller.handle(event, context, container, geometry);
            }
            if changed {
                action = CanvasAction::GeometryChanged;
                ui.ctx().request_repaint();
            }
            set_cursor(ui, &layout, geometry, context, controller);
        }
        _ => {
            if controller.active().is_some() {
                controller.end();
            }
            if show_placeholder(ui, layout.container, input.loading) {
                action = CanvasAction::OpenImage;
            }
        }
    }

    painter.rect_stroke(layout.container, 8.0, Stroke::new(1.0, Color32::from_gray(90)));
    action
}

/// Translate this frame's raw input into controller events.
fn pointer_events(
    ui: &egui::Ui,
    layout: &PreviewLayout,
    geometry: &OverlayGeometry,
    context: GestureContext,
) -> Vec<PointerEvent> {
    let origin = layout.container.min;
    let container = ContainerSize {
        width: layout.container.width() as f64,
        height: layout.container.height() as f64,
    };
    let layer = ui.layer_id();
    let ctx = ui.ctx().clone();
    let relative = |pos: Pos2| PointerPos::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
    let target_at = |pos: Pos2| {
        if ctx.layer_id_at(pos) != Some(layer) {
            return None;
        }
        hit_test(relative(pos), container, &geometry.text_box, context.image_loaded)
    };

    let events = ui.input(|input| input.events.clone());
    events
        .iter()
        .filter_map(|event| match event {
            Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => Some(PointerEvent::Down {
                pos: relative(*pos),
                source: PointerSource::Mouse,
                target: target_at(*pos),
            }),
            Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => Some(PointerEvent::Up {
                source: PointerSource::Mouse,
            }),
            Event::PointerMoved(pos) => Some(PointerEvent::Move {
                pos: relative(*pos),
                source: PointerSource::Mouse,
            }),
            Event::PointerGone | Event::WindowFocused(false) => Some(PointerEvent::Cancel),
            Event::Touch { id, phase, pos, .. } => {
                let source = PointerSource::Touch(id.0);
                Some(match phase {
                    TouchPhase::Start => PointerEvent::Down {
                        pos: relative(*pos),
                        source,
                        target: target_at(*pos),
                    },
                    TouchPhase::Move => PointerEvent::Move {
                        pos: relative(*pos),
                        source,
                    },
                    TouchPhase::End => PointerEvent::Up { source },
                    TouchPhase::Cancel => PointerEvent::Cancel,
                })
            }
            _ => None,
        })
        .collect()
}

fn draw_text(painter: &egui::Painter, layout: &PreviewLayout, draft: &PostDraft) {
    let Some(text) = &layout.text else {
        return;
    };
    let family = FontBook::egui_family(draft.style().font);
    let font_id = egui::FontId::new(text.font_px, family);

    let paint_pass = |offset: egui::Vec2, color: Color32| {
        for line in &text.lines {
            let galley = painter.layout_no_wrap(line.text.clone(), font_id.clone(), color);
            let top_left = Pos2::new(line.left(text.align), line.center_y - galley.size().y / 2.0) + offset;
            painter.galley(top_left, galley, color);
        }
    };
    for extra in &layout.layers {
        paint_pass(extra.offset, extra.color);
    }
    paint_pass(egui::Vec2::ZERO, layout.text_color);
}

fn draw_box(painter: &egui::Painter, layout: &PreviewLayout, active: Option<Gesture>) {
    let rect = layout.text_box;
    let alpha = if active.is_some() { 255 } else { 128 };
    let stroke = Stroke::new(2.0, Color32::from_white_alpha(alpha));
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()];
    painter.extend(egui::Shape::dashed_line(&corners, stroke, 6.0, 4.0));

    for (_, center) in &layout.handles {
        painter.circle_filled(*center, HANDLE_RADIUS, Color32::WHITE);
        painter.circle_stroke(*center, HANDLE_RADIUS, Stroke::new(1.0, Color32::from_gray(30)));
    }
}

fn set_cursor(
    ui: &egui::Ui,
    layout: &PreviewLayout,
    geometry: &OverlayGeometry,
    context: GestureContext,
    controller: &InteractionController,
) {
    let icon = match controller.active() {
        Some(Gesture::Dragging) => Some(CursorIcon::Grabbing),
        Some(Gesture::Panning) => Some(CursorIcon::Grabbing),
        Some(Gesture::Resizing(handle)) => Some(resize_cursor(handle)),
        None => ui.ctx().pointer_hover_pos().and_then(|pos| {
            if !layout.container.contains(pos) {
                return None;
            }
            let container = ContainerSize {
                width: layout.container.width() as f64,
                height: layout.container.height() as f64,
            };
            let rel = PointerPos::new(
                (pos.x - layout.container.min.x) as f64,
                (pos.y - layout.container.min.y) as f64,
            );
            match hit_test(rel, container, &geometry.text_box, true)? {
                HitTarget::Handle(handle) => Some(resize_cursor(handle)),
                HitTarget::TextBox => Some(CursorIcon::Move),
                HitTarget::Background if context.fit_mode == FitMode::Fill => Some(CursorIcon::Grab),
                HitTarget::Background => None,
            }
        }),
    };
    if let Some(icon) = icon {
        ui.ctx().set_cursor_icon(icon);
    }
}

fn resize_cursor(handle: ResizeHandle) -> CursorIcon {
    match handle {
        ResizeHandle::NorthWest => CursorIcon::ResizeNorthWest,
        ResizeHandle::NorthEast => CursorIcon::ResizeNorthEast,
        ResizeHandle::SouthWest => CursorIcon::ResizeSouthWest,
        ResizeHandle::SouthEast => CursorIcon::ResizeSouthEast,
        ResizeHandle::North => CursorIcon::ResizeNorth,
        ResizeHandle::South => CursorIcon::ResizeSouth,
        ResizeHandle::East => CursorIcon::ResizeEast,
        ResizeHandle::West => CursorIcon::ResizeWest,
    }
}

/// Empty-state message with an upload button. Returns true when clicked.
fn show_placeholder(ui: &mut egui::Ui, container: Rect, loading: Option<&str>) -> bool {
    let mut clicked = false;
    ui.allocate_ui_at_rect(container, |ui| {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space((container.height() / 2.0 - 60.0).max(0.0));
                if let Some(message) = loading {
                    ui.spinner();
                    ui.add_space(10.0);
                    ui.label(egui::RichText::new(message).size(16.0).color(Color32::from_gray(200)));
                    return;
                }
                ui.heading(
                    egui::RichText::new("Upload your image")
                        .size(22.0)
                        .color(Color32::from_gray(200)),
                );
                ui.label(
                    egui::RichText::new("Click the button below to select a photo")
                        .color(Color32::from_gray(150)),
                );
                ui.add_space(12.0);
                clicked = ui.button("⬆ Upload Image").clicked();
            });
        });
    });
    clicked
}
