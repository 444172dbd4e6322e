// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gesture state machine.
//!
//! The controller owns the single active gesture of the editor (drag the
//! text box, resize it from a handle, or pan the background) and turns the
//! pointer events of that gesture into geometry updates. Events arrive in
//! order from the window-wide input stream, so the pointer may leave the
//! preview while a gesture is active.
//!
//! Deltas are incremental: each move is measured from the previous pointer
//! position and the baseline is then advanced.

use crate::models::export_config::FitMode;
use crate::models::overlay::{OverlayGeometry, ResizeHandle, TextOverlayBox};
use crate::util::geometry;

/// Radius around a handle center that still grabs the handle, in pixels.
pub const HANDLE_GRAB_RADIUS: f64 = 10.0;

/// Which physical pointer produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    /// A touch point, identified by its touch id.
    Touch(u64),
}

/// Screen position of a pointer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(ResizeHandle),
    TextBox,
    Background,
}

/// The manipulation performed by an active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Dragging,
    Resizing(ResizeHandle),
    Panning,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Active {
        gesture: Gesture,
        source: PointerSource,
        last: PointerPos,
    },
}

/// Editor facts that decide whether a gesture may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureContext {
    pub image_loaded: bool,
    pub fit_mode: FitMode,
}

/// Pointer input, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: PointerPos,
        source: PointerSource,
        target: Option<HitTarget>,
    },
    Move {
        pos: PointerPos,
        source: PointerSource,
    },
    Up {
        source: PointerSource,
    },
    /// The pointer stopped being tracked (left the window, touch cancelled,
    /// focus lost).
    Cancel,
}

/// Size of the preview container in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

/// Owner of the single active gesture.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// The active gesture, if any.
    pub fn active(&self) -> Option<Gesture> {
        match self.state {
            InteractionState::Idle => None,
            InteractionState::Active { gesture, .. } => Some(gesture),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Feed one pointer event. Returns `true` when the geometry changed.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        context: GestureContext,
        container: ContainerSize,
        geometry: &mut OverlayGeometry,
    ) -> bool {
        match event {
            PointerEvent::Down {
                pos,
                source,
                target,
            } => {
                if let Some(target) = target {
                    self.begin(target, pos, source, context);
                }
                false
            }
            PointerEvent::Move { pos, source } => self.pointer_moved(pos, source, container, geometry),
            PointerEvent::Up { source } => {
                if self.owned_by(source) {
                    self.end();
                }
                false
            }
            PointerEvent::Cancel => {
                self.end();
                false
            }
        }
    }

    /// Try to start a gesture. Returns the gesture started, or `None` when
    /// the target does not allow one or another gesture is already active.
    pub fn begin(
        &mut self,
        target: HitTarget,
        pos: PointerPos,
        source: PointerSource,
        context: GestureContext,
    ) -> Option<Gesture> {
        if !self.is_idle() || !context.image_loaded {
            return None;
        }
        let gesture = match target {
            HitTarget::Handle(handle) => Gesture::Resizing(handle),
            HitTarget::TextBox => Gesture::Dragging,
            HitTarget::Background if context.fit_mode == FitMode::Fill => Gesture::Panning,
            HitTarget::Background => return None,
        };
        log::debug!("Gesture started: {:?} via {:?}", gesture, source);
        self.state = InteractionState::Active {
            gesture,
            source,
            last: pos,
        };
        Some(gesture)
    }

    /// Apply a pointer move to the geometry. Moves from other pointers than
    /// the gesture owner are ignored.
    pub fn pointer_moved(
        &mut self,
        pos: PointerPos,
        source: PointerSource,
        container: ContainerSize,
        geometry: &mut OverlayGeometry,
    ) -> bool {
        let InteractionState::Active {
            gesture,
            source: owner,
            last,
        } = self.state
        else {
            return false;
        };
        if owner != source {
            return false;
        }

        let dx = geometry::pixel_delta_to_percent(pos.x - last.x, container.width);
        let dy = geometry::pixel_delta_to_percent(pos.y - last.y, container.height);
        let before = *geometry;
        match gesture {
            Gesture::Dragging => {
                geometry.text_box = geometry::apply_drag(geometry.text_box, dx, dy);
            }
            Gesture::Resizing(handle) => {
                geometry.text_box = geometry::apply_resize(geometry.text_box, handle, dx, dy);
            }
            Gesture::Panning => {
                geometry.offset = geometry::apply_pan(geometry.offset, dx, dy);
            }
        }
        self.state = InteractionState::Active {
            gesture,
            source: owner,
            last: pos,
        };
        *geometry != before
    }

    /// End the active gesture, keeping the geometry as it is.
    pub fn end(&mut self) {
        if let InteractionState::Active { gesture, .. } = self.state {
            log::debug!("Gesture ended: {:?}", gesture);
        }
        self.state = InteractionState::Idle;
    }

    fn owned_by(&self, source: PointerSource) -> bool {
        matches!(self.state, InteractionState::Active { source: owner, .. } if owner == source)
    }
}

/// Find what lies under a pointer given relative to the container's top-left
/// corner. Handles win over the box body, which wins over the background.
pub fn hit_test(
    pos: PointerPos,
    container: ContainerSize,
    text_box: &TextOverlayBox,
    show_box: bool,
) -> Option<HitTarget> {
    if container.width <= 0.0 || container.height <= 0.0 {
        return None;
    }
    if show_box {
        let left = geometry::percent_to_pixel(text_box.x, container.width);
        let top = geometry::percent_to_pixel(text_box.y, container.height);
        let width = geometry::percent_to_pixel(text_box.width, container.width);
        let height = geometry::percent_to_pixel(text_box.height, container.height);

        for handle in ResizeHandle::CORNERS {
            let (fx, fy) = handle.anchor();
            let hx = left + fx * width;
            let hy = top + fy * height;
            let distance = ((pos.x - hx).powi(2) + (pos.y - hy).powi(2)).sqrt();
            if distance <= HANDLE_GRAB_RADIUS {
                return Some(HitTarget::Handle(handle));
            }
        }

        if pos.x >= left && pos.x <= left + width && pos.y >= top && pos.y <= top + height {
            return Some(HitTarget::TextBox);
        }
    }

    let inside = pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= container.width && pos.y <= container.height;
    inside.then_some(HitTarget::Background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::overlay::ImageOffset;

    const CONTAINER: ContainerSize = ContainerSize {
        width: 400.0,
        height: 200.0,
    };

    fn loaded(fit_mode: FitMode) -> GestureContext {
        GestureContext {
            image_loaded: true,
            fit_mode,
        }
    }

    fn down(x: f64, y: f64, target: HitTarget) -> PointerEvent {
        PointerEvent::Down {
            pos: PointerPos::new(x, y),
            source: PointerSource::Mouse,
            target: Some(target),
        }
    }

    fn mouse_move(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            pos: PointerPos::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    #[test]
    fn test_drag_gesture_moves_box_incrementally() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fill);

        controller.handle(down(100.0, 100.0, HitTarget::TextBox), ctx, CONTAINER, &mut geometry);
        assert_eq!(controller.active(), Some(Gesture::Dragging));

        // 40px of 400px = 10%, then another 20px = 5%.
        assert!(controller.handle(mouse_move(140.0, 100.0), ctx, CONTAINER, &mut geometry));
        assert!(controller.handle(mouse_move(160.0, 100.0), ctx, CONTAINER, &mut geometry));
        assert!((geometry.text_box.x - 40.0).abs() < 1e-9);
        assert!((geometry.text_box.y - 40.0).abs() < 1e-9);

        controller.handle(PointerEvent::Up { source: PointerSource::Mouse }, ctx, CONTAINER, &mut geometry);
        assert!(controller.is_idle());

        // Moves after release change nothing.
        assert!(!controller.handle(mouse_move(300.0, 150.0), ctx, CONTAINER, &mut geometry));
        assert!((geometry.text_box.x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_gesture_uses_handle() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fit);

        controller.handle(
            down(0.0, 0.0, HitTarget::Handle(ResizeHandle::SouthEast)),
            ctx,
            CONTAINER,
            &mut geometry,
        );
        controller.handle(mouse_move(-80.0, 20.0), ctx, CONTAINER, &mut geometry);
        assert!((geometry.text_box.width - 30.0).abs() < 1e-9);
        assert!((geometry.text_box.height - 30.0).abs() < 1e-9);
        assert!((geometry.text_box.x - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_only_in_fill_mode() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();

        controller.handle(down(0.0, 0.0, HitTarget::Background), loaded(FitMode::Fit), CONTAINER, &mut geometry);
        assert!(controller.is_idle());

        let ctx = loaded(FitMode::Fill);
        controller.handle(down(0.0, 0.0, HitTarget::Background), ctx, CONTAINER, &mut geometry);
        assert_eq!(controller.active(), Some(Gesture::Panning));
        controller.handle(mouse_move(40.0, -20.0), ctx, CONTAINER, &mut geometry);
        assert!((geometry.offset.x - 40.0).abs() < 1e-9);
        assert!((geometry.offset.y - 60.0).abs() < 1e-9);
        assert_eq!(geometry.text_box, TextOverlayBox::default());
    }

    #[test]
    fn test_no_gesture_without_image() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = GestureContext {
            image_loaded: false,
            fit_mode: FitMode::Fill,
        };
        for target in [
            HitTarget::TextBox,
            HitTarget::Background,
            HitTarget::Handle(ResizeHandle::NorthWest),
        ] {
            controller.handle(down(0.0, 0.0, target), ctx, CONTAINER, &mut geometry);
            assert!(controller.is_idle());
        }
    }

    #[test]
    fn test_gestures_are_exclusive() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fill);

        controller.handle(down(0.0, 0.0, HitTarget::TextBox), ctx, CONTAINER, &mut geometry);
        let second = controller.begin(
            HitTarget::Background,
            PointerPos::new(5.0, 5.0),
            PointerSource::Touch(7),
            ctx,
        );
        assert_eq!(second, None);
        assert_eq!(controller.active(), Some(Gesture::Dragging));
    }

    #[test]
    fn test_only_owner_drives_gesture() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fill);

        controller.handle(
            PointerEvent::Down {
                pos: PointerPos::new(10.0, 10.0),
                source: PointerSource::Touch(1),
                target: Some(HitTarget::TextBox),
            },
            ctx,
            CONTAINER,
            &mut geometry,
        );

        // The mouse and a second finger are ignored.
        assert!(!controller.handle(mouse_move(200.0, 10.0), ctx, CONTAINER, &mut geometry));
        let other_touch = PointerEvent::Move {
            pos: PointerPos::new(200.0, 10.0),
            source: PointerSource::Touch(2),
        };
        assert!(!controller.handle(other_touch, ctx, CONTAINER, &mut geometry));
        controller.handle(PointerEvent::Up { source: PointerSource::Mouse }, ctx, CONTAINER, &mut geometry);
        assert_eq!(controller.active(), Some(Gesture::Dragging));

        let owner_move = PointerEvent::Move {
            pos: PointerPos::new(50.0, 10.0),
            source: PointerSource::Touch(1),
        };
        assert!(controller.handle(owner_move, ctx, CONTAINER, &mut geometry));
        assert!((geometry.text_box.x - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_keeps_geometry() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fill);

        controller.handle(down(0.0, 0.0, HitTarget::Background), ctx, CONTAINER, &mut geometry);
        controller.handle(mouse_move(-40.0, 0.0), ctx, CONTAINER, &mut geometry);
        controller.handle(PointerEvent::Cancel, ctx, CONTAINER, &mut geometry);
        assert!(controller.is_idle());
        assert_eq!(geometry.offset, ImageOffset::new(60.0, 50.0));
    }

    #[test]
    fn test_zero_size_container_is_noop() {
        let mut controller = InteractionController::new();
        let mut geometry = OverlayGeometry::default();
        let ctx = loaded(FitMode::Fill);
        let empty = ContainerSize {
            width: 0.0,
            height: 0.0,
        };

        controller.handle(down(0.0, 0.0, HitTarget::TextBox), ctx, empty, &mut geometry);
        assert!(!controller.handle(mouse_move(90.0, 90.0), ctx, empty, &mut geometry));
        assert_eq!(geometry, OverlayGeometry::default());
    }

    #[test]
    fn test_hit_test_priority() {
        let text_box = TextOverlayBox::default();
        // Box spans x 100..300, y 80..120 in a 400x200 container.
        assert_eq!(
            hit_test(PointerPos::new(101.0, 81.0), CONTAINER, &text_box, true),
            Some(HitTarget::Handle(ResizeHandle::NorthWest))
        );
        assert_eq!(
            hit_test(PointerPos::new(300.0, 120.0), CONTAINER, &text_box, true),
            Some(HitTarget::Handle(ResizeHandle::SouthEast))
        );
        assert_eq!(
            hit_test(PointerPos::new(200.0, 100.0), CONTAINER, &text_box, true),
            Some(HitTarget::TextBox)
        );
        assert_eq!(
            hit_test(PointerPos::new(20.0, 20.0), CONTAINER, &text_box, true),
            Some(HitTarget::Background)
        );
        assert_eq!(
            hit_test(PointerPos::new(200.0, 100.0), CONTAINER, &text_box, false),
            Some(HitTarget::Background)
        );
        assert_eq!(hit_test(PointerPos::new(-5.0, 20.0), CONTAINER, &text_box, true), None);
    }
}
