//! Turns crossterm mouse events into [`WindowManager`] calls.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::error::{WmError, WmResult};
use crate::layout::{ControlButton, GestureMode, Point, control_button_at, hit_test};
use crate::window::{GestureState, WindowId, WindowManager};

/// Mouse front end for a [`WindowManager`].
///
/// Control buttons fire on release, and only if the release lands on the
/// button that was pressed. Two title-bar presses on the same window within
/// `WmConfig::double_click` toggle maximize.
#[derive(Debug, Default)]
pub struct PointerRouter {
    pressed_button: Option<(WindowId, ControlButton)>,
    last_title_click: Option<(WindowId, Instant)>,
}

fn cell(mouse: &MouseEvent) -> Point {
    Point::new(i32::from(mouse.column), i32::from(mouse.row))
}

fn button_under(wm: &WindowManager, id: WindowId, point: Point) -> Option<ControlButton> {
    let window = wm.window(id).ok()?;
    if !window.is_visible() {
        return None;
    }
    control_button_at(
        window.rect(),
        point,
        &wm.config().zones,
        window.control_buttons(),
    )
}

fn on_title_bar(wm: &WindowManager, id: WindowId, point: Point) -> bool {
    wm.window(id).is_ok_and(|window| {
        hit_test(
            window.rect(),
            point,
            &wm.config().zones,
            window.resizable(),
            true,
        ) == Some(GestureMode::Move)
    })
}

fn log_result<T>(result: WmResult<T>, what: &str) {
    match result {
        Ok(_) => {}
        Err(WmError::InvalidGesture) => tracing::trace!(what, "no gesture in progress"),
        Err(err) => tracing::warn!(what, %err, "pointer input rejected"),
    }
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the event was consumed.
    pub fn handle_mouse(&mut self, wm: &mut WindowManager, mouse: MouseEvent) -> bool {
        self.handle_mouse_at(wm, mouse, Instant::now())
    }

    /// [`Self::handle_mouse`] with an explicit clock, for tests and replays.
    pub fn handle_mouse_at(&mut self, wm: &mut WindowManager, mouse: MouseEvent, now: Instant) -> bool {
        let point = cell(&mouse);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(wm, point, now),
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.pressed_button.is_some() {
                    return true;
                }
                if wm.gesture_state() == GestureState::Idle {
                    tracing::trace!(?point, "drag without gesture");
                    return false;
                }
                log_result(wm.pointer_move(point), "pointer_move");
                true
            }
            MouseEventKind::Up(MouseButton::Left) => self.release(wm, point),
            _ => false,
        }
    }

    fn press(&mut self, wm: &mut WindowManager, point: Point, now: Instant) -> bool {
        let Some(target) = wm.registry().topmost_at(point) else {
            self.last_title_click = None;
            return false;
        };

        if let Some(button) = button_under(wm, target, point) {
            self.pressed_button = Some((target, button));
            self.last_title_click = None;
            return true;
        }

        if on_title_bar(wm, target, point) {
            if let Some((prev_id, prev)) = self.last_title_click
                && prev_id == target
                && now.saturating_duration_since(prev) <= wm.config().double_click
            {
                self.last_title_click = None;
                log_result(wm.title_double_click(target), "title_double_click");
                return true;
            }
            self.last_title_click = Some((target, now));
        } else {
            self.last_title_click = None;
        }

        log_result(wm.pointer_down(point, Some(target)), "pointer_down");
        true
    }

    fn release(&mut self, wm: &mut WindowManager, point: Point) -> bool {
        if let Some((id, button)) = self.pressed_button.take() {
            if button_under(wm, id, point) == Some(button) {
                log_result(wm.control_button_click(id, button), "control_button_click");
            } else {
                tracing::trace!(window_id = %id, ?button, "button press abandoned");
            }
            return true;
        }
        if wm.gesture_state() == GestureState::Idle {
            tracing::trace!(?point, "release without gesture");
            return false;
        }
        log_result(wm.pointer_up(point), "pointer_up");
        true
    }
}
