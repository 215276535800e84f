//! Gesture and lifecycle transitions.
//!
//! Gesture states:
//!
//! ```text
//! Idle --pointer down in title zone (moveable)-------> Moving
//! Idle --pointer down in edge/corner zone (resizable)-> Resizing(edge)
//! Moving | Resizing(_) --pointer up (anywhere)-------> Idle
//! ```
//!
//! Only one gesture session exists at a time. Lifecycle transitions
//! (minimize, maximize, restore, hide, show, close) do not look at the
//! gesture state, except that closing a window drops its session.

use super::{HookKind, Hooks, Notification, WindowId, WindowRegistry, WindowState};
use crate::config::FrameZones;
use crate::error::{WmError, WmResult};
use crate::layout::{FloatRect, GestureMode, Point, ResizeEdge, Viewport, compute_rect, hit_test};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Moving,
    Resizing(ResizeEdge),
}

/// Lives from pointer-down to pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSession {
    pub window: WindowId,
    pub mode: GestureMode,
    pub anchor_pointer: Point,
    pub anchor_rect: FloatRect,
    /// Last rect computed for this session.
    pub current_rect: FloatRect,
    pub last_pointer: Point,
    /// Apply rects to the window as they are computed instead of previewing.
    pub live: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Started(GestureMode),
    /// The window was activated but the pointer was not over a hit zone, or
    /// the window cannot be moved in its current state.
    Activated,
    /// Another gesture is running or a modal window blocks the target.
    Ignored,
}

#[derive(Debug, Default)]
pub struct WindowStateMachine {
    session: Option<GestureSession>,
}

/// Raise the activate hook, then mark `id` active and bring it to top.
pub fn activate(registry: &mut WindowRegistry, hooks: &mut Hooks, id: WindowId) -> WmResult<bool> {
    registry.window(id)?;
    if hooks.raise(HookKind::Activate, id).is_cancelled() {
        return Ok(false);
    }
    registry.set_active(id)?;
    Ok(true)
}

impl WindowStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture_state(&self) -> GestureState {
        match self.session.map(|s| s.mode) {
            None => GestureState::Idle,
            Some(GestureMode::Move) => GestureState::Moving,
            Some(GestureMode::Resize(edge)) => GestureState::Resizing(edge),
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn pointer_down(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        zones: &FrameZones,
        point: Point,
        target: WindowId,
    ) -> WmResult<GestureOutcome> {
        registry.window(target)?;
        if let Some(active) = self.session {
            tracing::trace!(window_id = %active.window, "pointer down during gesture ignored");
            return Ok(GestureOutcome::Ignored);
        }
        if let Some(modal) = registry.blocking_modal()
            && modal != target
        {
            tracing::debug!(window_id = %target, modal = %modal, "blocked by modal window");
            return Ok(GestureOutcome::Ignored);
        }

        if !activate(registry, hooks, target)? {
            tracing::debug!(window_id = %target, "activation vetoed, no gesture");
            return Ok(GestureOutcome::Ignored);
        }

        let window = registry.window(target)?;
        if window.state != WindowState::Normal {
            return Ok(GestureOutcome::Activated);
        }
        let Some(mode) = hit_test(window.rect, point, zones, window.resizable, window.moveable)
        else {
            return Ok(GestureOutcome::Activated);
        };
        let session = GestureSession {
            window: target,
            mode,
            anchor_pointer: point,
            anchor_rect: window.rect,
            current_rect: window.rect,
            last_pointer: point,
            live: window.show_content_while_moving,
        };
        if mode == GestureMode::Move {
            // a window the user has placed is no longer kept centred
            let window = registry.window_mut(target)?;
            window.center_horizontally = false;
            window.center_vertically = false;
        }
        tracing::debug!(window_id = %target, ?mode, ?point, "gesture started");
        self.session = Some(session);
        Ok(GestureOutcome::Started(mode))
    }

    /// Recompute the session rect for `point`.
    ///
    /// Returns the rect the gesture currently describes. A cancelled move or
    /// resize hook leaves the previous rect in place.
    pub fn pointer_move(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        point: Point,
        viewport: Option<Viewport>,
    ) -> WmResult<FloatRect> {
        let Some(session) = self.session.as_mut() else {
            return Err(WmError::InvalidGesture);
        };
        let id = session.window;
        let min_rect = match registry.window(id) {
            Ok(window) => window.min_rect,
            Err(err) => {
                self.session = None;
                return Err(err);
            }
        };
        session.last_pointer = point;
        let hook = match session.mode {
            GestureMode::Move => HookKind::Move,
            GestureMode::Resize(_) => HookKind::Resize,
        };
        if hooks.raise(hook, id).is_cancelled() {
            return Ok(session.current_rect);
        }
        let rect = compute_rect(
            session.anchor_rect,
            session.anchor_pointer,
            point,
            session.mode,
            min_rect,
            viewport,
        );
        tracing::trace!(window_id = %id, ?point, ?rect, "gesture move");
        if rect == session.current_rect {
            return Ok(rect);
        }
        session.current_rect = rect;
        if session.live {
            registry.set_rect(id, rect)?;
        } else {
            registry.push(Notification::PreviewChanged(id, Some(rect)));
        }
        Ok(rect)
    }

    /// End the gesture, committing the rect for the release point.
    pub fn pointer_up(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        point: Point,
        viewport: Option<Viewport>,
    ) -> WmResult<FloatRect> {
        let last = match self.session {
            Some(session) => session.last_pointer,
            None => return Err(WmError::InvalidGesture),
        };
        let moved = if point != last {
            self.pointer_move(registry, hooks, point, viewport)
        } else {
            Ok(FloatRect::default())
        };
        // the session always ends, even if the final move failed
        let Some(session) = self.session.take() else {
            return moved;
        };
        moved?;
        let id = session.window;
        if !session.live {
            registry.push(Notification::PreviewChanged(id, None));
            registry.set_rect(id, session.current_rect)?;
        }
        tracing::debug!(window_id = %id, rect = ?session.current_rect, "gesture ended");
        Ok(session.current_rect)
    }

    pub fn minimize(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        id: WindowId,
    ) -> WmResult<bool> {
        let window = registry.window(id)?;
        if window.state == WindowState::Minimized {
            return Ok(false);
        }
        let rect = window.rect;
        if hooks.raise(HookKind::Minimize, id).is_cancelled() {
            return Ok(false);
        }
        // Snapshot whatever the rect is now. For a maximized window that is
        // the maximized geometry, which restore() will then return to.
        registry.window_mut(id)?.restore_rect = Some(rect);
        registry.set_state(id, WindowState::Minimized)?;
        Ok(true)
    }

    /// Maximize into `target`.
    ///
    /// Already maximized windows keep their rect but still get a resize
    /// notification.
    pub fn maximize(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        id: WindowId,
        target: FloatRect,
    ) -> WmResult<bool> {
        let window = registry.window(id)?;
        let rect = window.rect;
        if window.state == WindowState::Maximized {
            if !hooks.raise(HookKind::Resize, id).is_cancelled() {
                registry.push(Notification::RectChanged(id, rect));
            }
            return Ok(false);
        }
        if hooks.raise(HookKind::Maximize, id).is_cancelled()
            || hooks.raise(HookKind::Resize, id).is_cancelled()
        {
            return Ok(false);
        }
        registry.window_mut(id)?.restore_rect = Some(rect);
        registry.set_state(id, WindowState::Maximized)?;
        registry.set_rect(id, target)?;
        Ok(true)
    }

    pub fn restore(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        id: WindowId,
    ) -> WmResult<bool> {
        let window = registry.window(id)?;
        if window.state == WindowState::Normal {
            return Ok(false);
        }
        let target = window.restore_rect.unwrap_or(window.rect);
        if hooks.raise(HookKind::Restore, id).is_cancelled()
            || hooks.raise(HookKind::Resize, id).is_cancelled()
        {
            return Ok(false);
        }
        registry.window_mut(id)?.shown_state = None;
        registry.set_state(id, WindowState::Normal)?;
        registry.set_rect(id, target)?;
        Ok(true)
    }

    pub fn hide(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        id: WindowId,
    ) -> WmResult<bool> {
        let window = registry.window(id)?;
        if window.state == WindowState::Hidden {
            return Ok(false);
        }
        let previous = window.state;
        if hooks.raise(HookKind::Hide, id).is_cancelled() {
            return Ok(false);
        }
        registry.window_mut(id)?.shown_state = Some(previous);
        registry.set_state(id, WindowState::Hidden)?;
        Ok(true)
    }

    /// Return a hidden window to the state it had before `hide`.
    pub fn show(
        &mut self,
        registry: &mut WindowRegistry,
        hooks: &mut Hooks,
        id: WindowId,
    ) -> WmResult<bool> {
        let window = registry.window(id)?;
        if window.state != WindowState::Hidden {
            return Ok(false);
        }
        if hooks.raise(HookKind::Show, id).is_cancelled() {
            return Ok(false);
        }
        let window = registry.window_mut(id)?;
        let state = window.shown_state.take().unwrap_or_default();
        registry.set_state(id, state)?;
        Ok(true)
    }

    /// Remove the window. Unknown ids are a no-op; a cancelled close hook
    /// keeps the window open.
    pub fn close(&mut self, registry: &mut WindowRegistry, hooks: &mut Hooks, id: WindowId) -> bool {
        if !registry.contains(id) {
            return false;
        }
        if hooks.raise(HookKind::Close, id).is_cancelled() {
            return false;
        }
        if self.session.is_some_and(|s| s.window == id) {
            tracing::debug!(window_id = %id, "gesture dropped by close");
            self.session = None;
        }
        registry.close(id).is_some()
    }
}
