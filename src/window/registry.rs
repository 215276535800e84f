use std::collections::BTreeMap;

use super::{Notification, StackLayer, Window, WindowId, WindowState};
use crate::config::WindowOptions;
use crate::error::{WmError, WmResult};
use crate::layout::{FloatRect, Point};

/// Owns every live window, the id and z-index counters and the active
/// window.
///
/// Z-indices come from a single counter, so they strictly increase over the
/// registry's lifetime and are never shared. Raising a window re-raises any
/// window in a higher [`StackLayer`] so modal and always-on-top windows can
/// never end up below ordinary ones.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    // ids are monotonic, so key order is open order
    windows: BTreeMap<WindowId, Window>,
    next_id: u64,
    top_z: u64,
    active: Option<WindowId>,
    outbox: Vec<Notification>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a window and make it active.
    ///
    /// The rect is clamped to `options.min_rect` first; a window that would
    /// still have a non-positive size is rejected.
    pub fn open(&mut self, initial_rect: FloatRect, options: WindowOptions) -> WmResult<WindowId> {
        let rect = initial_rect.clamp_to_min(options.min_rect);
        if rect.width <= 0 || rect.height <= 0 {
            tracing::warn!(?initial_rect, ?rect, "rejected window with empty rect");
            return Err(WmError::InvalidRect {
                width: rect.width,
                height: rect.height,
            });
        }
        let id = WindowId(self.next_id);
        self.next_id += 1;
        let window = Window::new(id, rect, options, 0);
        tracing::debug!(window_id = %id, ?rect, layer = ?window.layer(), "opened window");
        self.windows.insert(id, window);
        self.outbox.push(Notification::RectChanged(id, rect));
        self.outbox
            .push(Notification::StateChanged(id, WindowState::Normal));
        self.set_active(id)?;
        Ok(id)
    }

    /// Remove a window. Unknown ids are ignored. Closing the active window
    /// leaves nothing active.
    pub fn close(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(&id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        tracing::debug!(window_id = %id, "closed window");
        self.outbox.push(Notification::Closed(id));
        Some(window)
    }

    pub fn set_active(&mut self, id: WindowId) -> WmResult<()> {
        if !self.windows.contains_key(&id) {
            return Err(WmError::UnknownWindow(id));
        }
        if self.active != Some(id) {
            self.active = Some(id);
            self.outbox.push(Notification::ActiveChanged(id));
        }
        self.bring_to_top(id)
    }

    /// Give `id` the next z-index, then lift every window of a higher layer
    /// back above it, lowest layer and lowest z first so their relative order
    /// is kept.
    pub fn bring_to_top(&mut self, id: WindowId) -> WmResult<()> {
        let layer = self.window(id)?.layer();
        self.assign_z(id);
        let mut above: Vec<(StackLayer, u64, WindowId)> = self
            .windows
            .values()
            .filter(|w| w.id != id && w.layer() > layer)
            .map(|w| (w.layer(), w.z_index, w.id))
            .collect();
        above.sort_unstable();
        for (_, _, other) in above {
            self.assign_z(other);
        }
        Ok(())
    }

    fn assign_z(&mut self, id: WindowId) {
        self.top_z += 1;
        let z = self.top_z;
        if let Some(window) = self.windows.get_mut(&id) {
            window.z_index = z;
            self.outbox.push(Notification::ZIndexChanged(id, z));
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn window(&self, id: WindowId) -> WmResult<&Window> {
        self.windows.get(&id).ok_or(WmError::UnknownWindow(id))
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> WmResult<&mut Window> {
        self.windows.get_mut(&id).ok_or(WmError::UnknownWindow(id))
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn is_active(&self, id: WindowId) -> bool {
        self.active == Some(id)
    }

    pub fn top_z(&self) -> u64 {
        self.top_z
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Windows in open order.
    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    /// Ids sorted bottom to top.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut order: Vec<&Window> = self.windows.values().collect();
        order.sort_by_key(|w| w.z_index);
        order.into_iter().map(|w| w.id).collect()
    }

    /// Highest visible window whose rect contains `point`.
    pub fn topmost_at(&self, point: Point) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| w.is_visible() && w.rect.contains(point))
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    /// Highest visible modal window; while one exists, other windows do not
    /// take pointer input.
    pub fn blocking_modal(&self) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| w.modal && w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id)
    }

    pub(crate) fn set_rect(&mut self, id: WindowId, rect: FloatRect) -> WmResult<()> {
        let window = self.window_mut(id)?;
        if window.rect == rect {
            return Ok(());
        }
        window.rect = rect;
        tracing::trace!(window_id = %id, ?rect, "rect changed");
        self.outbox.push(Notification::RectChanged(id, rect));
        Ok(())
    }

    /// Returns false when the title was already `title`.
    pub(crate) fn set_title(&mut self, id: WindowId, title: String) -> WmResult<bool> {
        let window = self.window_mut(id)?;
        if window.title == title {
            return Ok(false);
        }
        window.set_title(title);
        self.outbox.push(Notification::TitleChanged(id));
        Ok(true)
    }

    /// Give every window the rect `fit` returns for it, skipping `None`.
    pub(crate) fn refit(&mut self, mut fit: impl FnMut(&Window) -> Option<FloatRect>) {
        for window in self.windows.values_mut() {
            let Some(rect) = fit(&*window) else {
                continue;
            };
            if window.rect == rect {
                continue;
            }
            window.rect = rect;
            tracing::trace!(window_id = %window.id, ?rect, "rect refit");
            self.outbox.push(Notification::RectChanged(window.id, rect));
        }
    }

    pub(crate) fn set_state(&mut self, id: WindowId, state: WindowState) -> WmResult<()> {
        let window = self.window_mut(id)?;
        if window.state == state {
            return Ok(());
        }
        let from = window.state;
        window.state = state;
        tracing::debug!(window_id = %id, ?from, to = ?state, "state changed");
        self.outbox.push(Notification::StateChanged(id, state));
        Ok(())
    }

    pub(crate) fn push(&mut self, notification: Notification) {
        self.outbox.push(notification);
    }

    /// Drain notifications produced since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }
}
