use super::state_machine::activate;
use super::{
    GestureOutcome, GestureSession, GestureState, Hooks, Notification, Window, WindowId,
    WindowObserver, WindowRegistry, WindowState, WindowStateMachine,
};
use crate::config::{WindowOptions, WmConfig};
use crate::error::WmResult;
use crate::layout::{ControlButton, FloatRect, Point, Viewport, centered, maximized_rect};

/// One taskbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: WindowId,
    pub title: String,
    pub state: WindowState,
    pub active: bool,
}

/// Front door of the core: owns the registry, the gesture/lifecycle state
/// machine, the hooks and the observers, and takes the pointer and button
/// input the host forwards.
///
/// Every operation delivers the notifications it produced to the registered
/// observers before returning. A copy is kept for `take_notifications` only
/// after `retain_notifications(true)`.
pub struct WindowManager {
    config: WmConfig,
    viewport: Viewport,
    registry: WindowRegistry,
    machine: WindowStateMachine,
    hooks: Hooks,
    observers: Vec<Box<dyn WindowObserver>>,
    retain: bool,
    delivered: Vec<Notification>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("viewport", &self.viewport)
            .field("registry", &self.registry)
            .field("machine", &self.machine)
            .field("hooks", &self.hooks)
            .field("observers", &self.observers.len())
            .field("retain", &self.retain)
            .field("delivered", &self.delivered.len())
            .finish()
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WmConfig::default())
    }
}

impl WindowManager {
    pub fn new(config: WmConfig) -> Self {
        Self {
            viewport: config.initial_viewport,
            config,
            registry: WindowRegistry::new(),
            machine: WindowStateMachine::new(),
            hooks: Hooks::new(),
            observers: Vec::new(),
            retain: false,
            delivered: Vec::new(),
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn window(&self, id: WindowId) -> WmResult<&Window> {
        self.registry.window(id)
    }

    pub fn active(&self) -> Option<WindowId> {
        self.registry.active()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.machine.gesture_state()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.machine.session()
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn add_observer(&mut self, observer: Box<dyn WindowObserver>) {
        self.observers.push(observer);
    }

    /// Keep delivered notifications for `take_notifications`. Off by default;
    /// turning it off drops whatever was kept.
    pub fn retain_notifications(&mut self, on: bool) {
        self.retain = on;
        if !on {
            self.delivered = Vec::new();
        }
    }

    /// Everything delivered to observers since the last call, while
    /// retention is on.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.delivered)
    }

    fn flush(&mut self) {
        let pending = self.registry.take_notifications();
        for notification in &pending {
            for observer in &mut self.observers {
                observer.notify(notification);
            }
        }
        if self.retain {
            self.delivered.extend(pending);
        }
    }

    fn finish<T>(&mut self, result: WmResult<T>) -> WmResult<T> {
        self.flush();
        result
    }

    fn gesture_bounds(&self) -> Option<Viewport> {
        self.config.confine_to_viewport.then_some(self.viewport)
    }

    fn maximized_target(&self) -> FloatRect {
        maximized_rect(
            self.viewport,
            self.config.maximize_offset,
            self.config.taskbar_height,
        )
    }

    /// True when a visible modal window other than `id` exists.
    fn blocked(&self, id: WindowId) -> bool {
        self.registry
            .blocking_modal()
            .is_some_and(|modal| modal != id)
    }

    pub fn open(&mut self, rect: FloatRect, options: WindowOptions) -> WmResult<WindowId> {
        let rect = centered(
            rect,
            self.viewport,
            options.center_horizontally,
            options.center_vertically,
        );
        let result = self.registry.open(rect, options);
        self.finish(result)
    }

    /// Close a window. Unknown ids are ignored; returns whether a window was
    /// removed.
    pub fn close(&mut self, id: WindowId) -> bool {
        let closed = self.machine.close(&mut self.registry, &mut self.hooks, id);
        self.flush();
        closed
    }

    pub fn set_active(&mut self, id: WindowId) -> WmResult<bool> {
        let result = activate(&mut self.registry, &mut self.hooks, id);
        self.finish(result)
    }

    pub fn minimize(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.machine.minimize(&mut self.registry, &mut self.hooks, id);
        self.finish(result)
    }

    pub fn maximize(&mut self, id: WindowId) -> WmResult<bool> {
        let target = self.maximized_target();
        let result = self
            .machine
            .maximize(&mut self.registry, &mut self.hooks, id, target);
        self.finish(result)
    }

    pub fn restore(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.machine.restore(&mut self.registry, &mut self.hooks, id);
        self.finish(result)
    }

    pub fn hide(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.machine.hide(&mut self.registry, &mut self.hooks, id);
        self.finish(result)
    }

    pub fn show(&mut self, id: WindowId) -> WmResult<bool> {
        let result = self.machine.show(&mut self.registry, &mut self.hooks, id);
        self.finish(result)
    }

    /// Returns false when the title is unchanged.
    pub fn set_title(&mut self, id: WindowId, title: impl Into<String>) -> WmResult<bool> {
        let result = self.registry.set_title(id, title.into());
        self.finish(result)
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> WmResult<bool> {
        if self.registry.window(id)?.state() == WindowState::Maximized {
            self.restore(id)
        } else {
            self.maximize(id)
        }
    }

    /// Refit maximized windows and re-centre centred ones.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(?viewport, "viewport changed");
        self.viewport = viewport;
        let target = self.maximized_target();
        self.registry.refit(|w| match w.state {
            WindowState::Maximized => Some(target),
            WindowState::Normal if w.is_centered() => Some(centered(
                w.rect,
                viewport,
                w.center_horizontally,
                w.center_vertically,
            )),
            _ => None,
        });
        self.flush();
    }

    pub fn pointer_down(
        &mut self,
        point: Point,
        target: Option<WindowId>,
    ) -> WmResult<GestureOutcome> {
        let Some(target) = target else {
            return Ok(GestureOutcome::Ignored);
        };
        let zones = self.config.zones;
        let result =
            self.machine
                .pointer_down(&mut self.registry, &mut self.hooks, &zones, point, target);
        self.finish(result)
    }

    pub fn pointer_move(&mut self, point: Point) -> WmResult<FloatRect> {
        let bounds = self.gesture_bounds();
        let result = self
            .machine
            .pointer_move(&mut self.registry, &mut self.hooks, point, bounds);
        self.finish(result)
    }

    pub fn pointer_up(&mut self, point: Point) -> WmResult<FloatRect> {
        let bounds = self.gesture_bounds();
        let result = self
            .machine
            .pointer_up(&mut self.registry, &mut self.hooks, point, bounds);
        self.finish(result)
    }

    /// Double-clicking a title bar toggles maximize and restore.
    pub fn title_double_click(&mut self, id: WindowId) -> WmResult<bool> {
        self.registry.window(id)?;
        if self.blocked(id) {
            return Ok(false);
        }
        self.toggle_maximize(id)
    }

    /// A title-bar button was clicked. Buttons the window does not have
    /// (modal windows only have close, and only sometimes) do nothing.
    pub fn control_button_click(&mut self, id: WindowId, button: ControlButton) -> WmResult<bool> {
        let window = self.registry.window(id)?;
        if !window.has_button(button) || self.blocked(id) {
            tracing::debug!(window_id = %id, ?button, "control button ignored");
            return Ok(false);
        }
        self.set_active(id)?;
        match button {
            ControlButton::Close => Ok(self.close(id)),
            ControlButton::Minimize => self.minimize(id),
            ControlButton::MaximizeRestore => self.toggle_maximize(id),
        }
    }

    /// Taskbar button behaviour: the active window minimizes when normal and
    /// restores otherwise; an inactive window is restored if minimized and
    /// then activated.
    pub fn taskbar_click(&mut self, id: WindowId) -> WmResult<()> {
        let state = self.registry.window(id)?.state();
        if self.registry.is_active(id) {
            if state == WindowState::Normal {
                self.minimize(id)?;
            } else {
                self.restore(id)?;
                self.set_active(id)?;
            }
        } else {
            if state == WindowState::Minimized {
                self.restore(id)?;
            }
            self.set_active(id)?;
        }
        Ok(())
    }

    /// Taskbar buttons in open order.
    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.registry
            .iter()
            .map(|w| TaskbarEntry {
                id: w.id,
                title: w.title.clone(),
                state: w.state,
                active: self.registry.is_active(w.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WmError;
    use crate::layout::{GestureMode, ResizeEdge};
    use crate::window::{HookKind, Propagation};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Notification>>>);

    impl WindowObserver for Recorder {
        fn notify(&mut self, notification: &Notification) {
            self.0.borrow_mut().push(*notification);
        }
    }

    impl Recorder {
        fn drain(&self) -> Vec<Notification> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    fn manager() -> (WindowManager, Recorder) {
        let mut wm = WindowManager::default();
        let rec = Recorder::default();
        wm.add_observer(Box::new(rec.clone()));
        (wm, rec)
    }

    #[test]
    fn open_with_zero_size_gets_min_size() {
        let (mut wm, _) = manager();
        let options = WindowOptions::default().with_min_rect(FloatRect::new(-5000, -5000, 165, 100));
        let id = wm.open(FloatRect::new(0, 0, 0, 0), options).unwrap();
        let rect = wm.window(id).unwrap().rect();
        assert_eq!((rect.width, rect.height), (165, 100));
    }

    #[test]
    fn move_gesture_scenario() {
        let (mut wm, rec) = manager();
        let id = wm
            .open(FloatRect::new(50, 50, 200, 150), WindowOptions::default())
            .unwrap();
        rec.drain();
        // anchor inside the title bar
        let outcome = wm.pointer_down(Point::new(100, 60), Some(id)).unwrap();
        assert_eq!(outcome, GestureOutcome::Started(GestureMode::Move));
        let rect = wm.pointer_move(Point::new(130, 40)).unwrap();
        assert_eq!(rect, FloatRect::new(80, 30, 200, 150));
        wm.pointer_up(Point::new(130, 40)).unwrap();
        assert!(
            rec.drain()
                .contains(&Notification::RectChanged(id, FloatRect::new(80, 30, 200, 150)))
        );
        assert_eq!(wm.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn resize_gesture_from_corner() {
        let (mut wm, _) = manager();
        let id = wm
            .open(FloatRect::new(100, 100, 300, 200), WindowOptions::default())
            .unwrap();
        let outcome = wm.pointer_down(Point::new(101, 101), Some(id)).unwrap();
        assert_eq!(
            outcome,
            GestureOutcome::Started(GestureMode::Resize(ResizeEdge::NorthWest))
        );
        wm.pointer_move(Point::new(81, 91)).unwrap();
        wm.pointer_up(Point::new(81, 91)).unwrap();
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(80, 90, 320, 210)
        );
    }

    #[test]
    fn activation_scenario() {
        let (mut wm, _) = manager();
        let a = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        let b = wm
            .open(FloatRect::new(40, 40, 500, 350), WindowOptions::default())
            .unwrap();
        let z = |wm: &WindowManager, id| wm.window(id).unwrap().z_index();
        assert!(z(&wm, b) > z(&wm, a));
        assert_eq!(wm.active(), Some(b));
        wm.set_active(a).unwrap();
        assert!(z(&wm, a) > z(&wm, b));
        assert_eq!(wm.active(), Some(a));
    }

    #[test]
    fn closed_window_is_unknown_everywhere() {
        let (mut wm, rec) = manager();
        let a = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        assert!(wm.close(a));
        assert!(rec.drain().contains(&Notification::Closed(a)));
        let unknown = Err(WmError::UnknownWindow(a));
        assert_eq!(wm.set_active(a), unknown);
        assert_eq!(wm.minimize(a), unknown);
        assert_eq!(wm.maximize(a), unknown);
        assert_eq!(wm.restore(a), unknown);
        assert_eq!(wm.hide(a), unknown);
        assert_eq!(wm.show(a), unknown);
        assert_eq!(wm.title_double_click(a), unknown);
        assert_eq!(
            wm.control_button_click(a, ControlButton::Close),
            unknown
        );
        assert_eq!(
            wm.pointer_down(Point::new(1, 1), Some(a)),
            Err(WmError::UnknownWindow(a))
        );
        assert!(!wm.close(a));
        assert_eq!(wm.active(), None);
    }

    #[test]
    fn maximize_uses_viewport_offset_and_taskbar() {
        let (mut wm, _) = manager();
        let original = FloatRect::new(30, 40, 500, 350);
        let id = wm.open(original, WindowOptions::default()).unwrap();
        wm.maximize(id).unwrap();
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(-5, -5, 1034, 749)
        );
        wm.set_viewport(Viewport::new(800, 600));
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(-5, -5, 810, 581)
        );
        wm.restore(id).unwrap();
        assert_eq!(wm.window(id).unwrap().rect(), original);
    }

    #[test]
    fn title_double_click_toggles() {
        let (mut wm, _) = manager();
        let id = wm
            .open(FloatRect::new(30, 40, 500, 350), WindowOptions::default())
            .unwrap();
        assert!(wm.title_double_click(id).unwrap());
        assert_eq!(wm.window(id).unwrap().state(), WindowState::Maximized);
        assert!(wm.title_double_click(id).unwrap());
        assert_eq!(wm.window(id).unwrap().state(), WindowState::Normal);
    }

    #[test]
    fn control_buttons_drive_lifecycle() {
        let (mut wm, _) = manager();
        let a = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        let b = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        assert!(wm.control_button_click(a, ControlButton::MaximizeRestore).unwrap());
        assert_eq!(wm.active(), Some(a));
        assert_eq!(wm.window(a).unwrap().state(), WindowState::Maximized);
        assert!(wm.control_button_click(a, ControlButton::Minimize).unwrap());
        assert_eq!(wm.window(a).unwrap().state(), WindowState::Minimized);
        assert!(wm.control_button_click(b, ControlButton::Close).unwrap());
        assert!(wm.window(b).is_err());
    }

    #[test]
    fn modal_buttons_and_blocking() {
        let (mut wm, _) = manager();
        let plain = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        let modal = wm
            .open(
                FloatRect::new(100, 100, 300, 200),
                WindowOptions::default().modal(),
            )
            .unwrap();
        assert!(!wm.control_button_click(modal, ControlButton::Close).unwrap());
        assert!(!wm.control_button_click(modal, ControlButton::Minimize).unwrap());
        assert!(!wm.control_button_click(plain, ControlButton::Minimize).unwrap());
        assert!(!wm.title_double_click(plain).unwrap());
        assert_eq!(
            wm.pointer_down(Point::new(10, 10), Some(plain)).unwrap(),
            GestureOutcome::Ignored
        );
        // programmatic close still works
        assert!(wm.close(modal));
        assert!(wm.control_button_click(plain, ControlButton::Minimize).unwrap());
    }

    #[test]
    fn taskbar_toggle_semantics() {
        let (mut wm, _) = manager();
        let a = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::titled("A"))
            .unwrap();
        let b = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::titled("B"))
            .unwrap();
        // active + normal -> minimize
        wm.taskbar_click(b).unwrap();
        assert_eq!(wm.window(b).unwrap().state(), WindowState::Minimized);
        assert_eq!(wm.active(), Some(b));
        // active + minimized -> restore
        wm.taskbar_click(b).unwrap();
        assert_eq!(wm.window(b).unwrap().state(), WindowState::Normal);
        // inactive -> activate
        wm.taskbar_click(a).unwrap();
        assert_eq!(wm.active(), Some(a));
        assert_eq!(wm.window(a).unwrap().state(), WindowState::Normal);
        assert!(wm.set_title(a, "A2").unwrap());
        let entries = wm.taskbar_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "A2");
        assert!(entries[0].active && !entries[1].active);
    }

    #[test]
    fn centered_window_follows_viewport_until_moved() {
        let (mut wm, _) = manager();
        let id = wm
            .open(FloatRect::new(0, 0, 400, 300), WindowOptions::default().centered())
            .unwrap();
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(312, 234, 400, 300)
        );
        wm.set_viewport(Viewport::new(800, 600));
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(200, 150, 400, 300)
        );
        wm.pointer_down(Point::new(300, 160), Some(id)).unwrap();
        wm.pointer_up(Point::new(310, 170)).unwrap();
        wm.set_viewport(Viewport::new(1000, 1000));
        assert_eq!(
            wm.window(id).unwrap().rect(),
            FloatRect::new(210, 160, 400, 300)
        );
    }

    #[test]
    fn confined_gestures_stay_on_screen() {
        let config = WmConfig {
            confine_to_viewport: true,
            ..WmConfig::default()
        };
        let mut wm = WindowManager::new(config);
        let id = wm
            .open(FloatRect::new(10, 10, 300, 200), WindowOptions::default())
            .unwrap();
        wm.pointer_down(Point::new(100, 20), Some(id)).unwrap();
        let rect = wm.pointer_move(Point::new(-500, -500)).unwrap();
        assert_eq!((rect.x, rect.y), (0, 0));
    }

    #[test]
    fn activate_hook_can_veto() {
        let (mut wm, _) = manager();
        let a = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        let b = wm
            .open(FloatRect::new(0, 0, 500, 350), WindowOptions::default())
            .unwrap();
        wm.hooks_mut()
            .add_listener(HookKind::Activate, move |id| {
                if id == a {
                    Propagation::Cancel
                } else {
                    Propagation::Continue
                }
            });
        assert!(!wm.set_active(a).unwrap());
        assert_eq!(wm.active(), Some(b));
    }

    #[test]
    fn observers_and_log_see_the_same_notifications() {
        let (mut wm, rec) = manager();
        wm.retain_notifications(true);
        let id = wm
            .open(FloatRect::new(0, 0, 300, 200), WindowOptions::default())
            .unwrap();
        wm.minimize(id).unwrap();
        let logged = wm.take_notifications();
        assert_eq!(logged, rec.drain());
        assert!(logged.contains(&Notification::StateChanged(id, WindowState::Minimized)));
        assert!(wm.take_notifications().is_empty());
    }

    #[test]
    fn nothing_is_kept_without_retention() {
        let (mut wm, rec) = manager();
        let id = wm
            .open(FloatRect::new(0, 0, 300, 200), WindowOptions::default())
            .unwrap();
        wm.pointer_down(Point::new(100, 10), Some(id)).unwrap();
        for step in 1..=500 {
            wm.pointer_move(Point::new(100 + step % 50, 10 + step % 30))
                .unwrap();
        }
        wm.pointer_up(Point::new(120, 20)).unwrap();
        assert!(rec.drain().len() > 500);
        assert!(wm.delivered.is_empty());
        assert!(wm.take_notifications().is_empty());

        wm.retain_notifications(true);
        wm.minimize(id).unwrap();
        assert!(!wm.delivered.is_empty());
        wm.retain_notifications(false);
        assert!(wm.take_notifications().is_empty());
    }

    #[test]
    fn title_change_reaches_observers() {
        let (mut wm, rec) = manager();
        let id = wm
            .open(FloatRect::new(0, 0, 300, 200), WindowOptions::titled("old"))
            .unwrap();
        rec.drain();
        assert!(wm.set_title(id, "new").unwrap());
        assert_eq!(rec.drain(), vec![Notification::TitleChanged(id)]);
        assert!(!wm.set_title(id, "new").unwrap());
        assert!(rec.drain().is_empty());
        assert_eq!(wm.taskbar_entries()[0].title, "new");
    }

    #[test]
    fn viewport_refit_notifies_observers() {
        let (mut wm, rec) = manager();
        let max = wm
            .open(FloatRect::new(0, 0, 300, 200), WindowOptions::default())
            .unwrap();
        let plain = wm
            .open(FloatRect::new(5, 5, 300, 200), WindowOptions::default())
            .unwrap();
        wm.maximize(max).unwrap();
        rec.drain();
        wm.set_viewport(Viewport::new(800, 600));
        let got = rec.drain();
        assert_eq!(
            got,
            vec![Notification::RectChanged(max, FloatRect::new(-5, -5, 810, 581))]
        );
        assert_eq!(wm.window(plain).unwrap().rect(), FloatRect::new(5, 5, 300, 200));
    }

    #[test]
    fn pointer_down_without_target_is_ignored() {
        let (mut wm, _) = manager();
        assert_eq!(
            wm.pointer_down(Point::new(0, 0), None).unwrap(),
            GestureOutcome::Ignored
        );
        assert_eq!(wm.pointer_up(Point::new(0, 0)), Err(WmError::InvalidGesture));
    }
}
