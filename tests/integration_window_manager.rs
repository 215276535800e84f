use std::cell::RefCell;
use std::rc::Rc;

use frame_wm::layout::{ControlButton, FloatRect, Point};
use frame_wm::window::{
    GestureOutcome, HookKind, Notification, Propagation, WindowObserver, WindowState,
};
use frame_wm::{WindowManager, WindowOptions, WmConfig, WmError};

#[derive(Clone, Default)]
struct Changes {
    rects: Rc<RefCell<Vec<FloatRect>>>,
    states: Rc<RefCell<Vec<WindowState>>>,
    z: Rc<RefCell<Vec<u64>>>,
}

impl WindowObserver for Changes {
    fn on_rect_changed(&mut self, _id: frame_wm::WindowId, rect: FloatRect) {
        self.rects.borrow_mut().push(rect);
    }

    fn on_state_changed(&mut self, _id: frame_wm::WindowId, state: WindowState) {
        self.states.borrow_mut().push(state);
    }

    fn on_z_index_changed(&mut self, _id: frame_wm::WindowId, z: u64) {
        self.z.borrow_mut().push(z);
    }
}

fn open(wm: &mut WindowManager, rect: FloatRect) -> frame_wm::WindowId {
    wm.open(rect, WindowOptions::default()).unwrap()
}

#[test]
fn open_zero_size_yields_min_size() {
    let mut wm = WindowManager::default();
    let id = open(&mut wm, FloatRect::new(0, 0, 0, 0));
    assert_eq!(wm.window(id).unwrap().rect(), FloatRect::new(0, 0, 165, 100));
}

#[test]
fn invalid_min_rect_is_rejected() {
    let mut wm = WindowManager::default();
    let options = WindowOptions::default().with_min_rect(FloatRect::new(0, 0, 0, 0));
    let err = wm.open(FloatRect::new(0, 0, 0, 10), options).unwrap_err();
    assert_eq!(err, WmError::InvalidRect { width: 0, height: 10 });
    assert!(wm.registry().is_empty());
}

#[test]
fn z_indices_strictly_increase_through_observer() {
    let mut wm = WindowManager::default();
    let changes = Changes::default();
    wm.add_observer(Box::new(changes.clone()));
    let a = open(&mut wm, FloatRect::new(0, 0, 500, 350));
    let b = open(&mut wm, FloatRect::new(0, 0, 500, 350));
    for _ in 0..20 {
        wm.set_active(a).unwrap();
        wm.set_active(b).unwrap();
    }
    let z = changes.z.borrow();
    assert!(z.windows(2).all(|pair| pair[0] < pair[1]), "{z:?}");
}

#[test]
fn activation_reorders_two_windows() {
    let mut wm = WindowManager::default();
    let a = open(&mut wm, FloatRect::new(0, 0, 500, 350));
    let b = open(&mut wm, FloatRect::new(0, 0, 500, 350));
    assert_eq!(wm.registry().stacking_order(), vec![a, b]);
    assert_eq!(wm.active(), Some(b));
    wm.set_active(a).unwrap();
    assert_eq!(wm.registry().stacking_order(), vec![b, a]);
    assert_eq!(wm.active(), Some(a));
}

#[test]
fn maximize_then_restore_round_trips_rect() {
    let mut wm = WindowManager::new(WmConfig::default());
    let changes = Changes::default();
    wm.add_observer(Box::new(changes.clone()));
    let original = FloatRect::new(120, 80, 400, 300);
    let id = open(&mut wm, original);
    wm.maximize(id).unwrap();
    wm.restore(id).unwrap();
    assert_eq!(wm.window(id).unwrap().rect(), original);
    assert_eq!(
        *changes.states.borrow(),
        vec![WindowState::Normal, WindowState::Maximized, WindowState::Normal]
    );
    assert_eq!(changes.rects.borrow().last(), Some(&original));
}

#[test]
fn hooks_see_lifecycle_in_order() {
    let mut wm = WindowManager::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        HookKind::Minimize,
        HookKind::Maximize,
        HookKind::Restore,
        HookKind::Resize,
        HookKind::Close,
    ] {
        let seen = Rc::clone(&seen);
        wm.hooks_mut().add_listener(kind, move |_| {
            seen.borrow_mut().push(kind);
            Propagation::Continue
        });
    }
    let id = open(&mut wm, FloatRect::new(0, 0, 400, 300));
    wm.maximize(id).unwrap();
    wm.restore(id).unwrap();
    wm.minimize(id).unwrap();
    assert!(wm.close(id));
    assert_eq!(
        *seen.borrow(),
        vec![
            HookKind::Maximize,
            HookKind::Resize,
            HookKind::Restore,
            HookKind::Resize,
            HookKind::Minimize,
            HookKind::Close,
        ]
    );
}

#[test]
fn closed_window_rejects_further_operations() {
    let mut wm = WindowManager::default();
    wm.retain_notifications(true);
    let a = open(&mut wm, FloatRect::new(0, 0, 500, 350));
    assert!(wm.close(a));
    assert!(!wm.close(a));
    assert_eq!(wm.minimize(a), Err(WmError::UnknownWindow(a)));
    assert_eq!(wm.taskbar_click(a), Err(WmError::UnknownWindow(a)));
    assert!(wm.take_notifications().contains(&Notification::Closed(a)));
}

#[test]
fn drag_scenario_through_manager() {
    let mut wm = WindowManager::default();
    let id = open(&mut wm, FloatRect::new(50, 50, 200, 150));
    let outcome = wm.pointer_down(Point::new(100, 60), Some(id)).unwrap();
    assert!(matches!(outcome, GestureOutcome::Started(_)));
    for step in 0..=30 {
        wm.pointer_move(Point::new(100 + step, 60 - step)).unwrap();
    }
    let rect = wm.pointer_up(Point::new(130, 30)).unwrap();
    assert_eq!(rect, FloatRect::new(80, 20, 200, 150));
    assert_eq!(wm.pointer_move(Point::new(0, 0)), Err(WmError::InvalidGesture));
}

#[test]
fn modal_dialog_flow() {
    let mut wm = WindowManager::default();
    let main = open(&mut wm, FloatRect::new(0, 0, 600, 400));
    let dialog = wm
        .open(
            FloatRect::new(0, 0, 300, 150),
            WindowOptions::titled("Confirm").modal_can_close().centered(),
        )
        .unwrap();
    assert_eq!(
        wm.pointer_down(Point::new(100, 10), Some(main)).unwrap(),
        GestureOutcome::Ignored
    );
    wm.set_active(main).unwrap();
    assert_eq!(wm.registry().stacking_order(), vec![main, dialog]);
    assert!(!wm.control_button_click(dialog, ControlButton::Minimize).unwrap());
    assert!(wm.control_button_click(dialog, ControlButton::Close).unwrap());
    assert!(wm.control_button_click(main, ControlButton::Minimize).unwrap());
    assert_eq!(wm.window(main).unwrap().state(), WindowState::Minimized);
}
