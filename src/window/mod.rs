pub mod hooks;
pub mod notify;
pub mod registry;
pub mod state_machine;

mod window_manager;

use std::fmt;

use crate::config::WindowOptions;
use crate::layout::{ControlButton, FloatRect};

pub use hooks::{HookKind, Hooks, ListenerId, Propagation};
pub use notify::{Notification, WindowObserver};
pub use registry::WindowRegistry;
pub use state_machine::{GestureOutcome, GestureSession, GestureState, WindowStateMachine};
pub use window_manager::{TaskbarEntry, WindowManager};

/// Opaque window handle. Ids come from a per-registry counter and are never
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Hidden,
}

/// Stacking band. Every window in a higher band sits above every window in
/// a lower one; activation recency orders windows inside a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackLayer {
    Normal,
    AlwaysOnTop,
    Modal,
}

const ALL_BUTTONS: [ControlButton; 3] = [
    ControlButton::Close,
    ControlButton::MaximizeRestore,
    ControlButton::Minimize,
];
const CLOSE_ONLY: [ControlButton; 1] = [ControlButton::Close];

#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    title: String,
    rect: FloatRect,
    min_rect: FloatRect,
    state: WindowState,
    resizable: bool,
    moveable: bool,
    always_on_top: bool,
    modal: bool,
    modal_can_close: bool,
    show_content_while_moving: bool,
    center_horizontally: bool,
    center_vertically: bool,
    z_index: u64,
    restore_rect: Option<FloatRect>,
    // state to return to on show()
    shown_state: Option<WindowState>,
}

impl Window {
    fn new(id: WindowId, rect: FloatRect, options: WindowOptions, z_index: u64) -> Self {
        Self {
            id,
            title: options.title,
            rect,
            min_rect: options.min_rect,
            state: WindowState::Normal,
            resizable: options.resizable,
            moveable: options.moveable,
            always_on_top: options.always_on_top,
            modal: options.modal,
            modal_can_close: options.modal_can_close,
            show_content_while_moving: options.show_content_while_moving,
            center_horizontally: options.center_horizontally,
            center_vertically: options.center_vertically,
            z_index,
            restore_rect: None,
            shown_state: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn min_rect(&self) -> FloatRect {
        self.min_rect
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn moveable(&self) -> bool {
        self.moveable
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn show_content_while_moving(&self) -> bool {
        self.show_content_while_moving
    }

    pub fn restore_rect(&self) -> Option<FloatRect> {
        self.restore_rect
    }

    pub fn is_centered(&self) -> bool {
        self.center_horizontally || self.center_vertically
    }

    /// Normal and maximized windows are drawn; minimized and hidden ones
    /// are not.
    pub fn is_visible(&self) -> bool {
        matches!(self.state, WindowState::Normal | WindowState::Maximized)
    }

    pub fn layer(&self) -> StackLayer {
        if self.modal {
            StackLayer::Modal
        } else if self.always_on_top {
            StackLayer::AlwaysOnTop
        } else {
            StackLayer::Normal
        }
    }

    /// Title bar buttons, right to left. Modal windows get no minimize or
    /// maximize button and only get a close button when allowed to.
    pub fn control_buttons(&self) -> &'static [ControlButton] {
        match (self.modal, self.modal_can_close) {
            (false, _) => &ALL_BUTTONS,
            (true, true) => &CLOSE_ONLY,
            (true, false) => &[],
        }
    }

    pub fn has_button(&self, button: ControlButton) -> bool {
        self.control_buttons().contains(&button)
    }
}
