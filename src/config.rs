//! Configuration structs with their defaults resolved up front.
//!
//! Pixel defaults: 6px resize borders, a 25px title bar, 34x26 title
//! buttons, a 165x100 minimum window and a maximize offset that pushes the
//! border just outside the viewport.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BUTTON_GAP, DEFAULT_BUTTON_HEIGHT, DEFAULT_BUTTON_WIDTH, DEFAULT_CORNER_SIZE,
    DEFAULT_DOUBLE_CLICK_MS, DEFAULT_EDGE_THICKNESS, DEFAULT_MIN_RECT, DEFAULT_TASKBAR_HEIGHT,
    DEFAULT_TITLE_HEIGHT, MAXIMIZE_OFFSET,
};
use crate::layout::{FloatRect, Insets, Viewport};

/// Widths of the hit zones around a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameZones {
    /// Resize border thickness per side.
    pub edges: Insets,
    /// Corner zones are `corner_width` x `corner_height` squares and take
    /// priority over the edges they overlap.
    pub corner_width: i32,
    pub corner_height: i32,
    /// Height of the title bar below the top border. Pointer-down here moves
    /// the window.
    pub title_height: i32,
    pub button_width: i32,
    pub button_height: i32,
    pub button_gap: i32,
}

impl Default for FrameZones {
    fn default() -> Self {
        Self {
            edges: Insets::uniform(DEFAULT_EDGE_THICKNESS),
            corner_width: DEFAULT_CORNER_SIZE,
            corner_height: DEFAULT_CORNER_SIZE,
            title_height: DEFAULT_TITLE_HEIGHT,
            button_width: DEFAULT_BUTTON_WIDTH,
            button_height: DEFAULT_BUTTON_HEIGHT,
            button_gap: DEFAULT_BUTTON_GAP,
        }
    }
}

impl FrameZones {
    /// Zones sized for terminal cells: one-cell borders, a one-row title
    /// directly below the top border and three-cell buttons.
    pub fn terminal() -> Self {
        Self {
            edges: Insets::uniform(1),
            corner_width: 2,
            corner_height: 1,
            title_height: 1,
            button_width: 3,
            button_height: 1,
            button_gap: 0,
        }
    }
}

/// Per-window flags supplied to `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    /// Floor for the window rect. `x`/`y` are a far off-screen sentinel so
    /// windows can be dragged partially out of view.
    pub min_rect: FloatRect,
    pub resizable: bool,
    pub moveable: bool,
    /// Stack above ordinary windows regardless of activation order.
    pub always_on_top: bool,
    /// Stack above every non-modal window and block pointer input to them.
    pub modal: bool,
    /// Modal windows only get a close button when this is set.
    pub modal_can_close: bool,
    /// When false, gestures update a preview outline and the window rect is
    /// committed on release.
    pub show_content_while_moving: bool,
    /// Keep the window centred when the viewport changes, until the user
    /// moves it.
    pub center_horizontally: bool,
    pub center_vertically: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            min_rect: DEFAULT_MIN_RECT,
            resizable: true,
            moveable: true,
            always_on_top: false,
            modal: false,
            modal_can_close: false,
            show_content_while_moving: true,
            center_horizontally: false,
            center_vertically: false,
        }
    }
}

impl WindowOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// A modal window has no minimize or maximize buttons, and no close
    /// button unless `modal_can_close` is also set.
    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    /// Give a modal window its close button. Implies `modal`.
    pub fn modal_can_close(mut self) -> Self {
        self.modal = true;
        self.modal_can_close = true;
        self
    }

    pub fn always_on_top(mut self) -> Self {
        self.always_on_top = true;
        self
    }

    pub fn with_min_rect(mut self, min_rect: FloatRect) -> Self {
        self.min_rect = min_rect;
        self
    }

    pub fn centered(mut self) -> Self {
        self.center_horizontally = true;
        self.center_vertically = true;
        self
    }
}

/// Manager-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmConfig {
    pub zones: FrameZones,
    /// Added to the viewport rect when maximizing.
    pub maximize_offset: FloatRect,
    /// Height kept free at the bottom of the viewport for a taskbar when
    /// maximizing. Zero when there is no taskbar.
    pub taskbar_height: i32,
    /// Two title-bar presses within this interval count as a double click.
    pub double_click: Duration,
    /// Confine move and resize gestures to the viewport instead of allowing
    /// windows to be dragged off-screen.
    pub confine_to_viewport: bool,
    pub initial_viewport: Viewport,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            zones: FrameZones::default(),
            maximize_offset: MAXIMIZE_OFFSET,
            taskbar_height: DEFAULT_TASKBAR_HEIGHT,
            double_click: Duration::from_millis(DEFAULT_DOUBLE_CLICK_MS),
            confine_to_viewport: false,
            initial_viewport: Viewport::new(1024, 768),
        }
    }
}

impl WmConfig {
    /// Cell-based preset used by the terminal front end.
    pub fn terminal(viewport: Viewport) -> Self {
        Self {
            zones: FrameZones::terminal(),
            maximize_offset: FloatRect::default(),
            taskbar_height: 1,
            initial_viewport: viewport,
            ..Self::default()
        }
    }
}
