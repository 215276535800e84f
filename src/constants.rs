//! Shared crate-wide constants.

use crate::layout::FloatRect;

/// Default floor for window rects. The origin components are a sentinel far
/// enough off-screen that dragging is effectively unbounded.
pub const DEFAULT_MIN_RECT: FloatRect = FloatRect::new(-5000, -5000, 165, 100);

/// Added to the viewport when maximizing so the resize border ends up just
/// outside the visible area.
pub const MAXIMIZE_OFFSET: FloatRect = FloatRect::new(-5, -5, 10, 10);

pub const DEFAULT_EDGE_THICKNESS: i32 = 6;
pub const DEFAULT_CORNER_SIZE: i32 = 6;
pub const DEFAULT_TITLE_HEIGHT: i32 = 25;
pub const DEFAULT_BUTTON_WIDTH: i32 = 34;
pub const DEFAULT_BUTTON_HEIGHT: i32 = 26;
pub const DEFAULT_BUTTON_GAP: i32 = 2;

/// Height of the taskbar strip, reserved at the bottom when maximizing.
pub const DEFAULT_TASKBAR_HEIGHT: i32 = 29;

pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 400;

