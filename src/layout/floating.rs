use super::{FloatRect, Point, Viewport};

use crate::config::FrameZones;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::North,
        ResizeEdge::South,
        ResizeEdge::East,
        ResizeEdge::West,
        ResizeEdge::NorthEast,
        ResizeEdge::NorthWest,
        ResizeEdge::SouthEast,
        ResizeEdge::SouthWest,
    ];

    fn horizontal(self) -> AxisEdge {
        match self {
            ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest => AxisEdge::Start,
            ResizeEdge::East | ResizeEdge::NorthEast | ResizeEdge::SouthEast => AxisEdge::End,
            ResizeEdge::North | ResizeEdge::South => AxisEdge::Pinned,
        }
    }

    fn vertical(self) -> AxisEdge {
        match self {
            ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest => AxisEdge::Start,
            ResizeEdge::South | ResizeEdge::SouthEast | ResizeEdge::SouthWest => AxisEdge::End,
            ResizeEdge::East | ResizeEdge::West => AxisEdge::Pinned,
        }
    }
}

/// What a pointer-down on a window frame turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureMode {
    Move,
    Resize(ResizeEdge),
}

/// Title bar buttons, laid out right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlButton {
    Close,
    MaximizeRestore,
    Minimize,
}

/// Which side of one axis a resize drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisEdge {
    /// West or north: the origin follows the pointer, the far edge stays put.
    Start,
    /// East or south: the size follows the pointer, the origin stays put.
    End,
    Pinned,
}

/// Compute the rect a gesture produces for the current pointer position.
///
/// Everything is derived from the fixed anchor, so repeated or dropped move
/// events never accumulate error. Width and height are floored at
/// `min_rect`; the origin is floored at `min_rect.x/y`, which by default is a
/// far off-screen sentinel. When `viewport` is `Some`, moving edges (or the
/// whole window for a move) are additionally confined to it before the
/// minimum-size floor is applied.
pub fn compute_rect(
    anchor_rect: FloatRect,
    anchor_pointer: Point,
    current_pointer: Point,
    mode: GestureMode,
    min_rect: FloatRect,
    viewport: Option<Viewport>,
) -> FloatRect {
    let dx = current_pointer.x.saturating_sub(anchor_pointer.x);
    let dy = current_pointer.y.saturating_sub(anchor_pointer.y);
    match mode {
        GestureMode::Move => move_rect(anchor_rect, dx, dy, min_rect, viewport),
        GestureMode::Resize(edge) => {
            let (x, width) = resize_axis(
                anchor_rect.x,
                anchor_rect.width,
                dx,
                edge.horizontal(),
                min_rect.x,
                min_rect.width,
                viewport.map(|v| v.width),
            );
            let (y, height) = resize_axis(
                anchor_rect.y,
                anchor_rect.height,
                dy,
                edge.vertical(),
                min_rect.y,
                min_rect.height,
                viewport.map(|v| v.height),
            );
            FloatRect {
                x,
                y,
                width,
                height,
            }
        }
    }
}

fn move_rect(
    anchor: FloatRect,
    dx: i32,
    dy: i32,
    min_rect: FloatRect,
    viewport: Option<Viewport>,
) -> FloatRect {
    let mut x = anchor.x.saturating_add(dx);
    let mut y = anchor.y.saturating_add(dy);
    if let Some(viewport) = viewport {
        x = x.min(viewport.width.saturating_sub(anchor.width)).max(0);
        y = y.min(viewport.height.saturating_sub(anchor.height)).max(0);
    }
    // size is never touched by a move, even if the anchor is under the floor
    FloatRect {
        x: x.max(min_rect.x),
        y: y.max(min_rect.y),
        width: anchor.width,
        height: anchor.height,
    }
}

fn resize_axis(
    origin: i32,
    size: i32,
    delta: i32,
    edge: AxisEdge,
    min_origin: i32,
    min_size: i32,
    limit: Option<i32>,
) -> (i32, i32) {
    match edge {
        AxisEdge::Pinned => (origin, size.max(min_size)),
        AxisEdge::Start => {
            let far = origin.saturating_add(size);
            let mut start = origin.saturating_add(delta);
            if limit.is_some() {
                start = start.max(0);
            }
            start = start.max(min_origin);
            let mut size = far.saturating_sub(start);
            if size < min_size {
                size = min_size;
                start = far.saturating_sub(min_size);
            }
            (start, size)
        }
        AxisEdge::End => {
            let mut end = origin.saturating_add(size).saturating_add(delta);
            if let Some(limit) = limit {
                end = end.min(limit);
            }
            (origin, end.saturating_sub(origin).max(min_size))
        }
    }
}

/// Classify a pointer-down at `point` (viewport coordinates) against the
/// frame of a window occupying `rect`.
///
/// Corner zones win over edge zones and edge zones win over the title bar.
/// Resize zones are only reported for resizable windows and the title bar
/// only for moveable ones.
pub fn hit_test(
    rect: FloatRect,
    point: Point,
    zones: &FrameZones,
    resizable: bool,
    moveable: bool,
) -> Option<GestureMode> {
    if !rect.contains(point) {
        return None;
    }
    let local = rect.localize(point);
    let (w, h) = (rect.width, rect.height);

    if resizable {
        let top = local.y < zones.corner_height;
        let bottom = local.y >= h - zones.corner_height;
        let left = local.x < zones.corner_width;
        let right = local.x >= w - zones.corner_width;
        let corner = if top && right {
            Some(ResizeEdge::NorthEast)
        } else if bottom && right {
            Some(ResizeEdge::SouthEast)
        } else if bottom && left {
            Some(ResizeEdge::SouthWest)
        } else if top && left {
            Some(ResizeEdge::NorthWest)
        } else {
            None
        };
        if let Some(edge) = corner {
            return Some(GestureMode::Resize(edge));
        }

        let edge = if local.y < zones.edges.top {
            Some(ResizeEdge::North)
        } else if local.y >= h - zones.edges.bottom {
            Some(ResizeEdge::South)
        } else if local.x >= w - zones.edges.right {
            Some(ResizeEdge::East)
        } else if local.x < zones.edges.left {
            Some(ResizeEdge::West)
        } else {
            None
        };
        if let Some(edge) = edge {
            return Some(GestureMode::Resize(edge));
        }
    }

    if moveable && local.y < zones.edges.top + zones.title_height {
        return Some(GestureMode::Move);
    }
    None
}

/// Title bar button rects for `buttons`, given right to left.
pub fn control_button_rects(
    rect: FloatRect,
    zones: &FrameZones,
    buttons: &[ControlButton],
) -> Vec<(ControlButton, FloatRect)> {
    let height = zones.button_height.min(zones.title_height);
    let y = rect.y + zones.edges.top;
    let mut right = rect.right() - zones.edges.right;
    let mut out = Vec::with_capacity(buttons.len());
    for button in buttons {
        let x = right - zones.button_width;
        if x < rect.x + zones.edges.left {
            break;
        }
        out.push((*button, FloatRect::new(x, y, zones.button_width, height)));
        right = x - zones.button_gap;
    }
    out
}

pub fn control_button_at(
    rect: FloatRect,
    point: Point,
    zones: &FrameZones,
    buttons: &[ControlButton],
) -> Option<ControlButton> {
    control_button_rects(rect, zones, buttons)
        .into_iter()
        .find(|(_, r)| r.contains(point))
        .map(|(button, _)| button)
}

/// Rect of a maximized window: the viewport grown by `offset` (so borders
/// can sit outside the visible area) minus whatever is reserved at the
/// bottom for a taskbar.
pub fn maximized_rect(viewport: Viewport, offset: FloatRect, reserve_bottom: i32) -> FloatRect {
    FloatRect {
        x: offset.x,
        y: offset.y,
        width: viewport.width + offset.width,
        height: viewport.height + offset.height - reserve_bottom,
    }
}

/// Re-centre `rect` inside `viewport` along the requested axes.
pub fn centered(rect: FloatRect, viewport: Viewport, horizontal: bool, vertical: bool) -> FloatRect {
    let mut out = rect;
    if horizontal {
        out.x = viewport.width / 2 - rect.width / 2;
    }
    if vertical {
        out.y = viewport.height / 2 - rect.height / 2;
    }
    out
}
