//! Paints a [`WindowManager`] into a ratatui [`Buffer`].
//!
//! Windows are painted bottom to top so higher windows simply overwrite
//! lower ones. Minimized and hidden windows are skipped. Rects are taken in
//! buffer cells and clipped to the buffer area.

use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier, Style};

use crate::config::FrameZones;
use crate::layout::{ControlButton, FloatRect, control_button_rects};
use crate::window::{TaskbarEntry, Window, WindowId, WindowManager, WindowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub border: Style,
    pub active_border: Style,
    pub title: Style,
    pub active_title: Style,
    pub body: Style,
    pub button: Style,
    pub preview: Style,
    pub taskbar: Style,
    pub taskbar_active: Style,
    pub taskbar_minimized: Style,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            active_border: Style::default().fg(Color::Blue),
            title: Style::default().bg(Color::DarkGray).fg(Color::White),
            active_title: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            body: Style::default().bg(Color::Reset),
            button: Style::default().fg(Color::Black).bg(Color::Gray),
            preview: Style::default().fg(Color::Yellow),
            taskbar: Style::default().bg(Color::DarkGray).fg(Color::Black),
            taskbar_active: Style::default().bg(Color::Gray).fg(Color::Black),
            taskbar_minimized: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Black)
                .add_modifier(Modifier::DIM),
        }
    }
}

fn put(buf: &mut Buffer, x: i32, y: i32, symbol: &str, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

/// The part of `lo..hi` that lies inside `start..start + len`.
fn visible(lo: i32, hi: i32, start: u16, len: u16) -> Range<i32> {
    let start = i32::from(start);
    lo.max(start)..hi.min(start + i32::from(len))
}

fn put_str(buf: &mut Buffer, x: i32, y: i32, text: &str, max: i32, style: Style) {
    let mut tmp = [0u8; 4];
    for (idx, ch) in text.chars().take(max.max(0) as usize).enumerate() {
        put(buf, x + idx as i32, y, ch.encode_utf8(&mut tmp), style);
    }
}

fn draw_outline(buf: &mut Buffer, rect: FloatRect, style: Style) {
    if rect.width <= 0 || rect.height <= 0 {
        return;
    }
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
    let area = buf.area;
    for x in visible(left, right + 1, area.x, area.width) {
        let (t, b) = if x == left {
            ("┌", "└")
        } else if x == right {
            ("┐", "┘")
        } else {
            ("─", "─")
        };
        put(buf, x, top, t, style);
        if bottom > top {
            put(buf, x, bottom, b, style);
        }
    }
    for y in visible(top + 1, bottom, area.y, area.height) {
        put(buf, left, y, "│", style);
        if right > left {
            put(buf, right, y, "│", style);
        }
    }
}

fn button_glyph(button: ControlButton, state: WindowState) -> &'static str {
    match button {
        ControlButton::Close => "[x]",
        ControlButton::Minimize => "[_]",
        ControlButton::MaximizeRestore if state == WindowState::Maximized => "[=]",
        ControlButton::MaximizeRestore => "[+]",
    }
}

fn draw_window(buf: &mut Buffer, window: &Window, zones: &FrameZones, active: bool, style: &FrameStyle) {
    let rect = window.rect();
    let area = buf.area;
    let columns = visible(rect.x, rect.right(), area.x, area.width);
    for y in visible(rect.y, rect.bottom(), area.y, area.height) {
        for x in columns.clone() {
            put(buf, x, y, " ", style.body);
        }
    }
    let border = if active { style.active_border } else { style.border };
    draw_outline(buf, rect, border);

    let title_style = if active { style.active_title } else { style.title };
    let title_left = rect.x + zones.edges.left;
    let title_right = rect.right() - zones.edges.right;
    for row in 0..zones.title_height {
        let y = rect.y + zones.edges.top + row;
        for x in visible(title_left, title_right, area.x, area.width) {
            put(buf, x, y, " ", title_style);
        }
    }

    let buttons = control_button_rects(rect, zones, window.control_buttons());
    let text_right = buttons.last().map_or(title_right, |(_, r)| r.x);
    let title_y = rect.y + zones.edges.top;
    put_str(
        buf,
        title_left + 1,
        title_y,
        window.title(),
        text_right - title_left - 2,
        title_style,
    );
    for (button, r) in buttons {
        put_str(
            buf,
            r.x,
            r.y,
            button_glyph(button, window.state()),
            r.width,
            style.button,
        );
    }
}

fn taskbar_label(entry: &TaskbarEntry) -> String {
    if entry.title.is_empty() {
        format!(" {} ", entry.id)
    } else {
        format!(" {} ", entry.title)
    }
}

/// Column span of each taskbar button, left to right, clipped to `width`.
pub fn taskbar_layout(entries: &[TaskbarEntry], width: u16) -> Vec<(WindowId, u16, u16)> {
    let mut spans = Vec::with_capacity(entries.len());
    let mut x: u16 = 0;
    for entry in entries {
        if x >= width {
            break;
        }
        let len = taskbar_label(entry).chars().count() as u16;
        let len = len.min(width - x);
        spans.push((entry.id, x, len));
        x = x.saturating_add(len).saturating_add(1);
    }
    spans
}

/// Window whose taskbar button covers `column`.
pub fn taskbar_hit(entries: &[TaskbarEntry], width: u16, column: u16) -> Option<WindowId> {
    taskbar_layout(entries, width)
        .into_iter()
        .find(|(_, start, len)| column >= *start && column < start + len)
        .map(|(id, _, _)| id)
}

fn draw_taskbar(buf: &mut Buffer, entries: &[TaskbarEntry], style: &FrameStyle) {
    let area = buf.area;
    if area.height == 0 {
        return;
    }
    let y = i32::from(area.bottom() - 1);
    for x in area.left()..area.right() {
        put(buf, i32::from(x), y, " ", style.taskbar);
    }
    for (entry, (_, start, len)) in entries.iter().zip(taskbar_layout(entries, area.width)) {
        let entry_style = if entry.active {
            style.taskbar_active
        } else if entry.state == WindowState::Minimized {
            style.taskbar_minimized
        } else {
            style.taskbar
        };
        put_str(
            buf,
            i32::from(area.x + start),
            y,
            &taskbar_label(entry),
            i32::from(len),
            entry_style,
        );
    }
}

/// Paint every visible window, the gesture preview outline and, when the
/// manager reserves space for one, the taskbar on the bottom row.
pub fn render(wm: &WindowManager, buf: &mut Buffer, style: &FrameStyle) {
    let zones = wm.config().zones;
    let registry = wm.registry();
    for id in registry.stacking_order() {
        let Some(window) = registry.get(id) else {
            continue;
        };
        if !window.is_visible() {
            continue;
        }
        draw_window(buf, window, &zones, registry.is_active(id), style);
    }
    if let Some(session) = wm.session()
        && !session.live
    {
        draw_outline(buf, session.current_rect, style.preview);
    }
    if wm.config().taskbar_height > 0 {
        draw_taskbar(buf, &wm.taskbar_entries(), style);
    }
}
