pub mod floating;

pub use floating::*;

/// Signed rectangle in viewport pixel coordinates.
///
/// Width and height are signed so that intermediate gesture math can go
/// negative before the minimum-size clamp is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FloatRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        rect_contains(*self, point)
    }

    /// Floors every component at the matching component of `min`.
    ///
    /// `min.x`/`min.y` act as a (usually very negative) sentinel so windows
    /// can be dragged partially off-screen.
    pub fn clamp_to_min(self, min: FloatRect) -> FloatRect {
        FloatRect {
            x: self.x.max(min.x),
            y: self.y.max(min.y),
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }

    /// Translate `point` into coordinates relative to this rect's origin.
    pub fn localize(&self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of the client area windows are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn as_rect(&self) -> FloatRect {
        FloatRect::new(0, 0, self.width, self.height)
    }
}

/// Per-side thickness, used for frame hit zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Insets {
    pub const fn uniform(size: i32) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }
}

pub fn rect_contains(rect: FloatRect, point: Point) -> bool {
    if rect.width <= 0 || rect.height <= 0 {
        return false;
    }
    point.x >= rect.x && point.x < rect.right() && point.y >= rect.y && point.y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_to_min_floors_size_and_origin() {
        let min = FloatRect::new(-5000, -5000, 165, 100);
        let got = FloatRect::new(-6000, 10, 0, 0).clamp_to_min(min);
        assert_eq!(got, FloatRect::new(-5000, 10, 165, 100));
    }

    #[test]
    fn rect_contains_edge_cases() {
        let empty = FloatRect::new(0, 0, 0, 5);
        assert!(!rect_contains(empty, Point::new(0, 0)));
        let r = FloatRect::new(1, 1, 3, 3);
        assert!(rect_contains(r, Point::new(1, 1)));
        assert!(rect_contains(r, Point::new(3, 3)));
        assert!(!rect_contains(r, Point::new(4, 1)));
        assert!(!rect_contains(r, Point::new(0, 2)));
    }

    #[test]
    fn localize_is_relative_to_origin() {
        let r = FloatRect::new(-10, 20, 50, 50);
        assert_eq!(r.localize(Point::new(0, 25)), Point::new(10, 5));
    }
}
