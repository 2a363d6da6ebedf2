pub mod drag;
pub mod snap;

pub use drag::{HeaderDrag, ResizeDrag, ResizeEdge};
pub use snap::{SnapEdge, SnapZone, compute_snap_rect, snap_zone_at};

use serde::{Deserialize, Serialize};

/// Pixel rectangle with a signed origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

/// Desktop area supplied by the hosting UI layer.
///
/// `reserved_bottom` is the taskbar band; windows are never placed inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub reserved_bottom: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32, reserved_bottom: i32) -> Self {
        Self {
            width,
            height,
            reserved_bottom,
        }
    }

    /// Height left over once the taskbar band is removed.
    pub fn usable_height(&self) -> i32 {
        self.height.saturating_sub(self.reserved_bottom).max(0)
    }

    /// The rectangle a maximized window fills.
    pub fn usable_rect(&self) -> Rect {
        Rect::new(0, 0, self.width.max(0), self.usable_height())
    }
}

/// Bound `value` to `[min, max]`. When the bounds cross, `min` wins.
///
/// Unlike [`i32::clamp`] this never panics, which matters for viewports
/// smaller than the minimum window size.
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

/// Fit `rect` inside the usable part of a viewport.
///
/// Width and height are raised to the minimums and capped at the usable
/// space; the origin is then pulled in so the whole rectangle stays inside
/// `[0, viewport_width] x [0, viewport_height - reserved_bottom]`. When the
/// viewport is smaller than the minimum size the minimum wins and the
/// rectangle is pinned at the origin.
pub fn clamp_rect_to_viewport(
    rect: Rect,
    viewport_width: i32,
    viewport_height: i32,
    reserved_bottom: i32,
    min_width: i32,
    min_height: i32,
) -> Rect {
    let usable_height = viewport_height.saturating_sub(reserved_bottom).max(0);
    let width = clamp(rect.width, min_width, viewport_width);
    let height = clamp(rect.height, min_height, usable_height);
    let max_x = viewport_width.saturating_sub(width).max(0);
    let max_y = usable_height.saturating_sub(height).max(0);
    Rect {
        x: clamp(rect.x, 0, max_x),
        y: clamp(rect.y, 0, max_y),
        width,
        height,
    }
}

pub fn rect_contains(rect: Rect, x: i32, y: i32) -> bool {
    if rect.width <= 0 || rect.height <= 0 {
        return false;
    }
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_value() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-3, 0, 10), 0);
        assert_eq!(clamp(42, 0, 10), 10);
    }

    #[test]
    fn clamp_with_crossed_bounds_prefers_min() {
        assert_eq!(clamp(100, 300, 200), 300);
        assert_eq!(clamp(250, 300, 200), 300);
    }

    #[test]
    fn clamp_rect_pulls_offscreen_window_back() {
        let rect = Rect::new(1800, 900, 500, 400);
        let r = clamp_rect_to_viewport(rect, 1920, 1080, 40, 300, 200);
        assert_eq!(r, Rect::new(1420, 640, 500, 400));
    }

    #[test]
    fn clamp_rect_caps_size_to_usable_area() {
        let rect = Rect::new(-20, -20, 4000, 4000);
        let r = clamp_rect_to_viewport(rect, 1280, 800, 40, 300, 200);
        assert_eq!(r, Rect::new(0, 0, 1280, 760));
    }

    #[test]
    fn clamp_rect_raises_to_minimums() {
        let rect = Rect::new(10, 10, 50, 20);
        let r = clamp_rect_to_viewport(rect, 1280, 800, 40, 300, 200);
        assert_eq!(r.width, 300);
        assert_eq!(r.height, 200);
    }

    #[test]
    fn tiny_viewport_keeps_minimum_size_at_origin() {
        let rect = Rect::new(50, 50, 500, 400);
        let r = clamp_rect_to_viewport(rect, 200, 150, 40, 300, 200);
        assert_eq!(r, Rect::new(0, 0, 300, 200));
    }

    #[test]
    fn viewport_usable_rect_excludes_taskbar() {
        let vp = Viewport::new(1280, 800, 40);
        assert_eq!(vp.usable_height(), 760);
        assert_eq!(vp.usable_rect(), Rect::new(0, 0, 1280, 760));
        let squashed = Viewport::new(100, 30, 40);
        assert_eq!(squashed.usable_height(), 0);
    }

    #[test]
    fn rect_contains_edge_cases() {
        let empty = Rect::new(0, 0, 0, 5);
        assert!(!rect_contains(empty, 0, 0));
        let r = Rect::new(1, 1, 3, 3);
        assert!(rect_contains(r, 1, 1));
        assert!(!rect_contains(r, 4, 1));
    }
}
