//! Pointer gestures that drive window moves and resizes.
//!
//! A gesture only records where it started. Every pointer-move event turns
//! into a target position or rectangle which the caller hands to
//! `move_window`/`resize`, so abandoning a gesture midway needs no rollback.

use super::Rect;
use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Title-bar drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag {
    pub id: WindowId,
    pub initial_x: i32,
    pub initial_y: i32,
    pub start_pointer_x: i32,
    pub start_pointer_y: i32,
}

impl HeaderDrag {
    pub fn new(id: WindowId, initial: Rect, pointer_x: i32, pointer_y: i32) -> Self {
        Self {
            id,
            initial_x: initial.x,
            initial_y: initial.y,
            start_pointer_x: pointer_x,
            start_pointer_y: pointer_y,
        }
    }

    /// Window origin for the current pointer position.
    pub fn target(&self, pointer_x: i32, pointer_y: i32) -> (i32, i32) {
        let dx = pointer_x - self.start_pointer_x;
        let dy = pointer_y - self.start_pointer_y;
        (self.initial_x + dx, self.initial_y + dy)
    }
}

/// Edge or corner drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub id: WindowId,
    pub edge: ResizeEdge,
    pub start_rect: Rect,
    pub start_pointer_x: i32,
    pub start_pointer_y: i32,
}

impl ResizeDrag {
    pub fn new(
        id: WindowId,
        edge: ResizeEdge,
        start_rect: Rect,
        pointer_x: i32,
        pointer_y: i32,
    ) -> Self {
        Self {
            id,
            edge,
            start_rect,
            start_pointer_x: pointer_x,
            start_pointer_y: pointer_y,
        }
    }

    pub fn target(&self, pointer_x: i32, pointer_y: i32) -> Rect {
        apply_resize_drag(
            self.start_rect,
            self.edge,
            pointer_x - self.start_pointer_x,
            pointer_y - self.start_pointer_y,
        )
    }
}

/// Rectangle produced by dragging `edge` of `start` by `(dx, dy)`.
///
/// The minimum window size is enforced here. When a left or top edge hits
/// the floor the origin is pushed back so the opposite edge stays put.
pub fn apply_resize_drag(start: Rect, edge: ResizeEdge, dx: i32, dy: i32) -> Rect {
    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if edge.moves_left() {
        x += dx;
        width -= dx;
    } else if edge.moves_right() {
        width += dx;
    }
    if edge.moves_top() {
        y += dy;
        height -= dy;
    } else if edge.moves_bottom() {
        height += dy;
    }

    if width < MIN_WINDOW_WIDTH {
        if edge.moves_left() {
            x -= MIN_WINDOW_WIDTH - width;
        }
        width = MIN_WINDOW_WIDTH;
    }
    if height < MIN_WINDOW_HEIGHT {
        if edge.moves_top() {
            y -= MIN_WINDOW_HEIGHT - height;
        }
        height = MIN_WINDOW_HEIGHT;
    }

    Rect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_drag_follows_pointer_delta() {
        let drag = HeaderDrag::new(WindowId(1), Rect::new(100, 120, 500, 400), 300, 130);
        assert_eq!(drag.target(340, 100), (140, 90));
        assert_eq!(drag.target(300, 130), (100, 120));
    }

    #[test]
    fn resize_top_drag_down() {
        let start = Rect::new(0, 50, 400, 300);
        let res = apply_resize_drag(start, ResizeEdge::Top, 0, 5);
        assert_eq!(res, Rect::new(0, 55, 400, 295));
    }

    #[test]
    fn resize_bottom_right_grows_both_axes() {
        let start = Rect::new(10, 10, 500, 400);
        let res = apply_resize_drag(start, ResizeEdge::BottomRight, 40, -20);
        assert_eq!(res, Rect::new(10, 10, 540, 380));
    }

    #[test]
    fn resize_left_past_floor_pins_right_edge() {
        let start = Rect::new(100, 100, 400, 300);
        let res = apply_resize_drag(start, ResizeEdge::Left, 250, 0);
        assert_eq!(res.width, MIN_WINDOW_WIDTH);
        assert_eq!(res.right(), start.right());
    }

    #[test]
    fn resize_drag_tracks_from_start_rect() {
        let drag = ResizeDrag::new(
            WindowId(3),
            ResizeEdge::Bottom,
            Rect::new(0, 0, 500, 400),
            250,
            400,
        );
        assert_eq!(drag.target(250, 300).height, 300);
        assert_eq!(drag.target(250, 100).height, MIN_WINDOW_HEIGHT);
    }
}
