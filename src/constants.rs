//! Shared crate-wide constants.

/// Smallest width a window may take, in pixels.
pub const MIN_WINDOW_WIDTH: i32 = 300;

/// Smallest height a window may take, in pixels.
pub const MIN_WINDOW_HEIGHT: i32 = 200;

/// Size used for a window whose app has no remembered layout.
pub const DEFAULT_WINDOW_WIDTH: i32 = 500;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 400;

/// Top-left anchor for windows without a remembered layout. A jitter in
/// `0..DEFAULT_JITTER_SPAN` is added on each axis so consecutive opens do not
/// stack exactly on top of each other.
pub const DEFAULT_ANCHOR: i32 = 100;
pub const DEFAULT_JITTER_SPAN: i32 = 50;

/// Height of the taskbar band kept clear at the bottom of the viewport when
/// the host does not say otherwise.
pub const DEFAULT_RESERVED_BOTTOM: i32 = 40;

/// Distance from a viewport edge, in pixels, at which a dragged pointer
/// enters a snap zone.
///
/// Left and right edges snap to halves; the top edge maximizes. The bottom
/// edge is not a drag target because the taskbar lives there.
pub const SNAP_EDGE_THRESHOLD: i32 = 50;
