use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Rect, Viewport};
use crate::constants::SNAP_EDGE_THRESHOLD;

/// Half of the usable screen a window can be snapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl SnapEdge {
    pub const ALL: [SnapEdge; 4] = [
        SnapEdge::Left,
        SnapEdge::Right,
        SnapEdge::Top,
        SnapEdge::Bottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapEdge::Left => "left",
            SnapEdge::Right => "right",
            SnapEdge::Top => "top",
            SnapEdge::Bottom => "bottom",
        }
    }
}

impl fmt::Display for SnapEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapEdge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(SnapEdge::Left),
            "right" => Ok(SnapEdge::Right),
            "top" => Ok(SnapEdge::Top),
            "bottom" => Ok(SnapEdge::Bottom),
            other => Err(format!("unknown edge `{other}`")),
        }
    }
}

/// Rectangle filling the half of the usable viewport named by `edge`.
///
/// Left/right halves span the full usable height, top/bottom halves the full
/// width. With odd sizes the right and bottom halves take the extra pixel so
/// the two halves always tile the usable area exactly.
pub fn compute_snap_rect(
    edge: SnapEdge,
    viewport_width: i32,
    viewport_height: i32,
    reserved_bottom: i32,
) -> Rect {
    let width = viewport_width.max(0);
    let height = viewport_height.saturating_sub(reserved_bottom).max(0);
    let half_w = width / 2;
    let half_h = height / 2;
    match edge {
        SnapEdge::Left => Rect::new(0, 0, half_w, height),
        SnapEdge::Right => Rect::new(half_w, 0, width - half_w, height),
        SnapEdge::Top => Rect::new(0, 0, width, half_h),
        SnapEdge::Bottom => Rect::new(0, half_h, width, height - half_h),
    }
}

/// Drop target offered while a window header is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapZone {
    Half(SnapEdge),
    Maximize,
}

impl SnapZone {
    pub fn label(&self) -> &'static str {
        match self {
            SnapZone::Half(SnapEdge::Left) => "Snap Left",
            SnapZone::Half(SnapEdge::Right) => "Snap Right",
            SnapZone::Half(SnapEdge::Top) => "Snap Top",
            SnapZone::Half(SnapEdge::Bottom) => "Snap Bottom",
            SnapZone::Maximize => "Maximize",
        }
    }

    /// Outline an overlay would draw for this zone.
    pub fn preview_rect(&self, viewport: Viewport) -> Rect {
        match *self {
            SnapZone::Half(edge) => compute_snap_rect(
                edge,
                viewport.width,
                viewport.height,
                viewport.reserved_bottom,
            ),
            SnapZone::Maximize => viewport.usable_rect(),
        }
    }
}

/// Snap zone under the pointer, if any.
///
/// Left and right edges win over the top edge so dragging into a top corner
/// still offers a half snap.
pub fn snap_zone_at(pointer_x: i32, pointer_y: i32, viewport: Viewport) -> Option<SnapZone> {
    if pointer_x < SNAP_EDGE_THRESHOLD {
        Some(SnapZone::Half(SnapEdge::Left))
    } else if pointer_x > viewport.width.saturating_sub(SNAP_EDGE_THRESHOLD) {
        Some(SnapZone::Half(SnapEdge::Right))
    } else if pointer_y < SNAP_EDGE_THRESHOLD {
        Some(SnapZone::Maximize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_of_even_viewport() {
        assert_eq!(
            compute_snap_rect(SnapEdge::Left, 1280, 800, 40),
            Rect::new(0, 0, 640, 760)
        );
        assert_eq!(
            compute_snap_rect(SnapEdge::Right, 1280, 800, 40),
            Rect::new(640, 0, 640, 760)
        );
        assert_eq!(
            compute_snap_rect(SnapEdge::Top, 1280, 800, 40),
            Rect::new(0, 0, 1280, 380)
        );
        assert_eq!(
            compute_snap_rect(SnapEdge::Bottom, 1280, 800, 40),
            Rect::new(0, 380, 1280, 380)
        );
    }

    #[test]
    fn odd_viewport_halves_tile_exactly() {
        let left = compute_snap_rect(SnapEdge::Left, 1001, 600, 0);
        let right = compute_snap_rect(SnapEdge::Right, 1001, 600, 0);
        assert_eq!(left.right(), right.x);
        assert_eq!(left.width + right.width, 1001);
    }

    #[test]
    fn edge_parse_is_case_insensitive() {
        assert_eq!("LEFT".parse::<SnapEdge>(), Ok(SnapEdge::Left));
        assert!("middle".parse::<SnapEdge>().is_err());
        for edge in SnapEdge::ALL {
            assert_eq!(edge.to_string().parse::<SnapEdge>(), Ok(edge));
        }
    }

    #[test]
    fn pointer_zones() {
        let vp = Viewport::new(1280, 800, 80);
        assert_eq!(
            snap_zone_at(10, 400, vp),
            Some(SnapZone::Half(SnapEdge::Left))
        );
        assert_eq!(
            snap_zone_at(1270, 400, vp),
            Some(SnapZone::Half(SnapEdge::Right))
        );
        assert_eq!(snap_zone_at(600, 5, vp), Some(SnapZone::Maximize));
        assert_eq!(snap_zone_at(600, 400, vp), None);
        // corner prefers the side
        assert_eq!(
            snap_zone_at(5, 5, vp),
            Some(SnapZone::Half(SnapEdge::Left))
        );
        assert_eq!(
            SnapZone::Maximize.preview_rect(vp),
            Rect::new(0, 0, 1280, 720)
        );
    }
}
