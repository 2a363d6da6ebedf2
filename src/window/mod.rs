mod collection;
pub mod memory;
mod window_manager;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::{Rect, Viewport};

pub use collection::{InvariantViolation, WindowCollection};
pub use memory::{Layout, LayoutMemory};
pub use window_manager::{
    HydrationTicket, Snapshot, SubscriptionId, WindowManager, WindowManagerOptions,
};

/// Opaque window identifier, unique for the lifetime of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(WindowId)
    }
}

/// One open window.
///
/// While `maximized` is set the geometry fields keep the windowed rectangle
/// so restoring needs no extra bookkeeping; see
/// [`WindowInstance::effective_rect`] for what should be painted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInstance {
    pub id: WindowId,
    pub app_id: String,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub minimized: bool,
    pub maximized: bool,
    pub z_index: u32,
}

impl WindowInstance {
    /// The windowed geometry, ignoring `maximized`.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Geometry a renderer should use.
    pub fn effective_rect(&self, viewport: Option<Viewport>) -> Rect {
        match viewport {
            Some(viewport) if self.maximized => viewport.usable_rect(),
            _ => self.rect(),
        }
    }

    pub fn layout(&self) -> Layout {
        Layout {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            maximized: self.maximized,
        }
    }
}
