use std::collections::BTreeSet;

use thiserror::Error;

use super::memory::LayoutMemory;
use super::{WindowId, WindowInstance};
use crate::constants::{
    DEFAULT_ANCHOR, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH,
};
use crate::layout::{Rect, SnapEdge, Viewport, clamp, clamp_rect_to_viewport, compute_snap_rect};

/// A broken collection invariant. Only produced by [`WindowCollection::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("window id {0} appears more than once")]
    DuplicateId(WindowId),
    #[error("z-order is not dense: expected 1..={expected}, found {found:?}")]
    SparseZOrder { expected: usize, found: Vec<u32> },
    #[error("window {id} is {width}x{height}, below the minimum size")]
    BelowMinimumSize {
        id: WindowId,
        width: i32,
        height: i32,
    },
}

/// Live windows in creation order.
///
/// Every mutation leaves the collection valid: ids are unique, `z_index`
/// values are exactly `1..=N`, and no window is smaller than the minimum
/// size. Operations addressed to an unknown id do nothing and return
/// `false`.
#[derive(Debug, Clone)]
pub struct WindowCollection {
    windows: Vec<WindowInstance>,
    next_window_seq: u64,
}

impl Default for WindowCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowCollection {
    /// Empty collection; the first window opened gets id 1.
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            next_window_seq: 1,
        }
    }

    pub fn windows(&self) -> &[WindowInstance] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowInstance> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Front-most window that is not minimized.
    pub fn active(&self) -> Option<&WindowInstance> {
        self.windows
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.z_index)
    }

    /// Ids ordered back to front.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        self.stacking_indices()
            .into_iter()
            .map(|idx| self.windows[idx].id)
            .collect()
    }

    fn stacking_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.windows.len()).collect();
        // stable: ties keep collection order
        order.sort_by_key(|&idx| self.windows[idx].z_index);
        order
    }

    fn renumber(&mut self, order: &[usize]) {
        for (rank, &idx) in order.iter().enumerate() {
            self.windows[idx].z_index = rank as u32 + 1;
        }
    }

    fn normalize(&mut self) {
        let order = self.stacking_indices();
        self.renumber(&order);
    }

    /// Create a window for `app_id` and put it in front.
    ///
    /// Geometry comes from `memory` when the app has been placed before,
    /// otherwise from the default anchor shifted by `jitter`. It is clamped
    /// to `viewport` when one is known.
    pub fn open(
        &mut self,
        app_id: &str,
        title: &str,
        memory: &LayoutMemory,
        viewport: Option<Viewport>,
        jitter: (i32, i32),
    ) -> WindowId {
        let (rect, maximized) = match memory.get(app_id) {
            Some(layout) => (layout.rect(), layout.maximized),
            None => (
                Rect::new(
                    DEFAULT_ANCHOR + jitter.0,
                    DEFAULT_ANCHOR + jitter.1,
                    DEFAULT_WINDOW_WIDTH,
                    DEFAULT_WINDOW_HEIGHT,
                ),
                false,
            ),
        };
        let rect = fit(rect, viewport);

        let id = WindowId(self.next_window_seq);
        self.next_window_seq = self.next_window_seq.saturating_add(1);
        let top = self.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
        self.windows.push(WindowInstance {
            id,
            app_id: app_id.to_string(),
            title: title.to_string(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            minimized: false,
            maximized,
            z_index: top + 1,
        });
        self.normalize();
        tracing::debug!(window_id = %id, app_id, ?rect, maximized, "opened window");
        id
    }

    pub fn close(&mut self, id: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        if self.windows.len() == before {
            return false;
        }
        self.normalize();
        tracing::debug!(window_id = %id, "closed window");
        true
    }

    /// Returns `false` when there was nothing to close.
    pub fn close_all(&mut self) -> bool {
        if self.windows.is_empty() {
            return false;
        }
        tracing::debug!(count = self.windows.len(), "closing all windows");
        self.windows.clear();
        true
    }

    /// Flip `minimized`. Stacking order is left alone so restoring the
    /// window puts it back exactly where it was.
    pub fn minimize_toggle(&mut self, id: WindowId) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        window.minimized = !window.minimized;
        tracing::debug!(window_id = %id, minimized = window.minimized, "toggled minimize");
        true
    }

    /// Minimize everything. Returns whether any window changed.
    pub fn minimize_all(&mut self) -> bool {
        let mut changed = false;
        for window in self.windows.iter_mut().filter(|w| !w.minimized) {
            window.minimized = true;
            changed = true;
        }
        changed
    }

    /// Flip `maximized`, remember the windowed geometry with the new flag,
    /// and bring the window to the front.
    pub fn maximize_toggle(&mut self, id: WindowId, memory: &mut LayoutMemory) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        window.maximized = !window.maximized;
        tracing::debug!(window_id = %id, maximized = window.maximized, "toggled maximize");
        memory.set(window.app_id.clone(), window.layout());
        self.focus(id)
    }

    /// Move `id` to the top of the stack, keeping everyone else's relative
    /// order, and renumber `1..=N`.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(target) = self.windows.iter().position(|w| w.id == id) else {
            return false;
        };
        let mut order = self.stacking_indices();
        order.retain(|&idx| idx != target);
        order.push(target);
        self.renumber(&order);
        true
    }

    /// Set the window origin. With a viewport the result is clamped so the
    /// window stays fully inside the usable area.
    ///
    /// Returns `false` when neither the window nor its remembered layout
    /// changed, e.g. a repeated move to the same point.
    pub fn move_to(
        &mut self,
        id: WindowId,
        x: i32,
        y: i32,
        memory: &mut LayoutMemory,
        viewport: Option<Viewport>,
    ) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        let before = window.rect();
        let rect = fit(Rect::new(x, y, window.width, window.height), viewport);
        window.set_rect(rect);
        let layout = window.layout();
        let remembered = memory.get(&window.app_id) == Some(layout);
        memory.set(window.app_id.clone(), layout);
        rect != before || !remembered
    }

    /// Set the window size, raised to the minimum. With a viewport the size
    /// is also capped at the space between the window origin and the far
    /// edges of the usable area.
    pub fn resize(
        &mut self,
        id: WindowId,
        width: i32,
        height: i32,
        memory: &mut LayoutMemory,
        viewport: Option<Viewport>,
    ) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        let mut rect = Rect::new(
            window.x,
            window.y,
            width.max(MIN_WINDOW_WIDTH),
            height.max(MIN_WINDOW_HEIGHT),
        );
        if let Some(vp) = viewport {
            rect.width = clamp(
                rect.width,
                MIN_WINDOW_WIDTH,
                vp.width.saturating_sub(rect.x.max(0)),
            );
            rect.height = clamp(
                rect.height,
                MIN_WINDOW_HEIGHT,
                vp.usable_height().saturating_sub(rect.y.max(0)),
            );
        }
        window.set_rect(fit(rect, viewport));
        memory.set(window.app_id.clone(), window.layout());
        true
    }

    /// Set origin and size together, as an edge drag does.
    pub fn place(
        &mut self,
        id: WindowId,
        rect: Rect,
        memory: &mut LayoutMemory,
        viewport: Option<Viewport>,
    ) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        window.set_rect(fit(rect, viewport));
        memory.set(window.app_id.clone(), window.layout());
        true
    }

    /// Fill half of the usable viewport. Snapping un-maximizes and focuses.
    pub fn snap_to_edge(
        &mut self,
        id: WindowId,
        edge: SnapEdge,
        viewport: Viewport,
        memory: &mut LayoutMemory,
    ) -> bool {
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        let rect = compute_snap_rect(
            edge,
            viewport.width,
            viewport.height,
            viewport.reserved_bottom,
        );
        window.set_rect(Rect {
            width: rect.width.max(MIN_WINDOW_WIDTH),
            height: rect.height.max(MIN_WINDOW_HEIGHT),
            ..rect
        });
        window.maximized = false;
        tracing::debug!(window_id = %id, %edge, ?rect, "snapped window");
        memory.set(window.app_id.clone(), window.layout());
        self.focus(id)
    }

    /// Replace the contents with windows restored from storage.
    ///
    /// Duplicate ids keep their first occurrence, sizes are raised to the
    /// minimum, z-order is renumbered, and the id sequence moves past every
    /// restored id.
    pub fn restore(&mut self, windows: Vec<WindowInstance>) {
        let mut seen = BTreeSet::new();
        self.windows = windows
            .into_iter()
            .filter(|w| seen.insert(w.id))
            .map(|mut w| {
                w.width = w.width.max(MIN_WINDOW_WIDTH);
                w.height = w.height.max(MIN_WINDOW_HEIGHT);
                w
            })
            .collect();
        let max_id = self.windows.iter().map(|w| w.id.0).max().unwrap_or(0);
        self.next_window_seq = self.next_window_seq.max(max_id.saturating_add(1));
        self.normalize();
    }

    /// Check every collection invariant.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut ids = BTreeSet::new();
        for window in &self.windows {
            if !ids.insert(window.id) {
                return Err(InvariantViolation::DuplicateId(window.id));
            }
            if window.width < MIN_WINDOW_WIDTH || window.height < MIN_WINDOW_HEIGHT {
                return Err(InvariantViolation::BelowMinimumSize {
                    id: window.id,
                    width: window.width,
                    height: window.height,
                });
            }
        }
        let mut z: Vec<u32> = self.windows.iter().map(|w| w.z_index).collect();
        z.sort_unstable();
        if z.iter().enumerate().any(|(idx, &z)| z != idx as u32 + 1) {
            return Err(InvariantViolation::SparseZOrder {
                expected: self.windows.len(),
                found: z,
            });
        }
        Ok(())
    }
}

fn fit(rect: Rect, viewport: Option<Viewport>) -> Rect {
    match viewport {
        Some(vp) => clamp_rect_to_viewport(
            rect,
            vp.width,
            vp.height,
            vp.reserved_bottom,
            MIN_WINDOW_WIDTH,
            MIN_WINDOW_HEIGHT,
        ),
        None => Rect {
            width: rect.width.max(MIN_WINDOW_WIDTH),
            height: rect.height.max(MIN_WINDOW_HEIGHT),
            ..rect
        },
    }
}
