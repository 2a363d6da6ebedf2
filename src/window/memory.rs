//! Per-application placement memory.
//!
//! Remembers where each app's window was last left so reopening it lands
//! in the same spot. Entries outlive the windows that produced them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub maximized: bool,
}

impl Layout {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutMemory {
    layouts: BTreeMap<String, Layout>,
}

impl LayoutMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, app_id: &str) -> Option<Layout> {
        self.layouts.get(app_id).copied()
    }

    /// Last write wins; nothing is merged.
    pub fn set(&mut self, app_id: impl Into<String>, layout: Layout) {
        self.layouts.insert(app_id.into(), layout);
    }

    pub fn get_all(&self) -> &BTreeMap<String, Layout> {
        &self.layouts
    }

    pub fn replace_all(&mut self, layouts: BTreeMap<String, Layout>) {
        self.layouts = layouts;
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(x: i32) -> Layout {
        Layout {
            x,
            y: 0,
            width: 500,
            height: 400,
            maximized: false,
        }
    }

    #[test]
    fn unknown_app_has_no_layout() {
        let memory = LayoutMemory::new();
        assert_eq!(memory.get("never-opened"), None);
    }

    #[test]
    fn set_overwrites() {
        let mut memory = LayoutMemory::new();
        memory.set("notes", layout(1));
        memory.set("notes", layout(2));
        assert_eq!(memory.get("notes"), Some(layout(2)));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn replace_all_swaps_whole_map() {
        let mut memory = LayoutMemory::new();
        memory.set("notes", layout(1));
        let mut next = BTreeMap::new();
        next.insert("files".to_string(), layout(7));
        memory.replace_all(next.clone());
        assert_eq!(memory.get("notes"), None);
        assert_eq!(memory.get_all(), &next);
    }

    #[test]
    fn maximized_defaults_when_missing_from_json() {
        let parsed: Layout =
            serde_json::from_str(r#"{"x":1,"y":2,"width":300,"height":200}"#).unwrap();
        assert!(!parsed.maximized);
        assert_eq!(parsed.rect(), Rect::new(1, 2, 300, 200));
    }
}
